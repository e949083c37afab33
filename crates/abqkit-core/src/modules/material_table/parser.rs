use crate::domain::{AbqError, ParserResult};

const TABLE_COLUMNS: usize = 7;

/// One row of a material table:
/// `name depth T_i dens_i T_f dens_f alpha_l`.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialRecord {
    pub name: String,
    pub depth: f64,
    pub initial_temperature: f64,
    pub initial_density: f64,
    pub final_temperature: f64,
    pub final_density: f64,
    pub linear_expansion: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialTable {
    records: Vec<MaterialRecord>,
}

impl MaterialTable {
    pub fn records(&self) -> &[MaterialRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Abaqus material names are case-insensitive.
    pub fn get(&self, name: &str) -> Option<&MaterialRecord> {
        self.records
            .iter()
            .find(|record| record.name.eq_ignore_ascii_case(name))
    }
}

/// Parses a material table. The first line is a column header and is
/// skipped; blank lines are ignored.
pub fn parse_material_table(source: &str) -> ParserResult<MaterialTable> {
    let mut records: Vec<MaterialRecord> = Vec::new();

    for (index, line) in source.lines().enumerate().skip(1) {
        let line_number = index + 1;
        let columns: Vec<&str> = line.split_whitespace().collect();
        if columns.is_empty() {
            continue;
        }
        if columns.len() != TABLE_COLUMNS {
            return Err(AbqError::input_validation(
                "INPUT.MATTABLE_ROW",
                format!(
                    "material table line {} has {} columns, expected {}",
                    line_number,
                    columns.len(),
                    TABLE_COLUMNS
                ),
            ));
        }

        let name = columns[0];
        if records
            .iter()
            .any(|record| record.name.eq_ignore_ascii_case(name))
        {
            return Err(AbqError::input_validation(
                "INPUT.MATTABLE_DUPLICATE",
                format!(
                    "material '{}' is listed twice (line {})",
                    name, line_number
                ),
            ));
        }

        let number = |column: usize, label: &str| -> ParserResult<f64> {
            columns[column].parse::<f64>().map_err(|_| {
                AbqError::input_validation(
                    "INPUT.MATTABLE_VALUE",
                    format!(
                        "material table line {}: {} '{}' is not a number",
                        line_number, label, columns[column]
                    ),
                )
            })
        };

        records.push(MaterialRecord {
            name: name.to_string(),
            depth: number(1, "depth")?,
            initial_temperature: number(2, "initial temperature")?,
            initial_density: number(3, "initial density")?,
            final_temperature: number(4, "final temperature")?,
            final_density: number(5, "final density")?,
            linear_expansion: number(6, "linear expansion")?,
        });
    }

    Ok(MaterialTable { records })
}
