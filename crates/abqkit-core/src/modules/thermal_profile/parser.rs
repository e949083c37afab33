use crate::domain::{AbqError, ParserResult};

const MISORDERED_SUFFIX: &str = "COOR1";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodalTemperature {
    pub node: u64,
    pub coord1: f64,
    pub coord2: f64,
    pub temperature: f64,
}

/// Reads `node COORD1 COORD2 NT` rows from a nodal temperature report.
pub fn parse_temperature_report(source: &str) -> ParserResult<Vec<NodalTemperature>> {
    let mut rows = Vec::new();

    for (index, line) in source.lines().enumerate() {
        let line_number = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        // a header ending in COOR1 means NT was exported before the coordinates
        if trimmed.to_ascii_uppercase().ends_with(MISORDERED_SUFFIX) {
            return Err(AbqError::input_validation(
                "INPUT.PROFILE_ORDER",
                format!(
                    "report line {} lists columns out of order; export COORD1, COORD2, NT",
                    line_number
                ),
            ));
        }
        if !trimmed.starts_with(|c: char| c.is_ascii_digit()) {
            continue;
        }

        let columns: Vec<&str> = trimmed.split_whitespace().collect();
        if columns.len() < 4 {
            return Err(AbqError::input_validation(
                "INPUT.PROFILE_COLUMNS",
                format!(
                    "report line {} has {} columns, expected node, COORD1, COORD2, NT",
                    line_number,
                    columns.len()
                ),
            ));
        }

        let node = columns[0].parse::<u64>().map_err(|_| {
            value_error(line_number, "node label", columns[0])
        })?;
        let number = |column: usize, label: &str| -> ParserResult<f64> {
            columns[column]
                .parse::<f64>()
                .map_err(|_| value_error(line_number, label, columns[column]))
        };

        rows.push(NodalTemperature {
            node,
            coord1: number(1, "COORD1")?,
            coord2: number(2, "COORD2")?,
            temperature: number(3, "NT")?,
        });
    }

    Ok(rows)
}

fn value_error(line_number: usize, label: &str, text: &str) -> AbqError {
    AbqError::input_validation(
        "INPUT.PROFILE_VALUE",
        format!(
            "report line {}: {} '{}' is not a number",
            line_number, label, text
        ),
    )
}
