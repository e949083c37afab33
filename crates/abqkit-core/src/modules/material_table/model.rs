use super::parser::{MaterialRecord, MaterialTable};
use crate::common::config::MaterialTableConfig;
use crate::domain::{AbqError, ToolResult};
use crate::inp::InpLine;
use std::fmt::Write as _;

// Placeholder values the CAE model is built with; each marks a line to be
// replaced from the material table.
pub(super) const VISCOSITY_SENTINEL: &str = "4.2E-42";
pub(super) const DENSITY_SENTINEL: &str = "42.42";
pub(super) const EXPANSION_SENTINEL: &str = "0.00042";
pub(super) const LOADS_MARKER: &str = "LOADS";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubstitutionCounts {
    pub creep_tables: usize,
    pub densities: usize,
    pub expansions: usize,
    pub load_blocks: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MaterialRewrite {
    pub content: String,
    pub counts: SubstitutionCounts,
}

pub(super) struct MaterialRewriter<'a> {
    config: &'a MaterialTableConfig,
    table: &'a MaterialTable,
}

impl<'a> MaterialRewriter<'a> {
    pub(super) fn new(config: &'a MaterialTableConfig, table: &'a MaterialTable) -> Self {
        Self { config, table }
    }

    pub(super) fn rewrite(&self, source: &str) -> ToolResult<MaterialRewrite> {
        let mut content = String::with_capacity(source.len());
        let mut counts = SubstitutionCounts::default();
        let mut current_material: Option<&str> = None;

        for (index, line) in source.lines().enumerate() {
            let line_number = index + 1;
            let trimmed = line.trim();

            if let InpLine::Keyword(keyword) = InpLine::classify(line) {
                if keyword.is("MATERIAL") {
                    current_material = keyword.parameter("name");
                }
            }

            if trimmed.to_ascii_uppercase().starts_with(VISCOSITY_SENTINEL) {
                self.material_at(current_material, line_number)?;
                for row in &self.config.creep_table {
                    content.push_str(row);
                    content.push('\n');
                }
                counts.creep_tables += 1;
                continue;
            }

            if trimmed.starts_with(DENSITY_SENTINEL) {
                let record = self.material_at(current_material, line_number)?;
                let density = self
                    .config
                    .material_density
                    .select(record.initial_density, record.final_density);
                let _ = writeln!(content, "    {density:.6},");
                counts.densities += 1;
                continue;
            }

            if trimmed.starts_with(EXPANSION_SENTINEL) {
                let record = self.material_at(current_material, line_number)?;
                let _ = writeln!(content, "    {:.12},", record.linear_expansion);
                counts.expansions += 1;
                continue;
            }

            if self.config.write_loads && trimmed.ends_with(LOADS_MARKER) {
                self.write_load_block(&mut content);
                counts.load_blocks += 1;
            }

            content.push_str(line);
            content.push('\n');
        }

        Ok(MaterialRewrite { content, counts })
    }

    fn material_at(
        &self,
        current_material: Option<&str>,
        line_number: usize,
    ) -> ToolResult<&'a MaterialRecord> {
        let name = current_material.ok_or_else(|| {
            AbqError::input_validation(
                "INPUT.MATTABLE_CONTEXT",
                format!(
                    "placeholder on line {} appears before any *Material",
                    line_number
                ),
            )
        })?;
        self.table.get(name).ok_or_else(|| {
            AbqError::input_validation(
                "INPUT.MATTABLE_MISSING",
                format!(
                    "material '{}' (line {}) is not in the material table",
                    name, line_number
                ),
            )
        })
    }

    fn write_load_block(&self, content: &mut String) {
        let choice = self.config.gravity_density;
        for record in self.table.records() {
            if self.config.geoid_mode && self.is_forbidden(&record.name) {
                tracing::debug!(material = %record.name, "geoid mode: skipping load");
                continue;
            }
            let density = choice.select(record.initial_density, record.final_density);
            let _ = write!(
                content,
                "** Name: {name}_grav  Type: Body force\n\
                 ** using material's {choice} density for Fg\n\
                 *Dload\n\
                 {assembly}.{name}, BRNU, {density:.6}\n\
                 {assembly}.{name}, BZNU, {density:.6}\n",
                name = record.name,
                assembly = self.config.assembly_name,
            );
        }
    }

    fn is_forbidden(&self, material: &str) -> bool {
        let upper = material.to_ascii_uppercase();
        self.config
            .forbidden_names
            .iter()
            .any(|fragment| upper.contains(&fragment.to_ascii_uppercase()))
    }
}

/// Skeleton material table for a model: the column header plus one row per
/// `*Material` name, in file order.
pub fn material_table_template(source: &str) -> String {
    let mut content = format!(
        "{:<15} {:<11} {:<11} {:<11} {:<11} {:<11} {:<11}\n",
        "Region", "Depth", "Temp_i", "Dens_i", "Temp_f", "Dens_f", "Alpha_l"
    );
    for line in source.lines() {
        if let InpLine::Keyword(keyword) = InpLine::classify(line) {
            if keyword.is("MATERIAL") {
                if let Some(name) = keyword.parameter("name") {
                    let _ = writeln!(content, "{name:<11}");
                }
            }
        }
    }
    content
}

#[cfg(test)]
mod tests {
    use super::{MaterialRewriter, material_table_template};
    use crate::common::config::{DensityChoice, MaterialTableConfig};
    use crate::modules::material_table::parser::parse_material_table;

    const TABLE: &str = "\
Region Depth Temp_i Dens_i Temp_f Dens_f Alpha_l
CRUST000 0 250 2550 250 2600 3.0e-5
POOLA000 0 1500 2900 1100 3100 2.5e-5
";

    const MODEL: &str = "\
*Material, name=CRUST000
*Density
    42.42,
*Expansion
    0.00042,
*Viscoelastic, time=CREEP LAW
    4.2e-42,     1.0,    0.,     0.
*Material, name=POOLA000
*Density
    42.42,
** LOADS
*Step, name=Step-1
";

    fn rewrite(config: &MaterialTableConfig) -> super::MaterialRewrite {
        let table = parse_material_table(TABLE).expect("table should parse");
        MaterialRewriter::new(config, &table)
            .rewrite(MODEL)
            .expect("rewrite should succeed")
    }

    #[test]
    fn placeholders_are_replaced_from_table() {
        let result = rewrite(&MaterialTableConfig::default());
        assert_eq!(result.counts.densities, 2);
        assert_eq!(result.counts.expansions, 1);
        assert_eq!(result.counts.creep_tables, 1);
        assert_eq!(result.counts.load_blocks, 1);

        assert!(result.content.contains("*Density\n    2550.000000,\n*Expansion\n"));
        assert!(result.content.contains("    0.000030000000,\n"));
        assert!(result.content.contains(
            "*Viscoelastic, time=CREEP LAW\n    2.5e-31,     1.0,    0.,     0.\n"
        ));
        assert!(result.content.contains("    2.5e-25,     1.0,    0.,  9999.\n*Material"));
        assert!(!result.content.contains("42.42"));
        assert!(!result.content.contains("4.2e-42"));
    }

    #[test]
    fn load_block_uses_gravity_density_before_marker() {
        let result = rewrite(&MaterialTableConfig::default());
        let expected = "\
** Name: CRUST000_grav  Type: Body force
** using material's final density for Fg
*Dload
master-1.CRUST000, BRNU, 2600.000000
master-1.CRUST000, BZNU, 2600.000000
** Name: POOLA000_grav  Type: Body force
** using material's final density for Fg
*Dload
master-1.POOLA000, BRNU, 3100.000000
master-1.POOLA000, BZNU, 3100.000000
** LOADS
*Step, name=Step-1
";
        assert!(result.content.ends_with(expected));
    }

    #[test]
    fn geoid_mode_skips_forbidden_units_and_average_density() {
        let config = MaterialTableConfig {
            geoid_mode: true,
            gravity_density: DensityChoice::Average,
            material_density: DensityChoice::Final,
            ..MaterialTableConfig::default()
        };
        let result = rewrite(&config);
        assert!(!result.content.contains("POOLA000_grav"));
        assert!(result.content.contains("master-1.CRUST000, BRNU, 2575.000000"));
        assert!(result.content.contains("** using material's average density for Fg"));
        assert!(result.content.contains("*Density\n    2600.000000,\n"));
    }

    #[test]
    fn loads_are_left_alone_when_disabled() {
        let config = MaterialTableConfig {
            write_loads: false,
            ..MaterialTableConfig::default()
        };
        let result = rewrite(&config);
        assert_eq!(result.counts.load_blocks, 0);
        assert!(!result.content.contains("*Dload"));
        assert!(result.content.contains("** LOADS\n"));
    }

    #[test]
    fn unknown_material_and_orphan_placeholder_fail() {
        let table = parse_material_table(TABLE).expect("table should parse");
        let config = MaterialTableConfig::default();
        let rewriter = MaterialRewriter::new(&config, &table);

        let error = rewriter
            .rewrite("*Material, name=MANTLE300\n*Density\n 42.42,\n")
            .expect_err("material absent");
        assert_eq!(error.code(), "INPUT.MATTABLE_MISSING");
        assert!(error.message().contains("line 3"));

        let error = rewriter.rewrite(" 42.42,\n").expect_err("no material yet");
        assert_eq!(error.code(), "INPUT.MATTABLE_CONTEXT");
    }

    #[test]
    fn template_lists_materials_in_file_order() {
        let template = material_table_template(MODEL);
        let lines: Vec<&str> = template.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Region          Depth       Temp_i"));
        assert_eq!(lines[1], "CRUST000   ");
        assert_eq!(lines[2], "POOLA000   ");
    }
}
