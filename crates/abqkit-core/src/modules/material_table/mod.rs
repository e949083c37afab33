//! Fills material placeholders of an Abaqus input file from a material table
//! and, optionally, writes one gravity body load per material.

mod model;
mod parser;

pub use model::{MaterialRewrite, SubstitutionCounts, material_table_template};
pub use parser::{MaterialRecord, MaterialTable, parse_material_table};

use super::ModuleExecutor;
use super::helpers::{
    read_input_source, refuse_overwrite, require_companion, validate_request_module, write_output,
};
use crate::common::config::MaterialTableConfig;
use crate::domain::{ToolArtifact, ToolModule, ToolRequest, ToolResult};
use model::MaterialRewriter;

pub fn apply_material_table(
    source: &str,
    table: &MaterialTable,
    config: &MaterialTableConfig,
) -> ToolResult<MaterialRewrite> {
    MaterialRewriter::new(config, table).rewrite(source)
}

#[derive(Debug, Clone, Default)]
pub struct MaterialTableModule {
    config: MaterialTableConfig,
}

impl MaterialTableModule {
    pub fn new(config: MaterialTableConfig) -> Self {
        Self { config }
    }
}

impl ModuleExecutor for MaterialTableModule {
    fn execute(&self, request: &ToolRequest) -> ToolResult<Vec<ToolArtifact>> {
        validate_request_module(request, ToolModule::MaterialTable)?;
        refuse_overwrite(request)?;
        let table_path = require_companion(request, "material table")?;

        let table_source = read_input_source(table_path, ToolModule::MaterialTable)?;
        let table = parse_material_table(&table_source)?;
        tracing::debug!(materials = table.len(), table = %table_path.display(), "read material table");

        let source = read_input_source(&request.input_path, ToolModule::MaterialTable)?;
        let rewrite = apply_material_table(&source, &table, &self.config)?;
        if rewrite.counts == SubstitutionCounts::default() {
            tracing::warn!(
                input = %request.input_path.display(),
                "no material placeholders or LOADS marker found; output equals input"
            );
        }
        write_output(&request.output_path, &rewrite.content, ToolModule::MaterialTable)?;
        tracing::info!(
            densities = rewrite.counts.densities,
            expansions = rewrite.counts.expansions,
            creep_tables = rewrite.counts.creep_tables,
            load_blocks = rewrite.counts.load_blocks,
            output = %request.output_path.display(),
            "wrote material properties"
        );

        Ok(vec![ToolArtifact::new(&request.output_path)])
    }
}

pub struct MaterialTemplateModule;

impl ModuleExecutor for MaterialTemplateModule {
    fn execute(&self, request: &ToolRequest) -> ToolResult<Vec<ToolArtifact>> {
        validate_request_module(request, ToolModule::MaterialTemplate)?;
        refuse_overwrite(request)?;

        let source = read_input_source(&request.input_path, ToolModule::MaterialTemplate)?;
        let template = material_table_template(&source);
        write_output(&request.output_path, &template, ToolModule::MaterialTemplate)?;
        tracing::info!(
            materials = template.lines().count().saturating_sub(1),
            output = %request.output_path.display(),
            "wrote material table template"
        );

        Ok(vec![ToolArtifact::new(&request.output_path)])
    }
}

#[cfg(test)]
mod tests {
    use super::{MaterialTableModule, MaterialTemplateModule, parse_material_table};
    use crate::common::config::MaterialTableConfig;
    use crate::domain::{ToolModule, ToolRequest};
    use crate::modules::ModuleExecutor;
    use std::fs;
    use tempfile::TempDir;

    const MODEL: &str = "\
*Material, name=ANORTH000
*Density
 42.42,
*Expansion
 0.00042,
** LOADS
";

    #[test]
    fn executor_requires_the_table() {
        let request = ToolRequest::new(ToolModule::MaterialTable, "m_nomat.inp", "m.inp");
        let error = MaterialTableModule::default()
            .execute(&request)
            .expect_err("table missing");
        assert_eq!(error.code(), "INPUT.TOOL_COMPANION");
    }

    #[test]
    fn executor_rewrites_model_and_template_round_trips_names() {
        let temp = TempDir::new().expect("tempdir should be created");
        let input = temp.path().join("ori_nomat.inp");
        let template_path = temp.path().join("ori.mattable");
        let output = temp.path().join("ori.inp");
        fs::write(&input, MODEL).expect("input should be written");

        MaterialTemplateModule
            .execute(&ToolRequest::new(
                ToolModule::MaterialTemplate,
                &input,
                &template_path,
            ))
            .expect("template should be written");

        // fill the skeleton row the way a user would
        let skeleton = fs::read_to_string(&template_path).expect("template should exist");
        let filled = skeleton.replace("ANORTH000  ", "ANORTH000 0 250 2800 250 2810 2.4e-5");
        let table = parse_material_table(&filled).expect("filled template should parse");
        assert_eq!(table.len(), 1);
        fs::write(&template_path, filled).expect("table should be written");

        let request = ToolRequest::new(ToolModule::MaterialTable, &input, &output)
            .with_companion(&template_path);
        MaterialTableModule::new(MaterialTableConfig::default())
            .execute(&request)
            .expect("rewrite should succeed");

        let written = fs::read_to_string(&output).expect("output should exist");
        assert!(written.contains("*Density\n    2800.000000,\n"));
        assert!(written.contains("    0.000024000000,\n"));
        assert!(written.contains("master-1.ANORTH000, BZNU, 2810.000000\n** LOADS\n"));
    }
}
