//! Inserts per-set gravity body loads (`*Dload`, BRNU/BZNU) ahead of the
//! output requests of an Abaqus input file.

mod parser;

use super::ModuleExecutor;
use super::helpers::{read_input_source, refuse_overwrite, validate_request_module, write_output};
use crate::domain::{AbqError, ToolArtifact, ToolModule, ToolRequest, ToolResult};
use parser::{ModelInventory, OUTPUT_REQUESTS_MARKER, parse_model_inventory};
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq)]
pub struct GravityLoadsOutcome {
    pub content: String,
    pub load_count: usize,
}

pub struct GravityLoadsModule;

impl ModuleExecutor for GravityLoadsModule {
    fn execute(&self, request: &ToolRequest) -> ToolResult<Vec<ToolArtifact>> {
        validate_request_module(request, ToolModule::GravityLoads)?;
        refuse_overwrite(request)?;

        let source = read_input_source(&request.input_path, ToolModule::GravityLoads)?;
        let outcome = apply_gravity_loads(&source)?;
        write_output(&request.output_path, &outcome.content, ToolModule::GravityLoads)?;
        tracing::info!(
            loads = outcome.load_count,
            output = %request.output_path.display(),
            "wrote gravity loads"
        );

        Ok(vec![ToolArtifact::new(&request.output_path)])
    }
}

pub fn apply_gravity_loads(source: &str) -> ToolResult<GravityLoadsOutcome> {
    let inventory = parse_model_inventory(source)?;
    let marker_line = inventory.marker_line.ok_or_else(|| {
        AbqError::input_validation(
            "INPUT.LOADS_MARKER",
            format!(
                "no '** {}' marker found; nowhere to insert loads",
                OUTPUT_REQUESTS_MARKER
            ),
        )
    })?;
    let block = render_load_block(&inventory)?;

    let mut content = String::with_capacity(source.len() + block.len());
    for (index, line) in source.lines().enumerate() {
        if index == marker_line {
            content.push_str(&block);
        }
        content.push_str(line);
        content.push('\n');
    }

    Ok(GravityLoadsOutcome {
        content,
        load_count: inventory.set_materials.len(),
    })
}

fn render_load_block(inventory: &ModelInventory) -> ToolResult<String> {
    let loads = inventory.set_loads()?;
    if loads.is_empty() {
        tracing::warn!("model defines no *Solid Section; writing an empty LOADS block");
    }

    let mut block = String::from("** LOADS\n**\n");
    if !loads.is_empty() {
        let instance = inventory.instance_name.as_deref().ok_or_else(|| {
            AbqError::input_validation(
                "INPUT.LOADS_INSTANCE",
                "model has sections but no *Instance name to qualify the load sets",
            )
        })?;
        for load in loads {
            tracing::debug!(set = load.set_name, density = load.density, "gravity load");
            let _ = write!(
                block,
                "**\n** MATERIAL: {set}, DENSITY: {density:.6}\n*Dload\n\
                 {instance}.{set}, BRNU, {density:.6}\n\
                 {instance}.{set}, BZNU, {density:.6}\n",
                set = load.set_name,
                density = load.density,
            );
        }
    }
    block.push_str("**\n");
    Ok(block)
}
