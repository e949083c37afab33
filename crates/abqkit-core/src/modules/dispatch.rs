use super::ModuleExecutor;
use super::gravity_loads::GravityLoadsModule;
use super::material_table::{MaterialTableModule, MaterialTemplateModule};
use super::prestress::PrestressModule;
use super::thermal_profile::ThermalProfileModule;
use crate::common::config::RunConfig;
use crate::domain::{ToolArtifact, ToolModule, ToolRequest, ToolResult};

pub fn executor_for(module: ToolModule, config: &RunConfig) -> Box<dyn ModuleExecutor> {
    match module {
        ToolModule::GravityLoads => Box::new(GravityLoadsModule),
        ToolModule::MaterialTable => {
            Box::new(MaterialTableModule::new(config.material_table.clone()))
        }
        ToolModule::MaterialTemplate => Box::new(MaterialTemplateModule),
        ToolModule::Prestress => Box::new(PrestressModule::new(config.prestress.mode)),
        ToolModule::ThermalProfile => {
            Box::new(ThermalProfileModule::new(config.thermal_profile.clone()))
        }
    }
}

pub fn execute_tool(request: &ToolRequest, config: &RunConfig) -> ToolResult<Vec<ToolArtifact>> {
    tracing::debug!(
        module = %request.module,
        input = %request.input_path.display(),
        "dispatching tool"
    );
    executor_for(request.module, config).execute(request)
}
