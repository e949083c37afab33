use crate::domain::{ToolArtifact, ToolRequest, ToolResult};

pub trait ModuleExecutor {
    fn execute(&self, request: &ToolRequest) -> ToolResult<Vec<ToolArtifact>>;
}
