pub mod errors;

pub use errors::{AbqError, AbqErrorCategory, AbqResult, ParserResult, ToolResult};

use std::fmt::{Display, Formatter};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolModule {
    GravityLoads,
    MaterialTable,
    MaterialTemplate,
    Prestress,
    ThermalProfile,
}

impl ToolModule {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GravityLoads => "LOADS",
            Self::MaterialTable => "MATTABLE",
            Self::MaterialTemplate => "MATTABLE-TEMPLATE",
            Self::Prestress => "PRESTRESS",
            Self::ThermalProfile => "THERMPROFILE",
        }
    }
}

impl Display for ToolModule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

/// One invocation of a file tool: the primary input, an optional companion
/// input (material table, stress report) and where results go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRequest {
    pub module: ToolModule,
    pub input_path: PathBuf,
    pub companion_path: Option<PathBuf>,
    pub output_path: PathBuf,
}

impl ToolRequest {
    pub fn new(
        module: ToolModule,
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            module,
            input_path: input_path.into(),
            companion_path: None,
            output_path: output_path.into(),
        }
    }

    pub fn with_companion(mut self, companion_path: impl Into<PathBuf>) -> Self {
        self.companion_path = Some(companion_path.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolArtifact {
    pub path: PathBuf,
}

impl ToolArtifact {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}
