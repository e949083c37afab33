//! Run configuration shared by the file tools.
//!
//! Every field has a default, so an empty JSON object (or no file at all) is a
//! valid configuration. Command-line flags are applied on top by the CLI.

use super::constants::{
    DEFAULT_BASIN_DEPTH, DEFAULT_RIGHTSIDE_ANGLE, DEFAULT_RIGHTSIDE_DISTANCE, LUNAR_RADIUS,
};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunConfig {
    pub gravity_loads: GravityLoadsConfig,
    pub material_table: MaterialTableConfig,
    pub prestress: PrestressConfig,
    pub thermal_profile: ThermalProfileConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GravityLoadsConfig {
    pub input_tag: String,
    pub output_tag: String,
}

impl Default for GravityLoadsConfig {
    fn default() -> Self {
        Self {
            input_tag: "_noload".to_string(),
            output_tag: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MaterialTableConfig {
    pub input_tag: String,
    pub output_tag: String,
    pub assembly_name: String,
    pub material_density: DensityChoice,
    pub gravity_density: DensityChoice,
    pub write_loads: bool,
    pub geoid_mode: bool,
    pub forbidden_names: Vec<String>,
    /// Data lines written in place of the viscosity sentinel, verbatim.
    pub creep_table: Vec<String>,
}

impl Default for MaterialTableConfig {
    fn default() -> Self {
        Self {
            input_tag: "_nomat".to_string(),
            output_tag: String::new(),
            assembly_name: "master-1".to_string(),
            material_density: DensityChoice::Initial,
            gravity_density: DensityChoice::Final,
            write_loads: true,
            geoid_mode: false,
            forbidden_names: vec!["POOL".to_string(), "CAP".to_string(), "ANNULUS".to_string()],
            creep_table: vec![
                "    2.5e-31,     1.0,    0.,     0.".to_string(),
                "    2.5e-31,     1.0,    0.,   700.".to_string(),
                "    2.5e-25,     1.0,    0.,   800.".to_string(),
                "    2.5e-25,     1.0,    0.,  9999.".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrestressConfig {
    pub mode: ReportMode,
    pub tag_prefix: String,
}

impl Default for PrestressConfig {
    fn default() -> Self {
        Self {
            mode: ReportMode::Flat,
            tag_prefix: "ps".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThermalProfileConfig {
    pub geometry: ProfileGeometry,
    pub basin_depth: f64,
    pub planet_radius: f64,
    pub rightside_angle: f64,
    pub rightside_distance: f64,
    pub edge_tolerance: f64,
    pub selection: EdgeSelection,
    pub plot_script: Option<PathBuf>,
}

impl Default for ThermalProfileConfig {
    fn default() -> Self {
        Self {
            geometry: ProfileGeometry::Curved,
            basin_depth: DEFAULT_BASIN_DEPTH,
            planet_radius: LUNAR_RADIUS,
            rightside_angle: DEFAULT_RIGHTSIDE_ANGLE,
            rightside_distance: DEFAULT_RIGHTSIDE_DISTANCE,
            edge_tolerance: 1.0e-9,
            selection: EdgeSelection::All,
            plot_script: None,
        }
    }
}

/// Which of a material's two tabulated densities feeds a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DensityChoice {
    Initial,
    Final,
    Average,
}

impl DensityChoice {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Final => "final",
            Self::Average => "average",
        }
    }

    pub fn select(self, initial: f64, final_: f64) -> f64 {
        match self {
            Self::Initial => initial,
            Self::Final => final_,
            Self::Average => (initial + final_) / 2.0,
        }
    }
}

/// Layout of a stress report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    /// Axisymmetric, flat surface; S22 per element.
    Flat,
    /// Axisymmetric, curved surface; radial stress in transformed coordinates.
    Curved,
    /// Full 3D; S11, S22, S33 per element.
    #[serde(alias = "3d")]
    Threedee,
}

impl ReportMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Curved => "curved",
            Self::Threedee => "threedee",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileGeometry {
    Flat,
    Curved,
}

impl ProfileGeometry {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Curved => "curved",
        }
    }
}

/// Which profile files are handed to the plotting script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeSelection {
    All,
    Left,
    Right,
    Edges,
}

impl EdgeSelection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Left => "left",
            Self::Right => "right",
            Self::Edges => "edges",
        }
    }
}

macro_rules! impl_choice_parsing {
    ($ty:ty, $label:literal, [$($text:literal => $variant:expr),+ $(,)?]) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($variant),)+
                    other => Err(format!(
                        "unknown {} '{}' (expected one of: {})",
                        $label,
                        other,
                        [$($text),+].join(", ")
                    )),
                }
            }
        }

        impl Display for $ty {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

impl_choice_parsing!(DensityChoice, "density choice", [
    "initial" => DensityChoice::Initial,
    "final" => DensityChoice::Final,
    "average" => DensityChoice::Average,
]);

impl_choice_parsing!(ReportMode, "report mode", [
    "flat" => ReportMode::Flat,
    "curved" => ReportMode::Curved,
    "threedee" => ReportMode::Threedee,
    "3d" => ReportMode::Threedee,
]);

impl_choice_parsing!(ProfileGeometry, "model geometry", [
    "flat" => ProfileGeometry::Flat,
    "curved" => ProfileGeometry::Curved,
]);

impl_choice_parsing!(EdgeSelection, "edge selection", [
    "all" => EdgeSelection::All,
    "left" => EdgeSelection::Left,
    "right" => EdgeSelection::Right,
    "edges" => EdgeSelection::Edges,
]);

#[derive(Debug, thiserror::Error)]
pub enum RunConfigError {
    #[error("failed to read run configuration '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse run configuration '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub fn load_run_config(config_path: impl AsRef<Path>) -> Result<RunConfig, RunConfigError> {
    let config_path = config_path.as_ref();
    let source = fs::read_to_string(config_path).map_err(|source| RunConfigError::Read {
        path: config_path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&source).map_err(|source| RunConfigError::Parse {
        path: config_path.to_path_buf(),
        source,
    })
}
