//! Splits a nodal temperature report into temperature/depth profiles for the
//! left edge (basin centre), the right edge and the rest of a model.

mod parser;

pub use parser::{NodalTemperature, parse_temperature_report};

use super::ModuleExecutor;
use super::helpers::{read_input_source, validate_request_module, write_output};
use super::serialization::format_fixed_f64;
use crate::common::config::{EdgeSelection, ProfileGeometry, ThermalProfileConfig};
use crate::domain::{ToolArtifact, ToolModule, ToolRequest, ToolResult};
use std::path::{Path, PathBuf};

pub const LEFT_PROFILE_FILE: &str = "edgeleft.thermprofile";
pub const RIGHT_PROFILE_FILE: &str = "edgeright.thermprofile";
pub const MIDDLE_PROFILE_FILE: &str = "middle.thermprofile";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfilePoint {
    pub temperature: f64,
    pub depth: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThermalProfiles {
    pub left: Vec<ProfilePoint>,
    pub right: Vec<ProfilePoint>,
    pub middle: Vec<ProfilePoint>,
}

impl ThermalProfiles {
    fn files(&self) -> [(&'static str, &[ProfilePoint]); 3] {
        [
            (LEFT_PROFILE_FILE, self.left.as_slice()),
            (RIGHT_PROFILE_FILE, self.right.as_slice()),
            (MIDDLE_PROFILE_FILE, self.middle.as_slice()),
        ]
    }
}

/// Sorts report rows onto the left edge, right edge or interior.
///
/// Flat models use `x = COORD1`, `y = COORD2`. Curved models use
/// `depth = COORD1 - planet_radius` and `theta = COORD2`. Left-edge depths are
/// shifted by the basin depth.
pub fn split_profiles(rows: &[NodalTemperature], config: &ThermalProfileConfig) -> ThermalProfiles {
    let near = |value: f64, target: f64| (value - target).abs() <= config.edge_tolerance;
    let right_edge = match config.geometry {
        ProfileGeometry::Flat => config.rightside_distance,
        ProfileGeometry::Curved => config.rightside_angle,
    };

    let mut profiles = ThermalProfiles::default();
    for row in rows {
        let (position, depth) = match config.geometry {
            ProfileGeometry::Flat => (row.coord1, row.coord2),
            ProfileGeometry::Curved => (row.coord2, -(config.planet_radius - row.coord1)),
        };
        let temperature = row.temperature;
        if near(position, 0.0) {
            profiles.left.push(ProfilePoint {
                temperature,
                depth: depth + config.basin_depth,
            });
        } else if near(position, right_edge) {
            profiles.right.push(ProfilePoint { temperature, depth });
        } else {
            profiles.middle.push(ProfilePoint { temperature, depth });
        }
    }
    profiles
}

pub fn render_profile(points: &[ProfilePoint]) -> String {
    points
        .iter()
        .map(|point| {
            format!(
                "{} {}\n",
                format_fixed_f64(point.temperature, 14, 6),
                format_fixed_f64(point.depth, 14, 6)
            )
        })
        .collect()
}

/// Profile files handed to the plotting script, in argument order.
pub fn selected_profile_files(selection: EdgeSelection) -> &'static [&'static str] {
    match selection {
        EdgeSelection::All => &[LEFT_PROFILE_FILE, RIGHT_PROFILE_FILE, MIDDLE_PROFILE_FILE],
        EdgeSelection::Left => &[LEFT_PROFILE_FILE],
        EdgeSelection::Right => &[RIGHT_PROFILE_FILE],
        EdgeSelection::Edges => &[LEFT_PROFILE_FILE, RIGHT_PROFILE_FILE],
    }
}

/// Writes all three profiles into a directory given as the request output.
#[derive(Debug, Clone, Default)]
pub struct ThermalProfileModule {
    config: ThermalProfileConfig,
}

impl ThermalProfileModule {
    pub fn new(config: ThermalProfileConfig) -> Self {
        Self { config }
    }

    pub fn profile_paths(&self, output_dir: &Path) -> Vec<PathBuf> {
        selected_profile_files(self.config.selection)
            .iter()
            .map(|name| output_dir.join(name))
            .collect()
    }
}

impl ModuleExecutor for ThermalProfileModule {
    fn execute(&self, request: &ToolRequest) -> ToolResult<Vec<ToolArtifact>> {
        validate_request_module(request, ToolModule::ThermalProfile)?;

        let source = read_input_source(&request.input_path, ToolModule::ThermalProfile)?;
        let rows = parse_temperature_report(&source)?;
        let profiles = split_profiles(&rows, &self.config);
        tracing::info!(
            geometry = %self.config.geometry,
            left = profiles.left.len(),
            right = profiles.right.len(),
            middle = profiles.middle.len(),
            "split temperature report"
        );
        if profiles.left.is_empty() && profiles.right.is_empty() {
            tracing::warn!("no nodes matched either model edge; check geometry settings");
        }

        let mut artifacts = Vec::with_capacity(3);
        for (name, points) in profiles.files() {
            let path = request.output_path.join(name);
            write_output(&path, &render_profile(points), ToolModule::ThermalProfile)?;
            tracing::debug!(path = %path.display(), points = points.len(), "wrote profile");
            artifacts.push(ToolArtifact::new(path));
        }
        Ok(artifacts)
    }
}
