//! Writes element stresses from a report back into an input file as a
//! lithostatic prestress (`*Initial Conditions, type=stress`).

mod parser;

pub use parser::{ElementPrestress, ElementStress, parse_stress_report};

use super::ModuleExecutor;
use super::helpers::{
    read_input_source, refuse_overwrite, require_companion, validate_request_module, write_output,
};
use super::serialization::{format_c_exponent, format_c_general_upper};
use crate::common::config::ReportMode;
use crate::domain::{AbqError, ToolArtifact, ToolModule, ToolRequest, ToolResult};
use crate::inp::is_marker_comment;
use std::fmt::Write as _;
use std::path::Path;

const STEP_MARKER: &str = "STEP";
const PRESTRESS_PREAMBLE: &str =
    "** PRESTRESSES\n*Initial Conditions, type=stress, unbalanced stress=step\n";

/// Inserts the prestress block in front of the first `** STEP` comment.
pub fn apply_prestress(source: &str, stresses: &[ElementPrestress]) -> ToolResult<String> {
    let step_line = source
        .lines()
        .position(|line| is_marker_comment(line, STEP_MARKER))
        .ok_or_else(|| {
            AbqError::input_validation(
                "INPUT.PRESTRESS_STEP",
                "no '** STEP' comment found; nowhere to insert the prestress",
            )
        })?;

    let mut content = String::with_capacity(source.len() + stresses.len() * 80);
    for (index, line) in source.lines().enumerate() {
        if index == step_line {
            content.push_str(PRESTRESS_PREAMBLE);
            for stress in stresses {
                content.push_str(&render_stress_row(stress));
                content.push('\n');
            }
        }
        content.push_str(line);
        content.push('\n');
    }
    Ok(content)
}

fn render_stress_row(row: &ElementPrestress) -> String {
    let mut line = format!("{}.{:>5}", row.part, row.element);
    match row.stress {
        ElementStress::Isotropic(stress) => {
            let value = format_c_general_upper(stress, 18);
            let _ = write!(line, ", {value}, {value}, {value}");
        }
        ElementStress::Principal(components) => {
            for component in components {
                let _ = write!(line, ", {:>11}", format_c_exponent(component, 11));
            }
        }
    }
    line
}

/// The input file must come first and the report second.
pub fn check_file_order(inp: &Path, report: &Path) -> ToolResult<()> {
    let ends_with = |path: &Path, suffix: &str| {
        path.to_string_lossy()
            .to_ascii_uppercase()
            .ends_with(suffix)
    };
    if !ends_with(inp, "INP") || !ends_with(report, "RPT") {
        return Err(AbqError::input_validation(
            "INPUT.PRESTRESS_ORDER",
            format!(
                "expected an input file then a report file, got '{}' and '{}'",
                inp.display(),
                report.display()
            ),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
pub struct PrestressModule {
    mode: ReportMode,
}

impl PrestressModule {
    pub fn new(mode: ReportMode) -> Self {
        Self { mode }
    }
}

impl ModuleExecutor for PrestressModule {
    fn execute(&self, request: &ToolRequest) -> ToolResult<Vec<ToolArtifact>> {
        validate_request_module(request, ToolModule::Prestress)?;
        let report_path = require_companion(request, "stress report")?;
        check_file_order(&request.input_path, report_path)?;
        refuse_overwrite(request)?;

        tracing::debug!(mode = %self.mode, report = %report_path.display(), "reading stress report");
        let report = read_input_source(report_path, ToolModule::Prestress)?;
        let stresses = parse_stress_report(&report, self.mode)?;
        if stresses.is_empty() {
            tracing::warn!(report = %report_path.display(), "stress report holds no element rows");
        }

        let source = read_input_source(&request.input_path, ToolModule::Prestress)?;
        let content = apply_prestress(&source, &stresses)?;
        write_output(&request.output_path, &content, ToolModule::Prestress)?;
        tracing::info!(
            elements = stresses.len(),
            output = %request.output_path.display(),
            "wrote prestress"
        );

        Ok(vec![ToolArtifact::new(&request.output_path)])
    }
}
