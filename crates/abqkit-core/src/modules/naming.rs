//! Output file names derived from input names.

use crate::domain::{AbqError, ToolResult};
use regex::Regex;
use std::path::{Path, PathBuf};

/// Replaces every `input_tag` in the file name with `output_tag`
/// (`model_noload.inp` -> `model.inp`).
pub fn tagged_output_path(input: &Path, input_tag: &str, output_tag: &str) -> ToolResult<PathBuf> {
    let file_name = file_name_of(input)?;
    if input_tag.is_empty() || !file_name.contains(input_tag) {
        return Err(AbqError::input_validation(
            "INPUT.OUTPUT_NAME",
            format!(
                "input file '{}' does not contain the tag '{}'; refusing to overwrite it",
                input.display(),
                input_tag
            ),
        ));
    }
    Ok(input.with_file_name(file_name.replace(input_tag, output_tag)))
}

/// Steps the iteration tag of a prestress input: the `.inp` tag is replaced
/// by the report's iteration number plus one (`m_ps0.inp` + `m_ps2.rpt` ->
/// `m_ps3.inp`). The last `<prefix><digits>` in each file name is the tag.
pub fn next_iteration_path(inp: &Path, report: &Path, prefix: &str) -> ToolResult<PathBuf> {
    let pattern = Regex::new(&format!(r"{}(\d+)", regex::escape(prefix))).map_err(|error| {
        AbqError::input_validation(
            "INPUT.ITERATION_TAG",
            format!("invalid iteration tag prefix '{}': {}", prefix, error),
        )
    })?;

    let inp_name = file_name_of(inp)?;
    let report_name = file_name_of(report)?;

    let inp_tag = pattern
        .captures_iter(inp_name)
        .last()
        .and_then(|captures| captures.get(0))
        .ok_or_else(|| missing_tag(inp, prefix))?;
    let report_digits = pattern
        .captures_iter(report_name)
        .last()
        .and_then(|captures| captures.get(1))
        .ok_or_else(|| missing_tag(report, prefix))?
        .as_str();
    let next_iteration = report_digits
        .parse::<u64>()
        .ok()
        .and_then(|iteration| iteration.checked_add(1))
        .ok_or_else(|| {
            AbqError::input_validation(
                "INPUT.ITERATION_TAG",
                format!(
                    "iteration tag '{}{}' of '{}' is too large to step",
                    prefix,
                    report_digits,
                    report.display()
                ),
            )
        })?;

    let next_name = format!(
        "{}{}{}{}",
        &inp_name[..inp_tag.start()],
        prefix,
        next_iteration,
        &inp_name[inp_tag.end()..]
    );
    Ok(inp.with_file_name(next_name))
}

/// Material table skeleton written next to a model: the part of the file
/// stem before the first `_`, plus `_mat_noalpha.txt`.
pub fn default_template_path(input: &Path) -> ToolResult<PathBuf> {
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| {
            AbqError::input_validation(
                "INPUT.OUTPUT_NAME",
                format!("'{}' has no usable file name", input.display()),
            )
        })?;
    let base = stem.split('_').next().unwrap_or(stem);
    Ok(input.with_file_name(format!("{base}_mat_noalpha.txt")))
}

fn file_name_of(path: &Path) -> ToolResult<&str> {
    path.file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            AbqError::input_validation(
                "INPUT.OUTPUT_NAME",
                format!("'{}' has no usable file name", path.display()),
            )
        })
}

fn missing_tag(path: &Path, prefix: &str) -> AbqError {
    AbqError::input_validation(
        "INPUT.ITERATION_TAG",
        format!(
            "'{}' carries no '{}<n>' iteration tag; refusing to overwrite the input",
            path.display(),
            prefix
        ),
    )
}
