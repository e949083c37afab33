use super::serialization::write_text_artifact;
use crate::domain::{AbqError, ToolModule, ToolRequest, ToolResult};
use std::fs;
use std::path::Path;

pub(crate) fn validate_request_module(request: &ToolRequest, expected: ToolModule) -> ToolResult<()> {
    if request.module != expected {
        return Err(AbqError::input_validation(
            "INPUT.TOOL_MODULE",
            format!("{} tool cannot run a {} request", expected, request.module),
        ));
    }
    Ok(())
}

pub(crate) fn require_companion<'a>(
    request: &'a ToolRequest,
    description: &str,
) -> ToolResult<&'a Path> {
    request.companion_path.as_deref().ok_or_else(|| {
        AbqError::input_validation(
            "INPUT.TOOL_COMPANION",
            format!("{} tool requires a {}", request.module, description),
        )
    })
}

pub(crate) fn read_input_source(path: &Path, module: ToolModule) -> ToolResult<String> {
    fs::read_to_string(path).map_err(|source| {
        AbqError::io_system(
            "IO.INPUT_READ",
            format!(
                "failed to read {} input '{}': {}",
                module,
                path.display(),
                source
            ),
        )
    })
}

pub(crate) fn write_output(path: &Path, content: &str, module: ToolModule) -> ToolResult<()> {
    write_text_artifact(path, content).map_err(|source| {
        AbqError::io_system(
            "IO.OUTPUT_WRITE",
            format!(
                "failed to write {} output '{}': {}",
                module,
                path.display(),
                source
            ),
        )
    })
}

pub(crate) fn refuse_overwrite(request: &ToolRequest) -> ToolResult<()> {
    let same_file = match (
        fs::canonicalize(&request.input_path),
        fs::canonicalize(&request.output_path),
    ) {
        (Ok(input), Ok(output)) => input == output,
        _ => request.input_path == request.output_path,
    };
    if same_file {
        return Err(AbqError::input_validation(
            "INPUT.OUTPUT_OVERWRITES_INPUT",
            format!(
                "{} output '{}' would overwrite its input",
                request.module,
                request.output_path.display()
            ),
        ));
    }
    Ok(())
}
