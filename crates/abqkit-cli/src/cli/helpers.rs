use super::CliError;
use abqkit_core::common::config::{RunConfig, load_run_config};
use abqkit_core::domain::{AbqError, ToolResult};
use abqkit_core::numerics::Layer;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub(super) fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("abqkit=debug,abqkit_core=debug"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("abqkit=info,abqkit_core=info"))
    };

    // a second init (repeated in-process runs) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}

pub(super) fn load_config(path: Option<&Path>) -> Result<RunConfig, CliError> {
    let Some(path) = path else {
        return Ok(RunConfig::default());
    };
    let config = load_run_config(path).map_err(|error| {
        CliError::Tool(AbqError::input_validation(
            "INPUT.CLI_CONFIG",
            error.to_string(),
        ))
    })?;
    tracing::debug!(config = %path.display(), "loaded run configuration");
    Ok(config)
}

/// Parses `R:RHO` (outer radius in m, density in kg/m^3).
pub(super) fn parse_layer(value: &str) -> Result<Layer, String> {
    let (radius, density) = value
        .split_once(':')
        .ok_or_else(|| format!("layer '{value}' must be RADIUS:DENSITY"))?;
    let radius = radius
        .trim()
        .parse::<f64>()
        .map_err(|error| format!("layer radius '{radius}': {error}"))?;
    let density = density
        .trim()
        .parse::<f64>()
        .map_err(|error| format!("layer density '{density}': {error}"))?;
    Ok(Layer::new(radius, density))
}

/// Runs `<script> <plot_name> <files...>` and waits for it.
pub(super) fn run_plot_script(script: &Path, plot_name: &str, files: &[PathBuf]) -> ToolResult<()> {
    tracing::info!(script = %script.display(), files = files.len(), "sending profiles to plot script");
    let status = Command::new(script)
        .arg(plot_name)
        .args(files)
        .status()
        .map_err(|source| {
            AbqError::io_system(
                "IO.PLOT_SCRIPT",
                format!("failed to start plot script '{}': {}", script.display(), source),
            )
        })?;
    if !status.success() {
        return Err(AbqError::computation(
            "RUN.PLOT_SCRIPT",
            format!("plot script '{}' exited with {}", script.display(), status),
        ));
    }
    Ok(())
}
