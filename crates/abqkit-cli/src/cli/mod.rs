mod commands;
mod helpers;

use abqkit_core::domain::AbqError;
use clap::Parser;
use std::path::PathBuf;

pub fn run_from_env() -> i32 {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match run(args) {
        Ok(code) => code,
        Err(error) => {
            let tool_error = error.as_abq_error();
            tracing::debug!(code = tool_error.code(), "command failed");
            eprintln!("{}", tool_error.diagnostic_line());
            if let Some(summary_line) = tool_error.fatal_exit_line() {
                eprintln!("{}", summary_line);
            }
            tool_error.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("abqkit".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => {
            helpers::init_logging(cli.verbose);
            let config = helpers::load_config(cli.config.as_deref())?;
            dispatch_parsed(cli.command, config)
        }
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(
    name = "abqkit",
    version,
    about = "Abaqus basin-model input tools and layered-sphere self-compression"
)]
struct Cli {
    /// Print debug-level progress on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON run configuration; command-line flags override it
    #[arg(long, global = true, value_name = "JSON")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Gravitational self-compression of a layered elastic sphere
    Sphere(commands::SphereArgs),
    /// Insert per-set gravity loads before the output requests
    Loads(commands::LoadsArgs),
    /// Fill material placeholders from a material table
    Mattable(commands::MattableArgs),
    /// Write a material table skeleton listing the model's materials
    #[command(name = "mattable-template")]
    MattableTemplate(commands::TemplateArgs),
    /// Insert report stresses as a prestress and step the iteration tag
    Prestress(commands::PrestressArgs),
    /// Split a nodal temperature report into edge and middle profiles
    Thermprofile(commands::ThermprofileArgs),
}

fn dispatch_parsed(
    command: CliCommand,
    config: abqkit_core::common::config::RunConfig,
) -> Result<i32, CliError> {
    match command {
        CliCommand::Sphere(args) => commands::run_sphere_command(args),
        CliCommand::Loads(args) => commands::run_loads_command(args, config),
        CliCommand::Mattable(args) => commands::run_mattable_command(args, config),
        CliCommand::MattableTemplate(args) => commands::run_template_command(args, config),
        CliCommand::Prestress(args) => commands::run_prestress_command(args, config),
        CliCommand::Thermprofile(args) => commands::run_thermprofile_command(args, config),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Tool(AbqError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<AbqError> for CliError {
    fn from(error: AbqError) -> Self {
        Self::Tool(error)
    }
}

impl CliError {
    fn as_abq_error(&self) -> AbqError {
        match self {
            Self::Usage(message) => AbqError::input_validation("INPUT.CLI_USAGE", message.clone()),
            Self::Tool(error) => error.clone(),
            Self::Internal(error) => AbqError::internal("INTERNAL.CLI", format!("{error:#}")),
        }
    }
}
