mod commands;
mod helpers;

use clap::Parser;
use spectra_core::domain::SpectraError;

pub fn run_from_env() -> i32 {
    let args: Vec<String> = std::env::args().collect();

    match parse_and_dispatch(args) {
        Ok(code) => code,
        Err(error) => {
            let spectra_error = error.as_spectra_error();
            tracing::debug!(category = %spectra_error.category(), "command failed");
            eprintln!("{}", spectra_error.diagnostic_line());
            eprintln!("{}", spectra_error.fatal_exit_line());
            spectra_error.exit_code()
        }
    }
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => dispatch_parsed(cli.command),
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
    name = "spectra",
    version,
    about = "Response spectra and statistics for ground-motion records"
)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Resample a {time, acceleration} record from stdin onto a constant step
    Regularize(commands::RegularizeArgs),
    /// Compute the response spectrum of a {time, acceleration} record from stdin
    Spectrum(commands::SpectrumArgs),
    /// Summarise a JSON array of samples from stdin
    Stats(commands::StatsArgs),
    /// Probability that a lognormal demand exceeds a lognormal capacity
    Exceedance(commands::ExceedanceArgs),
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Regularize(args) => commands::run_regularize_command(args),
        CliCommand::Spectrum(args) => commands::run_spectrum_command(args),
        CliCommand::Stats(args) => commands::run_stats_command(args),
        CliCommand::Exceedance(args) => commands::run_exceedance_command(args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Compute(SpectraError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn as_spectra_error(&self) -> SpectraError {
        match self {
            Self::Usage(message) => {
                SpectraError::invalid_argument("INPUT.CLI_USAGE", message.clone())
            }
            Self::Compute(error) => error.clone(),
            Self::Internal(error) => SpectraError::io_system("IO.CLI", format!("{error:#}")),
        }
    }
}

pub(crate) fn compute_error(error: impl Into<SpectraError>) -> CliError {
    CliError::Compute(error.into())
}
