use super::CliError;
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use spectra_core::domain::SpectraError;
use std::io::{Read, Write};

/// A recorded ground-motion history as read from stdin.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct HistoryRecord {
    pub(super) time: Vec<f64>,
    pub(super) acceleration: Vec<f64>,
}

pub(super) fn read_stdin_json<T: DeserializeOwned>(what: &str) -> Result<T, CliError> {
    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .context("failed to read stdin")?;
    parse_json(&raw, what)
}

pub(super) fn parse_json<T: DeserializeOwned>(raw: &str, what: &str) -> Result<T, CliError> {
    serde_json::from_str(raw).map_err(|source| {
        CliError::Compute(SpectraError::invalid_input(
            "INPUT.CLI_JSON",
            format!("failed to parse {what} from stdin: {source}"),
        ))
    })
}

pub(super) fn write_stdout_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, value).context("failed to serialize output")?;
    writeln!(handle).context("failed to write stdout")?;
    Ok(())
}
