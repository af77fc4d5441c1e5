use super::helpers::{HistoryRecord, read_stdin_json, write_stdout_json};
use super::{CliError, compute_error};
use serde::Serialize;
use spectra_core::common::SpectrumSettings;
use spectra_core::domain::ExecutionMode;
use spectra_core::numerics::{
    RegularSeries, RegularizeInput, Regularizer, ResponseSpectrum, TimeSeriesRegularizationApi,
    spectrum_from_history,
};
use spectra_core::stats::{
    Interpolation, StatisticsError, greater_probability, lognormal_from_median,
    lognormal_standard_deviation, mean, median, percentile, standard_deviation,
};

#[derive(clap::Args)]
pub(super) struct RegularizeArgs {
    /// Target time step in seconds
    #[arg(long)]
    dt: f64,
}

#[derive(clap::Args)]
pub(super) struct SpectrumArgs {
    /// Inline JSON settings, e.g. '{"freqNum": 200, "damping": 0.02}'
    #[arg(long)]
    settings: Option<String>,

    /// Regularization time step in seconds
    #[arg(long)]
    dt: Option<f64>,

    /// Lowest frequency of the sweep in Hz
    #[arg(long)]
    freq_start: Option<f64>,

    /// Highest frequency of the sweep in Hz
    #[arg(long)]
    freq_end: Option<f64>,

    /// Number of log-spaced frequencies
    #[arg(long)]
    freq_num: Option<usize>,

    /// Damping ratio
    #[arg(long)]
    damping: Option<f64>,

    /// Sweep frequencies on all cores
    #[arg(long)]
    parallel: bool,
}

impl SpectrumArgs {
    fn into_settings(self) -> Result<SpectrumSettings, CliError> {
        let mut settings = match self.settings.as_deref() {
            Some(json) => SpectrumSettings::from_json_str(json).map_err(compute_error)?,
            None => SpectrumSettings::default(),
        };
        if let Some(dt) = self.dt {
            settings.reg_dt = dt;
        }
        if let Some(freq_start) = self.freq_start {
            settings.freq_start = freq_start;
        }
        if let Some(freq_end) = self.freq_end {
            settings.freq_end = freq_end;
        }
        if let Some(freq_num) = self.freq_num {
            settings.freq_num = freq_num;
        }
        if let Some(damping) = self.damping {
            settings.damping = damping;
        }
        if self.parallel {
            settings.execution_mode = ExecutionMode::Parallel;
        }
        settings.validate().map_err(compute_error)?;
        Ok(settings)
    }
}

#[derive(clap::Args)]
pub(super) struct StatsArgs {
    /// Percentile to report, between 0 and 100
    #[arg(long, default_value_t = 84.0)]
    percentile: f64,

    /// Interpolation between ranks: linear, lower or higher
    #[arg(long, default_value_t = Interpolation::Linear)]
    interpolation: Interpolation,
}

#[derive(clap::Args)]
pub(super) struct ExceedanceArgs {
    /// Median of the lognormal demand
    #[arg(long)]
    demand_median: f64,

    /// Logarithmic standard deviation of the demand
    #[arg(long)]
    demand_beta: f64,

    /// Median of the lognormal capacity
    #[arg(long)]
    capacity_median: f64,

    /// Logarithmic standard deviation of the capacity
    #[arg(long)]
    capacity_beta: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpectrumReport {
    settings: SpectrumSettings,
    regular_samples: usize,
    spectrum: ResponseSpectrum,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsSummary {
    count: usize,
    mean: f64,
    median: f64,
    percent: f64,
    interpolation: Interpolation,
    percentile: f64,
    standard_deviation: Option<f64>,
    lognormal_standard_deviation: Option<f64>,
}

#[derive(Debug, Serialize)]
struct ExceedanceReport {
    probability: f64,
}

pub(super) fn run_regularize_command(args: RegularizeArgs) -> Result<i32, CliError> {
    let record: HistoryRecord = read_stdin_json("acceleration record")?;
    let series: RegularSeries = Regularizer
        .regularize(RegularizeInput::new(
            &record.acceleration,
            &record.time,
            args.dt,
        ))
        .map_err(compute_error)?;
    write_stdout_json(&series)?;
    Ok(0)
}

pub(super) fn run_spectrum_command(args: SpectrumArgs) -> Result<i32, CliError> {
    let settings = args.into_settings()?;
    let record: HistoryRecord = read_stdin_json("acceleration record")?;
    let result = spectrum_from_history(&record.time, &record.acceleration, &settings)
        .map_err(compute_error)?;

    tracing::info!(
        input_samples = record.time.len(),
        regular_samples = result.regular.len(),
        frequencies = result.spectrum.len(),
        "response spectrum computed"
    );

    write_stdout_json(&SpectrumReport {
        settings,
        regular_samples: result.regular.len(),
        spectrum: result.spectrum,
    })?;
    Ok(0)
}

pub(super) fn run_stats_command(args: StatsArgs) -> Result<i32, CliError> {
    let values: Vec<f64> = read_stdin_json("sample array")?;

    let summary = StatsSummary {
        count: values.len(),
        mean: mean(&values).map_err(compute_error)?,
        median: median(&values, args.interpolation).map_err(compute_error)?,
        percent: args.percentile,
        interpolation: args.interpolation,
        percentile: percentile(&values, args.percentile, args.interpolation)
            .map_err(compute_error)?,
        standard_deviation: optional_statistic(standard_deviation(&values))?,
        lognormal_standard_deviation: optional_statistic(lognormal_standard_deviation(&values))?,
    };
    write_stdout_json(&summary)?;
    Ok(0)
}

pub(super) fn run_exceedance_command(args: ExceedanceArgs) -> Result<i32, CliError> {
    let demand =
        lognormal_from_median(args.demand_median, args.demand_beta).map_err(compute_error)?;
    let capacity =
        lognormal_from_median(args.capacity_median, args.capacity_beta).map_err(compute_error)?;
    let probability = greater_probability(&demand, &capacity).map_err(compute_error)?;
    write_stdout_json(&ExceedanceReport { probability })?;
    Ok(0)
}

/// Statistics that need more than one sample, or positive samples, are
/// omitted from the summary rather than failing it.
fn optional_statistic(result: Result<f64, StatisticsError>) -> Result<Option<f64>, CliError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(
            StatisticsError::InsufficientSamples { .. }
            | StatisticsError::NonPositiveElement { .. },
        ) => Ok(None),
        Err(error) => Err(compute_error(error)),
    }
}
