//! Response-spectrum analysis settings.
//!
//! Defaults follow the usual seismic practice of a 0.01–100 Hz sweep over
//! 401 log-spaced bins at 5% damping.

use crate::domain::{ErrorCategory, ExecutionMode, SpectraError};
use crate::numerics::{FrequencyGrid, ResponseSpectrumError};
use serde::{Deserialize, Serialize};

pub const DEFAULT_FREQ_START: f64 = 0.01;
pub const DEFAULT_FREQ_END: f64 = 100.0;
pub const DEFAULT_FREQ_NUM: usize = 401;
pub const DEFAULT_DAMPING: f64 = 0.05;
pub const DEFAULT_REG_DT: f64 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpectrumSettings {
    pub freq_start: f64,
    pub freq_end: f64,
    pub freq_num: usize,
    pub damping: f64,
    pub reg_dt: f64,
    pub execution_mode: ExecutionMode,
}

impl Default for SpectrumSettings {
    fn default() -> Self {
        Self {
            freq_start: DEFAULT_FREQ_START,
            freq_end: DEFAULT_FREQ_END,
            freq_num: DEFAULT_FREQ_NUM,
            damping: DEFAULT_DAMPING,
            reg_dt: DEFAULT_REG_DT,
            execution_mode: ExecutionMode::Serial,
        }
    }
}

impl SpectrumSettings {
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)
            .map_err(|source| SettingsError::Parse { source })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check the frequency sweep, damping and step without running anything.
    pub fn validate(&self) -> Result<(), SettingsError> {
        FrequencyGrid::log_uniform(self.freq_start, self.freq_end, self.freq_num)?;
        if !self.reg_dt.is_finite() || self.reg_dt <= 0.0 {
            return Err(ResponseSpectrumError::InvalidTimeStep { value: self.reg_dt }.into());
        }
        if !(0.0..1.0).contains(&self.damping) {
            return Err(ResponseSpectrumError::InvalidDamping {
                value: self.damping,
            }
            .into());
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to parse spectrum settings: {source}")]
    Parse { source: serde_json::Error },
    #[error("invalid spectrum settings: {0}")]
    Invalid(#[from] ResponseSpectrumError),
}

impl SettingsError {
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Parse { .. } => ErrorCategory::InvalidArgument,
            Self::Invalid(error) => error.category(),
        }
    }
}

impl From<SettingsError> for SpectraError {
    fn from(error: SettingsError) -> Self {
        SpectraError::new(error.category(), "INPUT.SETTINGS", error.to_string())
    }
}
