use super::regularize::{RegularSeries, RegularizeError, RegularizeInput, regularize};
use super::response_spectrum::{
    ResponseSpectrum, ResponseSpectrumError, ResponseSpectrumInput, response_spectrum_with_mode,
};
use crate::common::SpectrumSettings;
use crate::domain::{ErrorCategory, SpectraError};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpectrumError {
    #[error(transparent)]
    Regularize(#[from] RegularizeError),
    #[error(transparent)]
    ResponseSpectrum(#[from] ResponseSpectrumError),
}

impl SpectrumError {
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Regularize(error) => error.category(),
            Self::ResponseSpectrum(error) => error.category(),
        }
    }
}

impl From<SpectrumError> for SpectraError {
    fn from(error: SpectrumError) -> Self {
        match error {
            SpectrumError::Regularize(error) => error.into(),
            SpectrumError::ResponseSpectrum(error) => error.into(),
        }
    }
}

/// Regularized history together with the spectrum computed from it.
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySpectrum {
    pub regular: RegularSeries,
    pub spectrum: ResponseSpectrum,
}

/// Resample a recorded `(time, acceleration)` history at `settings.reg_dt`
/// and compute its response spectrum over the configured sweep.
pub fn spectrum_from_history(
    time: &[f64],
    acceleration: &[f64],
    settings: &SpectrumSettings,
) -> Result<HistorySpectrum, SpectrumError> {
    let regular = regularize(RegularizeInput::new(acceleration, time, settings.reg_dt))?;
    let spectrum = response_spectrum_with_mode(
        ResponseSpectrumInput::new(
            settings.freq_start,
            settings.freq_end,
            settings.freq_num,
            &regular.values,
            settings.damping,
            regular.dt,
        ),
        settings.execution_mode,
    )?;
    Ok(HistorySpectrum { regular, spectrum })
}
