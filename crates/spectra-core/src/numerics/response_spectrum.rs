use super::oscillator::{OscillatorConstants, OscillatorState};
use crate::domain::{ErrorCategory, ExecutionMode, SpectraError};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponseSpectrumInput<'a> {
    pub freq_start: f64,
    pub freq_end: f64,
    pub freq_num: usize,
    pub history_acc: &'a [f64],
    pub xi: f64,
    pub reg_dt: f64,
}

impl<'a> ResponseSpectrumInput<'a> {
    pub fn new(
        freq_start: f64,
        freq_end: f64,
        freq_num: usize,
        history_acc: &'a [f64],
        xi: f64,
        reg_dt: f64,
    ) -> Self {
        Self {
            freq_start,
            freq_end,
            freq_num,
            history_acc,
            xi,
            reg_dt,
        }
    }
}

/// Frequencies evenly spaced in log10 between two inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyGrid {
    start: f64,
    end: f64,
    count: usize,
}

impl FrequencyGrid {
    pub fn log_uniform(start: f64, end: f64, count: usize) -> Result<Self, ResponseSpectrumError> {
        if count < 2 {
            return Err(ResponseSpectrumError::TooFewFrequencies { actual: count });
        }
        if !start.is_finite() || start <= 0.0 {
            return Err(ResponseSpectrumError::InvalidFrequencyStart { value: start });
        }
        if !end.is_finite() || end <= start {
            return Err(ResponseSpectrumError::InvalidFrequencyEnd { start, end });
        }
        Ok(Self { start, end, count })
    }

    pub const fn len(&self) -> usize {
        self.count
    }

    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn frequency(&self, index: usize) -> f64 {
        let log_start = self.start.log10();
        let log_step = (self.end.log10() - log_start) / (self.count - 1) as f64;
        10.0_f64.powf(log_start + index as f64 * log_step)
    }

    pub fn frequencies(&self) -> Vec<f64> {
        (0..self.count).map(|index| self.frequency(index)).collect()
    }
}

/// Peak response of a damped oscillator per frequency, index-aligned across
/// the four vectors.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct ResponseSpectrum {
    pub frequency: Vec<f64>,
    pub displacement: Vec<f64>,
    pub velocity: Vec<f64>,
    pub acceleration: Vec<f64>,
}

impl ResponseSpectrum {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            frequency: Vec::with_capacity(capacity),
            displacement: Vec::with_capacity(capacity),
            velocity: Vec::with_capacity(capacity),
            acceleration: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, point: SpectralPoint) {
        self.frequency.push(point.frequency);
        self.displacement.push(point.displacement);
        self.velocity.push(point.velocity);
        self.acceleration.push(point.acceleration);
    }

    pub fn len(&self) -> usize {
        self.frequency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequency.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct SpectralPoint {
    frequency: f64,
    displacement: f64,
    velocity: f64,
    acceleration: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResponseSpectrumError {
    #[error("response spectrum requires at least 2 frequencies, got {actual}")]
    TooFewFrequencies { actual: usize },
    #[error("start frequency must be finite and > 0, got {value}")]
    InvalidFrequencyStart { value: f64 },
    #[error("end frequency must be finite and > start frequency {start}, got {end}")]
    InvalidFrequencyEnd { start: f64, end: f64 },
    #[error("damping ratio must satisfy 0 <= xi < 1, got {value}")]
    InvalidDamping { value: f64 },
    #[error("response spectrum time step must be finite and > 0, got {value}")]
    InvalidTimeStep { value: f64 },
    #[error("acceleration history must contain at least one sample")]
    EmptyHistory,
    #[error("acceleration history must contain finite values, index {index} got {value}")]
    NonFiniteHistory { index: usize, value: f64 },
}

impl ResponseSpectrumError {
    pub const fn category(&self) -> ErrorCategory {
        ErrorCategory::InvalidInput
    }
}

impl From<ResponseSpectrumError> for SpectraError {
    fn from(error: ResponseSpectrumError) -> Self {
        SpectraError::new(error.category(), "INPUT.RESPONSE_SPECTRUM", error.to_string())
    }
}

pub trait ResponseSpectrumApi {
    fn response_spectrum(
        &self,
        input: ResponseSpectrumInput<'_>,
        mode: ExecutionMode,
    ) -> Result<ResponseSpectrum, ResponseSpectrumError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseSpectrumEngine;

impl ResponseSpectrumApi for ResponseSpectrumEngine {
    fn response_spectrum(
        &self,
        input: ResponseSpectrumInput<'_>,
        mode: ExecutionMode,
    ) -> Result<ResponseSpectrum, ResponseSpectrumError> {
        response_spectrum_with_mode(input, mode)
    }
}

/// Serial response spectrum of `history_acc`, sampled every `reg_dt`.
pub fn response_spectrum(
    input: ResponseSpectrumInput<'_>,
) -> Result<ResponseSpectrum, ResponseSpectrumError> {
    response_spectrum_with_mode(input, ExecutionMode::Serial)
}

/// Sweep the log-uniform frequency grid, integrating an independent
/// oscillator per bin. Both modes produce bit-identical output.
pub fn response_spectrum_with_mode(
    input: ResponseSpectrumInput<'_>,
    mode: ExecutionMode,
) -> Result<ResponseSpectrum, ResponseSpectrumError> {
    let grid = validate_input(input)?;

    tracing::debug!(
        freq_start = input.freq_start,
        freq_end = input.freq_end,
        freq_num = input.freq_num,
        samples = input.history_acc.len(),
        xi = input.xi,
        reg_dt = input.reg_dt,
        %mode,
        "computing response spectrum"
    );

    let points: Vec<SpectralPoint> = match mode {
        ExecutionMode::Serial => (0..grid.len())
            .map(|index| spectral_point(&grid, index, input))
            .collect(),
        ExecutionMode::Parallel => (0..grid.len())
            .into_par_iter()
            .map(|index| spectral_point(&grid, index, input))
            .collect(),
    };

    let mut spectrum = ResponseSpectrum::with_capacity(points.len());
    for point in points {
        spectrum.push(point);
    }
    Ok(spectrum)
}

fn spectral_point(
    grid: &FrequencyGrid,
    index: usize,
    input: ResponseSpectrumInput<'_>,
) -> SpectralPoint {
    let frequency = grid.frequency(index);
    let constants = OscillatorConstants::new(frequency, input.xi, input.reg_dt);
    let state = OscillatorState::integrate(&constants, input.history_acc);
    let peak = state.peak_displacement;

    tracing::trace!(index, frequency, peak, "integrated oscillator");

    SpectralPoint {
        frequency,
        displacement: peak,
        velocity: peak * constants.omega_n,
        acceleration: peak * constants.omega_n * constants.omega_n,
    }
}

fn validate_input(
    input: ResponseSpectrumInput<'_>,
) -> Result<FrequencyGrid, ResponseSpectrumError> {
    let grid = FrequencyGrid::log_uniform(input.freq_start, input.freq_end, input.freq_num)?;

    if !input.reg_dt.is_finite() || input.reg_dt <= 0.0 {
        return Err(ResponseSpectrumError::InvalidTimeStep {
            value: input.reg_dt,
        });
    }
    if !(0.0..1.0).contains(&input.xi) {
        return Err(ResponseSpectrumError::InvalidDamping { value: input.xi });
    }
    if input.history_acc.is_empty() {
        return Err(ResponseSpectrumError::EmptyHistory);
    }
    for (index, value) in input.history_acc.iter().copied().enumerate() {
        if !value.is_finite() {
            return Err(ResponseSpectrumError::NonFiniteHistory { index, value });
        }
    }

    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::{
        FrequencyGrid, ResponseSpectrumApi, ResponseSpectrumEngine, ResponseSpectrumError,
        ResponseSpectrumInput, response_spectrum, response_spectrum_with_mode,
    };
    use crate::domain::ExecutionMode;
    use std::f64::consts::PI;

    #[test]
    fn frequency_grid_is_log_uniform_and_inclusive() {
        let grid = FrequencyGrid::log_uniform(0.1, 100.0, 4).expect("grid");
        let frequencies = grid.frequencies();
        let expected = [0.1, 1.0, 10.0, 100.0];

        assert_eq!(grid.len(), 4);
        for (expected, actual) in expected.iter().zip(&frequencies) {
            assert_scalar_close("grid", *expected, *actual, 1.0e-12, 1.0e-12);
        }
    }

    #[test]
    fn frequency_grid_rejects_degenerate_bounds() {
        assert_eq!(
            FrequencyGrid::log_uniform(1.0, 10.0, 1),
            Err(ResponseSpectrumError::TooFewFrequencies { actual: 1 })
        );
        assert_eq!(
            FrequencyGrid::log_uniform(0.0, 10.0, 5),
            Err(ResponseSpectrumError::InvalidFrequencyStart { value: 0.0 })
        );
        assert_eq!(
            FrequencyGrid::log_uniform(10.0, 10.0, 5),
            Err(ResponseSpectrumError::InvalidFrequencyEnd {
                start: 10.0,
                end: 10.0,
            })
        );
    }

    #[test]
    fn undamped_impulse_matches_closed_form_peak() {
        let dt = 1.0e-3;
        let mut history = vec![0.0; 4_000];
        history[1] = 1.0 / dt;

        let spectrum = response_spectrum(ResponseSpectrumInput::new(
            1.0, 10.0, 2, &history, 0.0, dt,
        ))
        .expect("spectrum");

        for (frequency, displacement) in spectrum.frequency.iter().zip(&spectrum.displacement) {
            let omega = 2.0 * PI * frequency;
            assert_scalar_close("impulse peak", 1.0 / omega, *displacement, 0.0, 2.0e-3);
        }
    }

    #[test]
    fn pseudo_quantities_scale_with_natural_frequency() {
        let history: Vec<f64> = (0..500)
            .map(|index| (index as f64 * 0.05).sin() * (-(index as f64) * 0.004).exp())
            .collect();

        let spectrum = response_spectrum(ResponseSpectrumInput::new(
            0.5, 20.0, 9, &history, 0.05, 0.01,
        ))
        .expect("spectrum");

        assert_eq!(spectrum.len(), 9);
        assert_eq!(spectrum.displacement.len(), 9);
        assert_eq!(spectrum.velocity.len(), 9);
        assert_eq!(spectrum.acceleration.len(), 9);
        for index in 0..spectrum.len() {
            let omega = 2.0 * PI * spectrum.frequency[index];
            let displacement = spectrum.displacement[index];
            assert!(displacement > 0.0);
            assert_scalar_close("sv", displacement * omega, spectrum.velocity[index], 0.0, 1.0e-12);
            assert_scalar_close(
                "sa",
                displacement * omega * omega,
                spectrum.acceleration[index],
                0.0,
                1.0e-12,
            );
        }
        assert!(
            spectrum.frequency.windows(2).all(|pair| pair[0] < pair[1]),
            "frequencies should ascend"
        );
    }

    #[test]
    fn repeated_and_parallel_runs_are_bit_identical() {
        let history: Vec<f64> = (0..800)
            .map(|index| ((index * 37 % 101) as f64 - 50.0) / 25.0)
            .collect();
        let input = ResponseSpectrumInput::new(0.2, 50.0, 33, &history, 0.05, 0.005);

        let first = response_spectrum(input).expect("first run");
        let second = response_spectrum(input).expect("second run");
        let parallel =
            response_spectrum_with_mode(input, ExecutionMode::Parallel).expect("parallel run");

        let engine = ResponseSpectrumEngine
            .response_spectrum(input, ExecutionMode::Serial)
            .expect("engine run");

        assert_eq!(first, second);
        assert_eq!(first, parallel);
        assert_eq!(first, engine);
    }

    #[test]
    fn response_spectrum_rejects_invalid_inputs() {
        let history = [0.0, 1.0, 0.0];

        let error = response_spectrum(ResponseSpectrumInput::new(1.0, 10.0, 1, &history, 0.05, 0.01))
            .expect_err("single frequency should fail");
        assert_eq!(error, ResponseSpectrumError::TooFewFrequencies { actual: 1 });

        let error = response_spectrum(ResponseSpectrumInput::new(-1.0, 10.0, 5, &history, 0.05, 0.01))
            .expect_err("negative start should fail");
        assert_eq!(error, ResponseSpectrumError::InvalidFrequencyStart { value: -1.0 });

        let error = response_spectrum(ResponseSpectrumInput::new(1.0, 10.0, 5, &history, 1.0, 0.01))
            .expect_err("critical damping should fail");
        assert_eq!(error, ResponseSpectrumError::InvalidDamping { value: 1.0 });

        let error = response_spectrum(ResponseSpectrumInput::new(1.0, 10.0, 5, &history, 0.05, 0.0))
            .expect_err("zero dt should fail");
        assert_eq!(error, ResponseSpectrumError::InvalidTimeStep { value: 0.0 });

        let error = response_spectrum(ResponseSpectrumInput::new(1.0, 10.0, 5, &[], 0.05, 0.01))
            .expect_err("empty history should fail");
        assert_eq!(error, ResponseSpectrumError::EmptyHistory);

        let error = response_spectrum(ResponseSpectrumInput::new(
            1.0,
            10.0,
            5,
            &[0.0, f64::INFINITY],
            0.05,
            0.01,
        ))
        .expect_err("non-finite history should fail");
        assert_eq!(
            error,
            ResponseSpectrumError::NonFiniteHistory {
                index: 1,
                value: f64::INFINITY,
            }
        );
    }

    fn assert_scalar_close(label: &str, expected: f64, actual: f64, abs_tol: f64, rel_tol: f64) {
        let abs_diff = (actual - expected).abs();
        let rel_diff = abs_diff / expected.abs().max(f64::MIN_POSITIVE);
        assert!(
            abs_diff <= abs_tol || rel_diff <= rel_tol,
            "{label} expected={expected:.15e} actual={actual:.15e} abs_diff={abs_diff:.15e} rel_diff={rel_diff:.15e}"
        );
    }
}
