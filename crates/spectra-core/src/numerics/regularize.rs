use crate::domain::{ErrorCategory, SpectraError};
use serde::{Deserialize, Serialize};

/// Largest number of evenly spaced samples a single call may emit.
pub const MAX_REGULAR_SAMPLES: f64 = 1.0e8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegularizeInput<'a> {
    pub acceleration: &'a [f64],
    pub time: &'a [f64],
    pub dt: f64,
}

impl<'a> RegularizeInput<'a> {
    pub fn new(acceleration: &'a [f64], time: &'a [f64], dt: f64) -> Self {
        Self {
            acceleration,
            time,
            dt,
        }
    }
}

/// Evenly spaced samples produced by [`regularize`].
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct RegularSeries {
    pub dt: f64,
    pub time: Vec<f64>,
    pub values: Vec<f64>,
}

impl RegularSeries {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegularizeError {
    #[error("regularize input length mismatch: acceleration={acceleration}, time={time}")]
    LengthMismatch { acceleration: usize, time: usize },
    #[error("regularize requires at least 2 samples, got {actual}")]
    InsufficientPoints { actual: usize },
    #[error("regularize time step must be finite and > 0, got {value}")]
    InvalidTimeStep { value: f64 },
    #[error("regularize vector '{field}' must contain finite values, index {index} got {value}")]
    NonFiniteValue {
        field: &'static str,
        index: usize,
        value: f64,
    },
    #[error("time must be strictly increasing, index {index} has {current} after {previous}")]
    NonIncreasingTime {
        index: usize,
        previous: f64,
        current: f64,
    },
    #[error(
        "regularize time step {dt} is below the floating-point spacing {spacing} at time {time}"
    )]
    TimeStepBelowResolution { dt: f64, time: f64, spacing: f64 },
    #[error("regularize span {span} with step {dt} exceeds {limit} samples")]
    TooManySamples { span: f64, dt: f64, limit: f64 },
}

impl RegularizeError {
    pub const fn category(&self) -> ErrorCategory {
        ErrorCategory::InvalidInput
    }
}

impl From<RegularizeError> for SpectraError {
    fn from(error: RegularizeError) -> Self {
        SpectraError::new(error.category(), "INPUT.REGULARIZE", error.to_string())
    }
}

pub trait TimeSeriesRegularizationApi {
    fn regularize(&self, input: RegularizeInput<'_>) -> Result<RegularSeries, RegularizeError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Regularizer;

impl TimeSeriesRegularizationApi for Regularizer {
    fn regularize(&self, input: RegularizeInput<'_>) -> Result<RegularSeries, RegularizeError> {
        regularize(input)
    }
}

/// Resample an irregular acceleration history onto a constant `dt` grid.
///
/// Starting at `time[0]`, points are emitted at `dt` increments while they
/// fall inside the current segment `[time[i], time[i+1]]` (both ends
/// inclusive), with the value linearly interpolated between the segment
/// endpoints. The running time is advanced by repeated addition of `dt`,
/// not recomputed from a sample index.
///
/// `dt` must be at least the floating-point spacing at the largest time
/// magnitude, and the output is capped at [`MAX_REGULAR_SAMPLES`] samples.
pub fn regularize(input: RegularizeInput<'_>) -> Result<RegularSeries, RegularizeError> {
    validate_input(input)?;

    let time = input.time;
    let acceleration = input.acceleration;
    let span = time[time.len() - 1] - time[0];
    let capacity = (span / input.dt).ceil() as usize + 1;
    let mut regular_time = Vec::with_capacity(capacity);
    let mut regular_values = Vec::with_capacity(capacity);

    let mut current = time[0];
    for (segment_time, segment_acceleration) in time.windows(2).zip(acceleration.windows(2)) {
        let (t0, t1) = (segment_time[0], segment_time[1]);
        let (a0, a1) = (segment_acceleration[0], segment_acceleration[1]);

        while current >= t0 && current <= t1 {
            regular_time.push(current);
            regular_values.push(a0 + (current - t0) / (t1 - t0) * (a1 - a0));
            current += input.dt;
        }
    }

    tracing::debug!(
        input_samples = time.len(),
        output_samples = regular_time.len(),
        dt = input.dt,
        "regularized acceleration history"
    );

    Ok(RegularSeries {
        dt: input.dt,
        time: regular_time,
        values: regular_values,
    })
}

fn validate_input(input: RegularizeInput<'_>) -> Result<(), RegularizeError> {
    if input.acceleration.len() != input.time.len() {
        return Err(RegularizeError::LengthMismatch {
            acceleration: input.acceleration.len(),
            time: input.time.len(),
        });
    }
    if input.time.len() < 2 {
        return Err(RegularizeError::InsufficientPoints {
            actual: input.time.len(),
        });
    }
    if !input.dt.is_finite() || input.dt <= 0.0 {
        return Err(RegularizeError::InvalidTimeStep { value: input.dt });
    }

    for (index, value) in input.time.iter().copied().enumerate() {
        if !value.is_finite() {
            return Err(RegularizeError::NonFiniteValue {
                field: "time",
                index,
                value,
            });
        }
        if index > 0 {
            let previous = input.time[index - 1];
            if value <= previous {
                return Err(RegularizeError::NonIncreasingTime {
                    index,
                    previous,
                    current: value,
                });
            }
        }
    }

    // The coarsest spacing of an increasing grid sits at one of its ends; a
    // step at least that wide always moves the running time forward.
    let first = input.time[0];
    let last = input.time[input.time.len() - 1];
    let widest = first.abs().max(last.abs());
    let spacing = f64::from_bits(widest.to_bits() + 1) - widest;
    if input.dt < spacing {
        return Err(RegularizeError::TimeStepBelowResolution {
            dt: input.dt,
            time: widest,
            spacing,
        });
    }
    let span = last - first;
    if span / input.dt > MAX_REGULAR_SAMPLES {
        return Err(RegularizeError::TooManySamples {
            span,
            dt: input.dt,
            limit: MAX_REGULAR_SAMPLES,
        });
    }

    for (index, value) in input.acceleration.iter().copied().enumerate() {
        if !value.is_finite() {
            return Err(RegularizeError::NonFiniteValue {
                field: "acceleration",
                index,
                value,
            });
        }
    }

    Ok(())
}
