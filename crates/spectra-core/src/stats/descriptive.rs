//! Descriptive statistics over sample vectors.
//!
//! Every function validates its input before touching the data and sorts a
//! private copy where ordering is needed, so callers' slices are never
//! reordered.

use crate::domain::{ErrorCategory, SpectraError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// How to combine the two samples straddling a fractional rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    #[default]
    Linear,
    Lower,
    Higher,
}

impl Interpolation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Lower => "lower",
            Self::Higher => "higher",
        }
    }

    fn combine(self, lower: f64, higher: f64, fraction: f64) -> f64 {
        match self {
            Self::Linear => lower + fraction * (higher - lower),
            Self::Lower => lower,
            Self::Higher => higher,
        }
    }
}

impl Display for Interpolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

impl FromStr for Interpolation {
    type Err = StatisticsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "lower" => Ok(Self::Lower),
            "higher" => Ok(Self::Higher),
            _ => Err(StatisticsError::UnknownInterpolation {
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatisticsError {
    #[error("statistic requires at least one sample")]
    EmptyInput,
    #[error("statistic requires at least {needed} samples, got {actual}")]
    InsufficientSamples { needed: usize, actual: usize },
    #[error("percent should be between 0 and 100, got {value}")]
    PercentOutOfRange { value: f64 },
    #[error("sample elements must be positive, index {index} got {value}")]
    NonPositiveElement { index: usize, value: f64 },
    #[error("invalid interpolation type '{value}', expected linear, lower or higher")]
    UnknownInterpolation { value: String },
}

impl StatisticsError {
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyInput => ErrorCategory::EmptyInput,
            _ => ErrorCategory::InvalidArgument,
        }
    }
}

impl From<StatisticsError> for SpectraError {
    fn from(error: StatisticsError) -> Self {
        SpectraError::new(error.category(), "INPUT.STATISTICS", error.to_string())
    }
}

pub fn mean(values: &[f64]) -> Result<f64, StatisticsError> {
    if values.is_empty() {
        return Err(StatisticsError::EmptyInput);
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median of `values`. Odd lengths return the middle sample regardless of
/// `interpolation`.
pub fn median(values: &[f64], interpolation: Interpolation) -> Result<f64, StatisticsError> {
    if values.is_empty() {
        return Err(StatisticsError::EmptyInput);
    }

    let sorted = sorted_copy(values);
    let count = sorted.len();
    if !count.is_multiple_of(2) {
        return Ok(sorted[(count - 1) / 2]);
    }

    let (lower, higher) = (sorted[count / 2 - 1], sorted[count / 2]);
    Ok(match interpolation {
        Interpolation::Linear => (lower + higher) / 2.0,
        Interpolation::Lower => lower,
        Interpolation::Higher => higher,
    })
}

/// Percentile of `values` for `percent` in `[0, 100]`.
///
/// The rank is `percent / 100 * (n - 1)` on the sorted samples; the two
/// neighbouring samples are combined according to `interpolation`.
pub fn percentile(
    values: &[f64],
    percent: f64,
    interpolation: Interpolation,
) -> Result<f64, StatisticsError> {
    if !(0.0..=100.0).contains(&percent) {
        return Err(StatisticsError::PercentOutOfRange { value: percent });
    }
    if values.is_empty() {
        return Err(StatisticsError::EmptyInput);
    }

    let sorted = sorted_copy(values);
    let last = sorted.len() - 1;
    let rank = percent / 100.0 * last as f64;
    let low_index = (rank.floor() as usize).min(last);
    let fraction = rank - low_index as f64;
    let high_index = if fraction > 0.0 {
        (low_index + 1).min(last)
    } else {
        low_index
    };

    Ok(interpolation.combine(sorted[low_index], sorted[high_index], fraction))
}

/// Sample standard deviation with Bessel's correction.
pub fn standard_deviation(values: &[f64]) -> Result<f64, StatisticsError> {
    if values.len() < 2 {
        return Err(StatisticsError::InsufficientSamples {
            needed: 2,
            actual: values.len(),
        });
    }

    let center = mean(values)?;
    let sum_of_squares: f64 = values
        .iter()
        .map(|value| (value - center) * (value - center))
        .sum();
    Ok((sum_of_squares / (values.len() - 1) as f64).sqrt())
}

/// Standard deviation of the natural logarithms of `values`, the usual
/// lognormal dispersion (beta) estimate.
pub fn lognormal_standard_deviation(values: &[f64]) -> Result<f64, StatisticsError> {
    if let Some((index, value)) = first_non_positive(values) {
        return Err(StatisticsError::NonPositiveElement { index, value });
    }
    let logs: Vec<f64> = values.iter().map(|value| value.ln()).collect();
    standard_deviation(&logs)
}

pub(super) fn first_non_positive(values: &[f64]) -> Option<(usize, f64)> {
    values
        .iter()
        .copied()
        .enumerate()
        .find(|(_, value)| *value <= 0.0)
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

#[cfg(test)]
mod tests {
    use super::{
        Interpolation, StatisticsError, lognormal_standard_deviation, mean, median, percentile,
        standard_deviation,
    };
    use crate::domain::{ErrorCategory, SpectraError};
    use proptest::prelude::*;

    #[test]
    fn mean_of_small_sample() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), Ok(2.5));
        assert_eq!(mean(&[-3.0]), Ok(-3.0));
        assert_eq!(mean(&[]), Err(StatisticsError::EmptyInput));
    }

    #[test]
    fn median_follows_interpolation_for_even_lengths() {
        let values = [4.0, 1.0, 3.0, 2.0];
        assert_eq!(median(&values, Interpolation::Linear), Ok(2.5));
        assert_eq!(median(&values, Interpolation::Lower), Ok(2.0));
        assert_eq!(median(&values, Interpolation::Higher), Ok(3.0));
    }

    #[test]
    fn median_of_odd_length_is_middle_sample() {
        let values = [9.0, -1.0, 5.0];
        for interpolation in [
            Interpolation::Linear,
            Interpolation::Lower,
            Interpolation::Higher,
        ] {
            assert_eq!(median(&values, interpolation), Ok(5.0));
        }
        assert_eq!(
            median(&[], Interpolation::Linear),
            Err(StatisticsError::EmptyInput)
        );
    }

    #[test]
    fn percentile_interpolates_between_ranks() {
        let values = [5.0, 1.0, 4.0, 2.0, 3.0];
        assert_eq!(percentile(&values, 50.0, Interpolation::Linear), Ok(3.0));
        assert_eq!(percentile(&values, 0.0, Interpolation::Linear), Ok(1.0));
        assert_eq!(percentile(&values, 100.0, Interpolation::Linear), Ok(5.0));
        assert_eq!(percentile(&values, 100.0, Interpolation::Higher), Ok(5.0));
        assert_eq!(percentile(&values, 0.0, Interpolation::Lower), Ok(1.0));

        let values = [10.0, 20.0, 30.0, 40.0];
        assert_eq!(percentile(&values, 50.0, Interpolation::Linear), Ok(25.0));
        assert_eq!(percentile(&values, 50.0, Interpolation::Lower), Ok(20.0));
        assert_eq!(percentile(&values, 50.0, Interpolation::Higher), Ok(30.0));
    }

    #[test]
    fn percentile_rejects_out_of_range_percent() {
        assert_eq!(
            percentile(&[1.0, 2.0], 100.5, Interpolation::Linear),
            Err(StatisticsError::PercentOutOfRange { value: 100.5 })
        );
        assert_eq!(
            percentile(&[1.0, 2.0], -1.0, Interpolation::Lower),
            Err(StatisticsError::PercentOutOfRange { value: -1.0 })
        );
        assert!(matches!(
            percentile(&[1.0, 2.0], f64::NAN, Interpolation::Linear),
            Err(StatisticsError::PercentOutOfRange { .. })
        ));
        assert_eq!(
            percentile(&[], 50.0, Interpolation::Linear),
            Err(StatisticsError::EmptyInput)
        );
    }

    #[test]
    fn standard_deviation_uses_bessel_correction() {
        let sigma = standard_deviation(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).expect("std");
        assert!((sigma - 2.138_089_935_299_395).abs() < 1.0e-12, "got {sigma}");

        assert_eq!(
            standard_deviation(&[1.0]),
            Err(StatisticsError::InsufficientSamples {
                needed: 2,
                actual: 1,
            })
        );
    }

    #[test]
    fn lognormal_standard_deviation_works_in_log_space() {
        let beta = lognormal_standard_deviation(&[1.0, 2.0, 4.0, 8.0]).expect("beta");
        assert!((beta - 0.894_849_162_259_764_4).abs() < 1.0e-12, "got {beta}");

        assert_eq!(
            lognormal_standard_deviation(&[1.0, 0.0, 2.0]),
            Err(StatisticsError::NonPositiveElement {
                index: 1,
                value: 0.0,
            })
        );
    }

    #[test]
    fn interpolation_parses_names_and_rejects_others() {
        assert_eq!("linear".parse::<Interpolation>(), Ok(Interpolation::Linear));
        assert_eq!(" Lower ".parse::<Interpolation>(), Ok(Interpolation::Lower));
        assert_eq!("HIGHER".parse::<Interpolation>(), Ok(Interpolation::Higher));

        let error = "nearest"
            .parse::<Interpolation>()
            .expect_err("unknown name should fail");
        assert_eq!(
            error,
            StatisticsError::UnknownInterpolation {
                value: "nearest".to_string(),
            }
        );
        assert_eq!(error.category(), ErrorCategory::InvalidArgument);
        assert_eq!(Interpolation::default(), Interpolation::Linear);
    }

    #[test]
    fn statistics_errors_map_to_domain_categories() {
        let error: SpectraError = StatisticsError::EmptyInput.into();
        assert_eq!(error.category(), ErrorCategory::EmptyInput);
        assert_eq!(error.placeholder(), "INPUT.STATISTICS");

        let error: SpectraError = StatisticsError::PercentOutOfRange { value: 120.0 }.into();
        assert_eq!(error.category(), ErrorCategory::InvalidArgument);
        assert_eq!(
            error.message(),
            "percent should be between 0 and 100, got 120"
        );
    }

    fn finite_vec(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(-1.0e6_f64..1.0e6, min_len..=max_len)
    }

    proptest! {
        #[test]
        fn percentile_stays_within_sample_range(
            data in finite_vec(1, 60),
            percent in 0.0_f64..=100.0,
        ) {
            let low = data.iter().copied().fold(f64::INFINITY, f64::min);
            let high = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            for interpolation in [Interpolation::Linear, Interpolation::Lower, Interpolation::Higher] {
                let value = percentile(&data, percent, interpolation).unwrap();
                prop_assert!(value >= low - 1.0e-9 && value <= high + 1.0e-9);
            }
        }

        #[test]
        fn lower_and_higher_bracket_linear(
            data in finite_vec(2, 60),
            percent in 0.0_f64..=100.0,
        ) {
            let lower = percentile(&data, percent, Interpolation::Lower).unwrap();
            let linear = percentile(&data, percent, Interpolation::Linear).unwrap();
            let higher = percentile(&data, percent, Interpolation::Higher).unwrap();
            prop_assert!(lower <= linear + 1.0e-9 && linear <= higher + 1.0e-9);
        }

        #[test]
        fn median_matches_fiftieth_percentile(data in finite_vec(1, 60)) {
            let med = median(&data, Interpolation::Linear).unwrap();
            let p50 = percentile(&data, 50.0, Interpolation::Linear).unwrap();
            prop_assert!((med - p50).abs() <= 1.0e-9 * med.abs().max(1.0));
        }

        #[test]
        fn standard_deviation_is_shift_invariant(
            data in finite_vec(2, 60),
            shift in -1.0e3_f64..1.0e3,
        ) {
            let shifted: Vec<f64> = data.iter().map(|value| value + shift).collect();
            let original = standard_deviation(&data).unwrap();
            let moved = standard_deviation(&shifted).unwrap();
            prop_assert!((original - moved).abs() <= 1.0e-6 * original.max(1.0));
        }
    }
}
