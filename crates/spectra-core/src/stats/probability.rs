use crate::domain::{ErrorCategory, SpectraError};
use statrs::distribution::{Continuous, ContinuousCDF, LogNormal};
use statrs::statistics::Median;

const LOWER_TAIL: f64 = 0.001;
const UPPER_TAIL: f64 = 0.999;
const STEPS_PER_MEDIAN: f64 = 1000.0;
const MAX_INTEGRATION_STEPS: f64 = 1.0e8;

/// The subset of a continuous distribution the exceedance integral needs.
pub trait ContinuousDistribution {
    fn quantile(&self, probability: f64) -> f64;
    fn pdf(&self, x: f64) -> f64;
    fn cdf(&self, x: f64) -> f64;
    fn median(&self) -> f64;
}

impl<T> ContinuousDistribution for T
where
    T: Continuous<f64, f64> + ContinuousCDF<f64, f64> + Median<f64>,
{
    fn quantile(&self, probability: f64) -> f64 {
        ContinuousCDF::inverse_cdf(self, probability)
    }

    fn pdf(&self, x: f64) -> f64 {
        Continuous::pdf(self, x)
    }

    fn cdf(&self, x: f64) -> f64 {
        ContinuousCDF::cdf(self, x)
    }

    fn median(&self) -> f64 {
        Median::median(self)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProbabilityError {
    #[error("demand {field} must be finite, got {value}")]
    NonFiniteBound { field: &'static str, value: f64 },
    #[error("integration step median/1000 must be finite and > 0, got {value}")]
    InvalidStep { value: f64 },
    #[error("integration from {lower} to {upper} with step {step} exceeds the step limit")]
    TooManySteps { lower: f64, upper: f64, step: f64 },
    #[error("invalid distribution parameters: {reason}")]
    InvalidDistribution { reason: String },
}

impl ProbabilityError {
    pub const fn category(&self) -> ErrorCategory {
        ErrorCategory::InvalidArgument
    }
}

impl From<ProbabilityError> for SpectraError {
    fn from(error: ProbabilityError) -> Self {
        SpectraError::new(error.category(), "INPUT.PROBABILITY", error.to_string())
    }
}

/// Probability that a draw from `demand` exceeds a draw from `capacity`.
///
/// Trapezoidal integration of `pdf_demand(x) * cdf_capacity(x)` between the
/// 0.1% and 99.9% demand quantiles with a fixed step of `median / 1000`. The
/// truncated tails and the fixed step make this an approximation.
pub fn greater_probability<D, C>(demand: &D, capacity: &C) -> Result<f64, ProbabilityError>
where
    D: ContinuousDistribution + ?Sized,
    C: ContinuousDistribution + ?Sized,
{
    let lower = demand.quantile(LOWER_TAIL);
    let upper = demand.quantile(UPPER_TAIL);
    let step = demand.median() / STEPS_PER_MEDIAN;

    if !lower.is_finite() {
        return Err(ProbabilityError::NonFiniteBound {
            field: "lower quantile",
            value: lower,
        });
    }
    if !upper.is_finite() {
        return Err(ProbabilityError::NonFiniteBound {
            field: "upper quantile",
            value: upper,
        });
    }
    if !step.is_finite() || step <= 0.0 {
        return Err(ProbabilityError::InvalidStep { value: step });
    }
    if (upper - lower) / step > MAX_INTEGRATION_STEPS {
        return Err(ProbabilityError::TooManySteps { lower, upper, step });
    }

    let integrand = |x: f64| demand.pdf(x) * capacity.cdf(x);

    let mut probability = 0.0;
    let mut x = lower;
    let mut left = integrand(x);
    while x < upper {
        let right = integrand(x + step);
        probability += step * (left + right) / 2.0;
        left = right;
        x += step;
    }

    tracing::debug!(lower, upper, step, probability, "integrated exceedance probability");
    Ok(probability)
}

/// Lognormal distribution from its median and logarithmic standard
/// deviation (beta), as used for fragility curves.
pub fn lognormal_from_median(median: f64, beta: f64) -> Result<LogNormal, ProbabilityError> {
    if !median.is_finite() || median <= 0.0 {
        return Err(ProbabilityError::InvalidDistribution {
            reason: format!("median must be finite and > 0, got {median}"),
        });
    }
    if !beta.is_finite() || beta <= 0.0 {
        return Err(ProbabilityError::InvalidDistribution {
            reason: format!("beta must be finite and > 0, got {beta}"),
        });
    }
    LogNormal::new(median.ln(), beta).map_err(|error| ProbabilityError::InvalidDistribution {
        reason: error.to_string(),
    })
}
