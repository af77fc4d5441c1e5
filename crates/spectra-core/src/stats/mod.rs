pub mod compare;
pub mod descriptive;
pub mod format;
pub mod probability;

pub use compare::{check_equal, check_equal_size, is_negative_or_zero};
pub use descriptive::{
    Interpolation, StatisticsError, lognormal_standard_deviation, mean, median, percentile,
    standard_deviation,
};
pub use format::zeropad;
pub use probability::{
    ContinuousDistribution, ProbabilityError, greater_probability, lognormal_from_median,
};
