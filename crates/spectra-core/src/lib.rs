//! Numerical utilities for seismic analysis: resampling of recorded ground
//! motion onto a constant time step, single-degree-of-freedom response
//! spectra, and the descriptive statistics used when post-processing them.

pub mod common;
pub mod domain;
pub mod numerics;
pub mod stats;
