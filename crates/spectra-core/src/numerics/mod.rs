pub mod history;
pub mod oscillator;
pub mod regularize;
pub mod response_spectrum;

pub use history::{HistorySpectrum, SpectrumError, spectrum_from_history};
pub use oscillator::{OscillatorConstants, OscillatorState};
pub use regularize::{
    RegularSeries, RegularizeError, RegularizeInput, Regularizer, TimeSeriesRegularizationApi,
    regularize,
};
pub use response_spectrum::{
    FrequencyGrid, ResponseSpectrum, ResponseSpectrumApi, ResponseSpectrumEngine,
    ResponseSpectrumError, ResponseSpectrumInput, response_spectrum, response_spectrum_with_mode,
};
