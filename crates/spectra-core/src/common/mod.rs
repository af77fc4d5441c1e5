pub mod config;

pub use config::{SettingsError, SpectrumSettings};
