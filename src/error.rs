//! error types

use thiserror::Error;

/// Rejected configuration. Fatal at startup.
#[derive(Debug, Error, PartialEq)]
pub(crate) enum ConfigError {
    #[error("device name missing from configuration")]
    MissingDeviceName,

    #[error("battery voltage min ({min}mV) must be below max ({max}mV)")]
    InvalidBatteryRange { min: u16, max: u16 },

    #[error("distance threshold {0}cm is not usable")]
    InvalidDistanceThreshold(f32),

    #[error("distance debounce {0}cm must be a finite value >= 0")]
    InvalidDebounce(f32),

    #[error("max update interval must be greater than zero")]
    InvalidUpdateInterval,

    #[error("empty normalization range [{min}, {max}]")]
    EmptyRange { min: f32, max: f32 },
}

/// The cached reading is too old to be reported.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("cached value is too old")]
pub(crate) struct StaleData {
    /// milliseconds since the last accepted broadcast, `None` if there was none
    pub(crate) age: Option<u64>,
}
