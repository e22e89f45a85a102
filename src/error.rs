//! Error taxonomy for input validation, tariff lookups, and configuration.

use thiserror::Error;

/// Hour-of-day outside `0..=23` handed to a tariff lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("hour of day {hour} is outside 0..=23")]
pub struct InvalidHourError {
    pub hour: u32,
}

/// Rejected forecast input. A run that fails validation produces no report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("forecast sequence is empty")]
    EmptyForecast,

    #[error("negative predicted consumption {value} kWh at horizon index {horizon_index}")]
    NegativeConsumption { horizon_index: usize, value: f64 },

    #[error("predicted consumption at horizon index {horizon_index} is not a finite number")]
    NonFiniteConsumption { horizon_index: usize },

    #[error("invalid hour at horizon index {horizon_index}: {source}")]
    InvalidHour {
        horizon_index: usize,
        #[source]
        source: InvalidHourError,
    },

    #[error("malformed time label \"{label}\" (expected H:MM or HH:MM)")]
    MalformedTimeLabel { label: String },
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"tariff.peak_multiplier"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Failure of a simulation run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_hour_message_names_the_hour() {
        let err = InvalidHourError { hour: 24 };
        assert_eq!(err.to_string(), "hour of day 24 is outside 0..=23");
    }

    #[test]
    fn config_error_display_includes_field() {
        let err = ConfigError::new("simulation.base_rate_usd_per_kwh", "must be > 0");
        let s = err.to_string();
        assert!(s.contains("simulation.base_rate_usd_per_kwh"));
        assert!(s.contains("must be > 0"));
    }

    #[test]
    fn validation_error_converts_into_sim_error() {
        let err: SimError = ValidationError::EmptyForecast.into();
        assert!(matches!(err, SimError::Validation(ValidationError::EmptyForecast)));
    }
}
