//! Usage-pattern policies that reshape a raw consumption forecast.

use super::types::{HourlyForecast, TimeSlot, UsagePattern};
use crate::error::ConfigError;

/// Rewrites predicted consumption according to a [`UsagePattern`].
///
/// Windows come from the tariff: the caller passes the slot the hour was
/// classified into, so moving the tariff's peak moves the pattern with it.
///
/// - `Normal` keeps the forecast unchanged.
/// - `PeakFocused` keeps full consumption in [`TimeSlot::Peak`] hours and
///   scales every other hour by `reduction_factor`.
/// - `OffPeakFocused` keeps full consumption in [`TimeSlot::OffPeak`] hours
///   and scales peak and shoulder hours by `reduction_factor`.
///
/// # Examples
///
/// ```
/// use tou_sim::sim::pattern::PatternAdjuster;
/// use tou_sim::sim::types::{HourlyForecast, TimeSlot, UsagePattern};
///
/// let adjuster = PatternAdjuster::default();
/// let noon = HourlyForecast::new(12, 0, 2.0);
/// assert_eq!(adjuster.adjust(&noon, TimeSlot::Shoulder, UsagePattern::PeakFocused), 1.0);
/// assert_eq!(adjuster.adjust(&noon, TimeSlot::Shoulder, UsagePattern::Normal), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PatternAdjuster {
    reduction_factor: f64,
}

impl PatternAdjuster {
    pub const DEFAULT_REDUCTION_FACTOR: f64 = 0.5;

    /// Creates an adjuster with a custom reduction factor.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `reduction_factor` is not in `[0.0, 1.0]`.
    pub fn new(reduction_factor: f64) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&reduction_factor) {
            return Err(ConfigError::new(
                "pattern.reduction_factor",
                format!("must be in [0.0, 1.0], got {reduction_factor}"),
            ));
        }
        Ok(Self { reduction_factor })
    }

    pub fn reduction_factor(&self) -> f64 {
        self.reduction_factor
    }

    /// Returns the simulated consumption (kWh) for one forecast hour billed in `slot`.
    pub fn adjust(&self, forecast: &HourlyForecast, slot: TimeSlot, pattern: UsagePattern) -> f64 {
        let predicted = forecast.predicted_kwh;
        match (pattern, slot) {
            (UsagePattern::Normal, _)
            | (UsagePattern::PeakFocused, TimeSlot::Peak)
            | (UsagePattern::OffPeakFocused, TimeSlot::OffPeak) => predicted,
            (UsagePattern::PeakFocused | UsagePattern::OffPeakFocused, _) => {
                predicted * self.reduction_factor
            }
        }
    }
}

impl Default for PatternAdjuster {
    fn default() -> Self {
        Self {
            reduction_factor: Self::DEFAULT_REDUCTION_FACTOR,
        }
    }
}
