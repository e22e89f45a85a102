//! Per-hour shifting suggestions for heavy hours in priced slots.

use std::fmt;

use serde::Serialize;

use super::types::{SimulationPoint, TimeSlot};
use crate::error::ConfigError;

/// Advice for one simulated hour whose consumption exceeds the threshold
/// in a slot priced above the base rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub horizon_index: usize,
    pub hour_of_day: u32,
    pub time_slot: TimeSlot,
    /// Simulated consumption of the hour (kWh).
    pub simulated_kwh: f64,
    pub multiplier: f64,
    /// Base-rate-equivalent energy of the surcharge, `kwh × (multiplier − 1)`.
    pub potential_savings_kwh: f64,
    /// Cost reduction from billing the hour at the base rate instead (%).
    pub savings_pct: f64,
    pub recommendation: &'static str,
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:00 [{}] {:.3} kWh: {} Potential savings: {:.3} kWh ({:.1}% cost reduction).",
            self.hour_of_day,
            self.time_slot,
            self.simulated_kwh,
            self.recommendation,
            self.potential_savings_kwh,
            self.savings_pct,
        )
    }
}

/// Flags hours worth shifting.
///
/// # Examples
///
/// ```
/// use tou_sim::sim::suggest::SuggestionRules;
///
/// let rules = SuggestionRules::new(1.5).unwrap();
/// assert_eq!(rules.threshold_kwh(), 1.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuggestionRules {
    threshold_kwh: f64,
}

impl SuggestionRules {
    pub const DEFAULT_THRESHOLD_KWH: f64 = 1.0;

    /// # Errors
    ///
    /// Returns a `ConfigError` if `threshold_kwh` is negative or not finite.
    pub fn new(threshold_kwh: f64) -> Result<Self, ConfigError> {
        if !threshold_kwh.is_finite() || threshold_kwh < 0.0 {
            return Err(ConfigError::new(
                "suggestions.threshold_kwh",
                format!("must be a finite number >= 0, got {threshold_kwh}"),
            ));
        }
        Ok(Self { threshold_kwh })
    }

    pub fn threshold_kwh(&self) -> f64 {
        self.threshold_kwh
    }

    /// Returns one suggestion per point above the threshold in a slot with a
    /// multiplier above 1, in horizon order.
    pub fn suggest(&self, points: &[SimulationPoint]) -> Vec<Suggestion> {
        points
            .iter()
            .filter(|p| p.multiplier > 1.0 && p.simulated_kwh > self.threshold_kwh)
            .map(|p| Suggestion {
                horizon_index: p.horizon_index,
                hour_of_day: p.hour_of_day,
                time_slot: p.time_slot,
                simulated_kwh: p.simulated_kwh,
                multiplier: p.multiplier,
                potential_savings_kwh: p.simulated_kwh * (p.multiplier - 1.0),
                savings_pct: (p.multiplier - 1.0) / p.multiplier * 100.0,
                recommendation: p.time_slot.recommendation(),
            })
            .collect()
    }
}

impl Default for SuggestionRules {
    fn default() -> Self {
        Self {
            threshold_kwh: Self::DEFAULT_THRESHOLD_KWH,
        }
    }
}
