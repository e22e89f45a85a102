//! Estimate of the money saved by moving peak consumption elsewhere.

use super::aggregate::SlotBreakdown;
use super::types::TimeSlot;
use crate::error::ConfigError;

/// Models the saving from shifting a fixed share of peak-slot cost to a
/// zero-cost baseline.
///
/// The shiftable share is a policy constant, not derived from any measured
/// shiftability. Cost is assumed linear in consumption.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavingsEstimator {
    shiftable_fraction: f64,
}

impl SavingsEstimator {
    pub const DEFAULT_SHIFTABLE_FRACTION: f64 = 0.5;

    /// # Errors
    ///
    /// Returns a `ConfigError` if `shiftable_fraction` is not in `[0.0, 1.0]`.
    pub fn new(shiftable_fraction: f64) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&shiftable_fraction) {
            return Err(ConfigError::new(
                "savings.shiftable_fraction",
                format!("must be in [0.0, 1.0], got {shiftable_fraction}"),
            ));
        }
        Ok(Self { shiftable_fraction })
    }

    pub fn shiftable_fraction(&self) -> f64 {
        self.shiftable_fraction
    }

    /// Potential savings (USD); never more than the peak-slot cost.
    pub fn estimate(&self, by_slot: &SlotBreakdown) -> f64 {
        by_slot
            .get(&TimeSlot::Peak)
            .map_or(0.0, |peak| peak.cost_usd * self.shiftable_fraction)
    }
}

impl Default for SavingsEstimator {
    fn default() -> Self {
        Self {
            shiftable_fraction: Self::DEFAULT_SHIFTABLE_FRACTION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::aggregate::SlotTotals;

    fn breakdown(peak_cost: f64) -> SlotBreakdown {
        TimeSlot::ALL
            .into_iter()
            .map(|slot| {
                let mut totals = SlotTotals::empty(slot);
                if slot == TimeSlot::Peak {
                    totals.cost_usd = peak_cost;
                } else {
                    totals.cost_usd = 10.0;
                }
                (slot, totals)
            })
            .collect()
    }

    #[test]
    fn half_of_peak_cost_by_default() {
        let est = SavingsEstimator::default();
        assert_eq!(est.estimate(&breakdown(1.44)), 1.44 * 0.5);
    }

    #[test]
    fn other_slots_do_not_contribute() {
        let est = SavingsEstimator::default();
        assert_eq!(est.estimate(&breakdown(0.0)), 0.0);
    }

    #[test]
    fn never_exceeds_peak_cost() {
        for fraction in [0.0, 0.25, 0.5, 1.0] {
            let est = SavingsEstimator::new(fraction).unwrap();
            assert!(est.estimate(&breakdown(3.0)) <= 3.0);
        }
    }

    #[test]
    fn fraction_out_of_range_is_rejected() {
        assert!(SavingsEstimator::new(1.01).is_err());
        assert!(SavingsEstimator::new(-0.1).is_err());
        assert!(SavingsEstimator::new(f64::NAN).is_err());
    }
}
