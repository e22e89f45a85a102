//! Immutable result of one simulation run.

use std::fmt;

use serde::Serialize;

use super::aggregate::{SlotBreakdown, SlotTotals, Totals};
use super::types::{SimulationPoint, TimeSlot, UsagePattern};

/// Everything a presentation layer needs from a single run.
///
/// Values keep full precision; rounding to cents happens only when the
/// report is displayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    /// Pattern the forecast was reshaped with.
    pub pattern: UsagePattern,
    /// Base rate used for every point (USD/kWh).
    pub base_rate_usd_per_kwh: f64,
    /// One point per forecast hour, in input order.
    pub points: Vec<SimulationPoint>,
    pub totals: Totals,
    /// Totals per slot; all three slots are always present.
    pub by_slot: SlotBreakdown,
    /// Estimated saving from shifting peak consumption (USD, >= 0).
    pub potential_savings_usd: f64,
}

impl SimulationReport {
    /// Totals of one slot.
    pub fn slot(&self, slot: TimeSlot) -> SlotTotals {
        self.by_slot
            .get(&slot)
            .copied()
            .unwrap_or_else(|| SlotTotals::empty(slot))
    }

    /// Number of simulated hours.
    pub fn horizon_len(&self) -> usize {
        self.points.len()
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Simulation Report ---")?;
        writeln!(f, "Pattern:               {}", self.pattern)?;
        writeln!(f, "Horizon:               {} h", self.horizon_len())?;
        writeln!(f, "Base rate:             ${:.4}/kWh", self.base_rate_usd_per_kwh)?;
        writeln!(f, "{}", self.totals)?;
        writeln!(f, "Potential savings:     ${:.2}", self.potential_savings_usd)?;
        writeln!(f, "--- By time slot ---")?;
        let mut slots = TimeSlot::ALL.iter().peekable();
        while let Some(&slot) = slots.next() {
            write!(f, "{}", self.slot(slot))?;
            if slots.peek().is_some() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Simulator;
    use crate::sim::types::HourlyForecast;

    fn evening_report() -> SimulationReport {
        let sim: Simulator = Simulator::default();
        let forecasts: Vec<HourlyForecast> = (0..4)
            .map(|i| HourlyForecast::new(16 + i, i as usize, 2.0))
            .collect();
        sim.run(&forecasts, UsagePattern::Normal, 0.1).unwrap()
    }

    #[test]
    fn slot_lookup_covers_empty_slots() {
        let report = evening_report();
        assert_eq!(report.slot(TimeSlot::Peak).hour_count, 3);
        assert_eq!(report.slot(TimeSlot::Shoulder).hour_count, 1);
        assert_eq!(report.slot(TimeSlot::OffPeak), SlotTotals::empty(TimeSlot::OffPeak));
    }

    #[test]
    fn display_rounds_to_cents() {
        let text = evening_report().to_string();
        assert!(text.starts_with("--- Simulation Report ---"));
        assert!(text.contains("Horizon:               4 h"));
        // 2.0 kWh * 0.1 * (1.2 + 3 * 1.5) = 1.14
        assert!(text.contains("Total cost:            $1.14"), "{text}");
        assert!(text.contains("Potential savings:     $0.45"), "{text}");
        assert_eq!(text.lines().filter(|l| l.contains(" h  ")).count(), 3);
    }

    #[test]
    fn serializes_points_and_slots() {
        let json = serde_json::to_value(evening_report()).unwrap();
        assert_eq!(json["points"].as_array().map(Vec::len), Some(4));
        assert_eq!(json["by_slot"]["off_peak"]["hour_count"], 0);
    }
}
