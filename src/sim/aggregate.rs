//! Post-hoc aggregation of simulated points into horizon and slot totals.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::types::{SimulationPoint, TimeSlot};

/// Energy, cost, and hour count accumulated for one billing slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlotTotals {
    pub slot: TimeSlot,
    /// Simulated energy billed in this slot (kWh).
    pub energy_kwh: f64,
    /// Cost billed in this slot (USD).
    pub cost_usd: f64,
    /// Number of simulated hours that fell in this slot.
    pub hour_count: usize,
}

impl SlotTotals {
    pub fn empty(slot: TimeSlot) -> Self {
        Self {
            slot,
            energy_kwh: 0.0,
            cost_usd: 0.0,
            hour_count: 0,
        }
    }
}

/// Per-slot totals, always holding an entry for every [`TimeSlot`].
pub type SlotBreakdown = BTreeMap<TimeSlot, SlotTotals>;

/// Whole-horizon totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Totals {
    /// Sum of raw forecast consumption (kWh).
    pub predicted_energy_kwh: f64,
    /// Sum of pattern-adjusted consumption (kWh).
    pub simulated_energy_kwh: f64,
    /// Sum of per-point cost (USD).
    pub total_cost_usd: f64,
    /// `simulated_energy_kwh - predicted_energy_kwh`; positive means the
    /// pattern increased consumption.
    pub difference_kwh: f64,
}

/// Reduces points into horizon totals and per-slot totals in a single pass.
///
/// Every slot is present in the breakdown even when no point falls in it.
///
/// # Arguments
///
/// * `points` - Simulated points, in horizon order
///
/// # Returns
///
/// `(totals, by_slot)`.
pub fn aggregate(points: &[SimulationPoint]) -> (Totals, SlotBreakdown) {
    let mut by_slot: SlotBreakdown = TimeSlot::ALL
        .into_iter()
        .map(|slot| (slot, SlotTotals::empty(slot)))
        .collect();

    let mut predicted = 0.0_f64;
    let mut simulated = 0.0_f64;
    let mut cost = 0.0_f64;

    for p in points {
        predicted += p.predicted_kwh;
        simulated += p.simulated_kwh;
        cost += p.cost_usd;

        let bucket = by_slot
            .entry(p.time_slot)
            .or_insert_with(|| SlotTotals::empty(p.time_slot));
        bucket.energy_kwh += p.simulated_kwh;
        bucket.cost_usd += p.cost_usd;
        bucket.hour_count += 1;
    }

    let totals = Totals {
        predicted_energy_kwh: predicted,
        simulated_energy_kwh: simulated,
        total_cost_usd: cost,
        difference_kwh: simulated - predicted,
    };
    (totals, by_slot)
}

impl fmt::Display for Totals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Predicted energy:      {:.2} kWh", self.predicted_energy_kwh)?;
        writeln!(f, "Simulated energy:      {:.2} kWh", self.simulated_energy_kwh)?;
        writeln!(f, "Difference:            {:+.2} kWh", self.difference_kwh)?;
        write!(f, "Total cost:            ${:.2}", self.total_cost_usd)
    }
}

impl fmt::Display for SlotTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<9} {:>3} h  {:>8.2} kWh  ${:.2}",
            self.slot, self.hour_count, self.energy_kwh, self.cost_usd
        )
    }
}
