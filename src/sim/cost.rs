//! Per-hour cost calculation.

use super::tariff::Tariff;
use super::types::TimeSlot;
use crate::error::{ConfigError, InvalidHourError};

/// Default base electricity rate when no external pricing is supplied.
pub const DEFAULT_BASE_RATE_USD_PER_KWH: f64 = 0.12;

/// Prices consumption at a fixed base rate scaled by the tariff multiplier.
///
/// The base rate is fixed for the lifetime of the calculator, so identical
/// inputs always price identically.
#[derive(Debug)]
pub struct CostCalculator<'a, T: Tariff> {
    tariff: &'a T,
    base_rate_usd_per_kwh: f64,
}

impl<'a, T: Tariff> CostCalculator<'a, T> {
    /// Creates a calculator bound to `tariff`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the base rate is not a positive finite number.
    pub fn new(tariff: &'a T, base_rate_usd_per_kwh: f64) -> Result<Self, ConfigError> {
        if !base_rate_usd_per_kwh.is_finite() || base_rate_usd_per_kwh <= 0.0 {
            return Err(ConfigError::new(
                "simulation.base_rate_usd_per_kwh",
                format!("must be a finite number > 0, got {base_rate_usd_per_kwh}"),
            ));
        }
        Ok(Self {
            tariff,
            base_rate_usd_per_kwh,
        })
    }

    pub fn base_rate_usd_per_kwh(&self) -> f64 {
        self.base_rate_usd_per_kwh
    }

    /// Cost (USD) of `kwh` consumed at `hour_of_day`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHourError`] if `hour_of_day` is outside `0..=23`.
    pub fn cost(&self, kwh: f64, hour_of_day: u32) -> Result<f64, InvalidHourError> {
        let slot = self.tariff.classify(hour_of_day)?;
        Ok(self.cost_in_slot(kwh, slot))
    }

    /// Cost (USD) of `kwh` consumed in an already classified slot.
    pub fn cost_in_slot(&self, kwh: f64, slot: TimeSlot) -> f64 {
        kwh * self.base_rate_usd_per_kwh * self.tariff.multiplier_for(slot)
    }
}
