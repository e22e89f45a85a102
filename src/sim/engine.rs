//! Simulation engine that drives tariff, pattern, cost, aggregation, and savings.

use tracing::debug;

use super::aggregate::aggregate;
use super::cost::CostCalculator;
use super::pattern::PatternAdjuster;
use super::report::SimulationReport;
use super::savings::SavingsEstimator;
use super::tariff::{Tariff, TariffSchedule};
use super::types::{HourlyForecast, SimulationPoint, UsagePattern};
use crate::error::{SimError, ValidationError};

/// Simulation engine owning the tariff and policy components.
///
/// Generic over `T: Tariff` for static dispatch. The engine holds no per-run
/// state: every call to [`Simulator::run`] builds a fresh report, so one
/// simulator can serve concurrent runs through a shared reference.
#[derive(Debug, Clone, Default)]
pub struct Simulator<T: Tariff = TariffSchedule> {
    tariff: T,
    adjuster: PatternAdjuster,
    savings: SavingsEstimator,
}

impl<T: Tariff> Simulator<T> {
    /// Creates a new simulation engine.
    ///
    /// # Arguments
    ///
    /// * `tariff` - Slot classification and multipliers
    /// * `adjuster` - Usage-pattern policy
    /// * `savings` - Shiftable-savings policy
    pub fn new(tariff: T, adjuster: PatternAdjuster, savings: SavingsEstimator) -> Self {
        Self {
            tariff,
            adjuster,
            savings,
        }
    }

    /// Runs one simulation over `forecasts`.
    ///
    /// Input is validated in full before any point is computed, so a failed
    /// run never yields a partial report. Output points keep input order.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] for a non-positive base rate and
    /// [`SimError::Validation`] for an empty sequence, a negative or
    /// non-finite consumption, or an hour outside `0..=23`.
    pub fn run(
        &self,
        forecasts: &[HourlyForecast],
        pattern: UsagePattern,
        base_rate_usd_per_kwh: f64,
    ) -> Result<SimulationReport, SimError> {
        let calculator = CostCalculator::new(&self.tariff, base_rate_usd_per_kwh)?;
        self.validate(forecasts)?;
        debug!(
            horizon = forecasts.len(),
            %pattern,
            base_rate_usd_per_kwh,
            "running simulation"
        );

        let mut points = Vec::with_capacity(forecasts.len());
        for forecast in forecasts {
            points.push(self.simulate_point(forecast, pattern, &calculator)?);
        }

        let (totals, by_slot) = aggregate(&points);
        let potential_savings_usd = self.savings.estimate(&by_slot);

        Ok(SimulationReport {
            pattern,
            base_rate_usd_per_kwh,
            points,
            totals,
            by_slot,
            potential_savings_usd,
        })
    }

    /// Runs every [`UsagePattern`] over the same forecast.
    ///
    /// # Errors
    ///
    /// Fails with the same errors as [`Simulator::run`]. Either every pattern
    /// produces a report or none is returned.
    pub fn compare(
        &self,
        forecasts: &[HourlyForecast],
        base_rate_usd_per_kwh: f64,
    ) -> Result<Vec<SimulationReport>, SimError> {
        UsagePattern::ALL
            .into_iter()
            .map(|pattern| self.run(forecasts, pattern, base_rate_usd_per_kwh))
            .collect()
    }

    /// Returns a reference to the tariff.
    pub fn tariff(&self) -> &T {
        &self.tariff
    }

    pub fn adjuster(&self) -> &PatternAdjuster {
        &self.adjuster
    }

    pub fn savings(&self) -> &SavingsEstimator {
        &self.savings
    }

    fn validate(&self, forecasts: &[HourlyForecast]) -> Result<(), ValidationError> {
        if forecasts.is_empty() {
            debug!("rejected empty forecast");
            return Err(ValidationError::EmptyForecast);
        }
        for f in forecasts {
            let horizon_index = f.horizon_index;
            if !f.predicted_kwh.is_finite() {
                debug!(horizon_index, "rejected non-finite consumption");
                return Err(ValidationError::NonFiniteConsumption { horizon_index });
            }
            if f.predicted_kwh < 0.0 {
                debug!(horizon_index, value = f.predicted_kwh, "rejected negative consumption");
                return Err(ValidationError::NegativeConsumption {
                    horizon_index,
                    value: f.predicted_kwh,
                });
            }
            if let Err(source) = self.tariff.classify(f.hour_of_day) {
                debug!(horizon_index, hour = f.hour_of_day, "rejected invalid hour");
                return Err(ValidationError::InvalidHour {
                    horizon_index,
                    source,
                });
            }
        }
        Ok(())
    }

    fn simulate_point(
        &self,
        forecast: &HourlyForecast,
        pattern: UsagePattern,
        calculator: &CostCalculator<'_, T>,
    ) -> Result<SimulationPoint, ValidationError> {
        let rule = self
            .tariff
            .rule_for(forecast.hour_of_day)
            .map_err(|source| ValidationError::InvalidHour {
                horizon_index: forecast.horizon_index,
                source,
            })?;
        let simulated_kwh = self.adjuster.adjust(forecast, rule.slot, pattern);
        let cost_usd = calculator.cost_in_slot(simulated_kwh, rule.slot);

        Ok(SimulationPoint {
            hour_of_day: forecast.hour_of_day,
            horizon_index: forecast.horizon_index,
            predicted_kwh: forecast.predicted_kwh,
            simulated_kwh,
            time_slot: rule.slot,
            multiplier: rule.multiplier,
            cost_usd,
        })
    }
}
