//! Integration tests for full simulation runs over the default tariff.

mod common;

use common::{assert_close, default_simulator, flat_day, synthetic_two_days};
use tou_sim::error::{InvalidHourError, SimError, ValidationError};
use tou_sim::sim::Simulator;
use tou_sim::sim::pattern::PatternAdjuster;
use tou_sim::sim::savings::SavingsEstimator;
use tou_sim::sim::suggest::SuggestionRules;
use tou_sim::sim::tariff::Tariff;
use tou_sim::sim::types::{HourlyForecast, TimeSlot, UsagePattern};

#[test]
fn flat_day_normal_prices_each_slot() {
    let report = default_simulator()
        .run(&flat_day(2.0), UsagePattern::Normal, 0.12)
        .unwrap();

    assert_eq!(report.horizon_len(), 24);
    assert_close(report.points[18].cost_usd, 0.36, "peak hour cost");
    assert_close(report.points[10].cost_usd, 0.288, "shoulder hour cost");
    assert_close(report.points[3].cost_usd, 0.24, "off-peak hour cost");

    let peak = report.slot(TimeSlot::Peak);
    let shoulder = report.slot(TimeSlot::Shoulder);
    let off_peak = report.slot(TimeSlot::OffPeak);
    assert_eq!(peak.hour_count, 4);
    assert_eq!(shoulder.hour_count, 10);
    assert_eq!(off_peak.hour_count, 10);
    assert_close(peak.cost_usd, 1.44, "peak slot cost");
    assert_close(shoulder.cost_usd, 2.88, "shoulder slot cost");
    assert_close(off_peak.cost_usd, 2.40, "off-peak slot cost");

    assert_close(report.totals.total_cost_usd, 6.72, "total cost");
    assert_close(report.totals.predicted_energy_kwh, 48.0, "predicted energy");
    assert_close(report.totals.difference_kwh, 0.0, "difference");
    assert_close(report.potential_savings_usd, 0.72, "potential savings");
}

#[test]
fn peak_focused_keeps_only_the_peak_window() {
    let report = default_simulator()
        .run(&flat_day(2.0), UsagePattern::PeakFocused, 0.12)
        .unwrap();

    assert_close(report.totals.simulated_energy_kwh, 28.0, "simulated energy");
    assert_close(report.totals.difference_kwh, -20.0, "difference");
    assert_close(report.points[17].simulated_kwh, 2.0, "17:00 kept");
    assert_close(report.points[21].simulated_kwh, 1.0, "21:00 reduced");
}

#[test]
fn off_peak_focused_reduces_daytime() {
    let report = default_simulator()
        .run(&flat_day(2.0), UsagePattern::OffPeakFocused, 0.12)
        .unwrap();

    // 14 daytime hours halved, 10 night hours kept.
    assert_close(report.totals.simulated_energy_kwh, 34.0, "simulated energy");
    assert_close(report.points[6].simulated_kwh, 2.0, "06:00 kept");
    assert_close(report.points[7].simulated_kwh, 1.0, "07:00 reduced");
    assert_close(report.points[20].simulated_kwh, 1.0, "20:00 reduced");
    assert_close(report.points[21].simulated_kwh, 2.0, "21:00 kept");
}

#[test]
fn slot_totals_partition_the_run() {
    let sim = default_simulator();
    let forecasts = synthetic_two_days();

    for pattern in UsagePattern::ALL {
        let report = sim.run(&forecasts, pattern, 0.12).unwrap();
        let cost: f64 = report.by_slot.values().map(|s| s.cost_usd).sum();
        let energy: f64 = report.by_slot.values().map(|s| s.energy_kwh).sum();
        let hours: usize = report.by_slot.values().map(|s| s.hour_count).sum();

        assert_close(cost, report.totals.total_cost_usd, "slot cost sum");
        assert_close(energy, report.totals.simulated_energy_kwh, "slot energy sum");
        assert_eq!(hours, 48, "{pattern}: every hour lands in one slot");
    }
}

#[test]
fn normal_pattern_is_identity_on_synthetic_load() {
    let forecasts = synthetic_two_days();
    let report = default_simulator()
        .run(&forecasts, UsagePattern::Normal, 0.12)
        .unwrap();

    for (f, p) in forecasts.iter().zip(&report.points) {
        assert_eq!(p.simulated_kwh, f.predicted_kwh);
    }
    assert_eq!(report.totals.difference_kwh, 0.0);
}

#[test]
fn points_keep_input_order_across_midnight() {
    let forecasts = synthetic_two_days();
    let report = default_simulator()
        .run(&forecasts, UsagePattern::Normal, 0.12)
        .unwrap();

    let hours: Vec<u32> = report.points.iter().map(|p| p.hour_of_day).collect();
    assert_eq!(&hours[..6], &[20, 21, 22, 23, 0, 1]);
    for (i, p) in report.points.iter().enumerate() {
        assert_eq!(p.horizon_index, i);
    }
}

#[test]
fn savings_are_half_the_peak_cost() {
    let sim = default_simulator();
    for pattern in UsagePattern::ALL {
        let report = sim.run(&synthetic_two_days(), pattern, 0.2).unwrap();
        let peak_cost = report.slot(TimeSlot::Peak).cost_usd;
        assert_close(report.potential_savings_usd, 0.5 * peak_cost, "savings");
        assert!(report.potential_savings_usd >= 0.0);
    }
}

#[test]
fn cost_scales_with_base_rate() {
    let sim = default_simulator();
    let forecasts = synthetic_two_days();
    let cheap = sim.run(&forecasts, UsagePattern::Normal, 0.10).unwrap();
    let dear = sim.run(&forecasts, UsagePattern::Normal, 0.20).unwrap();
    assert_close(
        dear.totals.total_cost_usd,
        2.0 * cheap.totals.total_cost_usd,
        "doubled rate",
    );
}

#[test]
fn empty_forecast_is_rejected() {
    let err = default_simulator()
        .run(&[], UsagePattern::Normal, 0.12)
        .unwrap_err();
    assert_eq!(err, SimError::Validation(ValidationError::EmptyForecast));
}

#[test]
fn negative_consumption_is_rejected() {
    let mut forecasts = flat_day(1.0);
    forecasts[5].predicted_kwh = -0.5;
    let err = default_simulator()
        .run(&forecasts, UsagePattern::Normal, 0.12)
        .unwrap_err();
    assert_eq!(
        err,
        SimError::Validation(ValidationError::NegativeConsumption {
            horizon_index: 5,
            value: -0.5,
        })
    );
}

#[test]
fn non_positive_base_rate_is_rejected() {
    let sim = default_simulator();
    for rate in [0.0, -0.12, f64::NAN] {
        let err = sim.run(&flat_day(1.0), UsagePattern::Normal, rate).unwrap_err();
        assert!(matches!(err, SimError::Config(_)), "rate {rate}: {err:?}");
    }
}

#[test]
fn compare_runs_every_pattern_on_the_same_forecast() {
    let reports = default_simulator()
        .compare(&synthetic_two_days(), 0.12)
        .unwrap();

    let patterns: Vec<UsagePattern> = reports.iter().map(|r| r.pattern).collect();
    assert_eq!(patterns, UsagePattern::ALL);

    let predicted = reports[0].totals.predicted_energy_kwh;
    for r in &reports {
        assert_eq!(r.totals.predicted_energy_kwh, predicted);
    }
    // Reshaping only ever removes consumption.
    let normal_cost = reports[0].totals.total_cost_usd;
    assert!(reports[1].totals.total_cost_usd < normal_cost);
    assert!(reports[2].totals.total_cost_usd < normal_cost);
}

#[test]
fn custom_policy_components_are_honored() {
    let sim: Simulator = Simulator::new(
        Default::default(),
        PatternAdjuster::new(0.25).unwrap(),
        SavingsEstimator::new(1.0).unwrap(),
    );
    let report = sim.run(&flat_day(4.0), UsagePattern::PeakFocused, 0.1).unwrap();

    assert_close(report.points[0].simulated_kwh, 1.0, "reduced by 0.25");
    assert_close(report.points[18].simulated_kwh, 4.0, "peak kept");
    let peak_cost = report.slot(TimeSlot::Peak).cost_usd;
    assert_close(report.potential_savings_usd, peak_cost, "fully shiftable");
}

/// Two-slot tariff: evenings at double price, everything else off-peak.
struct EveningTariff;

impl Tariff for EveningTariff {
    fn classify(&self, hour_of_day: u32) -> Result<TimeSlot, InvalidHourError> {
        match hour_of_day {
            18..=21 => Ok(TimeSlot::Peak),
            0..=23 => Ok(TimeSlot::OffPeak),
            hour => Err(InvalidHourError { hour }),
        }
    }

    fn multiplier_for(&self, slot: TimeSlot) -> f64 {
        match slot {
            TimeSlot::Peak => 2.0,
            TimeSlot::Shoulder | TimeSlot::OffPeak => 1.0,
        }
    }
}

#[test]
fn simulator_accepts_any_tariff() {
    let sim = Simulator::new(
        EveningTariff,
        PatternAdjuster::default(),
        SavingsEstimator::default(),
    );
    let report = sim.run(&flat_day(1.0), UsagePattern::Normal, 0.1).unwrap();

    assert_eq!(report.slot(TimeSlot::Peak).hour_count, 4);
    assert_eq!(report.slot(TimeSlot::Shoulder).hour_count, 0);
    assert_close(report.slot(TimeSlot::Shoulder).cost_usd, 0.0, "empty slot");
    assert_close(report.totals.total_cost_usd, 2.8, "20 h at 0.1 + 4 h at 0.2");
}

#[test]
fn patterns_follow_the_tariff_slots() {
    let sim = Simulator::new(
        EveningTariff,
        PatternAdjuster::default(),
        SavingsEstimator::default(),
    );
    let report = sim.run(&flat_day(2.0), UsagePattern::PeakFocused, 0.1).unwrap();

    assert_close(report.points[17].simulated_kwh, 1.0, "17:00 off-peak here");
    assert_close(report.points[21].simulated_kwh, 2.0, "21:00 peak here");
    assert_close(report.totals.simulated_energy_kwh, 28.0, "4 h kept, 20 h halved");
}

#[test]
fn out_of_range_hour_is_rejected_before_any_point() {
    let mut forecasts = flat_day(1.0);
    forecasts.push(HourlyForecast::new(24, 24, 1.0));
    let err = default_simulator()
        .run(&forecasts, UsagePattern::Normal, 0.12)
        .unwrap_err();
    assert!(matches!(
        err,
        SimError::Validation(ValidationError::InvalidHour {
            horizon_index: 24,
            ..
        })
    ));
}

#[test]
fn suggestions_cover_heavy_priced_hours() {
    let report = default_simulator()
        .run(&flat_day(2.0), UsagePattern::Normal, 0.12)
        .unwrap();
    let suggestions = SuggestionRules::default().suggest(&report.points);

    // 10 shoulder + 4 peak hours; off-peak is billed at the base rate.
    assert_eq!(suggestions.len(), 14);
    assert!(suggestions.iter().all(|s| s.time_slot != TimeSlot::OffPeak));
    let peak = suggestions
        .iter()
        .find(|s| s.hour_of_day == 18)
        .unwrap();
    assert_close(peak.potential_savings_kwh, 1.0, "2 kWh x (1.5 - 1)");

    // Halving off-peak-focused load drops daytime hours to the threshold.
    let shifted = default_simulator()
        .run(&flat_day(2.0), UsagePattern::OffPeakFocused, 0.12)
        .unwrap();
    assert!(SuggestionRules::default().suggest(&shifted.points).is_empty());
}
