//! Shared test fixtures for integration tests.

use tou_sim::forecast::SyntheticForecast;
use tou_sim::sim::Simulator;
use tou_sim::sim::types::HourlyForecast;

/// Tolerance for comparing accumulated money and energy sums.
pub const EPS: f64 = 1e-9;

/// Default simulator (default tariff, reduction factor 0.5, shiftable 0.5).
pub fn default_simulator() -> Simulator {
    Simulator::default()
}

/// One day starting at midnight with the same consumption every hour.
pub fn flat_day(kwh: f64) -> Vec<HourlyForecast> {
    (0..24u32)
        .map(|h| HourlyForecast::new(h, h as usize, kwh))
        .collect()
}

/// Two days of seeded synthetic consumption starting at 20:00.
pub fn synthetic_two_days() -> Vec<HourlyForecast> {
    SyntheticForecast {
        start_hour: 20,
        ..SyntheticForecast::default()
    }
    .generate(48)
}

pub fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < EPS,
        "{what}: expected {expected}, got {actual}"
    );
}
