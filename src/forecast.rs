//! Forecast input adapters for the simulator.
//!
//! Forecasts come from an external prediction service; this module only
//! reads them from CSV, trims them to the requested horizon, or synthesises
//! a seeded profile for demos.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Deserialize;
use thiserror::Error;

use crate::error::ValidationError;
use crate::sim::types::HourlyForecast;

/// Failure while reading an external forecast.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("cannot read forecast \"{path}\": {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid forecast CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// One CSV row: `time,predicted_kwh`.
#[derive(Debug, Deserialize)]
struct ForecastRow {
    time: String,
    predicted_kwh: f64,
}

/// Reads a forecast from CSV with a `time,predicted_kwh` header.
///
/// Horizon indices are assigned in row order; the hour of day is taken from
/// the `time` label (`"17:00"`).
///
/// # Errors
///
/// Returns a `ForecastError` on malformed CSV or an unparseable time label.
pub fn read_forecast_csv(reader: impl Read) -> Result<Vec<HourlyForecast>, ForecastError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut forecasts = Vec::new();
    for (horizon_index, row) in rdr.deserialize::<ForecastRow>().enumerate() {
        let row = row?;
        forecasts.push(HourlyForecast::from_time_label(
            &row.time,
            horizon_index,
            row.predicted_kwh,
        )?);
    }
    Ok(forecasts)
}

/// Reads a forecast CSV file from disk.
///
/// # Errors
///
/// Returns a `ForecastError` if the file cannot be opened or parsed.
pub fn load_forecast_csv(path: &Path) -> Result<Vec<HourlyForecast>, ForecastError> {
    let file = File::open(path).map_err(|source| ForecastError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_forecast_csv(io::BufReader::new(file))
}

/// Keeps the first `hours` records of a forecast.
///
/// A forecast shorter than `hours` is returned whole.
pub fn truncate_to_horizon(forecasts: &[HourlyForecast], hours: usize) -> Vec<HourlyForecast> {
    forecasts[..hours.min(forecasts.len())].to_vec()
}

/// Seeded synthetic consumption profile.
///
/// Models a daily sinusoid around `base_kwh` with Gaussian noise, clamped at
/// zero. Stands in for the external forecaster in demos and tests.
///
/// # Examples
///
/// ```
/// use tou_sim::forecast::SyntheticForecast;
///
/// let profile = SyntheticForecast::default();
/// let day = profile.generate(24);
/// assert_eq!(day.len(), 24);
/// assert!(day.iter().all(|f| f.predicted_kwh >= 0.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticForecast {
    /// Hour of day of the first record (0–23).
    pub start_hour: u32,
    /// Mean hourly consumption (kWh).
    pub base_kwh: f64,
    /// Daily sinusoidal amplitude (kWh).
    pub amplitude_kwh: f64,
    /// Phase offset (radians); `π` peaks at 18:00.
    pub phase_rad: f64,
    /// Gaussian noise standard deviation (kWh).
    pub noise_std: f64,
    /// Random seed.
    pub seed: u64,
}

impl Default for SyntheticForecast {
    fn default() -> Self {
        Self {
            start_hour: 0,
            base_kwh: 0.8,
            amplitude_kwh: 0.4,
            phase_rad: std::f64::consts::PI,
            noise_std: 0.05,
            seed: 42,
        }
    }
}

impl SyntheticForecast {
    /// Generates `hours` consecutive hourly records starting at `start_hour`.
    pub fn generate(&self, hours: usize) -> Vec<HourlyForecast> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        (0..hours)
            .map(|i| {
                let hour_of_day = ((self.start_hour as usize + i) % 24) as u32;
                let day_pos = f64::from(hour_of_day) / 24.0;
                let angle = 2.0 * std::f64::consts::PI * day_pos + self.phase_rad;
                let noise = gaussian_noise(&mut rng, self.noise_std);
                let kwh = (self.base_kwh + self.amplitude_kwh * angle.sin() + noise).max(0.0);
                HourlyForecast::new(hour_of_day, i, kwh)
            })
            .collect()
    }
}

/// Gaussian noise with mean 0 via the Box-Muller transform.
fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}
