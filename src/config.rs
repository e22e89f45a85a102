//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::forecast::SyntheticForecast;
use crate::sim::Simulator;
use crate::sim::pattern::PatternAdjuster;
use crate::sim::savings::SavingsEstimator;
use crate::sim::suggest::SuggestionRules;
use crate::sim::tariff::{HourWindow, TariffSchedule};
use crate::sim::types::UsagePattern;

/// Longest horizon the calling surface accepts (hours).
pub const MAX_HORIZON_HOURS: usize = 48;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Run-level parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Slot windows and price multipliers.
    #[serde(default)]
    pub tariff: TariffConfig,
    /// Usage-pattern policy.
    #[serde(default)]
    pub pattern: PatternConfig,
    /// Shiftable-savings policy.
    #[serde(default)]
    pub savings: SavingsConfig,
    /// Per-hour shifting suggestions.
    #[serde(default)]
    pub suggestions: SuggestionsConfig,
    /// Synthetic forecast used when no external forecast is supplied.
    #[serde(default)]
    pub forecast: ForecastConfig,
}

/// Run-level parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Base electricity rate (USD/kWh, must be > 0).
    pub base_rate_usd_per_kwh: f64,
    /// Usage pattern applied to the forecast.
    pub pattern: UsagePattern,
    /// Number of hours to simulate (1–48).
    pub horizon_hours: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            base_rate_usd_per_kwh: crate::sim::cost::DEFAULT_BASE_RATE_USD_PER_KWH,
            pattern: UsagePattern::Normal,
            horizon_hours: 24,
        }
    }
}

/// Slot windows (half-open hour ranges) and price multipliers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TariffConfig {
    /// Peak window start hour (inclusive).
    pub peak_start: u32,
    /// Peak window end hour (exclusive).
    pub peak_end: u32,
    /// Shoulder window start hour (inclusive).
    pub shoulder_start: u32,
    /// Shoulder window end hour (exclusive).
    pub shoulder_end: u32,
    pub peak_multiplier: f64,
    pub shoulder_multiplier: f64,
    pub off_peak_multiplier: f64,
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            peak_start: TariffSchedule::DEFAULT_PEAK_HOURS.start,
            peak_end: TariffSchedule::DEFAULT_PEAK_HOURS.end,
            shoulder_start: TariffSchedule::DEFAULT_SHOULDER_HOURS.start,
            shoulder_end: TariffSchedule::DEFAULT_SHOULDER_HOURS.end,
            peak_multiplier: TariffSchedule::DEFAULT_PEAK_MULTIPLIER,
            shoulder_multiplier: TariffSchedule::DEFAULT_SHOULDER_MULTIPLIER,
            off_peak_multiplier: TariffSchedule::DEFAULT_OFF_PEAK_MULTIPLIER,
        }
    }
}

impl TariffConfig {
    /// Builds the tariff schedule.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for malformed windows or non-positive multipliers.
    pub fn to_schedule(&self) -> Result<TariffSchedule, ConfigError> {
        TariffSchedule::new(
            HourWindow::new(self.peak_start, self.peak_end),
            HourWindow::new(self.shoulder_start, self.shoulder_end),
            self.peak_multiplier,
            self.shoulder_multiplier,
            self.off_peak_multiplier,
        )
    }
}

/// Usage-pattern policy parameters.
///
/// Which hours a pattern keeps in full is decided by the `[tariff]` slots.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PatternConfig {
    /// Scale applied to hours a pattern moves load away from (0.0–1.0).
    pub reduction_factor: f64,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            reduction_factor: PatternAdjuster::DEFAULT_REDUCTION_FACTOR,
        }
    }
}

impl PatternConfig {
    /// Builds the pattern adjuster.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for an out-of-range factor.
    pub fn to_adjuster(&self) -> Result<PatternAdjuster, ConfigError> {
        PatternAdjuster::new(self.reduction_factor)
    }
}

/// Shiftable-savings policy.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SavingsConfig {
    /// Share of peak-slot cost assumed shiftable (0.0–1.0).
    pub shiftable_fraction: f64,
}

impl Default for SavingsConfig {
    fn default() -> Self {
        Self {
            shiftable_fraction: SavingsEstimator::DEFAULT_SHIFTABLE_FRACTION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuggestionsConfig {
    /// Consumption above which a priced hour is flagged (kWh).
    pub threshold_kwh: f64,
}

impl Default for SuggestionsConfig {
    fn default() -> Self {
        Self {
            threshold_kwh: SuggestionRules::DEFAULT_THRESHOLD_KWH,
        }
    }
}

impl SuggestionsConfig {
    /// # Errors
    ///
    /// Returns a `ConfigError` for a negative or non-finite threshold.
    pub fn to_rules(&self) -> Result<SuggestionRules, ConfigError> {
        SuggestionRules::new(self.threshold_kwh)
    }
}

/// Synthetic forecast parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForecastConfig {
    /// Hour of day of the first simulated hour (0–23).
    pub start_hour: u32,
    /// Mean hourly consumption (kWh).
    pub base_kwh: f64,
    /// Daily sinusoidal amplitude (kWh).
    pub amplitude_kwh: f64,
    /// Phase offset (radians).
    pub phase_rad: f64,
    /// Gaussian noise standard deviation (kWh).
    pub noise_std: f64,
    /// Random seed.
    pub seed: u64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        let s = SyntheticForecast::default();
        Self {
            start_hour: s.start_hour,
            base_kwh: s.base_kwh,
            amplitude_kwh: s.amplitude_kwh,
            phase_rad: s.phase_rad,
            noise_std: s.noise_std,
            seed: s.seed,
        }
    }
}

impl ForecastConfig {
    pub fn to_synthetic(&self) -> SyntheticForecast {
        SyntheticForecast {
            start_hour: self.start_hour,
            base_kwh: self.base_kwh,
            amplitude_kwh: self.amplitude_kwh,
            phase_rad: self.phase_rad,
            noise_std: self.noise_std,
            seed: self.seed,
        }
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario (default tariff, 0.12 USD/kWh, normal usage).
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Returns the flat-rate preset: every slot billed at the base rate.
    pub fn flat_rate() -> Self {
        Self {
            tariff: TariffConfig {
                peak_multiplier: 1.0,
                shoulder_multiplier: 1.0,
                off_peak_multiplier: 1.0,
                ..TariffConfig::default()
            },
            ..Self::default()
        }
    }

    /// Returns the evening-heavy preset: consumption peaking around 19:00,
    /// simulated with peak-focused usage.
    pub fn evening_heavy() -> Self {
        Self {
            simulation: SimulationConfig {
                pattern: UsagePattern::PeakFocused,
                ..SimulationConfig::default()
            },
            forecast: ForecastConfig {
                base_kwh: 1.0,
                amplitude_kwh: 0.9,
                phase_rad: 2.88,
                noise_std: 0.05,
                ..ForecastConfig::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "flat_rate", "evening_heavy"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "flat_rate" => Ok(Self::flat_rate()),
            "evening_heavy" => Ok(Self::evening_heavy()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.simulation;

        if !s.base_rate_usd_per_kwh.is_finite() || s.base_rate_usd_per_kwh <= 0.0 {
            errors.push(ConfigError::new(
                "simulation.base_rate_usd_per_kwh",
                "must be a finite number > 0",
            ));
        }
        if !(1..=MAX_HORIZON_HOURS).contains(&s.horizon_hours) {
            errors.push(ConfigError::new(
                "simulation.horizon_hours",
                format!("must be in [1, {MAX_HORIZON_HOURS}]"),
            ));
        }

        if let Err(e) = self.tariff.to_schedule() {
            errors.push(e);
        }
        if let Err(e) = self.pattern.to_adjuster() {
            errors.push(e);
        }
        if let Err(e) = SavingsEstimator::new(self.savings.shiftable_fraction) {
            errors.push(e);
        }
        if let Err(e) = self.suggestions.to_rules() {
            errors.push(e);
        }

        let f = &self.forecast;
        if f.start_hour > 23 {
            errors.push(ConfigError::new("forecast.start_hour", "must be in [0, 23]"));
        }
        for (field, value) in [
            ("forecast.base_kwh", f.base_kwh),
            ("forecast.amplitude_kwh", f.amplitude_kwh),
            ("forecast.noise_std", f.noise_std),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.push(ConfigError::new(field, "must be a finite number >= 0"));
            }
        }

        errors
    }

    /// Builds a simulator from the tariff, pattern, and savings sections.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` found in those sections.
    pub fn build_simulator(&self) -> Result<Simulator, ConfigError> {
        Ok(Simulator::new(
            self.tariff.to_schedule()?,
            self.pattern.to_adjuster()?,
            SavingsEstimator::new(self.savings.shiftable_fraction)?,
        ))
    }
}
