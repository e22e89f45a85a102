//! Core simulation types: forecast input, slot and pattern variants, per-hour points.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ValidationError};

/// One hour of predicted consumption supplied by an external forecaster.
///
/// # Examples
///
/// ```
/// use tou_sim::sim::types::HourlyForecast;
///
/// let f = HourlyForecast::from_time_label("17:00", 0, 2.0).unwrap();
/// assert_eq!(f.hour_of_day, 17);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecast {
    /// Hour of day (valid range 0–23, checked by the engine).
    pub hour_of_day: u32,
    /// Position in the simulated horizon.
    pub horizon_index: usize,
    /// Predicted consumption for this hour (kWh, >= 0).
    pub predicted_kwh: f64,
}

impl HourlyForecast {
    pub fn new(hour_of_day: u32, horizon_index: usize, predicted_kwh: f64) -> Self {
        Self {
            hour_of_day,
            horizon_index,
            predicted_kwh,
        }
    }

    /// Builds a forecast record from a clock label such as `"17:00"` or `"7:30"`.
    ///
    /// Only the hour component is kept. The range of the hour is not checked
    /// here; out-of-range hours are rejected when the run validates its input.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MalformedTimeLabel`] if the label is not `H:MM`/`HH:MM`.
    pub fn from_time_label(
        label: &str,
        horizon_index: usize,
        predicted_kwh: f64,
    ) -> Result<Self, ValidationError> {
        let malformed = || ValidationError::MalformedTimeLabel {
            label: label.to_string(),
        };
        let (hour, minute) = label.trim().split_once(':').ok_or_else(malformed)?;
        let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if hour.is_empty() || hour.len() > 2 || minute.len() != 2 || !digits(hour) || !digits(minute)
        {
            return Err(malformed());
        }
        let hour_of_day = hour.parse::<u32>().map_err(|_| malformed())?;
        let minute = minute.parse::<u32>().map_err(|_| malformed())?;
        if minute > 59 {
            return Err(malformed());
        }
        Ok(Self::new(hour_of_day, horizon_index, predicted_kwh))
    }
}

/// Billing period with its own price multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSlot {
    Peak,
    Shoulder,
    OffPeak,
}

impl TimeSlot {
    /// All slots, most expensive first.
    pub const ALL: [Self; 3] = [Self::Peak, Self::Shoulder, Self::OffPeak];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Peak => "peak",
            Self::Shoulder => "shoulder",
            Self::OffPeak => "off_peak",
        }
    }

    /// Fixed usage advice for the slot.
    pub fn recommendation(self) -> &'static str {
        match self {
            Self::Peak => {
                "Avoid running high-power appliances. Delay usage until off-peak hours."
            }
            Self::Shoulder => {
                "Complete heavy usage tasks before peak hours or wait until off-peak."
            }
            Self::OffPeak => {
                "Optimal time for running high-power appliances and charging batteries."
            }
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TimeSlot {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "peak" => Ok(Self::Peak),
            "shoulder" => Ok(Self::Shoulder),
            "off_peak" | "offpeak" | "off-peak" => Ok(Self::OffPeak),
            other => Err(ConfigError::new(
                "time_slot",
                format!("must be \"peak\", \"shoulder\" or \"off_peak\", got \"{other}\""),
            )),
        }
    }
}

/// How discretionary load is distributed across the day.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum UsagePattern {
    /// Forecast is used as-is.
    #[default]
    Normal,
    /// Load concentrated into peak hours.
    #[serde(alias = "peak")]
    PeakFocused,
    /// Load shifted away from daytime and peak hours.
    #[serde(alias = "offpeak", alias = "off_peak")]
    OffPeakFocused,
}

impl UsagePattern {
    pub const ALL: [Self; 3] = [Self::Normal, Self::PeakFocused, Self::OffPeakFocused];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::PeakFocused => "peak_focused",
            Self::OffPeakFocused => "off_peak_focused",
        }
    }
}

impl fmt::Display for UsagePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for UsagePattern {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "peak_focused" | "peak" => Ok(Self::PeakFocused),
            "off_peak_focused" | "offpeak" | "off_peak" => Ok(Self::OffPeakFocused),
            other => Err(ConfigError::new(
                "pattern",
                format!(
                    "must be \"normal\", \"peak_focused\" or \"off_peak_focused\", got \"{other}\""
                ),
            )),
        }
    }
}

/// Complete record of one simulated hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationPoint {
    /// Hour of day (0–23).
    pub hour_of_day: u32,
    /// Position in the simulated horizon.
    pub horizon_index: usize,
    /// Raw forecast consumption (kWh).
    pub predicted_kwh: f64,
    /// Consumption after the usage pattern was applied (kWh).
    pub simulated_kwh: f64,
    /// Billing slot of this hour.
    pub time_slot: TimeSlot,
    /// Price multiplier of `time_slot`.
    pub multiplier: f64,
    /// Cost of `simulated_kwh` at the slot price (USD).
    pub cost_usd: f64,
}

impl fmt::Display for SimulationPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "h={:>3} ({:02}:00) | {:<8} x{:.2} | predicted={:>7.2} kWh  \
             simulated={:>7.2} kWh | cost=${:.2}",
            self.horizon_index,
            self.hour_of_day,
            self.time_slot,
            self.multiplier,
            self.predicted_kwh,
            self.simulated_kwh,
            self.cost_usd,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_label_parses_hour() {
        let f = HourlyForecast::from_time_label("7:30", 3, 1.25).unwrap();
        assert_eq!(f.hour_of_day, 7);
        assert_eq!(f.horizon_index, 3);
        assert_eq!(f.predicted_kwh, 1.25);
    }

    #[test]
    fn time_label_keeps_out_of_range_hour_for_validation() {
        let f = HourlyForecast::from_time_label("25:00", 0, 1.0).unwrap();
        assert_eq!(f.hour_of_day, 25);
    }

    #[test]
    fn malformed_time_labels_are_rejected() {
        for label in ["", "17", "ab:00", "17:0", "17:60", "123:00", ":00"] {
            let err = HourlyForecast::from_time_label(label, 0, 1.0);
            assert!(
                matches!(err, Err(ValidationError::MalformedTimeLabel { .. })),
                "label {label:?} should be rejected"
            );
        }
    }

    #[test]
    fn pattern_parses_names_and_aliases() {
        assert_eq!("normal".parse::<UsagePattern>().ok(), Some(UsagePattern::Normal));
        assert_eq!("peak".parse::<UsagePattern>().ok(), Some(UsagePattern::PeakFocused));
        assert_eq!(
            "OffPeak".parse::<UsagePattern>().ok(),
            Some(UsagePattern::OffPeakFocused)
        );
        assert!("weekend".parse::<UsagePattern>().is_err());
    }

    #[test]
    fn slot_display_round_trips_through_from_str() {
        for slot in TimeSlot::ALL {
            assert_eq!(slot.to_string().parse::<TimeSlot>().ok(), Some(slot));
        }
    }

    #[test]
    fn point_display_does_not_panic() {
        let p = SimulationPoint {
            hour_of_day: 18,
            horizon_index: 5,
            predicted_kwh: 2.0,
            simulated_kwh: 2.0,
            time_slot: TimeSlot::Peak,
            multiplier: 1.5,
            cost_usd: 0.36,
        };
        let s = format!("{p}");
        assert!(s.contains("peak"));
        assert!(s.contains("18:00"));
    }
}
