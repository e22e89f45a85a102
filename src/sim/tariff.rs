//! Time-of-use tariff: hour-of-day to billing slot and price multiplier.

use serde::Serialize;

use super::types::TimeSlot;
use crate::error::{ConfigError, InvalidHourError};

/// Half-open range of hours `[start, end)` within a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourWindow {
    /// First hour inside the window (inclusive).
    pub start: u32,
    /// First hour after the window (exclusive, at most 24).
    pub end: u32,
}

impl HourWindow {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, hour: u32) -> bool {
        hour >= self.start && hour < self.end
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Checks `start < end <= 24`, reporting problems under `field`.
    pub(crate) fn validate(&self, field: &str) -> Result<(), ConfigError> {
        if self.end > 24 {
            return Err(ConfigError::new(field, format!("end {} must be <= 24", self.end)));
        }
        if self.start >= self.end {
            return Err(ConfigError::new(
                field,
                format!("start {} must be < end {}", self.start, self.end),
            ));
        }
        Ok(())
    }
}

/// Price multiplier attached to a slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TariffRule {
    pub slot: TimeSlot,
    /// Factor applied to the base rate (> 0).
    pub multiplier: f64,
}

/// Slot details for a given hour, as shown by a "current slot" banner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotInfo {
    pub hour: u32,
    pub slot: TimeSlot,
    pub multiplier: f64,
    /// Where the current slot ends, `None` when every hour bills the same slot.
    pub next_transition: Option<SlotTransition>,
    pub recommendation: &'static str,
}

/// Hour at which the billing slot changes and the slot that begins there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotTransition {
    pub hour: u32,
    pub slot: TimeSlot,
}

/// Pricing rules consulted by the simulator.
///
/// Implementations are read-only after construction, so one tariff can be
/// shared across any number of concurrent runs.
pub trait Tariff {
    /// Returns the billing slot of `hour_of_day`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHourError`] if `hour_of_day` is outside `0..=23`.
    fn classify(&self, hour_of_day: u32) -> Result<TimeSlot, InvalidHourError>;

    /// Returns the price multiplier of `slot`.
    fn multiplier_for(&self, slot: TimeSlot) -> f64;

    /// Returns the slot and multiplier that apply at `hour_of_day`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHourError`] if `hour_of_day` is outside `0..=23`.
    fn rule_for(&self, hour_of_day: u32) -> Result<TariffRule, InvalidHourError> {
        let slot = self.classify(hour_of_day)?;
        Ok(TariffRule {
            slot,
            multiplier: self.multiplier_for(slot),
        })
    }

    /// Describes the slot at `hour` and when it next changes, wrapping past midnight.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHourError`] if `hour` is outside `0..=23`.
    fn slot_info(&self, hour: u32) -> Result<SlotInfo, InvalidHourError> {
        let rule = self.rule_for(hour)?;
        let mut next_transition = None;
        for offset in 1..24 {
            let candidate = (hour + offset) % 24;
            let slot = self.classify(candidate)?;
            if slot != rule.slot {
                next_transition = Some(SlotTransition {
                    hour: candidate,
                    slot,
                });
                break;
            }
        }
        Ok(SlotInfo {
            hour,
            slot: rule.slot,
            multiplier: rule.multiplier,
            next_transition,
            recommendation: rule.slot.recommendation(),
        })
    }
}

impl<T: Tariff + ?Sized> Tariff for &T {
    fn classify(&self, hour_of_day: u32) -> Result<TimeSlot, InvalidHourError> {
        (**self).classify(hour_of_day)
    }

    fn multiplier_for(&self, slot: TimeSlot) -> f64 {
        (**self).multiplier_for(slot)
    }
}

/// Three-slot time-of-use schedule.
///
/// Hours in the peak window bill as [`TimeSlot::Peak`], hours in the shoulder
/// window as [`TimeSlot::Shoulder`], and every other hour as
/// [`TimeSlot::OffPeak`].
///
/// # Examples
///
/// ```
/// use tou_sim::sim::tariff::{Tariff, TariffSchedule};
/// use tou_sim::sim::types::TimeSlot;
///
/// let schedule = TariffSchedule::default();
/// assert_eq!(schedule.classify(17), Ok(TimeSlot::Peak));
/// assert_eq!(schedule.multiplier_for(TimeSlot::Shoulder), 1.2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TariffSchedule {
    peak_hours: HourWindow,
    shoulder_hours: HourWindow,
    peak_multiplier: f64,
    shoulder_multiplier: f64,
    off_peak_multiplier: f64,
}

impl TariffSchedule {
    pub const DEFAULT_PEAK_HOURS: HourWindow = HourWindow::new(17, 21);
    pub const DEFAULT_SHOULDER_HOURS: HourWindow = HourWindow::new(7, 17);
    pub const DEFAULT_PEAK_MULTIPLIER: f64 = 1.5;
    pub const DEFAULT_SHOULDER_MULTIPLIER: f64 = 1.2;
    pub const DEFAULT_OFF_PEAK_MULTIPLIER: f64 = 1.0;

    /// Creates a schedule from slot windows and multipliers.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a window is empty, ends past hour 24, or
    /// overlaps the other window, or if a multiplier is not a positive finite number.
    pub fn new(
        peak_hours: HourWindow,
        shoulder_hours: HourWindow,
        peak_multiplier: f64,
        shoulder_multiplier: f64,
        off_peak_multiplier: f64,
    ) -> Result<Self, ConfigError> {
        peak_hours.validate("tariff.peak_hours")?;
        shoulder_hours.validate("tariff.shoulder_hours")?;
        if peak_hours.overlaps(&shoulder_hours) {
            return Err(ConfigError::new(
                "tariff.shoulder_hours",
                "must not overlap tariff.peak_hours",
            ));
        }
        for (field, multiplier) in [
            ("tariff.peak_multiplier", peak_multiplier),
            ("tariff.shoulder_multiplier", shoulder_multiplier),
            ("tariff.off_peak_multiplier", off_peak_multiplier),
        ] {
            if !multiplier.is_finite() || multiplier <= 0.0 {
                return Err(ConfigError::new(
                    field,
                    format!("must be a finite number > 0, got {multiplier}"),
                ));
            }
        }

        Ok(Self {
            peak_hours,
            shoulder_hours,
            peak_multiplier,
            shoulder_multiplier,
            off_peak_multiplier,
        })
    }

    pub fn peak_hours(&self) -> HourWindow {
        self.peak_hours
    }

    pub fn shoulder_hours(&self) -> HourWindow {
        self.shoulder_hours
    }

    /// All three rules, most expensive slot first.
    pub fn rules(&self) -> [TariffRule; 3] {
        TimeSlot::ALL.map(|slot| TariffRule {
            slot,
            multiplier: self.multiplier_for(slot),
        })
    }
}

impl Default for TariffSchedule {
    fn default() -> Self {
        Self {
            peak_hours: Self::DEFAULT_PEAK_HOURS,
            shoulder_hours: Self::DEFAULT_SHOULDER_HOURS,
            peak_multiplier: Self::DEFAULT_PEAK_MULTIPLIER,
            shoulder_multiplier: Self::DEFAULT_SHOULDER_MULTIPLIER,
            off_peak_multiplier: Self::DEFAULT_OFF_PEAK_MULTIPLIER,
        }
    }
}

impl Tariff for TariffSchedule {
    fn classify(&self, hour_of_day: u32) -> Result<TimeSlot, InvalidHourError> {
        if hour_of_day > 23 {
            return Err(InvalidHourError { hour: hour_of_day });
        }
        let slot = if self.peak_hours.contains(hour_of_day) {
            TimeSlot::Peak
        } else if self.shoulder_hours.contains(hour_of_day) {
            TimeSlot::Shoulder
        } else {
            TimeSlot::OffPeak
        };
        Ok(slot)
    }

    fn multiplier_for(&self, slot: TimeSlot) -> f64 {
        match slot {
            TimeSlot::Peak => self.peak_multiplier,
            TimeSlot::Shoulder => self.shoulder_multiplier,
            TimeSlot::OffPeak => self.off_peak_multiplier,
        }
    }
}
