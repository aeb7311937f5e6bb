//! Temperature reading, operator thresholds and excursion alerting.
//!
//! The sensor is an LM35 on a 10-bit ADC with a 5 V reference, so one count
//! is 4.88 mV and one degree is 10 mV. [`Temperature::apply_sample`] scales a
//! raw count to whole degrees, truncating toward zero, and stores the result
//! as a magnitude plus sign flag.
//!
//! # Thresholds
//!
//! `min < max` holds after every successful edit. The invariant is checked
//! only at edit time: [`Temperature::set_min`] and [`Temperature::set_max`]
//! reject a value that would break it and leave the stored one untouched.
//!
//! # One-shot Buzz
//!
//! [`ExcursionMonitor`] tracks whether the buzzer may sound for the next
//! excursion. Every reading inside the band re-arms it, and the first reading
//! outside the band consumes it, so each excursion buzzes exactly once.

use crate::error::ThresholdConflict;

/// Numerator of the count-to-degree scale (0.488 °C per count).
const SCALE_NUM: i32 = 488;
/// Denominator of the count-to-degree scale.
const SCALE_DEN: i32 = 1000;

/// Highest value accepted for the upper threshold.
pub const MAX_THRESHOLD: i16 = 100;

/// Position of the current reading relative to the thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "debug-mode", derive(defmt::Format))]
pub enum TempBand {
    /// Strictly below `min`
    Below,
    /// Inside `[min, max]`
    Within,
    /// Strictly above `max`
    Above,
}

/// Which threshold an edit targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "debug-mode", derive(defmt::Format))]
pub enum Threshold {
    Min,
    Max,
}

/// Latest reading and the operator-configured band.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "debug-mode", derive(defmt::Format))]
pub struct Temperature {
    /// Magnitude of the latest reading in °C
    pub current: u16,
    /// Sign of the latest reading
    pub negative: bool,
    /// Lower threshold in °C
    pub min: i16,
    /// Upper threshold in °C
    pub max: i16,
}

impl Temperature {
    pub const fn new(min: i16, max: i16) -> Self {
        Self {
            current: 0,
            negative: false,
            min,
            max,
        }
    }

    /// Converts a raw sensor count to degrees and stores it.
    pub fn apply_sample(&mut self, raw: i32) {
        let degrees = raw.saturating_mul(SCALE_NUM) / SCALE_DEN;
        self.negative = degrees < 0;
        self.current = u16::try_from(degrees.unsigned_abs()).unwrap_or(u16::MAX);
    }

    /// The latest reading as a signed value.
    pub fn degrees(&self) -> i32 {
        let magnitude = i32::from(self.current);
        if self.negative { -magnitude } else { magnitude }
    }

    /// Compares the latest reading to the `[min, max]` band.
    pub fn classify(&self) -> TempBand {
        let degrees = self.degrees();
        if degrees < i32::from(self.min) {
            TempBand::Below
        } else if degrees > i32::from(self.max) {
            TempBand::Above
        } else {
            TempBand::Within
        }
    }

    /// Sets the lower threshold.
    ///
    /// # Errors
    ///
    /// [`ThresholdConflict::MinNotBelowMax`] if `value >= max`.
    pub fn set_min(&mut self, value: i16) -> Result<(), ThresholdConflict> {
        if value >= self.max {
            return Err(ThresholdConflict::MinNotBelowMax);
        }
        self.min = value;
        Ok(())
    }

    /// Sets the upper threshold.
    ///
    /// # Errors
    ///
    /// [`ThresholdConflict::MaxNotAboveMin`] if `value <= min`, or
    /// [`ThresholdConflict::MaxAboveLimit`] if `value` exceeds
    /// [`MAX_THRESHOLD`].
    pub fn set_max(&mut self, value: i16) -> Result<(), ThresholdConflict> {
        if value <= self.min {
            return Err(ThresholdConflict::MaxNotAboveMin);
        }
        if value > MAX_THRESHOLD {
            return Err(ThresholdConflict::MaxAboveLimit);
        }
        self.max = value;
        Ok(())
    }

    /// Routes an edit to the selected threshold.
    pub fn set_threshold(&mut self, which: Threshold, value: i16) -> Result<(), ThresholdConflict> {
        match which {
            Threshold::Min => self.set_min(value),
            Threshold::Max => self.set_max(value),
        }
    }
}

/// One-shot buzz permission for temperature excursions.
///
/// Starts disarmed: a device that boots outside the band stays quiet until
/// the reading has been inside it at least once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "debug-mode", derive(defmt::Format))]
pub struct ExcursionMonitor {
    armed: bool,
}

impl ExcursionMonitor {
    pub const fn new() -> Self {
        Self { armed: false }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Feeds the latest band.
    ///
    /// # Returns
    ///
    /// `true` when this reading starts a new excursion and the buzzer
    /// should pulse.
    pub fn observe(&mut self, band: TempBand) -> bool {
        match band {
            TempBand::Within => {
                self.armed = true;
                false
            }
            TempBand::Below | TempBand::Above => core::mem::replace(&mut self.armed, false),
        }
    }
}
