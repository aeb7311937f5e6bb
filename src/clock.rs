//! Wall-clock time and calendar date.
//!
//! Time is held as three digit pairs (hours, minutes, seconds) rather than
//! bounded integers. Each pair is two independent decimal digits, which is
//! exactly how the seven-segment display addresses them: one digit per
//! segment block, no division on the refresh path.
//!
//! # Rollover Cascade
//!
//! [`ClockTime::advance_one_second`] increments the seconds units digit and
//! carries upward:
//!
//! ```text
//! sec units 10 → 0, sec tens +1
//! sec tens   6 → 0, min units +1
//! min units 10 → 0, min tens +1
//! min tens   6 → 0, hour units +1
//! hour units 10 → 0, hour tens +1
//! hour     24:00 → 00:00, day +1
//! ```
//!
//! # Calendar
//!
//! Months are fixed at 30 days and there are no leap years. The day and month
//! counters wrap at 30 and 12 respectively and are normalized on every tick,
//! so a value entered at the boundary (day 30, month 12) rolls over at the
//! next second.

/// Two decimal digits stored independently.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "debug-mode", derive(defmt::Format))]
pub struct DigitPair {
    /// Tens digit
    pub tens: u8,
    /// Units digit
    pub units: u8,
}

impl DigitPair {
    pub const ZERO: Self = Self::new(0, 0);

    pub const fn new(tens: u8, units: u8) -> Self {
        Self { tens, units }
    }

    /// Splits a value in `0..=99` into its two digits.
    pub const fn from_value(value: u8) -> Self {
        Self {
            tens: value / 10,
            units: value % 10,
        }
    }

    pub const fn value(self) -> u8 {
        self.tens * 10 + self.units
    }

    pub const fn digits(self) -> [u8; 2] {
        [self.tens, self.units]
    }
}

/// Time of day in 24-hour digit-pair form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "debug-mode", derive(defmt::Format))]
pub struct ClockTime {
    pub hour: DigitPair,
    pub minute: DigitPair,
    pub second: DigitPair,
}

impl ClockTime {
    pub const MIDNIGHT: Self = Self::from_hms(0, 0, 0);

    /// Builds a time from plain integers.
    ///
    /// Callers are expected to pass in-range values (`hour < 24`,
    /// `minute < 60`, `second < 60`); the field entry validation guarantees
    /// this for operator input.
    pub const fn from_hms(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            hour: DigitPair::from_value(hour),
            minute: DigitPair::from_value(minute),
            second: DigitPair::from_value(second),
        }
    }

    /// Builds a time at second zero of the given minute.
    pub const fn from_hm(hour: u8, minute: u8) -> Self {
        Self::from_hms(hour, minute, 0)
    }

    /// Same hour and minute, seconds forced to zero.
    pub const fn at_minute_start(self) -> Self {
        Self {
            second: DigitPair::ZERO,
            ..self
        }
    }

    /// Seconds elapsed since midnight.
    pub const fn seconds_of_day(self) -> u32 {
        self.hour.value() as u32 * 3600
            + self.minute.value() as u32 * 60
            + self.second.value() as u32
    }

    /// Advances the clock by one second with cascading rollovers.
    ///
    /// # Returns
    ///
    /// `true` when the hour counter wrapped from 24 back to 00, meaning the
    /// calendar day must advance.
    pub fn advance_one_second(&mut self) -> bool {
        self.second.units += 1;
        if self.second.units == 10 {
            self.second.units = 0;
            self.second.tens += 1;
        }
        if self.second.tens == 6 {
            self.second.tens = 0;
            self.minute.units += 1;
        }
        if self.minute.units == 10 {
            self.minute.units = 0;
            self.minute.tens += 1;
        }
        if self.minute.tens == 6 {
            self.minute.tens = 0;
            self.hour.units += 1;
        }
        if self.hour.units == 10 {
            self.hour.units = 0;
            self.hour.tens += 1;
        }
        if self.hour.tens == 2 && self.hour.units == 4 {
            self.hour = DigitPair::ZERO;
            return true;
        }
        false
    }
}

/// Calendar date with fixed 30-day months.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "debug-mode", derive(defmt::Format))]
pub struct CalendarDate {
    /// Year, unbounded
    pub year: u16,
    /// Month counter, wraps to 0 on reaching [`Self::MONTHS_PER_YEAR`]
    pub month: u8,
    /// Day counter, wraps to 0 on reaching [`Self::DAYS_PER_MONTH`]
    pub day: u8,
}

impl CalendarDate {
    pub const DAYS_PER_MONTH: u8 = 30;
    pub const MONTHS_PER_YEAR: u8 = 12;

    pub const fn new(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Moves to the next day and normalizes the month and year counters.
    pub fn advance_day(&mut self) {
        self.day += 1;
        self.normalize();
    }

    /// Applies the day and month wrap rules to the stored counters.
    ///
    /// Runs every tick, not only at midnight, so an entered day of 30 or
    /// month of 12 carries into the next field one second after commit.
    pub fn normalize(&mut self) {
        if self.day >= Self::DAYS_PER_MONTH {
            self.day = 0;
            self.month += 1;
        }
        if self.month >= Self::MONTHS_PER_YEAR {
            self.month = 0;
            self.year = self.year.wrapping_add(1);
        }
    }
}
