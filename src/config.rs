//! Compiled-in configuration.
//!
//! Nothing survives a power cycle: every boot starts from
//! [`Settings::DEFAULT`]. Timing values are in seconds (periodic ticks) or
//! milliseconds (pulses, polling, message holds).

use crate::alarm::Alarm;
use crate::auth::Pin;
use crate::clock::{CalendarDate, ClockTime};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Clock value at boot
    pub boot_time: ClockTime,
    /// Calendar value at boot
    pub boot_date: CalendarDate,
    /// Alarm at boot
    pub boot_alarm: Alarm,
    /// Lower temperature threshold at boot, °C
    pub min_temperature: i16,
    /// Upper temperature threshold at boot, °C
    pub max_temperature: i16,
    /// PIN at boot
    pub pin: Pin,
    /// Wrong PINs allowed per authentication session
    pub pin_attempts: u8,
    /// Lockout window after the attempt budget runs out
    pub lockout_secs: u16,
    /// Alarm pulses before buzzing stops on its own
    pub alarm_buzz_periods: u8,
    /// Length of one alarm pulse
    pub alarm_pulse_ms: u32,
    /// Length of the temperature excursion pulse
    pub excursion_pulse_ms: u32,
    /// Foreground keypad polling cadence
    pub key_poll_ms: u32,
    /// Hold time for confirmation messages
    pub confirm_hold_ms: u32,
    /// Hold time for rejection and lockout messages
    pub reject_hold_ms: u32,
}

impl Settings {
    pub const DEFAULT: Self = Self {
        boot_time: ClockTime::from_hms(12, 45, 0),
        boot_date: CalendarDate::new(1400, 3, 20),
        boot_alarm: Alarm::new(ClockTime::from_hm(13, 30), false),
        min_temperature: 18,
        max_temperature: 25,
        pin: Pin::new([1, 2, 3, 4]),
        pin_attempts: 3,
        lockout_secs: 15,
        alarm_buzz_periods: 60,
        alarm_pulse_ms: 20,
        excursion_pulse_ms: 100,
        key_poll_ms: 50,
        confirm_hold_ms: 200,
        reject_hold_ms: 300,
    };
}

impl Default for Settings {
    fn default() -> Self {
        Self::DEFAULT
    }
}
