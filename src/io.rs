//! Contracts with the hardware collaborators.
//!
//! The core never touches a peripheral directly. The firmware binary
//! implements these traits over the board's GPIO, ADC and LCD; host tests
//! implement them over scripted keys and recorded frames.
//!
//! Async methods are awaited only from the executor that owns the
//! implementation, so the traits do not require `Send` futures.
#![allow(async_fn_in_trait)]

use crate::alarm::Alarm;
use crate::clock::{CalendarDate, ClockTime};
use crate::temperature::{TempBand, Temperature};

/// A decoded keypad press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "debug-mode", derive(defmt::Format))]
pub enum KeyCode {
    /// `0..=9`
    Digit(u8),
    /// `*`
    Cancel,
    /// `#`
    Confirm,
}

/// Character cell on the text display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "debug-mode", derive(defmt::Format))]
pub struct Position {
    pub col: u8,
    pub row: u8,
}

impl Position {
    pub const fn new(col: u8, row: u8) -> Self {
        Self { col, row }
    }
}

/// Non-blocking key source.
pub trait Keypad {
    /// Returns a key if one was pressed since the last poll.
    fn poll_key(&mut self) -> Option<KeyCode>;
}

/// The operator side of the foreground: key input plus pacing.
pub trait Operator {
    /// Waits until the operator presses a key.
    async fn next_key(&mut self) -> KeyCode;

    /// Keeps the current screen up for `ms` milliseconds.
    async fn linger(&mut self, ms: u32);
}

/// Two-line character display used for menus and the main page.
pub trait TextDisplay {
    fn clear(&mut self);

    fn render_text(&mut self, position: Position, text: &str);

    /// Date and temperature, top line of the main page.
    fn render_summary(&mut self, date: &CalendarDate, temperature: &Temperature);

    /// Alarm time and status at `position`.
    fn render_alarm(&mut self, position: Position, alarm: &Alarm, buzzing: bool);
}

/// Numeric display showing the running clock.
pub trait TimeDisplay {
    fn render_time(&mut self, time: &ClockTime);
}

/// Analog temperature sensor.
pub trait TemperatureSensor {
    /// Takes one raw reading.
    async fn sample(&mut self) -> i32;
}

/// Piezo buzzer.
pub trait Buzzer {
    /// Sounds the buzzer for `ms` milliseconds.
    async fn pulse(&mut self, ms: u32);
}

/// Indicator lights for the temperature band.
pub trait BandIndicator {
    fn show_band(&mut self, band: TempBand);
}
