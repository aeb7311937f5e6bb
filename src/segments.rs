//! Six-digit multiplexed seven-segment clock display.
//!
//! Only one digit is lit at a time; [`segment_refresh_task`] steps through
//! them fast enough for the eye to see `HH MM SS`. The periodic tick
//! publishes each new time on [`CLOCK_SIGNAL`].
//!
//! # Segment Encoding
//!
//! ```text
//!   aaa
//!  f   b
//!   ggg        bit 0 = a ... bit 6 = g
//!  e   c
//!   ddd
//! ```

use embassy_stm32::gpio::{Level, Output};
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};
use embassy_time::Timer;

use thermoclock::clock::ClockTime;
use thermoclock::io::TimeDisplay;
use thermoclock::state::{SharedState, snapshot};

pub const DIGITS: usize = 6;

/// How long each digit stays lit.
const DWELL_MS: u64 = 2;

/// Segment patterns for `0..=9`.
const GLYPHS: [u8; 10] = [0x3F, 0x06, 0x5B, 0x4F, 0x66, 0x6D, 0x7D, 0x07, 0x7F, 0x6F];

/// Latest clock value, signalled once per tick.
pub static CLOCK_SIGNAL: Signal<CriticalSectionRawMutex, ClockTime> = Signal::new();

pub struct SegmentDisplay {
    /// Segment lines a..g (high = lit)
    segments: [Output<'static>; 7],
    /// Digit selects, left to right (active-low)
    selects: [Output<'static>; DIGITS],
    /// Decimal digit latched for each position
    digits: [u8; DIGITS],
    /// Position lit by the next refresh
    next: usize,
}

impl SegmentDisplay {
    pub fn new(segments: [Output<'static>; 7], selects: [Output<'static>; DIGITS]) -> Self {
        Self {
            segments,
            selects,
            digits: [0; DIGITS],
            next: 0,
        }
    }

    /// Blanks the digit lit last and lights the next one.
    pub fn refresh(&mut self) {
        let previous = (self.next + DIGITS - 1) % DIGITS;
        self.selects[previous].set_high();

        let glyph = GLYPHS
            .get(usize::from(self.digits[self.next]))
            .copied()
            .unwrap_or(0);
        for (bit, pin) in self.segments.iter_mut().enumerate() {
            pin.set_level(Level::from(glyph & (1 << bit) != 0));
        }

        self.selects[self.next].set_low();
        self.next = (self.next + 1) % DIGITS;
    }
}

impl TimeDisplay for SegmentDisplay {
    fn render_time(&mut self, time: &ClockTime) {
        let [h1, h0] = time.hour.digits();
        let [m1, m0] = time.minute.digits();
        let [s1, s0] = time.second.digits();
        self.digits = [h1, h0, m1, m0, s1, s0];
    }
}

/// Keeps the display multiplexed, picking up each new clock value.
///
/// # Arguments
///
/// * `display` - SegmentDisplay instance (takes ownership)
/// * `shared` - Shared state, read once for the boot time
#[embassy_executor::task]
pub async fn segment_refresh_task(mut display: SegmentDisplay, shared: &'static SharedState) {
    display.render_time(&snapshot(shared).time);
    loop {
        if let Some(time) = CLOCK_SIGNAL.try_take() {
            display.render_time(&time);
        }
        display.refresh();
        Timer::after_millis(DWELL_MS).await;
    }
}
