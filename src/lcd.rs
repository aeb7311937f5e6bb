//! HD44780 character LCD driver, 16x2, 4-bit bus.
//!
//! Writes are blocking: each byte goes out as two nibbles strobed on EN,
//! with `block_for` covering the controller's execution times. The LCD is
//! only driven from the foreground, so a busy-wait never stalls the tick.
//!
//! # Bus Timing
//!
//! - EN pulse: >= 450 ns high
//! - Most instructions: 37 µs
//! - Clear display / return home: 1.52 ms
//! - Power-on: 40 ms before the first instruction

use embassy_stm32::gpio::{Level, Output};
use embassy_time::{Duration, block_for};

use thermoclock::alarm::Alarm;
use thermoclock::clock::CalendarDate;
use thermoclock::io::{Position, TextDisplay};
use thermoclock::screen;
use thermoclock::temperature::Temperature;

const CLEAR_DISPLAY: u8 = 0x01;
const ENTRY_MODE_INCREMENT: u8 = 0x06;
const DISPLAY_ON_CURSOR_OFF: u8 = 0x0C;
const FUNCTION_SET_4BIT_2LINE: u8 = 0x28;
const SET_DDRAM_ADDRESS: u8 = 0x80;

/// DDRAM address of the first cell of each row.
const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];

pub struct Lcd {
    /// Register select: low for instructions, high for characters
    rs: Output<'static>,
    en: Output<'static>,
    /// D4..D7
    data: [Output<'static>; 4],
}

impl Lcd {
    /// Takes the bus pins and runs the 4-bit initialization sequence.
    ///
    /// # Arguments
    ///
    /// * `rs` - Register select (PC4)
    /// * `en` - Enable strobe (PC5)
    /// * `data` - D4..D7 (PC0..PC3)
    pub fn new(rs: Output<'static>, en: Output<'static>, data: [Output<'static>; 4]) -> Self {
        let mut lcd = Self { rs, en, data };
        lcd.init();
        lcd
    }

    fn init(&mut self) {
        block_for(Duration::from_millis(40));

        // Three 8-bit function sets resynchronize the controller whatever
        // mode it powered up in, then switch to 4-bit.
        self.rs.set_low();
        for _ in 0..3 {
            self.write_nibble(0x03);
            block_for(Duration::from_millis(5));
        }
        self.write_nibble(0x02);

        self.command(FUNCTION_SET_4BIT_2LINE);
        self.command(DISPLAY_ON_CURSOR_OFF);
        self.command(ENTRY_MODE_INCREMENT);
        self.clear();

        #[cfg(feature = "debug-mode")]
        defmt::info!("LCD ready");
    }

    fn write_nibble(&mut self, nibble: u8) {
        for (bit, pin) in self.data.iter_mut().enumerate() {
            pin.set_level(Level::from(nibble & (1 << bit) != 0));
        }
        self.en.set_high();
        block_for(Duration::from_micros(1));
        self.en.set_low();
        block_for(Duration::from_micros(50));
    }

    fn write_byte(&mut self, byte: u8, is_data: bool) {
        self.rs.set_level(Level::from(is_data));
        self.write_nibble(byte >> 4);
        self.write_nibble(byte & 0x0F);
    }

    fn command(&mut self, command: u8) {
        self.write_byte(command, false);
    }

    fn set_cursor(&mut self, position: Position) {
        let row = usize::from(position.row).min(ROW_OFFSETS.len() - 1);
        self.command(SET_DDRAM_ADDRESS | (ROW_OFFSETS[row] + position.col));
    }

    fn write_str(&mut self, text: &str) {
        for byte in text.bytes() {
            self.write_byte(byte, true);
        }
    }
}

impl TextDisplay for Lcd {
    fn clear(&mut self) {
        self.command(CLEAR_DISPLAY);
        block_for(Duration::from_millis(2));
    }

    fn render_text(&mut self, position: Position, text: &str) {
        self.set_cursor(position);
        self.write_str(text);
    }

    fn render_summary(&mut self, date: &CalendarDate, temperature: &Temperature) {
        self.render_text(Position::new(0, 0), &screen::summary_line(date, temperature));
    }

    fn render_alarm(&mut self, position: Position, alarm: &Alarm, buzzing: bool) {
        self.render_text(position, &screen::alarm_line(alarm, buzzing));
    }
}
