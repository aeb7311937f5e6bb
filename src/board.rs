//! Small board drivers behind the core's collaborator traits.
//!
//! - [`AdcSensor`] - LM35 on an ADC channel
//! - [`PiezoBuzzer`] - Active buzzer on a push-pull output
//! - [`BandLeds`] - Two LEDs encoding the temperature band
//! - [`Panel`] - The keypad, polled, as the foreground operator

use embassy_stm32::adc::{Adc, AnyAdcChannel};
use embassy_stm32::gpio::{Input, Output};
use embassy_stm32::peripherals::ADC1;
use embassy_time::Timer;

use thermoclock::io::{BandIndicator, Buzzer, KeyCode, Keypad, Operator, TemperatureSensor};
use thermoclock::keypad::MatrixKeypad;
use thermoclock::temperature::TempBand;

pub struct AdcSensor {
    adc: Adc<'static, ADC1>,
    channel: AnyAdcChannel<ADC1>,
}

impl AdcSensor {
    pub fn new(adc: Adc<'static, ADC1>, channel: AnyAdcChannel<ADC1>) -> Self {
        Self { adc, channel }
    }
}

impl TemperatureSensor for AdcSensor {
    async fn sample(&mut self) -> i32 {
        i32::from(self.adc.read(&mut self.channel).await)
    }
}

pub struct PiezoBuzzer {
    drive: Output<'static>,
}

impl PiezoBuzzer {
    pub fn new(drive: Output<'static>) -> Self {
        Self { drive }
    }
}

impl Buzzer for PiezoBuzzer {
    async fn pulse(&mut self, ms: u32) {
        self.drive.set_high();
        Timer::after_millis(u64::from(ms)).await;
        self.drive.set_low();
    }
}

/// Band LEDs driven as a 2-bit code.
///
/// | Band   | PA5 | PA6 |
/// |--------|-----|-----|
/// | Below  | 0   | 0   |
/// | Above  | 0   | 1   |
/// | Within | 1   | 0   |
pub struct BandLeds {
    bit0: Output<'static>,
    bit1: Output<'static>,
}

impl BandLeds {
    pub fn new(bit0: Output<'static>, bit1: Output<'static>) -> Self {
        Self { bit0, bit1 }
    }
}

impl BandIndicator for BandLeds {
    fn show_band(&mut self, band: TempBand) {
        let (bit0, bit1) = match band {
            TempBand::Below => (false, false),
            TempBand::Above => (false, true),
            TempBand::Within => (true, false),
        };
        self.bit0.set_level(bit0.into());
        self.bit1.set_level(bit1.into());
    }
}

/// Keypad polled at a fixed cadence.
pub struct Panel {
    keypad: MatrixKeypad<Output<'static>, Input<'static>>,
    poll_ms: u32,
}

impl Panel {
    pub fn new(keypad: MatrixKeypad<Output<'static>, Input<'static>>, poll_ms: u32) -> Self {
        Self { keypad, poll_ms }
    }
}

impl Operator for Panel {
    async fn next_key(&mut self) -> KeyCode {
        loop {
            if let Some(key) = self.keypad.poll_key() {
                #[cfg(feature = "debug-mode")]
                defmt::debug!("key {}", key);
                return key;
            }
            Timer::after_millis(u64::from(self.poll_ms)).await;
        }
    }

    async fn linger(&mut self, ms: u32) {
        Timer::after_millis(u64::from(ms)).await;
    }
}
