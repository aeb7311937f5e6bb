//! Hardware abstraction and peripheral initialization.
//!
//! This module defines the pin mappings and peripheral initialization
//! for the clock/thermostat panel.
//!
//! # Pin Assignments
//!
//! ## Character LCD (HD44780, 4-bit bus)
//! - **PC4**: RS - Register select (low = command, high = data)
//! - **PC5**: EN - Enable strobe
//! - **PC0..PC3**: D4..D7 - Data nibble
//!
//! ## Seven-Segment Display (6 digits, multiplexed)
//! - **PB8..PB14**: Segments a..g (high = lit)
//! - **PC6..PC11**: Digit selects, hours tens first (active-low)
//!
//! ## Keypad (4x3 matrix)
//! - **PB4..PB7**: Rows 0..3 (outputs, idle high)
//! - **PB0, PB1, PB3**: Columns 0..2 (inputs, pull-up)
//!
//! ## Request Buttons (active-low, EXTI)
//! - **PA8**: Button 1 - Temperature thresholds
//! - **PA9**: Button 2 - Clock / alarm (silences a buzzing alarm)
//! - **PA10**: Button 3 - Calendar date
//!
//! ## Sensor and Outputs
//! - **PA0**: ADC_IN0 - LM35 temperature sensor
//! - **PA1**: Buzzer drive (high = on)
//! - **PA5, PA6**: Band LEDs, 2-bit code (see [`BandLeds`])
//!
//! ## Low Power & RTC
//! - **PC14**: OSC32_IN - 32.768 kHz crystal input
//! - **PC15**: OSC32_OUT - 32.768 kHz crystal output
//!
//! ## Debug (SWD)
//! - **PA13**: SWDIO
//! - **PA14**: SWCLK

use embassy_stm32::adc::{Adc, AdcChannel, Resolution};
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_stm32::{adc, bind_interrupts, peripherals};

use thermoclock::keypad::MatrixKeypad;

use crate::board::{AdcSensor, BandLeds, Panel, PiezoBuzzer};
use crate::buttons::Buttons;
use crate::lcd::Lcd;
use crate::segments::SegmentDisplay;

bind_interrupts!(struct Irqs {
    ADC1_COMP => adc::InterruptHandler<peripherals::ADC1>;
});

/// Top-level peripheral container for the panel.
///
/// Owns every board driver. `main` splits it between the tasks.
pub struct Peripherals {
    /// Character LCD for menus and the main page
    pub lcd: Lcd,
    /// Seven-segment clock display
    pub segments: SegmentDisplay,
    /// Keypad wrapped as the foreground operator
    pub panel: Panel,
    /// Edit request buttons
    pub buttons: Buttons,
    /// Temperature sensor on the ADC
    pub sensor: AdcSensor,
    pub buzzer: PiezoBuzzer,
    pub leds: BandLeds,
}

impl Peripherals {
    /// Initializes all peripherals from the STM32 peripheral singleton.
    ///
    /// # Initial GPIO States
    ///
    /// - LCD control and data lines: Low (the driver runs its own init)
    /// - Segment lines: Low, digit selects: High (display blank)
    /// - Keypad rows: High (released)
    /// - Buzzer: Low (silent)
    /// - Band LEDs: Within code
    ///
    /// # Arguments
    ///
    /// * `p` - STM32 peripheral singleton from embassy_stm32::init()
    /// * `key_poll_ms` - Keypad polling cadence for the operator
    pub fn new(p: embassy_stm32::Peripherals, key_poll_ms: u32) -> Self {
        let mut adc = Adc::new(p.ADC1, Irqs);
        adc.set_resolution(Resolution::BITS10);

        Self {
            lcd: Lcd::new(
                Output::new(p.PC4, Level::Low, Speed::Low),
                Output::new(p.PC5, Level::Low, Speed::Low),
                [
                    Output::new(p.PC0, Level::Low, Speed::Low),
                    Output::new(p.PC1, Level::Low, Speed::Low),
                    Output::new(p.PC2, Level::Low, Speed::Low),
                    Output::new(p.PC3, Level::Low, Speed::Low),
                ],
            ),
            segments: SegmentDisplay::new(
                [
                    Output::new(p.PB8, Level::Low, Speed::Low),
                    Output::new(p.PB9, Level::Low, Speed::Low),
                    Output::new(p.PB10, Level::Low, Speed::Low),
                    Output::new(p.PB11, Level::Low, Speed::Low),
                    Output::new(p.PB12, Level::Low, Speed::Low),
                    Output::new(p.PB13, Level::Low, Speed::Low),
                    Output::new(p.PB14, Level::Low, Speed::Low),
                ],
                [
                    Output::new(p.PC6, Level::High, Speed::Low),
                    Output::new(p.PC7, Level::High, Speed::Low),
                    Output::new(p.PC8, Level::High, Speed::Low),
                    Output::new(p.PC9, Level::High, Speed::Low),
                    Output::new(p.PC10, Level::High, Speed::Low),
                    Output::new(p.PC11, Level::High, Speed::Low),
                ],
            ),
            panel: Panel::new(
                MatrixKeypad::new(
                    [
                        Output::new(p.PB4, Level::High, Speed::Low),
                        Output::new(p.PB5, Level::High, Speed::Low),
                        Output::new(p.PB6, Level::High, Speed::Low),
                        Output::new(p.PB7, Level::High, Speed::Low),
                    ],
                    [
                        Input::new(p.PB0, Pull::Up),
                        Input::new(p.PB1, Pull::Up),
                        Input::new(p.PB3, Pull::Up),
                    ],
                ),
                key_poll_ms,
            ),
            buttons: Buttons::new(
                ExtiInput::new(p.PA8, p.EXTI8, Pull::Up),
                ExtiInput::new(p.PA9, p.EXTI9, Pull::Up),
                ExtiInput::new(p.PA10, p.EXTI10, Pull::Up),
            ),
            sensor: AdcSensor::new(adc, p.PA0.degrade_adc()),
            buzzer: PiezoBuzzer::new(Output::new(p.PA1, Level::Low, Speed::Low)),
            leds: BandLeds::new(
                Output::new(p.PA5, Level::High, Speed::Low),
                Output::new(p.PA6, Level::Low, Speed::Low),
            ),
        }
    }
}
