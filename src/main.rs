//! Firmware for a clock, alarm and thermostat panel.
//!
//! # Overview
//!
//! This firmware runs a wall-mounted panel featuring:
//! - A 6-digit seven-segment display showing the running clock
//! - A 16x2 character LCD for the date, temperature, alarm and menus
//! - An LM35 temperature sensor with band LEDs and an excursion buzz
//! - A daily alarm on a piezo buzzer
//! - A 4x3 keypad and three request buttons, with every edit PIN-gated
//!
//! # Hardware
//!
//! - **MCU**: STM32L053R8 (Cortex-M0+)
//! - **Display**: HD44780 16x2 LCD (4-bit) + 6x seven-segment digits
//! - **Sensor**: LM35 on ADC_IN0
//! - **RTC**: 32.768 kHz crystal
//!
//! # Execution Model
//!
//! Two executors share one [`SharedState`]:
//!
//! - **High priority** (`InterruptExecutor` on the USART1 vector): the
//!   once-per-second tick and the request buttons. It preempts the
//!   foreground whenever it has work.
//! - **Thread mode** (`#[embassy_executor::main]`): the foreground menu loop
//!   and the seven-segment refresh.
//!
//! State mutations are single `lock` calls on a critical-section mutex, so
//! the tick never observes a half-applied edit and the foreground never
//! observes a half-applied tick.
//!
//! # Module Organization
//!
//! - [`hardware`] - Pin mappings and peripheral initialization
//! - [`board`] - Sensor, buzzer, band LEDs and keypad operator
//! - [`buttons`] - EXTI request buttons
//! - [`lcd`] - HD44780 character LCD
//! - [`segments`] - Seven-segment clock display

#![no_std]
#![no_main]

mod board;
mod buttons;
mod hardware;
mod lcd;
mod segments;

use embassy_executor::{InterruptExecutor, Spawner};
use embassy_stm32::interrupt;
use embassy_stm32::interrupt::{InterruptExt, Priority};
use embassy_stm32::{
    Config,
    rcc::{LsConfig, LseConfig, mux::ClockMux},
    time::Hertz,
};
use embassy_time::{Duration, Ticker};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use thermoclock::state::snapshot;
use thermoclock::{AppState, Foreground, Requests, Settings, SharedState, periodic_update};

use board::{AdcSensor, BandLeds, PiezoBuzzer};
use buttons::button_task;
use hardware::Peripherals;
use segments::{CLOCK_SIGNAL, segment_refresh_task};

/// Compiled-in configuration; nothing is persisted.
static SETTINGS: Settings = Settings::DEFAULT;

static STATE: StaticCell<SharedState> = StaticCell::new();
static REQUESTS: StaticCell<Requests> = StaticCell::new();

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn USART1() {
    unsafe { EXECUTOR_HIGH.on_interrupt() }
}

/// Creates the clock configuration for STM32L053.
///
/// # Clock Settings
///
/// - **HSI**: 16 MHz, system clock (no PLL)
/// - **LSE**: 32.768 kHz external crystal for RTC
/// - **Voltage scale**: Range 1
///
/// # Returns
///
/// Configured RCC settings for embassy-stm32 initialization
fn create_clock_config() -> embassy_stm32::rcc::Config {
    embassy_stm32::rcc::Config {
        msi: None,
        hsi: true,
        hse: None,
        pll: None,
        sys: embassy_stm32::rcc::Sysclk::HSI,
        ahb_pre: embassy_stm32::rcc::AHBPrescaler::DIV1,
        apb1_pre: embassy_stm32::rcc::APBPrescaler::DIV1,
        apb2_pre: embassy_stm32::rcc::APBPrescaler::DIV1,
        ls: LsConfig {
            rtc: embassy_stm32::rcc::RtcClockSource::LSE,
            lsi: false,
            lse: Some(LseConfig {
                frequency: Hertz::hz(32768),
                mode: embassy_stm32::rcc::LseMode::Oscillator(embassy_stm32::rcc::LseDrive::Low),
            }),
        },
        voltage_scale: embassy_stm32::rcc::VoltageScale::RANGE1,
        mux: ClockMux::default(),
    }
}

/// Once-per-second update on the high-priority executor.
///
/// Samples the sensor, applies the tick, drives the buzzer and LEDs, and
/// publishes the new time to the seven-segment display.
#[embassy_executor::task]
async fn tick_task(
    shared: &'static SharedState,
    settings: &'static Settings,
    mut sensor: AdcSensor,
    mut buzzer: PiezoBuzzer,
    mut leds: BandLeds,
) {
    let mut ticker = Ticker::every(Duration::from_secs(1));
    loop {
        ticker.next().await;
        periodic_update(shared, settings, &mut sensor, &mut buzzer, &mut leds).await;
        CLOCK_SIGNAL.signal(snapshot(shared).time);
    }
}

/// Main entry point for the panel firmware.
///
/// # Initialization Sequence
///
/// 1. Configure clocks (16 MHz HSI, LSE for the RTC)
/// 2. Initialize STM32 peripherals and board drivers
/// 3. Allocate the shared state and request flags
/// 4. Start the high-priority executor; spawn the tick and button tasks
/// 5. Spawn the seven-segment refresh on the thread executor
/// 6. Run the foreground menu loop forever
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let mut config = Config::default();
    config.rcc = create_clock_config();

    let p = embassy_stm32::init(config);

    #[cfg(feature = "debug-mode")]
    defmt::info!("Thermoclock firmware starting...");

    // Wait for a debugger to attach before the tasks start logging.
    #[cfg(feature = "debug-mode")]
    embassy_time::Timer::after_secs(3).await;

    #[cfg(feature = "debug-mode")]
    defmt::info!("Initializing peripherals...");

    let peripherals = Peripherals::new(p, SETTINGS.key_poll_ms);

    let shared: &'static SharedState = STATE.init(AppState::shared(&SETTINGS));
    let requests: &'static Requests = REQUESTS.init(Requests::new());

    #[cfg(feature = "debug-mode")]
    defmt::info!("Starting high-priority executor...");

    interrupt::USART1.set_priority(Priority::P3);
    let high = EXECUTOR_HIGH.start(interrupt::USART1);
    high.spawn(tick_task(
        shared,
        &SETTINGS,
        peripherals.sensor,
        peripherals.buzzer,
        peripherals.leds,
    ))
    .unwrap();
    high.spawn(button_task(peripherals.buttons, shared, requests))
        .unwrap();

    spawner
        .spawn(segment_refresh_task(peripherals.segments, shared))
        .unwrap();

    #[cfg(feature = "debug-mode")]
    defmt::info!("Entering foreground loop...");

    Foreground::new(
        shared,
        requests,
        &SETTINGS,
        peripherals.panel,
        peripherals.lcd,
    )
    .run()
    .await
}
