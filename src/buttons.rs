//! Front-panel request buttons.
//!
//! Three active-low push buttons on EXTI lines raise the edit requests the
//! foreground picks up. The handler does no other work: a press only sets a
//! flag, except that the time/alarm button silences a buzzing alarm instead
//! of requesting an edit.
//!
//! # EXTI Operation
//!
//! Each button is an [`ExtiInput`] with the internal pull-up enabled, so a
//! press is a falling edge. The task waits on all three edges at once and
//! ignores further edges for [`DEBOUNCE_MS`] after handling one.

use embassy_futures::select::{Either3, select3};
use embassy_stm32::exti::ExtiInput;
use embassy_time::Timer;

use thermoclock::requests::{Request, Requests, press_time_button};
use thermoclock::state::{SharedState, with_state};

/// Contact bounce window after a handled edge.
const DEBOUNCE_MS: u64 = 30;

pub struct Buttons {
    /// Button 1 (PA8)
    temperature: ExtiInput<'static>,
    /// Button 2 (PA9)
    time_or_alarm: ExtiInput<'static>,
    /// Button 3 (PA10)
    date: ExtiInput<'static>,
}

impl Buttons {
    pub fn new(
        temperature: ExtiInput<'static>,
        time_or_alarm: ExtiInput<'static>,
        date: ExtiInput<'static>,
    ) -> Self {
        Self {
            temperature,
            time_or_alarm,
            date,
        }
    }

    /// Waits for the next press.
    async fn pressed(&mut self) -> Request {
        match select3(
            self.temperature.wait_for_falling_edge(),
            self.time_or_alarm.wait_for_falling_edge(),
            self.date.wait_for_falling_edge(),
        )
        .await
        {
            Either3::First(()) => Request::EditTemperature,
            Either3::Second(()) => Request::EditTimeOrAlarm,
            Either3::Third(()) => Request::EditDate,
        }
    }
}

/// Async task turning button presses into requests.
///
/// # Arguments
///
/// * `buttons` - Buttons instance (takes ownership)
/// * `shared` - Shared state, locked only to silence the alarm
/// * `requests` - Request flags read by the foreground
#[embassy_executor::task]
pub async fn button_task(
    mut buttons: Buttons,
    shared: &'static SharedState,
    requests: &'static Requests,
) {
    loop {
        let request = buttons.pressed().await;

        #[cfg(feature = "debug-mode")]
        defmt::info!("button: {}", request);

        match request {
            Request::EditTimeOrAlarm => {
                with_state(shared, |state| press_time_button(state, requests));
            }
            other => requests.raise(other),
        }

        Timer::after_millis(DEBOUNCE_MS).await;
    }
}
