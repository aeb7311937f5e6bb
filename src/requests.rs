//! Edit requests raised by the front-panel buttons.
//!
//! Each button owns one flag. The button handler sets it; the foreground
//! reads it, runs the workflow, and clears it afterwards. Presses that
//! arrive while the same workflow is running are absorbed by that clear.

use portable_atomic::{AtomicBool, Ordering};

use crate::state::AppState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "debug-mode", derive(defmt::Format))]
pub enum Request {
    /// Button 1: temperature thresholds
    EditTemperature,
    /// Button 2: clock or alarm (silences a buzzing alarm instead)
    EditTimeOrAlarm,
    /// Button 3: calendar date
    EditDate,
}

pub struct Requests {
    temperature: AtomicBool,
    time_or_alarm: AtomicBool,
    date: AtomicBool,
}

impl Requests {
    pub const fn new() -> Self {
        Self {
            temperature: AtomicBool::new(false),
            time_or_alarm: AtomicBool::new(false),
            date: AtomicBool::new(false),
        }
    }

    fn flag(&self, request: Request) -> &AtomicBool {
        match request {
            Request::EditTemperature => &self.temperature,
            Request::EditTimeOrAlarm => &self.time_or_alarm,
            Request::EditDate => &self.date,
        }
    }

    pub fn raise(&self, request: Request) {
        self.flag(request).store(true, Ordering::Release);
    }

    /// The highest-priority raised request, if any. Does not clear it.
    pub fn pending(&self) -> Option<Request> {
        [
            Request::EditTemperature,
            Request::EditTimeOrAlarm,
            Request::EditDate,
        ]
        .into_iter()
        .find(|&request| self.flag(request).load(Ordering::Acquire))
    }

    /// Clears a request once its workflow has returned.
    pub fn acknowledge(&self, request: Request) {
        self.flag(request).store(false, Ordering::Release);
    }
}

impl Default for Requests {
    fn default() -> Self {
        Self::new()
    }
}

/// Handles a press of the time/alarm button.
///
/// A buzzing alarm is silenced and no request is raised.
pub fn press_time_button(state: &mut AppState, requests: &Requests) {
    if !state.silence_alarm() {
        requests.raise(Request::EditTimeOrAlarm);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[test]
    fn pending_follows_priority_and_survives_until_acknowledged() {
        let requests = Requests::new();
        assert_eq!(requests.pending(), None);

        requests.raise(Request::EditDate);
        requests.raise(Request::EditTemperature);
        assert_eq!(requests.pending(), Some(Request::EditTemperature));
        assert_eq!(requests.pending(), Some(Request::EditTemperature));

        requests.acknowledge(Request::EditTemperature);
        assert_eq!(requests.pending(), Some(Request::EditDate));
        requests.acknowledge(Request::EditDate);
        assert_eq!(requests.pending(), None);
    }

    #[test]
    fn time_button_silences_before_requesting() {
        let mut state = AppState::new(&Settings::DEFAULT);
        let requests = Requests::new();

        state.sounder.start();
        press_time_button(&mut state, &requests);
        assert!(!state.sounder.is_buzzing());
        assert_eq!(requests.pending(), None);

        press_time_button(&mut state, &requests);
        assert_eq!(requests.pending(), Some(Request::EditTimeOrAlarm));
    }
}
