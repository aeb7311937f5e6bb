//! The application state aggregate and how it is shared.
//!
//! All modeled state (clock, calendar, temperature, alarm, security) lives
//! in one [`AppState`]. The firmware allocates it once behind a
//! [`SharedState`] mutex and hands the same `&'static` reference to the
//! periodic tick and to the foreground.
//!
//! # Atomicity
//!
//! [`SharedState`] uses a [`CriticalSectionRawMutex`], so every `lock`
//! closure runs with interrupts masked. The periodic tick applies its whole
//! update inside one closure; a foreground reader therefore sees the clock
//! either before or after a rollover cascade, never in between. Foreground
//! commits are single closures too.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use crate::alarm::{Alarm, AlarmSounder};
use crate::auth::Security;
use crate::clock::{CalendarDate, ClockTime};
use crate::config::Settings;
use crate::lockout::LockoutGuard;
use crate::temperature::{ExcursionMonitor, Temperature};

/// Application state shared between the periodic tick and the foreground.
pub type SharedState = Mutex<CriticalSectionRawMutex, RefCell<AppState>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppState {
    pub time: ClockTime,
    pub date: CalendarDate,
    pub temperature: Temperature,
    pub excursion: ExcursionMonitor,
    pub alarm: Alarm,
    pub sounder: AlarmSounder,
    pub security: Security,
}

impl AppState {
    /// Boot state built from `settings`.
    pub const fn new(settings: &Settings) -> Self {
        Self {
            time: settings.boot_time,
            date: settings.boot_date,
            temperature: Temperature::new(settings.min_temperature, settings.max_temperature),
            excursion: ExcursionMonitor::new(),
            alarm: settings.boot_alarm,
            sounder: AlarmSounder::new(settings.alarm_buzz_periods),
            security: Security::new(
                settings.pin,
                LockoutGuard::new(settings.pin_attempts, settings.lockout_secs),
            ),
        }
    }

    /// Wraps a boot state in the shared mutex.
    pub const fn shared(settings: &Settings) -> SharedState {
        Mutex::new(RefCell::new(Self::new(settings)))
    }

    /// Silences a buzzing alarm.
    ///
    /// # Returns
    ///
    /// `true` if the alarm was buzzing.
    pub fn silence_alarm(&mut self) -> bool {
        let silenced = self.sounder.silence();
        #[cfg(feature = "debug-mode")]
        if silenced {
            defmt::info!("alarm silenced");
        }
        silenced
    }
}

/// Consistent copy of what the main page shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub time: ClockTime,
    pub date: CalendarDate,
    pub temperature: Temperature,
    pub alarm: Alarm,
    pub buzzing: bool,
}

impl Snapshot {
    pub fn of(state: &AppState) -> Self {
        Self {
            time: state.time,
            date: state.date,
            temperature: state.temperature,
            alarm: state.alarm,
            buzzing: state.sounder.is_buzzing(),
        }
    }
}

/// Takes a [`Snapshot`] under the lock.
pub fn snapshot(shared: &SharedState) -> Snapshot {
    shared.lock(|cell| Snapshot::of(&cell.borrow()))
}

/// Runs `f` on the state under the lock.
pub fn with_state<R>(shared: &SharedState, f: impl FnOnce(&mut AppState) -> R) -> R {
    shared.lock(|cell| f(&mut cell.borrow_mut()))
}
