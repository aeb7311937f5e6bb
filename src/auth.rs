//! PIN gate for protected actions.
//!
//! Every protected request opens a fresh [`AuthSession`]. The session is a
//! pure state machine: the foreground feeds it one key at a time together
//! with the [`Security`] record (secret PIN plus [`LockoutGuard`]) and
//! reacts to the returned [`AuthStep`]. Nothing else in the application
//! state is touched here.
//!
//! # Keys
//!
//! - `0..9`: append a digit; the fourth digit is checked immediately
//! - Cancel (`*`): abandon the protected action
//! - Confirm (`#`): first press switches to PIN-change mode, later presses
//!   clear the digits typed so far
//!
//! # PIN Change
//!
//! In change mode the current PIN is verified first (wrong entries spend the
//! same attempt budget), then a new 4-digit PIN is typed in clear and
//! replaces the secret.

use core::fmt;

use crate::error::Error;
use crate::io::KeyCode;
use crate::lockout::{Failure, LockoutGuard};

/// Number of digits in a PIN.
pub const PIN_LEN: usize = 4;

/// A 4-digit secret.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Pin([u8; PIN_LEN]);

impl Pin {
    pub const fn new(digits: [u8; PIN_LEN]) -> Self {
        Self(digits)
    }
}

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pin(****)")
    }
}

/// Secret PIN and the guard that rate-limits guesses at it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Security {
    pin: Pin,
    pub lockout: LockoutGuard,
}

impl Security {
    pub const fn new(pin: Pin, lockout: LockoutGuard) -> Self {
        Self { pin, lockout }
    }

    pub fn verify(&self, candidate: &Pin) -> bool {
        self.pin == *candidate
    }

    fn replace_pin(&mut self, pin: Pin) {
        self.pin = pin;
    }
}

/// Which PIN the operator is typing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "debug-mode", derive(defmt::Format))]
pub enum Stage {
    /// The PIN guarding the requested action
    Verify,
    /// The current PIN, before changing it
    ChangeCurrent,
    /// The replacement PIN
    ChangeNew,
}

/// Successful end of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "debug-mode", derive(defmt::Format))]
pub enum Access {
    /// The protected action may proceed
    Authenticated,
    /// The PIN was replaced; the protected action is not entered
    ChangedPin,
}

/// Outcome of one key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "debug-mode", derive(defmt::Format))]
pub enum AuthStep {
    /// A digit was stored at `position`; `echo` carries it when the stage
    /// shows digits in clear
    Digit { position: usize, echo: Option<u8> },
    /// The session moved to a new stage with an empty entry
    Prompt(Stage),
    /// The digits typed so far were discarded
    Cleared,
    /// Mismatch with attempts remaining; the entry restarts in the same stage
    WrongPin { attempts_left: u8 },
    /// The session is over
    Done(Result<Access, Error>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthSession {
    stage: Stage,
    typed: [u8; PIN_LEN],
    len: usize,
}

impl AuthSession {
    /// Opens a session, refilling the attempt budget.
    ///
    /// # Errors
    ///
    /// [`Error::Unauthorized`] while the lockout window is open; no digit
    /// entry takes place.
    pub fn open(security: &mut Security) -> Result<Self, Error> {
        if security.lockout.is_blocked() {
            return Err(Error::Unauthorized {
                remaining_secs: security.lockout.remaining_secs(),
            });
        }
        security.lockout.begin_session();
        Ok(Self {
            stage: Stage::Verify,
            typed: [0; PIN_LEN],
            len: 0,
        })
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Digits typed in the current stage.
    pub fn typed_len(&self) -> usize {
        self.len
    }

    pub fn on_key(&mut self, key: KeyCode, security: &mut Security) -> AuthStep {
        match key {
            KeyCode::Digit(digit) => self.push_digit(digit, security),
            KeyCode::Cancel => AuthStep::Done(Err(Error::Discarded)),
            KeyCode::Confirm if self.stage == Stage::Verify => {
                self.restart(Stage::ChangeCurrent);
                AuthStep::Prompt(Stage::ChangeCurrent)
            }
            KeyCode::Confirm => {
                self.len = 0;
                AuthStep::Cleared
            }
        }
    }

    fn push_digit(&mut self, digit: u8, security: &mut Security) -> AuthStep {
        let position = self.len;
        self.typed[position] = digit;
        self.len += 1;
        if self.len < PIN_LEN {
            let echo = (self.stage == Stage::ChangeNew).then_some(digit);
            return AuthStep::Digit { position, echo };
        }

        let entered = Pin::new(self.typed);
        self.len = 0;
        if self.stage == Stage::ChangeNew {
            security.replace_pin(entered);
            #[cfg(feature = "debug-mode")]
            defmt::info!("PIN changed");
            return AuthStep::Done(Ok(Access::ChangedPin));
        }

        if security.verify(&entered) {
            if self.stage == Stage::ChangeCurrent {
                self.restart(Stage::ChangeNew);
                return AuthStep::Prompt(Stage::ChangeNew);
            }
            security.lockout.begin_session();
            return AuthStep::Done(Ok(Access::Authenticated));
        }

        match security.lockout.record_failure() {
            Failure::Blocked => AuthStep::Done(Err(Error::LockedOut)),
            Failure::Retry { attempts_left } => AuthStep::WrongPin { attempts_left },
        }
    }

    fn restart(&mut self, stage: Stage) {
        self.stage = stage;
        self.len = 0;
    }
}
