//! Failed-PIN attempt budget and timed lockout.
//!
//! # States
//!
//! ```text
//! Open ──3rd failure──► Blocked(window) ──tick × window──► Open
//! ```
//!
//! The attempt budget is per authentication session: [`LockoutGuard::begin_session`]
//! refills it. The blocked countdown is driven by the periodic tick, so the
//! foreground may read a value that is one second stale.

/// Guard state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "debug-mode", derive(defmt::Format))]
pub enum LockState {
    Open,
    Blocked { remaining_secs: u16 },
}

/// Result of recording a failed attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "debug-mode", derive(defmt::Format))]
pub enum Failure {
    /// Budget not exhausted; the operator may try again
    Retry { attempts_left: u8 },
    /// Budget exhausted; the guard is now blocked
    Blocked,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "debug-mode", derive(defmt::Format))]
pub struct LockoutGuard {
    state: LockState,
    attempts_left: u8,
    attempts_per_session: u8,
    window_secs: u16,
}

impl LockoutGuard {
    pub const fn new(attempts_per_session: u8, window_secs: u16) -> Self {
        Self {
            state: LockState::Open,
            attempts_left: attempts_per_session,
            attempts_per_session,
            window_secs,
        }
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self.state, LockState::Blocked { .. })
    }

    /// Seconds until the guard opens again, zero when open.
    pub fn remaining_secs(&self) -> u16 {
        match self.state {
            LockState::Open => 0,
            LockState::Blocked { remaining_secs } => remaining_secs,
        }
    }

    pub fn attempts_left(&self) -> u8 {
        self.attempts_left
    }

    /// Refills the attempt budget for a new authentication session.
    pub fn begin_session(&mut self) {
        self.attempts_left = self.attempts_per_session;
    }

    /// Spends one attempt; blocks when the budget reaches zero.
    pub fn record_failure(&mut self) -> Failure {
        self.attempts_left = self.attempts_left.saturating_sub(1);
        if self.attempts_left == 0 {
            self.state = LockState::Blocked {
                remaining_secs: self.window_secs,
            };
            #[cfg(feature = "debug-mode")]
            defmt::warn!("PIN attempts exhausted, blocked for {}s", self.window_secs);
            Failure::Blocked
        } else {
            Failure::Retry {
                attempts_left: self.attempts_left,
            }
        }
    }

    /// Counts one second off the lockout window.
    ///
    /// # Returns
    ///
    /// `true` on the tick that reopens the guard.
    pub fn tick(&mut self) -> bool {
        match self.state {
            LockState::Open => false,
            LockState::Blocked { remaining_secs } if remaining_secs <= 1 => {
                self.state = LockState::Open;
                self.attempts_left = self.attempts_per_session;
                true
            }
            LockState::Blocked { remaining_secs } => {
                self.state = LockState::Blocked {
                    remaining_secs: remaining_secs - 1,
                };
                false
            }
        }
    }
}
