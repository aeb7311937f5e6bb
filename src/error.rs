//! Operator-facing error taxonomy.
//!
//! Every variant is recoverable: the foreground shows a message (or nothing,
//! for [`Error::Discarded`]) and returns to the main page.

use thiserror::Error;

/// Threshold edit that would break `min < max <= 100`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[cfg_attr(feature = "debug-mode", derive(defmt::Format))]
pub enum ThresholdConflict {
    #[error("min can't be bigger than max")]
    MinNotBelowMax,
    #[error("max can't be smaller than min")]
    MaxNotAboveMin,
    #[error("max can't be bigger than 100")]
    MaxAboveLimit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[cfg_attr(feature = "debug-mode", derive(defmt::Format))]
pub enum Error {
    /// A completed field failed its range rule; the field was cleared.
    #[error("field {field} out of range")]
    InvalidField { field: usize },
    /// Protected action refused while the lockout window is open.
    #[error("locked out for {remaining_secs} more seconds")]
    Unauthorized { remaining_secs: u16 },
    /// The attempt budget ran out during this session.
    #[error("too many wrong PINs")]
    LockedOut,
    /// The operator cancelled; nothing was committed.
    #[error("discarded")]
    Discarded,
    #[error(transparent)]
    ThresholdConflict(#[from] ThresholdConflict),
}
