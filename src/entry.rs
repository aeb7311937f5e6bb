//! Digit-by-digit entry of fixed-width decimal fields.
//!
//! One machine covers the three editors (time of day, calendar date,
//! temperature threshold). Fields are filled left to right; a field is
//! validated the moment its last digit arrives and either accepted (the
//! cursor moves on) or cleared (the cursor returns to the start of that
//! field, earlier fields are kept).
//!
//! # States
//!
//! ```text
//! AwaitingField(i) ──digit × width──► validate ──ok, i < N-1──► AwaitingField(i+1)
//!                                             ├─ok, i = N-1──► Committed
//!                                             └─out of range─► AwaitingField(i), cleared
//! any ──Cancel──► Aborted
//! any ──Confirm (reset editors)──► AwaitingField(0), all cleared
//! ```
//!
//! Transitions are pure; the caller commits the returned values to the
//! model. An aborted entry therefore never leaves a partial edit behind.

use crate::clock::{CalendarDate, ClockTime};
use crate::error::Error;
use crate::io::KeyCode;

/// Width and range rule of one field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    /// Digits in the field
    pub width: u8,
    /// Largest accepted value, `None` for unconstrained
    pub max: Option<u16>,
}

impl FieldSpec {
    pub const fn bounded(width: u8, max: u16) -> Self {
        Self {
            width,
            max: Some(max),
        }
    }

    pub const fn unbounded(width: u8) -> Self {
        Self { width, max: None }
    }

    fn accepts(&self, value: u16) -> bool {
        self.max.is_none_or(|max| value <= max)
    }
}

/// What the Confirm key does in an editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmKey {
    /// Clear every field and return to the first one
    Reset,
    /// Close the current field with the digits typed so far
    Finish,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    AwaitingField { index: usize, typed: u8 },
    Committed,
    Aborted,
}

/// Successful transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryStep<const N: usize> {
    /// Digit stored; `position` is its offset inside `field`
    Digit { field: usize, position: u8 },
    /// `field` passed validation; the cursor moved to the next field
    FieldAccepted { field: usize },
    /// All fields cleared; the cursor is back on the first field
    Reset,
    /// Every field passed validation
    Committed([u16; N]),
    /// Key has no meaning in the current state
    Ignored,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldEntry<const N: usize> {
    specs: [FieldSpec; N],
    values: [u16; N],
    confirm: ConfirmKey,
    phase: Phase,
}

impl<const N: usize> FieldEntry<N> {
    pub const fn new(specs: [FieldSpec; N], confirm: ConfirmKey) -> Self {
        Self {
            specs,
            values: [0; N],
            confirm,
            phase: Phase::AwaitingField { index: 0, typed: 0 },
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn specs(&self) -> &[FieldSpec; N] {
        &self.specs
    }

    /// Feeds one key.
    ///
    /// # Errors
    ///
    /// - [`Error::Discarded`] on Cancel; the entry is aborted
    /// - [`Error::InvalidField`] when a completed field is out of range; the
    ///   field has been cleared and entry continues
    pub fn on_key(&mut self, key: KeyCode) -> Result<EntryStep<N>, Error> {
        let Phase::AwaitingField { index, typed } = self.phase else {
            return Ok(EntryStep::Ignored);
        };

        match key {
            KeyCode::Cancel => {
                self.phase = Phase::Aborted;
                Err(Error::Discarded)
            }
            KeyCode::Confirm => match self.confirm {
                ConfirmKey::Reset => {
                    self.values = [0; N];
                    self.phase = Phase::AwaitingField { index: 0, typed: 0 };
                    Ok(EntryStep::Reset)
                }
                ConfirmKey::Finish if typed > 0 => self.close_field(index),
                ConfirmKey::Finish => Ok(EntryStep::Ignored),
            },
            KeyCode::Digit(digit) if digit <= 9 => {
                self.values[index] = self.values[index] * 10 + u16::from(digit);
                let typed = typed + 1;
                if typed < self.specs[index].width {
                    self.phase = Phase::AwaitingField { index, typed };
                    Ok(EntryStep::Digit {
                        field: index,
                        position: typed - 1,
                    })
                } else {
                    self.close_field(index)
                }
            }
            KeyCode::Digit(_) => Ok(EntryStep::Ignored),
        }
    }

    fn close_field(&mut self, index: usize) -> Result<EntryStep<N>, Error> {
        if !self.specs[index].accepts(self.values[index]) {
            self.values[index] = 0;
            self.phase = Phase::AwaitingField { index, typed: 0 };
            #[cfg(feature = "debug-mode")]
            defmt::debug!("field {} rejected", index);
            return Err(Error::InvalidField { field: index });
        }
        if index + 1 == N {
            self.phase = Phase::Committed;
            Ok(EntryStep::Committed(self.values))
        } else {
            self.phase = Phase::AwaitingField {
                index: index + 1,
                typed: 0,
            };
            Ok(EntryStep::FieldAccepted { field: index })
        }
    }
}

/// `HH MM`, hour up to 23, minute up to 59.
pub const fn time_entry() -> FieldEntry<2> {
    FieldEntry::new(
        [FieldSpec::bounded(2, 23), FieldSpec::bounded(2, 59)],
        ConfirmKey::Reset,
    )
}

/// `YYYY MM DD`, month up to 12, day up to 30.
pub const fn date_entry() -> FieldEntry<3> {
    FieldEntry::new(
        [
            FieldSpec::unbounded(4),
            FieldSpec::bounded(2, CalendarDate::MONTHS_PER_YEAR as u16),
            FieldSpec::bounded(2, CalendarDate::DAYS_PER_MONTH as u16),
        ],
        ConfirmKey::Reset,
    )
}

/// Up to three digits, Confirm closes early.
pub const fn threshold_entry() -> FieldEntry<1> {
    FieldEntry::new([FieldSpec::unbounded(3)], ConfirmKey::Finish)
}

/// Time at second zero from committed `[hour, minute]` fields.
pub fn time_from_fields([hour, minute]: [u16; 2]) -> ClockTime {
    ClockTime::from_hm(hour as u8, minute as u8)
}

pub fn date_from_fields([year, month, day]: [u16; 3]) -> CalendarDate {
    CalendarDate::new(year, month as u8, day as u8)
}
