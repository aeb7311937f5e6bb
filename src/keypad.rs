//! 4x3 matrix keypad scanner.
//!
//! ```text
//!          col0 col1 col2
//! row0      1    2    3
//! row1      4    5    6
//! row2      7    8    9
//! row3      *    0    #
//! ```
//!
//! Rows are outputs idling high; a scan pulls one row low at a time and
//! reads the columns, which have pull-ups, so a closed switch reads low.
//! When several keys are down the last one scanned wins. A key is reported
//! once per press: holding it down does not repeat.

use embedded_hal::digital::v2::{InputPin, OutputPin};

use crate::io::{KeyCode, Keypad};

pub const ROWS: usize = 4;
pub const COLS: usize = 3;

const LAYOUT: [[KeyCode; COLS]; ROWS] = [
    [KeyCode::Digit(1), KeyCode::Digit(2), KeyCode::Digit(3)],
    [KeyCode::Digit(4), KeyCode::Digit(5), KeyCode::Digit(6)],
    [KeyCode::Digit(7), KeyCode::Digit(8), KeyCode::Digit(9)],
    [KeyCode::Cancel, KeyCode::Digit(0), KeyCode::Confirm],
];

pub struct MatrixKeypad<R, C> {
    rows: [R; ROWS],
    cols: [C; COLS],
    held: Option<KeyCode>,
}

impl<R, C> MatrixKeypad<R, C>
where
    R: OutputPin,
    C: InputPin,
{
    /// Takes the row drivers and column sense lines, releasing every row.
    pub fn new(mut rows: [R; ROWS], cols: [C; COLS]) -> Self {
        for row in rows.iter_mut() {
            let _ = row.set_high();
        }
        Self {
            rows,
            cols,
            held: None,
        }
    }

    /// Scans the whole matrix once.
    ///
    /// # Returns
    ///
    /// The key currently held down, if any, regardless of whether it was
    /// already reported.
    pub fn scan(&mut self) -> Option<KeyCode> {
        let mut found = None;
        for (row, keys) in self.rows.iter_mut().zip(LAYOUT.iter()) {
            let _ = row.set_low();
            for (col, key) in self.cols.iter().zip(keys.iter()) {
                if matches!(col.is_low(), Ok(true)) {
                    found = Some(*key);
                }
            }
            let _ = row.set_high();
        }
        found
    }
}

impl<R, C> Keypad for MatrixKeypad<R, C>
where
    R: OutputPin,
    C: InputPin,
{
    fn poll_key(&mut self) -> Option<KeyCode> {
        let now = self.scan();
        let previous = core::mem::replace(&mut self.held, now);
        match now {
            Some(key) if previous != Some(key) => Some(key),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;
    use core::convert::Infallible;
    use std::rc::Rc;

    use super::*;

    /// Simulated switch matrix: which (row, col) contacts are closed and
    /// which row is currently driven low.
    #[derive(Default)]
    struct Matrix {
        active_row: Cell<Option<usize>>,
        closed: Cell<[[bool; COLS]; ROWS]>,
    }

    struct RowPin(Rc<Matrix>, usize);
    struct ColPin(Rc<Matrix>, usize);

    impl OutputPin for RowPin {
        type Error = Infallible;

        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.0.active_row.set(Some(self.1));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            if self.0.active_row.get() == Some(self.1) {
                self.0.active_row.set(None);
            }
            Ok(())
        }
    }

    impl InputPin for ColPin {
        type Error = Infallible;

        fn is_high(&self) -> Result<bool, Self::Error> {
            self.is_low().map(|low| !low)
        }

        fn is_low(&self) -> Result<bool, Self::Error> {
            let closed = self.0.closed.get();
            Ok(self
                .0
                .active_row
                .get()
                .is_some_and(|row| closed[row][self.1]))
        }
    }

    fn keypad() -> (Rc<Matrix>, MatrixKeypad<RowPin, ColPin>) {
        let matrix = Rc::new(Matrix::default());
        let rows = core::array::from_fn(|i| RowPin(matrix.clone(), i));
        let cols = core::array::from_fn(|i| ColPin(matrix.clone(), i));
        (matrix.clone(), MatrixKeypad::new(rows, cols))
    }

    fn press(matrix: &Matrix, row: usize, col: usize, down: bool) {
        let mut closed = matrix.closed.get();
        closed[row][col] = down;
        matrix.closed.set(closed);
    }

    #[test]
    fn decodes_every_position() {
        let (matrix, mut keypad) = keypad();
        for row in 0..ROWS {
            for col in 0..COLS {
                press(&matrix, row, col, true);
                assert_eq!(keypad.scan(), Some(LAYOUT[row][col]));
                press(&matrix, row, col, false);
            }
        }
        assert_eq!(keypad.scan(), None);
    }

    #[test]
    fn reports_once_per_press() {
        let (matrix, mut keypad) = keypad();
        assert_eq!(keypad.poll_key(), None);

        press(&matrix, 3, 0, true);
        assert_eq!(keypad.poll_key(), Some(KeyCode::Cancel));
        assert_eq!(keypad.poll_key(), None);

        press(&matrix, 3, 0, false);
        assert_eq!(keypad.poll_key(), None);
        press(&matrix, 3, 0, true);
        assert_eq!(keypad.poll_key(), Some(KeyCode::Cancel));
    }

    #[test]
    fn last_scanned_key_wins() {
        let (matrix, mut keypad) = keypad();
        press(&matrix, 0, 0, true);
        press(&matrix, 3, 2, true);
        assert_eq!(keypad.poll_key(), Some(KeyCode::Confirm));
    }
}
