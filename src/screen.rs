//! Text layout for the 16x2 character display.
//!
//! Lines are built in fixed-capacity [`heapless::String`]s. Main-page lines
//! are padded to the full width so a shorter value overwrites a longer one
//! left over from the previous frame.

use core::fmt::{self, Write};

use heapless::String;

use crate::alarm::Alarm;
use crate::clock::{CalendarDate, ClockTime};
use crate::temperature::Temperature;

/// Characters per display line.
pub const LINE_WIDTH: usize = 16;

pub type Line = String<LINE_WIDTH>;

/// Formats `args` into a line, truncating at the display width.
pub fn line(args: fmt::Arguments<'_>) -> Line {
    let mut out = Truncating(Line::new());
    let _ = out.write_fmt(args);
    out.0
}

/// Pads `text` with spaces to the full line width.
pub fn padded(mut text: Line) -> Line {
    while text.push(' ').is_ok() {}
    text
}

/// `YYYY/M/D T C`, e.g. `1400/3/20 24C` or `1400/3/20 -5C`.
pub fn summary_line(date: &CalendarDate, temperature: &Temperature) -> Line {
    let sign = if temperature.negative { "-" } else { "" };
    padded(line(format_args!(
        "{}/{}/{} {}{}C",
        date.year, date.month, date.day, sign, temperature.current
    )))
}

/// `HH:MM`.
pub fn hhmm(time: &ClockTime) -> Line {
    line(format_args!(
        "{}{}:{}{}",
        time.hour.tens, time.hour.units, time.minute.tens, time.minute.units
    ))
}

/// `HH:MM>ON`, `HH:MM>OFF`, or `HH:MM btn2:Stop` while buzzing.
pub fn alarm_line(alarm: &Alarm, buzzing: bool) -> Line {
    let status = if buzzing {
        " btn2:Stop"
    } else if alarm.enabled {
        ">ON"
    } else {
        ">OFF"
    };
    padded(line(format_args!("{}{}", hhmm(&alarm.target), status)))
}

/// Writer that drops whatever does not fit.
struct Truncating(Line);

impl Write for Truncating {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}
