//! Foreground dispatch loop and the protected edit workflows.
//!
//! The foreground redraws the main page, checks the request flags and runs
//! at most one workflow per iteration. Each workflow is gated by the PIN
//! ([`AuthSession`]) and then drives one field editor ([`FieldEntry`]).
//!
//! Workflows are paced by the operator and may run indefinitely. They hold
//! the state lock only for the duration of a single key transition or a
//! commit, so the periodic tick keeps running underneath them. Edits are
//! collected locally and committed in one lock at the end; cancelling at
//! any point leaves the model untouched.
//!
//! # Screens
//!
//! ```text
//! main page       1400/3/20 24C        PIN            Pin: ----      3
//!                 13:30>OFF                           *:Exit #:ChgPin
//!
//! time/alarm      1:Clock 3:Alarm      time entry     clock --:--
//!                 *:Discard                           *:Discard#:Reset
//! ```

use crate::auth::{Access, AuthSession, AuthStep, PIN_LEN, Stage};
use crate::config::Settings;
use crate::entry::{self, FieldEntry, Phase};
use crate::error::{Error, ThresholdConflict};
use crate::io::{KeyCode, Operator, Position, TextDisplay};
use crate::requests::{Request, Requests};
use crate::screen::{self, line};
use crate::state::{SharedState, snapshot, with_state};
use crate::temperature::Threshold;

const TOP: u8 = 0;
const BOTTOM: u8 = 1;

/// Column where the attempts counter is shown on the PIN prompt.
const ATTEMPTS_COL: u8 = 15;

/// Successful end of a workflow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "debug-mode", derive(defmt::Format))]
pub enum Outcome {
    /// The edit was committed
    Saved,
    /// The PIN was changed instead of entering the edit
    PinChanged,
}

/// Where an editor draws its fields.
struct EntryLayout<const N: usize> {
    /// Placeholder shown at `origin` for an empty entry
    template: &'static str,
    origin: u8,
    /// First column of each field
    columns: [u8; N],
    hint: &'static str,
}

const TIME_LAYOUT: EntryLayout<2> = EntryLayout {
    template: "--:--",
    origin: 6,
    columns: [6, 9],
    hint: "*:Discard#:Reset",
};

const DATE_LAYOUT: EntryLayout<3> = EntryLayout {
    template: "----/--/--",
    origin: 6,
    columns: [6, 11, 14],
    hint: "*:Discard#:Reset",
};

const THRESHOLD_LAYOUT: EntryLayout<1> = EntryLayout {
    template: "---",
    origin: 6,
    columns: [6],
    hint: "*:Discard #:Save",
};

pub struct Foreground<'a, O, D> {
    shared: &'a SharedState,
    requests: &'a Requests,
    settings: &'a Settings,
    operator: O,
    display: D,
}

impl<'a, O, D> Foreground<'a, O, D>
where
    O: Operator,
    D: TextDisplay,
{
    pub fn new(
        shared: &'a SharedState,
        requests: &'a Requests,
        settings: &'a Settings,
        operator: O,
        display: D,
    ) -> Self {
        Self {
            shared,
            requests,
            settings,
            operator,
            display,
        }
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn operator(&self) -> &O {
        &self.operator
    }

    /// Runs the dispatch loop forever.
    pub async fn run(&mut self) -> ! {
        loop {
            self.step().await;
        }
    }

    /// One iteration: redraw the main page, then handle a pending request
    /// or idle for one polling period.
    pub async fn step(&mut self) -> Option<Result<Outcome, Error>> {
        let shown = snapshot(self.shared);
        self.display.render_summary(&shown.date, &shown.temperature);
        self.display
            .render_alarm(Position::new(0, BOTTOM), &shown.alarm, shown.buzzing);

        let Some(request) = self.requests.pending() else {
            self.operator.linger(self.settings.key_poll_ms).await;
            return None;
        };

        #[cfg(feature = "debug-mode")]
        defmt::info!("handling {}", request);

        let result = match request {
            Request::EditTemperature => self.edit_temperature().await,
            Request::EditTimeOrAlarm => self.edit_time_or_alarm().await,
            Request::EditDate => self.edit_date().await,
        };

        #[cfg(feature = "debug-mode")]
        match &result {
            Ok(outcome) => defmt::info!("{} finished: {}", request, outcome),
            Err(error) => defmt::info!("{} abandoned: {}", request, error),
        }

        self.report(&result).await;
        self.requests.acknowledge(request);
        self.display.clear();
        Some(result)
    }

    async fn edit_time_or_alarm(&mut self) -> Result<Outcome, Error> {
        if self.authenticate().await? == Access::ChangedPin {
            return Ok(Outcome::PinChanged);
        }

        self.screen("1:Clock 3:Alarm", "*:Discard");
        let set_clock = loop {
            match self.operator.next_key().await {
                KeyCode::Digit(1) => break true,
                KeyCode::Digit(3) => break false,
                KeyCode::Cancel => return Err(Error::Discarded),
                _ => {}
            }
        };

        if set_clock {
            self.display.clear();
            self.display.render_text(Position::new(0, TOP), "clock ");
            let fields = self.enter_fields(entry::time_entry(), &TIME_LAYOUT).await?;
            let time = entry::time_from_fields(fields);
            with_state(self.shared, |state| state.time = time);
            return Ok(Outcome::Saved);
        }

        let enabled = self.choose_alarm_enabled().await?;
        self.display.clear();
        self.display.render_text(Position::new(0, TOP), "alarm ");
        let fields = self.enter_fields(entry::time_entry(), &TIME_LAYOUT).await?;
        let target = entry::time_from_fields(fields);
        with_state(self.shared, |state| {
            state.alarm.enabled = enabled;
            state.alarm.set_target(target);
        });
        Ok(Outcome::Saved)
    }

    /// Alarm status screen: `1` flips ON/OFF, `#` accepts, `*` discards.
    async fn choose_alarm_enabled(&mut self) -> Result<bool, Error> {
        let mut alarm = with_state(self.shared, |state| state.alarm);
        loop {
            self.display.clear();
            let toggle = if alarm.enabled { " 1:OFF" } else { " 1:ON" };
            let status = screen::alarm_line(&alarm, false);
            let text = line(format_args!("{}{}", status.trim_end(), toggle));
            self.screen(&text, "*:Discard #:Set");

            match self.operator.next_key().await {
                KeyCode::Digit(1) => alarm.enabled = !alarm.enabled,
                KeyCode::Confirm => return Ok(alarm.enabled),
                KeyCode::Cancel => return Err(Error::Discarded),
                KeyCode::Digit(_) => {}
            }
        }
    }

    async fn edit_date(&mut self) -> Result<Outcome, Error> {
        if self.authenticate().await? == Access::ChangedPin {
            return Ok(Outcome::PinChanged);
        }

        self.display.clear();
        self.display.render_text(Position::new(0, TOP), "date: ");
        let fields = self.enter_fields(entry::date_entry(), &DATE_LAYOUT).await?;
        let date = entry::date_from_fields(fields);
        with_state(self.shared, |state| state.date = date);
        Ok(Outcome::Saved)
    }

    async fn edit_temperature(&mut self) -> Result<Outcome, Error> {
        if self.authenticate().await? == Access::ChangedPin {
            return Ok(Outcome::PinChanged);
        }

        let current = with_state(self.shared, |state| state.temperature);
        let band = line(format_args!("min:{} max:{}", current.min, current.max));
        self.screen(&band, "*:Discard #:Edit");
        loop {
            match self.operator.next_key().await {
                KeyCode::Confirm => break,
                KeyCode::Cancel => return Err(Error::Discarded),
                KeyCode::Digit(_) => {}
            }
        }

        self.screen("0:Min 1:Max", "*:Discard");
        let which = loop {
            match self.operator.next_key().await {
                KeyCode::Digit(0) => break Threshold::Min,
                KeyCode::Digit(1) => break Threshold::Max,
                KeyCode::Cancel => return Err(Error::Discarded),
                _ => {}
            }
        };

        self.display.clear();
        let title = match which {
            Threshold::Min => "Min: ",
            Threshold::Max => "Max: ",
        };
        self.display.render_text(Position::new(0, TOP), title);
        let [value] = self
            .enter_fields(entry::threshold_entry(), &THRESHOLD_LAYOUT)
            .await?;
        let value = i16::try_from(value).unwrap_or(i16::MAX);
        with_state(self.shared, |state| {
            state.temperature.set_threshold(which, value)
        })?;

        #[cfg(feature = "debug-mode")]
        defmt::info!("threshold {} set to {}", which, value);
        Ok(Outcome::Saved)
    }

    /// Runs the PIN gate.
    ///
    /// # Errors
    ///
    /// - [`Error::Unauthorized`] if the lockout window is open
    /// - [`Error::LockedOut`] if this session used up the attempt budget
    /// - [`Error::Discarded`] if the operator cancelled
    async fn authenticate(&mut self) -> Result<Access, Error> {
        let mut session = with_state(self.shared, |state| AuthSession::open(&mut state.security))?;
        self.draw_pin_prompt(Stage::Verify);

        loop {
            let key = self.operator.next_key().await;
            let step = with_state(self.shared, |state| session.on_key(key, &mut state.security));
            match step {
                AuthStep::Digit { position, echo } => {
                    let col = pin_column(session.stage()) + position as u8;
                    let shown = match echo {
                        Some(digit) => line(format_args!("{}", digit)),
                        None => line(format_args!("*")),
                    };
                    self.display.render_text(Position::new(col, TOP), &shown);
                }
                AuthStep::Prompt(stage) => self.draw_pin_prompt(stage),
                AuthStep::Cleared => {
                    let col = pin_column(session.stage());
                    self.display.render_text(Position::new(col, TOP), "----");
                }
                AuthStep::WrongPin { .. } => {
                    self.display.render_text(Position::new(0, TOP), "   Wrong Pin!   ");
                    self.operator.linger(self.settings.confirm_hold_ms).await;
                    self.draw_pin_prompt(session.stage());
                }
                AuthStep::Done(result) => {
                    #[cfg(feature = "debug-mode")]
                    defmt::info!("authentication: {}", result);
                    return result;
                }
            }
        }
    }

    fn draw_pin_prompt(&mut self, stage: Stage) {
        let (prompt, hint) = match stage {
            Stage::Verify => ("Pin: ", "*:Exit #:ChgPin"),
            Stage::ChangeCurrent => ("CurntPin: ", "*:Exit #:Reset"),
            Stage::ChangeNew => ("NewPin: ", "*:Exit #:Reset"),
        };
        let text = line(format_args!("{}{:-<width$}", prompt, "", width = PIN_LEN));
        self.screen(&text, hint);

        if stage != Stage::ChangeNew {
            let attempts = with_state(self.shared, |state| state.security.lockout.attempts_left());
            let shown = line(format_args!("{}", attempts));
            self.display
                .render_text(Position::new(ATTEMPTS_COL, TOP), &shown);
        }
    }

    /// Drives one field editor to completion.
    async fn enter_fields<const N: usize>(
        &mut self,
        mut entry: FieldEntry<N>,
        layout: &EntryLayout<N>,
    ) -> Result<[u16; N], Error> {
        self.display
            .render_text(Position::new(layout.origin, TOP), layout.template);
        self.display.render_text(Position::new(0, BOTTOM), layout.hint);

        loop {
            if let Phase::AwaitingField { index, typed } = entry.phase() {
                let col = layout.columns[index] + typed;
                self.display.render_text(Position::new(col, TOP), "_");
            }

            let key = self.operator.next_key().await;
            let cursor = entry.phase();
            match entry.on_key(key) {
                Ok(entry::EntryStep::Committed(values)) => return Ok(values),
                Ok(entry::EntryStep::Reset) => {
                    self.display
                        .render_text(Position::new(layout.origin, TOP), layout.template);
                }
                Ok(entry::EntryStep::Ignored) => {}
                Ok(_) => {
                    if let (KeyCode::Digit(digit), Phase::AwaitingField { index, typed }) =
                        (key, cursor)
                    {
                        let col = layout.columns[index] + typed;
                        let shown = line(format_args!("{}", digit));
                        self.display.render_text(Position::new(col, TOP), &shown);
                    }
                }
                Err(Error::InvalidField { field }) => {
                    let width = usize::from(entry.specs()[field].width);
                    let dashes = line(format_args!("{:-<width$}", "", width = width));
                    self.display
                        .render_text(Position::new(layout.columns[field], TOP), &dashes);
                }
                Err(error) => return Err(error),
            }
        }
    }

    /// Shows the end-of-workflow message, if the outcome has one.
    async fn report(&mut self, result: &Result<Outcome, Error>) {
        let (top, bottom, hold) = match result {
            Ok(Outcome::Saved) => (
                line(format_args!("Set successfully")),
                line(format_args!("")),
                self.settings.confirm_hold_ms,
            ),
            Ok(Outcome::PinChanged) => (
                line(format_args!("  Pin changed")),
                line(format_args!("  successfully!")),
                self.settings.reject_hold_ms,
            ),
            Err(Error::Unauthorized { remaining_secs }) => (
                line(format_args!("Wait {}secs and", remaining_secs)),
                line(format_args!("then try again")),
                self.settings.confirm_hold_ms,
            ),
            Err(Error::LockedOut) => (
                line(format_args!("   Wrong Pin!")),
                line(format_args!("Locked {}secs", self.settings.lockout_secs)),
                self.settings.reject_hold_ms,
            ),
            Err(Error::ThresholdConflict(conflict)) => {
                let (top, bottom) = conflict_text(*conflict);
                (
                    line(format_args!("{}", top)),
                    line(format_args!("{}", bottom)),
                    self.settings.reject_hold_ms,
                )
            }
            Err(Error::Discarded | Error::InvalidField { .. }) => return,
        };
        self.screen(&top, &bottom);
        self.operator.linger(hold).await;
    }

    fn screen(&mut self, top: &str, bottom: &str) {
        self.display.clear();
        self.display.render_text(Position::new(0, TOP), top);
        self.display.render_text(Position::new(0, BOTTOM), bottom);
    }
}

/// First digit column of the PIN prompt for `stage`.
fn pin_column(stage: Stage) -> u8 {
    match stage {
        Stage::Verify => 5,
        Stage::ChangeCurrent => 10,
        Stage::ChangeNew => 8,
    }
}

fn conflict_text(conflict: ThresholdConflict) -> (&'static str, &'static str) {
    match conflict {
        ThresholdConflict::MinNotBelowMax => ("Min can't be", "bigger than max!"),
        ThresholdConflict::MaxNotAboveMin => ("Max can't be", "smaller than min"),
        ThresholdConflict::MaxAboveLimit => ("Max can't be", "bigger than 100"),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::alarm::Alarm;
    use crate::auth::Pin;
    use crate::clock::{CalendarDate, ClockTime};
    use crate::state::{AppState, SharedState};
    use crate::temperature::Temperature;

    struct Script {
        keys: VecDeque<KeyCode>,
        lingered_ms: u32,
    }

    impl Script {
        fn new(keys: &[KeyCode]) -> Self {
            Self {
                keys: keys.iter().copied().collect(),
                lingered_ms: 0,
            }
        }
    }

    impl Operator for Script {
        async fn next_key(&mut self) -> KeyCode {
            self.keys.pop_front().expect("key script exhausted")
        }

        async fn linger(&mut self, ms: u32) {
            self.lingered_ms += ms;
        }
    }

    /// 16x2 character grid plus a log of every text write.
    struct Lcd {
        rows: [[char; 16]; 2],
        writes: Vec<String>,
    }

    impl Lcd {
        fn new() -> Self {
            Self {
                rows: [[' '; 16]; 2],
                writes: Vec::new(),
            }
        }

        fn row(&self, row: usize) -> String {
            self.rows[row].iter().collect::<String>().trim_end().into()
        }

        fn showed(&self, text: &str) -> bool {
            self.writes.iter().any(|w| w.contains(text))
        }
    }

    impl TextDisplay for Lcd {
        fn clear(&mut self) {
            self.rows = [[' '; 16]; 2];
        }

        fn render_text(&mut self, position: Position, text: &str) {
            let row = &mut self.rows[usize::from(position.row)];
            for (cell, c) in row[usize::from(position.col)..].iter_mut().zip(text.chars()) {
                *cell = c;
            }
            self.writes.push(text.into());
        }

        fn render_summary(&mut self, date: &CalendarDate, temperature: &Temperature) {
            self.render_text(Position::new(0, 0), &screen::summary_line(date, temperature));
        }

        fn render_alarm(&mut self, position: Position, alarm: &Alarm, buzzing: bool) {
            self.render_text(position, &screen::alarm_line(alarm, buzzing));
        }
    }

    fn d(digit: u8) -> KeyCode {
        KeyCode::Digit(digit)
    }

    const PIN: [KeyCode; 4] = [
        KeyCode::Digit(1),
        KeyCode::Digit(2),
        KeyCode::Digit(3),
        KeyCode::Digit(4),
    ];

    fn keys(groups: &[&[KeyCode]]) -> Vec<KeyCode> {
        groups.iter().flat_map(|g| g.iter().copied()).collect()
    }

    struct Rig {
        shared: SharedState,
        requests: Requests,
        settings: Settings,
    }

    impl Rig {
        fn new() -> Self {
            let settings = Settings::DEFAULT;
            Self {
                shared: AppState::shared(&settings),
                requests: Requests::new(),
                settings,
            }
        }

        fn state(&self) -> AppState {
            with_state(&self.shared, |state| *state)
        }

        /// Raises `request`, runs one dispatch step with `script`.
        fn run(
            &self,
            request: Request,
            script: &[KeyCode],
        ) -> (Option<Result<Outcome, Error>>, Foreground<'_, Script, Lcd>) {
            self.requests.raise(request);
            let mut fg = Foreground::new(
                &self.shared,
                &self.requests,
                &self.settings,
                Script::new(script),
                Lcd::new(),
            );
            let result = embassy_futures::block_on(fg.step());
            assert!(
                fg.operator().keys.is_empty(),
                "unused keys: {:?}",
                fg.operator().keys
            );
            (result, fg)
        }
    }

    #[test]
    fn idle_step_draws_main_page() {
        let rig = Rig::new();
        let mut fg = Foreground::new(
            &rig.shared,
            &rig.requests,
            &rig.settings,
            Script::new(&[]),
            Lcd::new(),
        );
        assert_eq!(embassy_futures::block_on(fg.step()), None);
        assert_eq!(fg.display().row(0), "1400/3/20 0C");
        assert_eq!(fg.display().row(1), "13:30>OFF");
        assert_eq!(fg.operator().lingered_ms, rig.settings.key_poll_ms);
    }

    #[test]
    fn sets_clock_with_seconds_zeroed() {
        let rig = Rig::new();
        with_state(&rig.shared, |state| state.time = ClockTime::from_hms(12, 45, 37));

        let script = keys(&[&PIN, &[d(1)], &[d(0), d(7), d(3), d(0)]]);
        let (result, fg) = rig.run(Request::EditTimeOrAlarm, &script);

        assert_eq!(result, Some(Ok(Outcome::Saved)));
        assert_eq!(rig.state().time, ClockTime::from_hms(7, 30, 0));
        assert!(fg.display().showed("Set successfully"));
        assert_eq!(rig.requests.pending(), None);
    }

    #[test]
    fn cancel_mid_entry_leaves_state_unchanged() {
        for request in [Request::EditTimeOrAlarm, Request::EditDate] {
            let rig = Rig::new();
            let before = rig.state();
            let script = match request {
                Request::EditTimeOrAlarm => keys(&[&PIN, &[d(1), d(0), d(7), KeyCode::Cancel]]),
                _ => keys(&[&PIN, &[d(2), d(0), KeyCode::Cancel]]),
            };
            let (result, _) = rig.run(request, &script);
            assert_eq!(result, Some(Err(Error::Discarded)));
            assert_eq!(rig.state(), before);
            assert_eq!(rig.requests.pending(), None);
        }
    }

    #[test]
    fn invalid_hour_is_cleared_and_reentered() {
        let rig = Rig::new();
        let script = keys(&[&PIN, &[d(1)], &[d(2), d(7)], &[d(2), d(3), d(5), d(9)]]);
        let (result, fg) = rig.run(Request::EditTimeOrAlarm, &script);
        assert_eq!(result, Some(Ok(Outcome::Saved)));
        assert_eq!(rig.state().time, ClockTime::from_hms(23, 59, 0));
        assert!(fg.display().showed("--"));
    }

    #[test]
    fn sets_alarm_time_and_enable_together() {
        let rig = Rig::new();
        let script = keys(&[
            &PIN,
            &[d(3), d(1), KeyCode::Confirm],
            &[d(0), d(6), d(1), d(5)],
        ]);
        let (result, fg) = rig.run(Request::EditTimeOrAlarm, &script);
        assert_eq!(result, Some(Ok(Outcome::Saved)));
        assert_eq!(rig.state().alarm, Alarm::new(ClockTime::from_hm(6, 15), true));
        assert!(fg.display().showed("13:30>ON 1:OFF"));
    }

    #[test]
    fn alarm_toggle_is_dropped_when_time_entry_is_cancelled() {
        let rig = Rig::new();
        let before = rig.state().alarm;
        let script = keys(&[
            &PIN,
            &[d(3), d(1), KeyCode::Confirm],
            &[d(0), d(6), KeyCode::Cancel],
        ]);
        let (result, _) = rig.run(Request::EditTimeOrAlarm, &script);
        assert_eq!(result, Some(Err(Error::Discarded)));
        assert_eq!(rig.state().alarm, before);
    }

    #[test]
    fn sets_date_after_rejected_month() {
        let rig = Rig::new();
        let script = keys(&[
            &PIN,
            &[d(2), d(0), d(2), d(6)],
            &[d(1), d(5)],
            &[d(0), d(9)],
            &[d(1), d(4)],
        ]);
        let (result, _) = rig.run(Request::EditDate, &script);
        assert_eq!(result, Some(Ok(Outcome::Saved)));
        assert_eq!(rig.state().date, CalendarDate::new(2026, 9, 14));
    }

    #[test]
    fn date_reset_starts_over_from_year() {
        let rig = Rig::new();
        let script = keys(&[
            &PIN,
            &[d(1), d(9), d(9), d(9), d(0), KeyCode::Confirm],
            &[d(2), d(0), d(0), d(0), d(0), d(1), d(0), d(2)],
        ]);
        let (result, _) = rig.run(Request::EditDate, &script);
        assert_eq!(result, Some(Ok(Outcome::Saved)));
        assert_eq!(rig.state().date, CalendarDate::new(2000, 1, 2));
    }

    #[test]
    fn raises_max_threshold() {
        let rig = Rig::new();
        let script = keys(&[&PIN, &[KeyCode::Confirm, d(1), d(3), d(0), KeyCode::Confirm]]);
        let (result, _) = rig.run(Request::EditTemperature, &script);
        assert_eq!(result, Some(Ok(Outcome::Saved)));
        assert_eq!(rig.state().temperature.max, 30);
        assert_eq!(rig.state().temperature.min, 18);
    }

    #[test]
    fn rejects_conflicting_thresholds() {
        let rig = Rig::new();

        let script = keys(&[&PIN, &[KeyCode::Confirm, d(0), d(2), d(5), KeyCode::Confirm]]);
        let (result, fg) = rig.run(Request::EditTemperature, &script);
        assert_eq!(
            result,
            Some(Err(Error::ThresholdConflict(ThresholdConflict::MinNotBelowMax)))
        );
        assert!(fg.display().showed("bigger than max!"));

        let script = keys(&[&PIN, &[KeyCode::Confirm, d(1), d(1), d(0), d(1)]]);
        let (result, fg) = rig.run(Request::EditTemperature, &script);
        assert_eq!(
            result,
            Some(Err(Error::ThresholdConflict(ThresholdConflict::MaxAboveLimit)))
        );
        assert!(fg.display().showed("bigger than 100"));

        assert_eq!(rig.state().temperature, Temperature::new(18, 25));
    }

    #[test]
    fn three_wrong_pins_lock_out_later_requests() {
        let rig = Rig::new();
        let wrong = [d(9), d(9), d(9), d(9)];
        let script = keys(&[&wrong, &wrong, &wrong]);
        let (result, fg) = rig.run(Request::EditDate, &script);
        assert_eq!(result, Some(Err(Error::LockedOut)));
        assert!(fg.display().showed("Wrong Pin!"));
        assert!(rig.state().security.lockout.is_blocked());

        let (result, fg) = rig.run(Request::EditTemperature, &[]);
        assert_eq!(result, Some(Err(Error::Unauthorized { remaining_secs: 15 })));
        assert!(fg.display().showed("Wait 15secs and"));

        with_state(&rig.shared, |state| {
            for _ in 0..15 {
                state.tick(51);
            }
        });
        let script = keys(&[&PIN, &[KeyCode::Cancel]]);
        let (result, _) = rig.run(Request::EditTemperature, &script);
        assert_eq!(result, Some(Err(Error::Discarded)));
    }

    #[test]
    fn pin_change_skips_the_edit() {
        let rig = Rig::new();
        let before = rig.state();
        let script = keys(&[&[KeyCode::Confirm], &PIN, &[d(4), d(3), d(2), d(1)]]);
        let (result, fg) = rig.run(Request::EditTimeOrAlarm, &script);
        assert_eq!(result, Some(Ok(Outcome::PinChanged)));
        assert!(fg.display().showed("Pin changed"));

        let after = rig.state();
        assert!(after.security.verify(&Pin::new([4, 3, 2, 1])));
        assert_eq!(after.time, before.time);
        assert_eq!(after.alarm, before.alarm);

        let script = keys(&[&[d(4), d(3), d(2), d(1)], &[KeyCode::Cancel]]);
        let (result, _) = rig.run(Request::EditDate, &script);
        assert_eq!(result, Some(Err(Error::Discarded)));
    }

    #[test]
    fn pin_digits_are_masked() {
        let rig = Rig::new();
        let script = keys(&[&[d(1), d(2), KeyCode::Cancel]]);
        let (_, fg) = rig.run(Request::EditDate, &script);
        assert!(!fg.display().writes.iter().any(|w| w == "1" || w == "2"));
        assert_eq!(fg.display().writes.iter().filter(|w| *w == "*").count(), 2);
    }
}
