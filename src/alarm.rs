//! Daily alarm and its buzz sequencing.

use crate::clock::ClockTime;

/// A single daily alarm.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "debug-mode", derive(defmt::Format))]
pub struct Alarm {
    pub enabled: bool,
    /// Target time, seconds always zero
    pub target: ClockTime,
}

impl Alarm {
    pub const fn new(target: ClockTime, enabled: bool) -> Self {
        Self {
            enabled,
            target: target.at_minute_start(),
        }
    }

    /// Field-for-field comparison of `now` against the target, seconds
    /// included.
    pub fn matches(&self, now: &ClockTime) -> bool {
        self.target == *now
    }

    /// Whether the alarm should start sounding at `now`.
    pub fn fires_at(&self, now: &ClockTime) -> bool {
        self.enabled && self.matches(now)
    }

    /// Replaces the target; seconds are forced to zero.
    pub fn set_target(&mut self, target: ClockTime) {
        self.target = target.at_minute_start();
    }
}

/// What the sounder wants done on this period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "debug-mode", derive(defmt::Format))]
pub enum SounderStep {
    Idle,
    /// Emit one short pulse
    Pulse,
    /// The duration limit was exceeded; buzzing stopped this period
    Expired,
}

/// Buzzing state and duration counter for a fired alarm.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "debug-mode", derive(defmt::Format))]
pub struct AlarmSounder {
    buzzing: bool,
    periods: u8,
    limit: u8,
}

impl AlarmSounder {
    /// `limit` is the number of pulses emitted before buzzing stops on its
    /// own.
    pub const fn new(limit: u8) -> Self {
        Self {
            buzzing: false,
            periods: 0,
            limit,
        }
    }

    pub fn is_buzzing(&self) -> bool {
        self.buzzing
    }

    /// Starts (or restarts) buzzing with a fresh duration counter.
    pub fn start(&mut self) {
        self.buzzing = true;
        self.periods = 0;
    }

    /// Stops buzzing.
    ///
    /// # Returns
    ///
    /// `true` if the alarm was buzzing.
    pub fn silence(&mut self) -> bool {
        core::mem::replace(&mut self.buzzing, false)
    }

    /// Advances the duration counter by one period.
    pub fn step(&mut self) -> SounderStep {
        if !self.buzzing {
            return SounderStep::Idle;
        }
        self.periods = self.periods.saturating_add(1);
        if self.periods > self.limit {
            self.buzzing = false;
            SounderStep::Expired
        } else {
            SounderStep::Pulse
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_only_on_exact_second() {
        let alarm = Alarm::new(ClockTime::from_hm(12, 30), true);
        assert!(alarm.matches(&ClockTime::from_hms(12, 30, 0)));
        assert!(!alarm.matches(&ClockTime::from_hms(12, 30, 1)));
        assert!(!alarm.matches(&ClockTime::from_hms(12, 31, 0)));
        assert!(!alarm.matches(&ClockTime::from_hms(2, 30, 0)));
    }

    #[test]
    fn target_seconds_are_forced_to_zero() {
        let mut alarm = Alarm::new(ClockTime::from_hms(6, 15, 42), false);
        assert_eq!(alarm.target, ClockTime::from_hm(6, 15));
        alarm.set_target(ClockTime::from_hms(7, 0, 9));
        assert_eq!(alarm.target, ClockTime::from_hm(7, 0));
    }

    #[test]
    fn disabled_alarm_never_fires() {
        let alarm = Alarm::new(ClockTime::from_hm(12, 30), false);
        assert!(alarm.matches(&ClockTime::from_hm(12, 30)));
        assert!(!alarm.fires_at(&ClockTime::from_hm(12, 30)));
    }

    #[test]
    fn sounder_pulses_up_to_limit_then_expires() {
        let mut sounder = AlarmSounder::new(3);
        assert_eq!(sounder.step(), SounderStep::Idle);

        sounder.start();
        assert_eq!(sounder.step(), SounderStep::Pulse);
        assert_eq!(sounder.step(), SounderStep::Pulse);
        assert_eq!(sounder.step(), SounderStep::Pulse);
        assert_eq!(sounder.step(), SounderStep::Expired);
        assert!(!sounder.is_buzzing());
        assert_eq!(sounder.step(), SounderStep::Idle);
    }

    #[test]
    fn silence_reports_whether_it_was_buzzing() {
        let mut sounder = AlarmSounder::new(60);
        assert!(!sounder.silence());
        sounder.start();
        assert!(sounder.silence());
        assert_eq!(sounder.step(), SounderStep::Idle);
    }
}
