//! Once-per-second update.
//!
//! # Sequence
//!
//! 1. Advance the clock; on midnight, advance the calendar
//! 2. Store the new temperature sample
//! 3. Classify it and arm or fire the one-shot excursion buzz
//! 4. Start the alarm if the clock matches an enabled target
//! 5. Step the alarm sounder (pulse, or stop after the duration limit)
//! 6. Count the lockout window down
//!
//! Steps 1–6 are [`AppState::tick`], a pure function applied under one
//! lock. [`periodic_update`] wraps it with the I/O: the sensor is sampled
//! before the lock is taken and the buzzer is driven after it is released,
//! so interrupts stay masked only for the state update.

use crate::alarm::SounderStep;
use crate::config::Settings;
use crate::io::{BandIndicator, Buzzer, TemperatureSensor};
use crate::state::{AppState, SharedState, with_state};
use crate::temperature::TempBand;

/// What one tick decided, for the I/O layer to carry out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "debug-mode", derive(defmt::Format))]
pub struct TickReport {
    /// Band of the new reading
    pub band: TempBand,
    /// A new excursion started; pulse the buzzer once
    pub excursion_buzz: bool,
    /// The alarm matched on this tick
    pub alarm_fired: bool,
    /// Alarm sounder decision for this period
    pub sounder: SounderStep,
    /// The lockout window closed on this tick
    pub unlocked: bool,
}

impl AppState {
    /// Applies one period to the state.
    ///
    /// # Arguments
    ///
    /// * `raw_temperature` - Raw sensor count sampled for this period
    pub fn tick(&mut self, raw_temperature: i32) -> TickReport {
        if self.time.advance_one_second() {
            self.date.advance_day();
        } else {
            self.date.normalize();
        }

        self.temperature.apply_sample(raw_temperature);
        let band = self.temperature.classify();
        let excursion_buzz = self.excursion.observe(band);

        let alarm_fired = self.alarm.fires_at(&self.time);
        if alarm_fired {
            self.sounder.start();
        }
        let sounder = self.sounder.step();

        let unlocked = self.security.lockout.tick();

        TickReport {
            band,
            excursion_buzz,
            alarm_fired,
            sounder,
            unlocked,
        }
    }
}

/// Samples, applies one tick to `shared`, then drives the outputs.
pub async fn periodic_update<S, B, I>(
    shared: &SharedState,
    settings: &Settings,
    sensor: &mut S,
    buzzer: &mut B,
    indicator: &mut I,
) -> TickReport
where
    S: TemperatureSensor,
    B: Buzzer,
    I: BandIndicator,
{
    let raw = sensor.sample().await;
    let report = with_state(shared, |state| state.tick(raw));

    indicator.show_band(report.band);
    if report.excursion_buzz {
        #[cfg(feature = "debug-mode")]
        defmt::warn!("temperature excursion: {}", report.band);
        buzzer.pulse(settings.excursion_pulse_ms).await;
    }

    #[cfg(feature = "debug-mode")]
    if report.alarm_fired {
        defmt::info!("alarm fired");
    }
    match report.sounder {
        SounderStep::Pulse => buzzer.pulse(settings.alarm_pulse_ms).await,
        SounderStep::Expired => {
            #[cfg(feature = "debug-mode")]
            defmt::info!("alarm stopped after {} periods", settings.alarm_buzz_periods);
        }
        SounderStep::Idle => {}
    }

    #[cfg(feature = "debug-mode")]
    if report.unlocked {
        defmt::info!("lockout cleared");
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::Alarm;
    use crate::clock::{CalendarDate, ClockTime};
    use crate::state::snapshot;

    /// Raw count that scales to 24 °C.
    const RAW_24C: i32 = 51;
    /// Raw count that scales to 29 °C.
    const RAW_29C: i32 = 60;

    fn boot() -> AppState {
        AppState::new(&Settings::DEFAULT)
    }

    #[test]
    fn nine_hundred_ticks_from_boot_reach_one_pm() {
        let mut state = boot();
        for _ in 0..900 {
            state.tick(RAW_24C);
        }
        assert_eq!(state.time, ClockTime::from_hms(13, 0, 0));
        assert_eq!(state.date, CalendarDate::new(1400, 3, 20));
    }

    #[test]
    fn midnight_advances_calendar() {
        let mut state = boot();
        state.time = ClockTime::from_hms(23, 59, 59);
        state.date = CalendarDate::new(1400, 3, 29);
        state.tick(RAW_24C);
        assert_eq!(state.time, ClockTime::MIDNIGHT);
        assert_eq!(state.date, CalendarDate::new(1400, 4, 0));
    }

    #[test]
    fn committed_boundary_day_rolls_on_next_tick() {
        let mut state = boot();
        state.date = CalendarDate::new(1400, 3, 30);
        state.tick(RAW_24C);
        assert_eq!(state.date, CalendarDate::new(1400, 4, 0));
    }

    #[test]
    fn alarm_fires_once_and_auto_clears() {
        let mut state = boot();
        state.alarm = Alarm::new(ClockTime::from_hm(12, 30), true);
        state.time = ClockTime::from_hms(12, 29, 58);

        let mut fired = 0;
        let mut pulses = 0;
        let mut expired_at = None;
        for second in 0..86_400u32 {
            let report = state.tick(RAW_24C);
            if report.alarm_fired {
                fired += 1;
                assert_eq!(state.time, ClockTime::from_hms(12, 30, 0));
            }
            match report.sounder {
                SounderStep::Pulse => pulses += 1,
                SounderStep::Expired => expired_at = Some(second),
                SounderStep::Idle => {}
            }
        }

        assert_eq!(fired, 1);
        assert_eq!(pulses, Settings::DEFAULT.alarm_buzz_periods as u32);
        assert_eq!(expired_at, Some(1 + Settings::DEFAULT.alarm_buzz_periods as u32));
        assert!(!state.sounder.is_buzzing());
    }

    #[test]
    fn disabled_alarm_stays_quiet() {
        let mut state = boot();
        state.time = ClockTime::from_hms(13, 29, 59);
        let report = state.tick(RAW_24C);
        assert!(!report.alarm_fired);
        assert_eq!(report.sounder, SounderStep::Idle);
    }

    #[test]
    fn excursion_buzzes_once_after_returning_in_band() {
        let mut state = boot();
        assert!(!state.tick(RAW_29C).excursion_buzz);
        assert!(!state.tick(RAW_24C).excursion_buzz);
        let report = state.tick(RAW_29C);
        assert_eq!(report.band, TempBand::Above);
        assert!(report.excursion_buzz);
        assert!(!state.tick(RAW_29C).excursion_buzz);
    }

    #[test]
    fn lockout_clears_after_window() {
        let mut state = boot();
        for _ in 0..3 {
            state.security.lockout.record_failure();
        }
        let ticks_to_unlock = (1..=20)
            .find(|_| state.tick(RAW_24C).unlocked)
            .unwrap();
        assert_eq!(ticks_to_unlock, Settings::DEFAULT.lockout_secs);
        assert!(!state.security.lockout.is_blocked());
    }

    struct FixedSensor(i32);

    impl TemperatureSensor for FixedSensor {
        async fn sample(&mut self) -> i32 {
            self.0
        }
    }

    #[derive(Default)]
    struct Pulses(Vec<u32>);

    impl Buzzer for Pulses {
        async fn pulse(&mut self, ms: u32) {
            self.0.push(ms);
        }
    }

    #[derive(Default)]
    struct Leds(Vec<TempBand>);

    impl BandIndicator for Leds {
        fn show_band(&mut self, band: TempBand) {
            self.0.push(band);
        }
    }

    #[test]
    fn periodic_update_drives_outputs() {
        let settings = Settings::DEFAULT;
        let shared = AppState::shared(&settings);
        with_state(&shared, |state| {
            state.alarm = Alarm::new(ClockTime::from_hm(12, 45), true);
            state.time = ClockTime::from_hms(12, 44, 59);
            state.excursion.observe(TempBand::Within);
        });

        let mut buzzer = Pulses::default();
        let mut leds = Leds::default();
        let report = embassy_futures::block_on(periodic_update(
            &shared,
            &settings,
            &mut FixedSensor(RAW_29C),
            &mut buzzer,
            &mut leds,
        ));

        assert!(report.alarm_fired);
        assert!(report.excursion_buzz);
        assert_eq!(buzzer.0, vec![100, 20]);
        assert_eq!(leds.0, vec![TempBand::Above]);

        let shown = snapshot(&shared);
        assert_eq!(shown.time, ClockTime::from_hms(12, 45, 0));
        assert_eq!(shown.temperature.current, 29);
        assert!(shown.buzzing);
    }
}
