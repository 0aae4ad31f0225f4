//! Activity state machine.
//!
//! Evaluated once per tick against the idle reading and the audio flag:
//!
//! ```text
//! idle < effective_idle, audio, idle > 5s  -> PassiveConsumption  (+1s media)
//! idle < effective_idle                    -> Active              (+1s, session++)
//! effective_idle <= idle < away            -> Idle                (-1s, session = 0)
//! idle >= away                             -> Away                (-2s, session = 0)
//! ```
//!
//! `effective_idle` is the media threshold while audio plays.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fatigue::{FatigueEngine, ReasonCode};

/// Idle seconds above which audio playback counts as passive watching/listening.
const PASSIVE_MIN_IDLE_SECS: f64 = 5.0;
const TICK_SECS: f64 = 1.0;
const AWAY_RECOVERY_SECS: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityState {
    Active,
    PassiveConsumption,
    Idle,
    Away,
}

impl ActivityState {
    /// Active or passive: time that counts toward today's usage.
    pub fn is_engaged(self) -> bool {
        matches!(self, ActivityState::Active | ActivityState::PassiveConsumption)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivityThresholds {
    #[serde(default = "default_idle_threshold")]
    pub idle_threshold_secs: f64,
    #[serde(default = "default_media_idle_threshold")]
    pub media_idle_threshold_secs: f64,
    #[serde(default = "default_away_threshold")]
    pub away_threshold_secs: f64,
}

fn default_idle_threshold() -> f64 {
    60.0
}
fn default_media_idle_threshold() -> f64 {
    300.0
}
fn default_away_threshold() -> f64 {
    600.0
}

impl Default for ActivityThresholds {
    fn default() -> Self {
        Self {
            idle_threshold_secs: default_idle_threshold(),
            media_idle_threshold_secs: default_media_idle_threshold(),
            away_threshold_secs: default_away_threshold(),
        }
    }
}

impl ActivityThresholds {
    pub fn sanitized(self) -> Self {
        let fallback = Self::default();
        let pick = |v: f64, d: f64| if v.is_finite() && v > 0.0 { v } else { d };
        Self {
            idle_threshold_secs: pick(self.idle_threshold_secs, fallback.idle_threshold_secs),
            media_idle_threshold_secs: pick(
                self.media_idle_threshold_secs,
                fallback.media_idle_threshold_secs,
            ),
            away_threshold_secs: pick(self.away_threshold_secs, fallback.away_threshold_secs),
        }
    }

    pub fn effective_idle_threshold(&self, audio_playing: bool) -> f64 {
        if audio_playing {
            self.media_idle_threshold_secs
        } else {
            self.idle_threshold_secs
        }
    }

    /// Pure classification of one reading.
    pub fn classify(&self, reading: ActivityReading) -> ActivityState {
        let idle = reading.sanitized_idle();
        if idle < self.effective_idle_threshold(reading.audio_playing) {
            if reading.audio_playing && idle > PASSIVE_MIN_IDLE_SECS {
                ActivityState::PassiveConsumption
            } else {
                ActivityState::Active
            }
        } else if idle < self.away_threshold_secs {
            ActivityState::Idle
        } else {
            ActivityState::Away
        }
    }
}

/// Raw signals supplied by the input source once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ActivityReading {
    pub idle_seconds: f64,
    pub audio_playing: bool,
}

impl ActivityReading {
    pub fn new(idle_seconds: f64, audio_playing: bool) -> Self {
        Self {
            idle_seconds,
            audio_playing,
        }
    }

    fn sanitized_idle(&self) -> f64 {
        if self.idle_seconds.is_nan() {
            0.0
        } else {
            self.idle_seconds.max(0.0)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionCounters {
    /// Continuous Active seconds; zeroed on Idle/Away.
    pub current_session_seconds: u64,
    /// Longest current session seen today.
    pub longest_session_seconds: u64,
    /// Engaged seconds today, seeded from persisted usage.
    pub today_active_seconds: u64,
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivityStep {
    pub previous: Option<ActivityState>,
    pub state: ActivityState,
    pub fatigue_delta: f64,
}

impl ActivityStep {
    /// True when observers should be told about a transition.
    pub fn changed(&self) -> bool {
        self.previous.is_some_and(|prev| prev != self.state)
    }
}

#[derive(Debug, Clone)]
pub struct ActivityMachine {
    thresholds: ActivityThresholds,
    state: Option<ActivityState>,
    counters: SessionCounters,
    counters_date: Option<NaiveDate>,
}

impl Default for ActivityMachine {
    fn default() -> Self {
        Self::new(ActivityThresholds::default())
    }
}

impl ActivityMachine {
    pub fn new(thresholds: ActivityThresholds) -> Self {
        Self {
            thresholds: thresholds.sanitized(),
            state: None,
            counters: SessionCounters::default(),
            counters_date: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Last evaluated state; `None` before the first tick.
    pub fn state(&self) -> Option<ActivityState> {
        self.state
    }

    pub fn counters(&self) -> SessionCounters {
        self.counters
    }

    pub fn thresholds(&self) -> &ActivityThresholds {
        &self.thresholds
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Seed today's engaged seconds from persisted usage totals.
    pub fn seed_today_active(&mut self, seconds: u64, today: NaiveDate) {
        self.counters.today_active_seconds = self.counters.today_active_seconds.max(seconds);
        self.counters_date = Some(today);
    }

    /// Start a fresh continuous-work period.
    pub fn reset_session(&mut self) {
        self.counters.current_session_seconds = 0;
    }

    /// Evaluate one tick and drive the fatigue engine accordingly.
    pub fn step(
        &mut self,
        reading: ActivityReading,
        engine: &mut FatigueEngine,
        today: NaiveDate,
    ) -> ActivityStep {
        self.roll_day(today);

        let state = self.thresholds.classify(reading);
        let fatigue_delta = match state {
            ActivityState::PassiveConsumption => {
                engine.increase_fatigue(TICK_SECS, true, Some(ReasonCode::MediaConsumption))
            }
            ActivityState::Active => {
                self.counters.current_session_seconds += 1;
                engine.increase_fatigue(TICK_SECS, false, Some(ReasonCode::ActiveWork))
            }
            ActivityState::Idle => {
                self.counters.current_session_seconds = 0;
                engine.decrease_fatigue(TICK_SECS, 1.0, Some(ReasonCode::IdleRecovery))
            }
            ActivityState::Away => {
                self.counters.current_session_seconds = 0;
                engine.decrease_fatigue(AWAY_RECOVERY_SECS, 1.0, Some(ReasonCode::AwayRecovery))
            }
        };

        if state.is_engaged() {
            self.counters.today_active_seconds += 1;
            self.counters.longest_session_seconds = self
                .counters
                .longest_session_seconds
                .max(self.counters.current_session_seconds);
        }

        let previous = self.state.replace(state);
        if previous.is_some_and(|prev| prev != state) {
            tracing::debug!(from = ?previous, to = ?state, "activity state changed");
        }

        ActivityStep {
            previous,
            state,
            fatigue_delta,
        }
    }

    fn roll_day(&mut self, today: NaiveDate) {
        match self.counters_date {
            Some(date) if date == today => {}
            Some(_) => {
                tracing::debug!(%today, "calendar day changed, resetting daily counters");
                self.counters.longest_session_seconds = 0;
                self.counters.today_active_seconds = 0;
                self.counters_date = Some(today);
            }
            None => self.counters_date = Some(today),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn run(machine: &mut ActivityMachine, engine: &mut FatigueEngine, idle: f64, audio: bool) -> ActivityStep {
        machine.step(ActivityReading::new(idle, audio), engine, day(2))
    }

    #[test]
    fn decision_table() {
        let t = ActivityThresholds::default();
        assert_eq!(t.classify(ActivityReading::new(0.5, false)), ActivityState::Active);
        assert_eq!(t.classify(ActivityReading::new(3.0, true)), ActivityState::Active);
        assert_eq!(
            t.classify(ActivityReading::new(30.0, true)),
            ActivityState::PassiveConsumption
        );
        assert_eq!(
            t.classify(ActivityReading::new(120.0, true)),
            ActivityState::PassiveConsumption
        );
        assert_eq!(t.classify(ActivityReading::new(120.0, false)), ActivityState::Idle);
        assert_eq!(t.classify(ActivityReading::new(60.0, false)), ActivityState::Idle);
        assert_eq!(t.classify(ActivityReading::new(600.0, false)), ActivityState::Away);
        assert_eq!(t.classify(ActivityReading::new(-4.0, false)), ActivityState::Active);
    }

    #[test]
    fn active_ticks_grow_session_and_fatigue() {
        let mut machine = ActivityMachine::default();
        let mut engine = FatigueEngine::default();
        for _ in 0..10 {
            let step = run(&mut machine, &mut engine, 0.0, false);
            assert_eq!(step.state, ActivityState::Active);
        }
        let counters = machine.counters();
        assert_eq!(counters.current_session_seconds, 10);
        assert_eq!(counters.longest_session_seconds, 10);
        assert_eq!(counters.today_active_seconds, 10);
        assert!(engine.value() > 0.0);
    }

    #[test]
    fn passive_counts_usage_but_not_session() {
        let mut machine = ActivityMachine::default();
        let mut engine = FatigueEngine::default();
        for _ in 0..5 {
            run(&mut machine, &mut engine, 45.0, true);
        }
        let counters = machine.counters();
        assert_eq!(counters.current_session_seconds, 0);
        assert_eq!(counters.today_active_seconds, 5);
        assert_eq!(
            engine.last_explanation().unwrap().reason,
            ReasonCode::MediaConsumption
        );
    }

    #[test]
    fn idle_resets_session_and_recovers() {
        let mut machine = ActivityMachine::default();
        let mut engine = FatigueEngine::default();
        engine.restore(50.0);
        for _ in 0..30 {
            run(&mut machine, &mut engine, 0.0, false);
        }
        let before = engine.value();
        let step = run(&mut machine, &mut engine, 90.0, false);
        assert_eq!(step.state, ActivityState::Idle);
        assert!(step.changed());
        assert!(engine.value() < before);
        assert_eq!(machine.counters().current_session_seconds, 0);
        assert_eq!(machine.counters().longest_session_seconds, 30);
    }

    #[test]
    fn away_recovers_at_double_rate() {
        let mut idle_machine = ActivityMachine::default();
        let mut idle_engine = FatigueEngine::default();
        idle_engine.restore(60.0);
        let idle_delta = run(&mut idle_machine, &mut idle_engine, 100.0, false).fatigue_delta;

        let mut away_machine = ActivityMachine::default();
        let mut away_engine = FatigueEngine::default();
        away_engine.restore(60.0);
        let away_delta = run(&mut away_machine, &mut away_engine, 900.0, false).fatigue_delta;

        assert!((away_delta - 2.0 * idle_delta).abs() < 1e-3);
    }

    #[test]
    fn first_tick_is_not_a_transition() {
        let mut machine = ActivityMachine::default();
        let mut engine = FatigueEngine::default();
        let step = run(&mut machine, &mut engine, 0.0, false);
        assert!(!step.changed());
        let step = run(&mut machine, &mut engine, 0.0, false);
        assert!(!step.changed());
    }

    #[test]
    fn day_rollover_resets_daily_counters() {
        let mut machine = ActivityMachine::default();
        let mut engine = FatigueEngine::default();
        machine.seed_today_active(3_600, day(2));
        run(&mut machine, &mut engine, 0.0, false);
        assert_eq!(machine.counters().today_active_seconds, 3_601);

        machine.step(ActivityReading::new(0.0, false), &mut engine, day(3));
        let counters = machine.counters();
        assert_eq!(counters.today_active_seconds, 1);
        assert_eq!(counters.longest_session_seconds, 2);
        assert_eq!(counters.current_session_seconds, 2);
    }

    #[test]
    fn reset_session_keeps_daily_totals() {
        let mut machine = ActivityMachine::default();
        let mut engine = FatigueEngine::default();
        for _ in 0..4 {
            run(&mut machine, &mut engine, 0.0, false);
        }
        machine.reset_session();
        let counters = machine.counters();
        assert_eq!(counters.current_session_seconds, 0);
        assert_eq!(counters.longest_session_seconds, 4);
        assert_eq!(counters.today_active_seconds, 4);
    }
}
