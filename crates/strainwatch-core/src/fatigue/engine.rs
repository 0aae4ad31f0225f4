//! Fatigue engine.
//!
//! Owns the fatigue scalar (0..=100), its smoothed slope and the derived
//! severity bucket. Accumulation compounds with the current value and
//! recovery speeds up as the value grows, so the two curves are
//! deliberately asymmetric:
//!
//! ```text
//! increase/s = base_increase * (1 + v/100) * weight / 60
//! decrease/s = base_decrease * max(0.2, v/50) / 60 * multiplier
//! ```
//!
//! No operation fails. Non-positive or non-finite durations are no-ops and
//! every result is clamped into range.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::explanation::{FatigueExplanation, ReasonCode};
use super::severity::{Severity, SeverityThresholds};

/// Number of per-tick deltas the slope is averaged over.
pub const SLOPE_WINDOW: usize = 60;

const MIN_RECOVERY_FACTOR: f64 = 0.2;
const MAX_LOAD_WEIGHT: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FatigueConfig {
    #[serde(default = "default_base_increase")]
    pub base_increase_per_minute: f64,
    #[serde(default = "default_base_decrease")]
    pub base_decrease_per_minute: f64,
    /// Load weight forced while passively consuming media.
    #[serde(default = "default_media_multiplier")]
    pub media_multiplier: f64,
}

fn default_base_increase() -> f64 {
    1.0
}
fn default_base_decrease() -> f64 {
    2.0
}
fn default_media_multiplier() -> f64 {
    0.3
}

impl Default for FatigueConfig {
    fn default() -> Self {
        Self {
            base_increase_per_minute: default_base_increase(),
            base_decrease_per_minute: default_base_decrease(),
            media_multiplier: default_media_multiplier(),
        }
    }
}

impl FatigueConfig {
    pub fn sanitized(self) -> Self {
        Self {
            base_increase_per_minute: non_negative(self.base_increase_per_minute),
            base_decrease_per_minute: non_negative(self.base_decrease_per_minute),
            media_multiplier: non_negative(self.media_multiplier).min(MAX_LOAD_WEIGHT),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FatigueEngine {
    config: FatigueConfig,
    thresholds: SeverityThresholds,
    value: f64,
    slope: f64,
    severity: Severity,
    load_weight: f64,
    deltas: VecDeque<f64>,
    last_explanation: Option<FatigueExplanation>,
}

impl Default for FatigueEngine {
    fn default() -> Self {
        Self::new(FatigueConfig::default(), SeverityThresholds::default())
    }
}

impl FatigueEngine {
    pub fn new(config: FatigueConfig, thresholds: SeverityThresholds) -> Self {
        let thresholds = thresholds.sanitized();
        Self {
            config: config.sanitized(),
            thresholds,
            value: 0.0,
            slope: 0.0,
            severity: thresholds.classify(0.0),
            load_weight: 1.0,
            deltas: VecDeque::with_capacity(SLOPE_WINDOW),
            last_explanation: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Mean of recent per-tick deltas, in %/minute.
    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn load_weight(&self) -> f64 {
        self.load_weight
    }

    pub fn config(&self) -> &FatigueConfig {
        &self.config
    }

    pub fn thresholds(&self) -> &SeverityThresholds {
        &self.thresholds
    }

    pub fn last_explanation(&self) -> Option<&FatigueExplanation> {
        self.last_explanation.as_ref()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Set the multiplier used by the next accumulation calls.
    pub fn set_load_weight(&mut self, weight: f64) {
        if weight.is_finite() {
            self.load_weight = weight.clamp(0.0, MAX_LOAD_WEIGHT);
        }
    }

    /// Accumulate fatigue for `seconds` of activity. Returns the applied delta.
    pub fn increase_fatigue(
        &mut self,
        seconds: f64,
        is_media_mode: bool,
        reason: Option<ReasonCode>,
    ) -> f64 {
        if !is_positive(seconds) {
            return 0.0;
        }

        let weight = if is_media_mode {
            self.config.media_multiplier
        } else {
            self.load_weight
        };
        let base = self.config.base_increase_per_minute * (1.0 + self.value / 100.0);
        let rate = base * weight / 60.0;
        let next = (self.value + rate * seconds).min(100.0);

        let default_reason = if is_media_mode {
            ReasonCode::MediaConsumption
        } else {
            ReasonCode::ActiveWork
        };
        let mut explanation = FatigueExplanation::new(reason.unwrap_or(default_reason), None);
        explanation.base_contribution = base;
        explanation.load_weight = weight;
        self.commit(next, explanation)
    }

    /// Recover fatigue for `seconds` of rest. Returns the applied (negative) delta.
    pub fn decrease_fatigue(
        &mut self,
        seconds: f64,
        recovery_multiplier: f64,
        reason: Option<ReasonCode>,
    ) -> f64 {
        if !is_positive(seconds) {
            return 0.0;
        }

        let multiplier = non_negative(recovery_multiplier);
        let base =
            self.config.base_decrease_per_minute * (self.value / 50.0).max(MIN_RECOVERY_FACTOR);
        let rate = base / 60.0 * multiplier;
        let next = (self.value - rate * seconds).max(0.0);

        let mut explanation =
            FatigueExplanation::new(reason.unwrap_or(ReasonCode::IdleRecovery), None);
        explanation.base_contribution = base;
        explanation.load_weight = multiplier;
        self.commit(next, explanation)
    }

    /// Subtract a flat credit, bypassing the recovery curve.
    pub fn apply_recovery_credit(&mut self, credit: f64) -> f64 {
        let credit = non_negative(credit);
        let next = (self.value - credit).max(0.0);

        let mut explanation = FatigueExplanation::new(ReasonCode::BreakCredit, None);
        explanation.recovery_credit = credit;
        self.commit(next, explanation)
    }

    /// Seed the value from a persisted snapshot. The slope window starts empty.
    pub fn restore(&mut self, value: f64) {
        self.deltas.clear();
        self.slope = 0.0;
        self.value = clamp_value(value);
        self.severity = self.thresholds.classify(self.value);

        let mut explanation = FatigueExplanation::new(ReasonCode::Restore, None);
        explanation.value_after = self.value;
        self.last_explanation = Some(explanation);
    }

    pub fn reset(&mut self) {
        self.deltas.clear();
        self.value = 0.0;
        self.slope = 0.0;
        self.severity = self.thresholds.classify(0.0);
        self.last_explanation = None;
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn commit(&mut self, next: f64, mut explanation: FatigueExplanation) -> f64 {
        let next = clamp_value(next);
        let delta = next - self.value;
        self.value = next;

        if self.deltas.len() == SLOPE_WINDOW {
            self.deltas.pop_front();
        }
        self.deltas.push_back(delta);
        self.slope = self.deltas.iter().sum::<f64>() / self.deltas.len() as f64 * 60.0;
        self.severity = self.thresholds.classify(self.value);

        explanation.delta = delta;
        explanation.value_after = next;
        self.last_explanation = Some(explanation);
        delta
    }
}

fn is_positive(seconds: f64) -> bool {
    seconds.is_finite() && seconds > 0.0
}

fn non_negative(v: f64) -> f64 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}

fn clamp_value(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_at(value: f64) -> FatigueEngine {
        let mut engine = FatigueEngine::default();
        engine.restore(value);
        engine
    }

    #[test]
    fn one_minute_of_work_compounds() {
        let mut engine = FatigueEngine::default();
        engine.set_load_weight(1.0);
        for _ in 0..60 {
            engine.increase_fatigue(1.0, false, None);
        }
        assert!(engine.value() > 1.0, "value = {}", engine.value());
        assert!(engine.value() < 2.0, "value = {}", engine.value());
    }

    #[test]
    fn media_mode_overrides_load_weight() {
        let mut work = FatigueEngine::default();
        work.set_load_weight(1.0);
        work.increase_fatigue(60.0, false, None);

        let mut media = FatigueEngine::default();
        media.set_load_weight(1.0);
        media.increase_fatigue(60.0, true, None);

        assert!((work.value() - 1.0).abs() < 1e-9);
        assert!((media.value() - 0.3).abs() < 1e-9);
        assert_eq!(
            media.last_explanation().unwrap().reason,
            ReasonCode::MediaConsumption
        );
    }

    #[test]
    fn increase_clamps_at_100() {
        let mut engine = engine_at(99.9);
        engine.set_load_weight(5.0);
        engine.increase_fatigue(600.0, false, None);
        assert_eq!(engine.value(), 100.0);
        assert_eq!(engine.severity(), Severity::Grind);
    }

    #[test]
    fn decrease_clamps_at_zero() {
        let mut engine = engine_at(1.0);
        engine.decrease_fatigue(10_000.0, 3.0, None);
        assert_eq!(engine.value(), 0.0);
    }

    #[test]
    fn recovery_floor_keeps_low_values_moving() {
        let mut engine = engine_at(0.5);
        let delta = engine.decrease_fatigue(60.0, 1.0, None);
        // max(0.2, 0.01) * 2.0 per minute
        assert!((delta + 0.4).abs() < 1e-9, "delta = {delta}");
    }

    #[test]
    fn recovery_outruns_accumulation_only_when_high() {
        let mut low = engine_at(10.0);
        low.increase_fatigue(60.0, false, None);
        low.decrease_fatigue(60.0, 1.0, None);
        assert!(low.value() > 10.0);

        let mut high = engine_at(80.0);
        high.increase_fatigue(60.0, false, None);
        high.decrease_fatigue(60.0, 1.0, None);
        assert!(high.value() < 80.0);
    }

    #[test]
    fn non_positive_seconds_are_noops() {
        let mut engine = engine_at(40.0);
        assert_eq!(engine.increase_fatigue(0.0, false, None), 0.0);
        assert_eq!(engine.increase_fatigue(-5.0, false, None), 0.0);
        assert_eq!(engine.decrease_fatigue(f64::NAN, 1.0, None), 0.0);
        assert_eq!(engine.value(), 40.0);
        assert_eq!(engine.slope(), 0.0);
    }

    #[test]
    fn slope_is_mean_delta_per_minute() {
        let mut engine = FatigueEngine::default();
        engine.set_load_weight(1.0);
        engine.increase_fatigue(1.0, false, None);
        let first = engine.last_explanation().unwrap().delta;
        assert!((engine.slope() - first * 60.0).abs() < 1e-12);

        for _ in 0..200 {
            engine.increase_fatigue(1.0, false, None);
        }
        assert_eq!(engine.deltas.len(), SLOPE_WINDOW);
        assert!(engine.slope() > 1.0);
    }

    #[test]
    fn recovery_turns_slope_negative() {
        let mut engine = engine_at(50.0);
        for _ in 0..10 {
            engine.decrease_fatigue(1.0, 1.0, None);
        }
        assert!(engine.slope() < 0.0);
    }

    #[test]
    fn recovery_credit_subtracts_directly() {
        let mut engine = engine_at(50.0);
        let delta = engine.apply_recovery_credit(4.2);
        assert!((delta + 4.2).abs() < 1e-9);
        assert!((engine.value() - 45.8).abs() < 1e-9);
        let explanation = engine.last_explanation().unwrap();
        assert_eq!(explanation.reason, ReasonCode::BreakCredit);
        assert!((explanation.recovery_credit - 4.2).abs() < 1e-9);
    }

    #[test]
    fn reset_clears_everything() {
        let mut engine = engine_at(70.0);
        engine.increase_fatigue(30.0, false, None);
        engine.reset();
        assert_eq!(engine.value(), 0.0);
        assert_eq!(engine.slope(), 0.0);
        assert_eq!(engine.severity(), Severity::Fresh);
        assert!(engine.deltas.is_empty());
        assert!(engine.last_explanation().is_none());
    }

    #[test]
    fn load_weight_ignores_nan_and_clamps() {
        let mut engine = FatigueEngine::default();
        engine.set_load_weight(0.7);
        engine.set_load_weight(f64::NAN);
        assert_eq!(engine.load_weight(), 0.7);
        engine.set_load_weight(-1.0);
        assert_eq!(engine.load_weight(), 0.0);
    }

    #[test]
    fn restore_clamps_out_of_range_values() {
        assert_eq!(engine_at(140.0).value(), 100.0);
        assert_eq!(engine_at(-3.0).value(), 0.0);
        assert_eq!(engine_at(62.0).severity(), Severity::Overloaded);
    }
}
