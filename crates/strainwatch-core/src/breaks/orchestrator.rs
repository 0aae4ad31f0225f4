//! Break-task orchestrator.
//!
//! Each task moves `Pending -> Completed | Snoozed | Skipped` exactly once.
//! At most one task is pending at any time. Completion credits the fatigue
//! engine; skipping or snoozing opens a cooldown window during which
//! automatic triggers stay quiet.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::task::{BreakTaskRecord, BreakTaskResult, BreakTaskType, TriggerReason};
use crate::fatigue::{FatigueEngine, Severity};

/// Settled tasks kept in memory.
pub const HISTORY_CAPACITY: usize = 50;

/// Fatigue above which `Overloaded` asks for a stretch.
const OVERLOADED_STRETCH_VALUE: f64 = 75.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakConfig {
    #[serde(default = "default_continuous_work")]
    pub continuous_work_minutes: u64,
    #[serde(default = "default_cooldown")]
    pub cooldown_minutes: u64,
    #[serde(default = "default_eye_credit")]
    pub eye_credit: f64,
    #[serde(default = "default_breath_credit")]
    pub breath_credit: f64,
    #[serde(default = "default_mobility_credit")]
    pub mobility_credit: f64,
    #[serde(default = "default_stretch_credit")]
    pub stretch_credit: f64,
}

fn default_continuous_work() -> u64 {
    20
}
fn default_cooldown() -> u64 {
    5
}
fn default_eye_credit() -> f64 {
    3.0
}
fn default_breath_credit() -> f64 {
    4.0
}
fn default_mobility_credit() -> f64 {
    8.0
}
fn default_stretch_credit() -> f64 {
    5.0
}

impl Default for BreakConfig {
    fn default() -> Self {
        Self {
            continuous_work_minutes: default_continuous_work(),
            cooldown_minutes: default_cooldown(),
            eye_credit: default_eye_credit(),
            breath_credit: default_breath_credit(),
            mobility_credit: default_mobility_credit(),
            stretch_credit: default_stretch_credit(),
        }
    }
}

impl BreakConfig {
    pub fn base_credit(&self, task_type: BreakTaskType) -> f64 {
        let credit = match task_type {
            BreakTaskType::Eye => self.eye_credit,
            BreakTaskType::Breath => self.breath_credit,
            BreakTaskType::Mobility => self.mobility_credit,
            BreakTaskType::Stretch => self.stretch_credit,
        };
        if credit.is_finite() {
            credit.max(0.0)
        } else {
            0.0
        }
    }

    /// Higher fatigue at trigger time earns a proportionally larger reward.
    pub fn recovery_credit(&self, task_type: BreakTaskType, fatigue_at_trigger: f64) -> f64 {
        self.base_credit(task_type) * (1.0 + fatigue_at_trigger.clamp(0.0, 100.0) / 100.0 * 0.5)
    }

    fn continuous_work_secs(&self) -> u64 {
        self.continuous_work_minutes.saturating_mul(60).max(1)
    }

    fn cooldown(&self) -> Duration {
        Duration::minutes(self.cooldown_minutes.min(24 * 60) as i64)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BreakOrchestrator {
    config: BreakConfig,
    pending: Option<BreakTaskRecord>,
    cooldown_until: Option<DateTime<Utc>>,
    history: VecDeque<BreakTaskRecord>,
}

impl BreakOrchestrator {
    pub fn new(config: BreakConfig) -> Self {
        Self {
            config,
            pending: None,
            cooldown_until: None,
            history: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &BreakConfig {
        &self.config
    }

    pub fn pending(&self) -> Option<&BreakTaskRecord> {
        self.pending.as_ref()
    }

    /// Settled tasks, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &BreakTaskRecord> {
        self.history.iter()
    }

    pub fn in_cooldown(&self, now: DateTime<Utc>) -> bool {
        self.cooldown_until.is_some_and(|until| now < until)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Create a pending task. `None` if one is already pending, or if an
    /// automatic trigger fires inside the cooldown window.
    pub fn generate_task(
        &mut self,
        task_type: BreakTaskType,
        reason: TriggerReason,
        fatigue_at_trigger: f64,
        now: DateTime<Utc>,
    ) -> Option<BreakTaskRecord> {
        if self.pending.is_some() {
            return None;
        }
        if reason.is_automatic() && self.in_cooldown(now) {
            return None;
        }

        let task = BreakTaskRecord::new(task_type, reason, fatigue_at_trigger, now);
        tracing::info!(
            id = %task.id,
            task_type = task.task_type.as_str(),
            reason = reason.as_str(),
            fatigue = task.fatigue_at_trigger,
            "break task created"
        );
        self.pending = Some(task.clone());
        self.assert_single_pending();
        Some(task)
    }

    /// Settle the pending task with `task_id`. Returns the settled record, or
    /// `None` when there is nothing matching to settle.
    pub fn settle_task(
        &mut self,
        task_id: &str,
        result: BreakTaskResult,
        engine: &mut FatigueEngine,
        now: DateTime<Utc>,
    ) -> Option<BreakTaskRecord> {
        if result == BreakTaskResult::Pending {
            return None;
        }
        if self.pending.as_ref().map(|t| t.id.as_str()) != Some(task_id) {
            return None;
        }
        let mut task = self.pending.take()?;

        task.completed_at = Some(now);
        task.result = result;
        if result == BreakTaskResult::Completed {
            task.recovery_credit = self
                .config
                .recovery_credit(task.task_type, task.fatigue_at_trigger);
            engine.apply_recovery_credit(task.recovery_credit);
        } else {
            self.cooldown_until = Some(now + self.config.cooldown());
        }

        tracing::info!(
            id = %task.id,
            result = result.as_str(),
            credit = task.recovery_credit,
            "break task settled"
        );

        if self.history.len() == HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(task.clone());
        self.assert_single_pending();
        Some(task)
    }

    /// Check the continuous-work and severity triggers.
    pub fn check_triggers(
        &mut self,
        session_seconds: u64,
        severity: Severity,
        fatigue_value: f64,
        now: DateTime<Utc>,
    ) -> Option<BreakTaskRecord> {
        if self.pending.is_some() {
            return None;
        }

        let (task_type, reason) = if session_seconds >= self.config.continuous_work_secs() {
            (BreakTaskType::Mobility, TriggerReason::ContinuousWork)
        } else if severity == Severity::Grind {
            (BreakTaskType::Mobility, TriggerReason::SeverityGrind)
        } else if severity == Severity::Overloaded && fatigue_value > OVERLOADED_STRETCH_VALUE {
            (BreakTaskType::Stretch, TriggerReason::SeverityOverloaded)
        } else {
            return None;
        };

        self.generate_task(task_type, reason, fatigue_value, now)
    }

    fn assert_single_pending(&self) {
        debug_assert!(
            self.pending.as_ref().map_or(true, BreakTaskRecord::is_pending),
            "pending slot holds a settled task"
        );
        debug_assert!(
            self.history.iter().all(|t| !t.is_pending()),
            "a second pending task leaked into history"
        );
    }
}
