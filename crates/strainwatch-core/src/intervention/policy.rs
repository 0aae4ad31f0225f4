//! Intervention policy.
//!
//! Maps the fatigue value to an escalation level and gates each level with
//! its own cooldown. A suppressed evaluation neither consumes nor restarts
//! the cooldown, and levels never gate each other.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::messages::variants_for;
use crate::classifier::WorkloadCategory;

const MAX_COOLDOWN_SECS: u64 = 7 * 24 * 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionLevel {
    None,
    Nudge,
    Suggestion,
    Intervention,
}

impl InterventionLevel {
    fn slot(self) -> Option<usize> {
        match self {
            InterventionLevel::None => None,
            InterventionLevel::Nudge => Some(0),
            InterventionLevel::Suggestion => Some(1),
            InterventionLevel::Intervention => Some(2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterventionRecord {
    pub level: InterventionLevel,
    pub message: String,
    pub action_label: Option<String>,
    pub triggered_at: DateTime<Utc>,
}

impl InterventionRecord {
    pub fn none(at: DateTime<Utc>) -> Self {
        Self {
            level: InterventionLevel::None,
            message: String::new(),
            action_label: None,
            triggered_at: at,
        }
    }

    pub fn is_none(&self) -> bool {
        self.level == InterventionLevel::None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterventionConfig {
    #[serde(default = "default_nudge_threshold")]
    pub nudge_threshold: f64,
    #[serde(default = "default_suggestion_threshold")]
    pub suggestion_threshold: f64,
    #[serde(default = "default_intervention_threshold")]
    pub intervention_threshold: f64,
    #[serde(default = "default_nudge_cooldown")]
    pub nudge_cooldown_secs: u64,
    #[serde(default = "default_suggestion_cooldown")]
    pub suggestion_cooldown_secs: u64,
    #[serde(default = "default_intervention_cooldown")]
    pub intervention_cooldown_secs: u64,
}

fn default_nudge_threshold() -> f64 {
    40.0
}
fn default_suggestion_threshold() -> f64 {
    60.0
}
fn default_intervention_threshold() -> f64 {
    80.0
}
fn default_nudge_cooldown() -> u64 {
    60
}
fn default_suggestion_cooldown() -> u64 {
    180
}
fn default_intervention_cooldown() -> u64 {
    300
}

impl Default for InterventionConfig {
    fn default() -> Self {
        Self {
            nudge_threshold: default_nudge_threshold(),
            suggestion_threshold: default_suggestion_threshold(),
            intervention_threshold: default_intervention_threshold(),
            nudge_cooldown_secs: default_nudge_cooldown(),
            suggestion_cooldown_secs: default_suggestion_cooldown(),
            intervention_cooldown_secs: default_intervention_cooldown(),
        }
    }
}

impl InterventionConfig {
    /// Clamp thresholds into [0,100] and force ascending order.
    pub fn sanitized(self) -> Self {
        let clamp = |v: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, 100.0) };
        let nudge = clamp(self.nudge_threshold);
        let suggestion = clamp(self.suggestion_threshold).max(nudge);
        let intervention = clamp(self.intervention_threshold).max(suggestion);
        Self {
            nudge_threshold: nudge,
            suggestion_threshold: suggestion,
            intervention_threshold: intervention,
            ..self
        }
    }

    pub fn level_for(&self, fatigue_value: f64) -> InterventionLevel {
        if fatigue_value >= self.intervention_threshold {
            InterventionLevel::Intervention
        } else if fatigue_value >= self.suggestion_threshold {
            InterventionLevel::Suggestion
        } else if fatigue_value >= self.nudge_threshold {
            InterventionLevel::Nudge
        } else {
            InterventionLevel::None
        }
    }

    fn cooldown(&self, level: InterventionLevel) -> Duration {
        let secs = match level {
            InterventionLevel::None => 0,
            InterventionLevel::Nudge => self.nudge_cooldown_secs,
            InterventionLevel::Suggestion => self.suggestion_cooldown_secs,
            InterventionLevel::Intervention => self.intervention_cooldown_secs,
        };
        Duration::seconds(secs.min(MAX_COOLDOWN_SECS) as i64)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InterventionPolicy {
    config: InterventionConfig,
    last_triggered: [Option<DateTime<Utc>>; 3],
    rotation: [usize; 3],
}

impl InterventionPolicy {
    pub fn new(config: InterventionConfig) -> Self {
        Self {
            config: config.sanitized(),
            last_triggered: [None; 3],
            rotation: [0; 3],
        }
    }

    pub fn config(&self) -> &InterventionConfig {
        &self.config
    }

    pub fn last_triggered(&self, level: InterventionLevel) -> Option<DateTime<Utc>> {
        level.slot().and_then(|i| self.last_triggered[i])
    }

    /// Decide what, if anything, to show for the current fatigue value.
    pub fn evaluate(
        &mut self,
        fatigue_value: f64,
        category: WorkloadCategory,
        now: DateTime<Utc>,
    ) -> InterventionRecord {
        let level = self.config.level_for(fatigue_value);
        let Some(slot) = level.slot() else {
            return InterventionRecord::none(now);
        };

        if let Some(last) = self.last_triggered[slot] {
            if now - last < self.config.cooldown(level) {
                tracing::debug!(?level, "intervention suppressed by cooldown");
                return InterventionRecord::none(now);
            }
        }

        self.last_triggered[slot] = Some(now);
        let variants = variants_for(level, category);
        let (message, action_label) = match variants.len() {
            0 => (String::new(), None),
            n => {
                let variant = variants[self.rotation[slot] % n];
                self.rotation[slot] = self.rotation[slot].wrapping_add(1);
                (variant.message.to_string(), variant.action_label.map(str::to_string))
            }
        };

        InterventionRecord {
            level,
            message,
            action_label,
            triggered_at: now,
        }
    }

    pub fn reset_cooldowns(&mut self) {
        self.last_triggered = [None; 3];
    }
}
