use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakTaskType {
    Eye,
    Breath,
    Mobility,
    Stretch,
}

impl BreakTaskType {
    pub fn duration_seconds(self) -> u32 {
        match self {
            BreakTaskType::Eye => 20,
            BreakTaskType::Breath => 30,
            BreakTaskType::Mobility => 60,
            BreakTaskType::Stretch => 30,
        }
    }

    pub fn instructions(self) -> &'static str {
        match self {
            BreakTaskType::Eye => "Look at something at least 20 feet away and let your eyes relax.",
            BreakTaskType::Breath => "Breathe in for four counts, hold for four, out for six.",
            BreakTaskType::Mobility => "Stand up, walk around and roll your shoulders.",
            BreakTaskType::Stretch => "Stretch your neck, wrists and upper back.",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BreakTaskType::Eye => "eye",
            BreakTaskType::Breath => "breath",
            BreakTaskType::Mobility => "mobility",
            BreakTaskType::Stretch => "stretch",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eye" => Some(BreakTaskType::Eye),
            "breath" => Some(BreakTaskType::Breath),
            "mobility" => Some(BreakTaskType::Mobility),
            "stretch" => Some(BreakTaskType::Stretch),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakTaskResult {
    Pending,
    Completed,
    Snoozed,
    Skipped,
}

impl BreakTaskResult {
    pub fn as_str(self) -> &'static str {
        match self {
            BreakTaskResult::Pending => "pending",
            BreakTaskResult::Completed => "completed",
            BreakTaskResult::Snoozed => "snoozed",
            BreakTaskResult::Skipped => "skipped",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(BreakTaskResult::Pending),
            "completed" | "complete" | "done" => Some(BreakTaskResult::Completed),
            "snoozed" | "snooze" => Some(BreakTaskResult::Snoozed),
            "skipped" | "skip" => Some(BreakTaskResult::Skipped),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerReason {
    ContinuousWork,
    SeverityGrind,
    SeverityOverloaded,
    Intervention,
    Manual,
}

impl TriggerReason {
    /// Automatic triggers respect the post-skip/snooze cooldown. Severity
    /// triggers are included so a skipped break is not re-offered on the very
    /// next tick while fatigue stays high.
    pub fn is_automatic(self) -> bool {
        matches!(
            self,
            TriggerReason::ContinuousWork
                | TriggerReason::SeverityGrind
                | TriggerReason::SeverityOverloaded
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TriggerReason::ContinuousWork => "continuous_work",
            TriggerReason::SeverityGrind => "severity_grind",
            TriggerReason::SeverityOverloaded => "severity_overloaded",
            TriggerReason::Intervention => "intervention",
            TriggerReason::Manual => "manual",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "continuous_work" => TriggerReason::ContinuousWork,
            "severity_grind" => TriggerReason::SeverityGrind,
            "severity_overloaded" => TriggerReason::SeverityOverloaded,
            "intervention" => TriggerReason::Intervention,
            _ => TriggerReason::Manual,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakTaskRecord {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub task_type: BreakTaskType,
    pub duration_seconds: u32,
    pub trigger_reason: TriggerReason,
    pub completed_at: Option<DateTime<Utc>>,
    pub result: BreakTaskResult,
    pub recovery_credit: f64,
    pub fatigue_at_trigger: f64,
}

impl BreakTaskRecord {
    pub fn new(
        task_type: BreakTaskType,
        trigger_reason: TriggerReason,
        fatigue_at_trigger: f64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at,
            task_type,
            duration_seconds: task_type.duration_seconds(),
            trigger_reason,
            completed_at: None,
            result: BreakTaskResult::Pending,
            recovery_credit: 0.0,
            fatigue_at_trigger: if fatigue_at_trigger.is_nan() {
                0.0
            } else {
                fatigue_at_trigger.clamp(0.0, 100.0)
            },
        }
    }

    pub fn is_pending(&self) -> bool {
        self.result == BreakTaskResult::Pending
    }
}
