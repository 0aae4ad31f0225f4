use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::ActivityState;
use crate::breaks::BreakTaskRecord;
use crate::fatigue::Severity;
use crate::intervention::InterventionRecord;

/// Every observable state change produces an Event.
/// `Monitor::tick()` returns them; the caller forwards them to its single
/// observer (notification sink, UI, log).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    ActivityChanged {
        from: ActivityState,
        to: ActivityState,
        at: DateTime<Utc>,
    },
    SeverityChanged {
        from: Severity,
        to: Severity,
        value: f64,
        at: DateTime<Utc>,
    },
    /// Crossed into the forecast's high-efficiency threshold.
    ThresholdReached {
        value: f64,
        at: DateTime<Utc>,
    },
    Intervention {
        record: InterventionRecord,
    },
    BreakTaskCreated {
        task: BreakTaskRecord,
    },
    BreakTaskSettled {
        task: BreakTaskRecord,
    },
    FatigueRestored {
        value: f64,
        from_snapshot: bool,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn kind(&self) -> &'static str {
        match self {
            Event::ActivityChanged { .. } => "activity_changed",
            Event::SeverityChanged { .. } => "severity_changed",
            Event::ThresholdReached { .. } => "threshold_reached",
            Event::Intervention { .. } => "intervention",
            Event::BreakTaskCreated { .. } => "break_task_created",
            Event::BreakTaskSettled { .. } => "break_task_settled",
            Event::FatigueRestored { .. } => "fatigue_restored",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let event = Event::ActivityChanged {
            from: ActivityState::Active,
            to: ActivityState::Idle,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "activity_changed");
        assert_eq!(json["to"], "idle");
        assert_eq!(event.kind(), "activity_changed");
    }
}
