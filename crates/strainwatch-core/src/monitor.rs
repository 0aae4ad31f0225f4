//! Tick driver.
//!
//! `Monitor` owns every collaborator and is the only writer to them. The
//! caller drives it once per second with a [`TickSample`] and forwards the
//! returned [`Event`]s to its observer. Everything else is read back through
//! queries.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::{ActivityMachine, ActivityReading, ActivityState, SessionCounters};
use crate::breaks::{BreakOrchestrator, BreakTaskRecord, BreakTaskResult, BreakTaskType, TriggerReason};
use crate::classifier::{
    Classification, Cluster, ClusterSet, ContextClassifier, ForegroundContext, WorkloadCategory,
};
use crate::clock::Clock;
use crate::events::Event;
use crate::fatigue::{FatigueEngine, FatigueExplanation, Severity};
use crate::forecast::{Forecast, ForecastService};
use crate::intervention::{InterventionLevel, InterventionPolicy, InterventionRecord};
use crate::storage::{Config, FatigueSnapshot, UsageRecord};

/// Seconds represented by one tick.
const TICK_SECS: f64 = 1.0;

/// Raw readings for one tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickSample {
    pub idle_seconds: f64,
    #[serde(default)]
    pub audio_playing: bool,
    /// `None` keeps the previous classification.
    #[serde(default)]
    pub foreground: Option<ForegroundContext>,
}

impl TickSample {
    pub fn new(idle_seconds: f64, audio_playing: bool) -> Self {
        Self {
            idle_seconds,
            audio_playing,
            foreground: None,
        }
    }

    pub fn with_foreground(mut self, ctx: ForegroundContext) -> Self {
        self.foreground = Some(ctx);
        self
    }
}

/// Point-in-time view for presentation layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorSnapshot {
    pub at: DateTime<Utc>,
    pub value: f64,
    pub slope: f64,
    pub severity: Severity,
    pub load_weight: f64,
    pub activity: Option<ActivityState>,
    pub counters: SessionCounters,
    pub classification: Option<Classification>,
    pub forecast: Forecast,
    pub pending_task: Option<BreakTaskRecord>,
    pub explanation: Option<FatigueExplanation>,
}

/// Result of [`Monitor::evaluate_intervention`].
#[derive(Debug, Clone, PartialEq)]
pub struct InterventionOutcome {
    pub record: InterventionRecord,
    /// Stretch task requested by an `Intervention`-level decision.
    pub break_task: Option<BreakTaskRecord>,
}

impl InterventionOutcome {
    pub fn into_events(self) -> Vec<Event> {
        let mut events = Vec::new();
        if !self.record.is_none() {
            events.push(Event::Intervention {
                record: self.record,
            });
        }
        if let Some(task) = self.break_task {
            events.push(Event::BreakTaskCreated { task });
        }
        events
    }
}

/// A settled break task and the severity change its recovery credit caused.
#[derive(Debug, Clone)]
pub struct SettleOutcome {
    pub task: BreakTaskRecord,
    pub severity_change: Option<Event>,
}

impl SettleOutcome {
    pub fn into_events(self) -> Vec<Event> {
        let mut events = vec![Event::BreakTaskSettled { task: self.task }];
        events.extend(self.severity_change);
        events
    }
}

pub struct Monitor {
    clock: Arc<dyn Clock>,
    engine: FatigueEngine,
    activity: ActivityMachine,
    classifier: ContextClassifier,
    policy: InterventionPolicy,
    forecast: ForecastService,
    breaks: BreakOrchestrator,
    classification: Option<Classification>,
    foreground_process: Option<String>,
    usage: BTreeMap<(NaiveDate, String, WorkloadCategory), u64>,
}

impl Monitor {
    /// Wire every collaborator from `config`. `user_clusters` are layered
    /// after the built-in presets.
    pub fn new(config: &Config, user_clusters: Vec<Cluster>, clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            engine: FatigueEngine::new(config.fatigue, config.severity),
            activity: ActivityMachine::new(config.activity),
            classifier: ContextClassifier::new(
                ClusterSet::with_presets(user_clusters),
                config.weights,
            ),
            policy: InterventionPolicy::new(config.intervention),
            forecast: ForecastService::new(config.forecast),
            breaks: BreakOrchestrator::new(config.breaks),
            classification: None,
            foreground_process: None,
            usage: BTreeMap::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn engine(&self) -> &FatigueEngine {
        &self.engine
    }

    pub fn activity(&self) -> &ActivityMachine {
        &self.activity
    }

    pub fn classifier(&self) -> &ContextClassifier {
        &self.classifier
    }

    pub fn policy(&self) -> &InterventionPolicy {
        &self.policy
    }

    pub fn breaks(&self) -> &BreakOrchestrator {
        &self.breaks
    }

    pub fn classification(&self) -> Option<&Classification> {
        self.classification.as_ref()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn forecast(&self) -> Forecast {
        self.forecast.peek(self.engine.value(), self.engine.slope())
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            at: self.clock.now(),
            value: self.engine.value(),
            slope: self.engine.slope(),
            severity: self.engine.severity(),
            load_weight: self.engine.load_weight(),
            activity: self.activity.state(),
            counters: self.activity.counters(),
            classification: self.classification.clone(),
            forecast: self.forecast(),
            pending_task: self.breaks.pending().cloned(),
            explanation: self.engine.last_explanation().cloned(),
        }
    }

    /// Value to hand to the snapshot store.
    pub fn fatigue_snapshot(&self) -> FatigueSnapshot {
        FatigueSnapshot::new(self.engine.value(), self.clock.now())
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Mutable access for cluster edits.
    pub fn classifier_mut(&mut self) -> &mut ContextClassifier {
        &mut self.classifier
    }

    pub fn reset_cooldowns(&mut self) {
        self.policy.reset_cooldowns();
    }

    /// Seed state at startup. The snapshot is honoured only when it was
    /// taken on today's local date.
    pub fn restore(&mut self, snapshot: Option<&FatigueSnapshot>, today_usage_seconds: u64) -> Event {
        let now = self.clock.now();
        let today = self.clock.today();

        let from_snapshot = match snapshot {
            Some(s) if s.date() == today => {
                self.engine.restore(s.value);
                true
            }
            Some(s) => {
                tracing::info!(snapshot_date = %s.date(), %today, "ignoring snapshot from another day");
                self.engine.reset();
                false
            }
            None => {
                self.engine.reset();
                false
            }
        };
        self.activity.seed_today_active(today_usage_seconds, today);

        tracing::info!(
            value = self.engine.value(),
            from_snapshot,
            today_usage_seconds,
            "fatigue restored"
        );
        Event::FatigueRestored {
            value: self.engine.value(),
            from_snapshot,
            at: now,
        }
    }

    /// Advance one second.
    pub fn tick(&mut self, sample: &TickSample) -> Vec<Event> {
        let now = self.clock.now();
        let today = self.clock.today();
        let mut events = Vec::new();

        if let Some(ctx) = &sample.foreground {
            let classification = self.classifier.classify(ctx);
            self.engine.set_load_weight(classification.load_weight);
            self.foreground_process = Some(ctx.normalized_process());
            self.classification = Some(classification);
        }

        let before_value = self.engine.value();
        let before_severity = self.engine.severity();

        let reading = ActivityReading::new(sample.idle_seconds, sample.audio_playing);
        let step = self.activity.step(reading, &mut self.engine, today);
        if let (true, Some(from)) = (step.changed(), step.previous) {
            events.push(Event::ActivityChanged {
                from,
                to: step.state,
                at: now,
            });
        }

        let value = self.engine.value();
        let severity = self.engine.severity();
        if severity != before_severity {
            tracing::debug!(from = ?before_severity, to = ?severity, value, "severity changed");
            events.push(Event::SeverityChanged {
                from: before_severity,
                to: severity,
                value,
                at: now,
            });
        }

        let threshold = self.forecast.config().high_efficiency_threshold;
        if before_value < threshold && value >= threshold {
            events.push(Event::ThresholdReached { value, at: now });
        }
        self.forecast.update(value, self.engine.slope(), TICK_SECS);

        if step.state.is_engaged() {
            self.tally_usage(today);
            let session = self.activity.counters().current_session_seconds;
            if let Some(task) = self.breaks.check_triggers(session, severity, value, now) {
                events.push(Event::BreakTaskCreated { task });
            }
        }

        events
    }

    /// Ask the policy what to show now.
    pub fn evaluate_intervention(&mut self) -> InterventionOutcome {
        let now = self.clock.now();
        let value = self.engine.value();
        let category = self
            .classification
            .as_ref()
            .map_or(WorkloadCategory::Other, |c| c.category);

        let record = self.policy.evaluate(value, category, now);
        let break_task = if record.level == InterventionLevel::Intervention {
            self.breaks
                .generate_task(BreakTaskType::Stretch, TriggerReason::Intervention, value, now)
        } else {
            None
        };

        InterventionOutcome { record, break_task }
    }

    /// User-requested break. `None` while another task is pending.
    pub fn request_break(&mut self, task_type: BreakTaskType) -> Option<BreakTaskRecord> {
        let now = self.clock.now();
        self.breaks
            .generate_task(task_type, TriggerReason::Manual, self.engine.value(), now)
    }

    /// Settle the pending task. Any settlement starts a fresh work session.
    pub fn settle_break_task(
        &mut self,
        task_id: &str,
        result: BreakTaskResult,
    ) -> Option<SettleOutcome> {
        let now = self.clock.now();
        let before = self.engine.severity();
        let task = self
            .breaks
            .settle_task(task_id, result, &mut self.engine, now)?;
        self.activity.reset_session();

        let after = self.engine.severity();
        let severity_change = (after != before).then(|| {
            tracing::debug!(from = ?before, to = ?after, "severity changed by recovery credit");
            Event::SeverityChanged {
                from: before,
                to: after,
                value: self.engine.value(),
                at: now,
            }
        });
        Some(SettleOutcome {
            task,
            severity_change,
        })
    }

    /// Drain usage accumulated since the last call.
    pub fn take_usage(&mut self) -> Vec<UsageRecord> {
        std::mem::take(&mut self.usage)
            .into_iter()
            .map(|((date, process_name, category), seconds)| UsageRecord {
                date,
                process_name,
                category,
                seconds,
            })
            .collect()
    }

    fn tally_usage(&mut self, today: NaiveDate) {
        let process = self
            .foreground_process
            .clone()
            .unwrap_or_else(|| "unknown".to_string());
        let category = self
            .classification
            .as_ref()
            .map_or(WorkloadCategory::Other, |c| c.category);
        *self.usage.entry((today, process, category)).or_insert(0) += 1;
    }
}
