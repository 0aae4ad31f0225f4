//! # Strainwatch Core Library
//!
//! Estimates accumulated mental and visual fatigue from observed activity and
//! decides when to nudge, suggest or force a break. The CLI binary is a thin
//! layer over this crate.
//!
//! ## Architecture
//!
//! - **Monitor**: the tick driver. The caller invokes `tick()` once per second
//!   and receives the resulting [`Event`]s
//! - **Fatigue / Activity / Classifier**: the accumulation curve, the
//!   Active/Passive/Idle/Away machine and the workload classifier feeding it
//! - **Intervention / Forecast / Breaks**: everything derived from the curve
//! - **Storage**: SQLite-backed store, background writer and TOML configuration
//!
//! ## Key Components
//!
//! - [`Monitor`]: owns and wires every collaborator
//! - [`FatigueEngine`]: the fatigue scalar, slope and severity
//! - [`Database`]: snapshot, usage, cluster and break-task persistence
//! - [`Config`]: application configuration management

pub mod activity;
pub mod breaks;
pub mod classifier;
pub mod clock;
pub mod error;
pub mod events;
pub mod fatigue;
pub mod forecast;
pub mod intervention;
pub mod monitor;
pub mod storage;

pub use activity::{ActivityMachine, ActivityState, ActivityThresholds};
pub use breaks::{BreakOrchestrator, BreakTaskRecord, BreakTaskResult, BreakTaskType, TriggerReason};
pub use classifier::{Classification, Cluster, ContextClassifier, ForegroundContext, WorkloadCategory};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, DatabaseError};
pub use events::Event;
pub use fatigue::{FatigueEngine, Severity};
pub use forecast::{Forecast, ForecastService};
pub use intervention::{InterventionLevel, InterventionPolicy, InterventionRecord};
pub use monitor::{InterventionOutcome, Monitor, MonitorSnapshot, SettleOutcome, TickSample};
pub use storage::{Config, Database, FatigueSnapshot, FatigueStore, PersistenceWriter, UsageRecord};
