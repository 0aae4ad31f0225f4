//! Recovery micro-tasks: creation, settlement and recovery credits.

mod orchestrator;
mod task;

pub use orchestrator::{BreakConfig, BreakOrchestrator, HISTORY_CAPACITY};
pub use task::{BreakTaskRecord, BreakTaskResult, BreakTaskType, TriggerReason};
