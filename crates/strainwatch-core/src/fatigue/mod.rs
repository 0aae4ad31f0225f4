//! Fatigue estimation: the accumulation/recovery curve, its slope and the
//! severity bucket derived from it.

mod engine;
mod explanation;
mod severity;

pub use engine::{FatigueConfig, FatigueEngine, SLOPE_WINDOW};
pub use explanation::{FatigueExplanation, ReasonCode};
pub use severity::{Severity, SeverityThresholds};
