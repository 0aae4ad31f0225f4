use serde::{Deserialize, Serialize};

/// Why the fatigue value moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    ActiveWork,
    MediaConsumption,
    IdleRecovery,
    AwayRecovery,
    BreakCredit,
    Restore,
}

impl ReasonCode {
    pub fn describe(self) -> &'static str {
        match self {
            ReasonCode::ActiveWork => "active input",
            ReasonCode::MediaConsumption => "passive media consumption",
            ReasonCode::IdleRecovery => "idle recovery",
            ReasonCode::AwayRecovery => "away from device, double-rate recovery",
            ReasonCode::BreakCredit => "break task recovery credit",
            ReasonCode::Restore => "restored from snapshot",
        }
    }
}

/// Observability record for the most recent mutation. Not engine state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatigueExplanation {
    /// Per-minute rate of the base curve before load weighting.
    pub base_contribution: f64,
    /// Load weight (or recovery multiplier) that scaled the base curve.
    pub load_weight: f64,
    /// Direct subtraction bypassing the curve.
    pub recovery_credit: f64,
    /// Signed change actually applied after clamping.
    pub delta: f64,
    pub value_after: f64,
    pub reason: ReasonCode,
    pub reason_text: String,
}

impl FatigueExplanation {
    pub(crate) fn new(reason: ReasonCode, reason_text: Option<&str>) -> Self {
        Self {
            base_contribution: 0.0,
            load_weight: 0.0,
            recovery_credit: 0.0,
            delta: 0.0,
            value_after: 0.0,
            reason,
            reason_text: reason_text
                .map(str::to_string)
                .unwrap_or_else(|| reason.describe().to_string()),
        }
    }
}
