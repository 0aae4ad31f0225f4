//! Discrete severity buckets derived from the fatigue value.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Fresh,
    Strained,
    Overloaded,
    Grind,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Fresh => "fresh",
            Severity::Strained => "strained",
            Severity::Overloaded => "overloaded",
            Severity::Grind => "grind",
        }
    }
}

/// Lower bounds (inclusive) of each non-Fresh bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityThresholds {
    #[serde(default = "default_strained")]
    pub strained: f64,
    #[serde(default = "default_overloaded")]
    pub overloaded: f64,
    #[serde(default = "default_grind")]
    pub grind: f64,
}

fn default_strained() -> f64 {
    30.0
}
fn default_overloaded() -> f64 {
    60.0
}
fn default_grind() -> f64 {
    85.0
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            strained: default_strained(),
            overloaded: default_overloaded(),
            grind: default_grind(),
        }
    }
}

impl SeverityThresholds {
    /// Clamp into [0,100] and force ascending order.
    pub fn sanitized(self) -> Self {
        let strained = clamp_pct(self.strained);
        let overloaded = clamp_pct(self.overloaded).max(strained);
        let grind = clamp_pct(self.grind).max(overloaded);
        Self {
            strained,
            overloaded,
            grind,
        }
    }

    /// Pure step function; no hysteresis.
    pub fn classify(&self, value: f64) -> Severity {
        if value >= self.grind {
            Severity::Grind
        } else if value >= self.overloaded {
            Severity::Overloaded
        } else if value >= self.strained {
            Severity::Strained
        } else {
            Severity::Fresh
        }
    }
}

fn clamp_pct(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 100.0)
    }
}
