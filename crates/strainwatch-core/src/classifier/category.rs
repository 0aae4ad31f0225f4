use serde::{Deserialize, Serialize};

/// Weight applied when a category has no configured weight.
pub const UNMAPPED_LOAD_WEIGHT: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadCategory {
    Work,
    Entertainment,
    Communication,
    #[default]
    Other,
}

impl WorkloadCategory {
    pub const ALL: [WorkloadCategory; 4] = [
        WorkloadCategory::Work,
        WorkloadCategory::Entertainment,
        WorkloadCategory::Communication,
        WorkloadCategory::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WorkloadCategory::Work => "work",
            WorkloadCategory::Entertainment => "entertainment",
            WorkloadCategory::Communication => "communication",
            WorkloadCategory::Other => "other",
        }
    }

    /// Parse a stored or user-supplied name. Unknown names map to `Other`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "work" => WorkloadCategory::Work,
            "entertainment" => WorkloadCategory::Entertainment,
            "communication" => WorkloadCategory::Communication,
            _ => WorkloadCategory::Other,
        }
    }
}

impl std::fmt::Display for WorkloadCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-category load weights. A missing entry falls back to
/// [`UNMAPPED_LOAD_WEIGHT`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entertainment: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub communication: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other: Option<f64>,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            work: Some(1.0),
            entertainment: Some(0.3),
            communication: Some(0.7),
            other: Some(0.6),
        }
    }
}

impl CategoryWeights {
    pub fn weight_for(&self, category: WorkloadCategory) -> f64 {
        let configured = match category {
            WorkloadCategory::Work => self.work,
            WorkloadCategory::Entertainment => self.entertainment,
            WorkloadCategory::Communication => self.communication,
            WorkloadCategory::Other => self.other,
        };
        configured
            .filter(|w| w.is_finite() && *w >= 0.0)
            .unwrap_or(UNMAPPED_LOAD_WEIGHT)
    }
}
