//! Contract between the core and its persistent store.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::breaks::BreakTaskRecord;
use crate::classifier::{Cluster, WorkloadCategory};
use crate::clock::local_date;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FatigueSnapshot {
    pub value: f64,
    pub recorded_at: DateTime<Utc>,
}

impl FatigueSnapshot {
    pub fn new(value: f64, recorded_at: DateTime<Utc>) -> Self {
        Self { value, recorded_at }
    }

    /// Local calendar date the snapshot belongs to.
    pub fn date(&self) -> NaiveDate {
        local_date(self.recorded_at)
    }
}

/// Engaged seconds attributed to one process on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub date: NaiveDate,
    pub process_name: String,
    pub category: WorkloadCategory,
    pub seconds: u64,
}

pub trait FatigueStore {
    fn load_latest_snapshot(&self) -> Result<Option<FatigueSnapshot>>;
    fn save_snapshot(&self, snapshot: &FatigueSnapshot) -> Result<()>;

    /// Total engaged seconds recorded for `date`.
    fn load_usage_seconds(&self, date: NaiveDate) -> Result<u64>;
    /// Add to the running total for `(date, process, category)`.
    fn add_usage(&self, record: &UsageRecord) -> Result<()>;

    /// User clusters in list order. Presets are not stored.
    fn list_clusters(&self) -> Result<Vec<Cluster>>;
    fn upsert_cluster(&self, cluster: &Cluster) -> Result<()>;
    fn delete_cluster(&self, id: &str) -> Result<bool>;

    /// Insert or replace by id.
    fn save_break_task(&self, task: &BreakTaskRecord) -> Result<()>;
    /// Newest first.
    fn list_break_tasks(&self, limit: usize) -> Result<Vec<BreakTaskRecord>>;
}
