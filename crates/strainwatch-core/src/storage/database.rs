//! SQLite-backed store.
//!
//! Provides persistent storage for:
//! - Fatigue snapshots (latest one is restored at start of day)
//! - Per-day usage totals by process and category
//! - User clusters
//! - Break-task history

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::data_dir;
use super::store::{FatigueSnapshot, FatigueStore, UsageRecord};
use crate::breaks::{BreakTaskRecord, BreakTaskResult, BreakTaskType, TriggerReason};
use crate::classifier::{Cluster, WorkloadCategory};
use crate::error::{CoreError, DatabaseError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/strainwatch.db`.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created or the
    /// database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(data_dir()?.join("strainwatch.db"))
    }

    pub fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests and dry runs).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS fatigue_snapshots (
                    id          INTEGER PRIMARY KEY AUTOINCREMENT,
                    value       REAL NOT NULL,
                    recorded_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS usage_records (
                    date         TEXT NOT NULL,
                    process_name TEXT NOT NULL,
                    category     TEXT NOT NULL,
                    seconds      INTEGER NOT NULL DEFAULT 0,
                    PRIMARY KEY (date, process_name, category)
                );

                CREATE TABLE IF NOT EXISTS clusters (
                    id            TEXT PRIMARY KEY,
                    position      INTEGER NOT NULL,
                    name          TEXT NOT NULL,
                    process_names TEXT NOT NULL DEFAULT '[]',
                    keywords      TEXT NOT NULL DEFAULT '[]',
                    load_weight   REAL NOT NULL,
                    color         TEXT NOT NULL,
                    category      TEXT NOT NULL DEFAULT 'other'
                );

                CREATE TABLE IF NOT EXISTS break_tasks (
                    id                 TEXT PRIMARY KEY,
                    created_at         TEXT NOT NULL,
                    task_type          TEXT NOT NULL,
                    duration_seconds   INTEGER NOT NULL,
                    trigger_reason     TEXT NOT NULL,
                    completed_at       TEXT,
                    result             TEXT NOT NULL,
                    recovery_credit    REAL NOT NULL DEFAULT 0,
                    fatigue_at_trigger REAL NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_snapshots_recorded_at ON fatigue_snapshots(recorded_at);
                CREATE INDEX IF NOT EXISTS idx_break_tasks_created_at ON break_tasks(created_at);",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    /// Usage rows for one day, largest first.
    pub fn usage_for(&self, date: NaiveDate) -> Result<Vec<UsageRecord>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT date, process_name, category, seconds FROM usage_records
                 WHERE date = ?1 ORDER BY seconds DESC, process_name",
            )
            .map_err(DatabaseError::from)?;
        let rows = stmt
            .query_map(params![date.format(DATE_FORMAT).to_string()], |row| {
                Ok(UsageRecord {
                    date: parse_date(row, 0)?,
                    process_name: row.get(1)?,
                    category: WorkloadCategory::parse(&row.get::<_, String>(2)?),
                    seconds: row.get::<_, i64>(3)?.max(0) as u64,
                })
            })
            .map_err(DatabaseError::from)?;
        collect(rows)
    }
}

impl FatigueStore for Database {
    fn load_latest_snapshot(&self) -> Result<Option<FatigueSnapshot>> {
        let snapshot = self
            .conn
            .query_row(
                "SELECT value, recorded_at FROM fatigue_snapshots
                 ORDER BY recorded_at DESC, id DESC LIMIT 1",
                [],
                |row| {
                    Ok(FatigueSnapshot {
                        value: row.get(0)?,
                        recorded_at: parse_ts(row, 1)?,
                    })
                },
            )
            .optional()
            .map_err(DatabaseError::from)?;
        Ok(snapshot)
    }

    fn save_snapshot(&self, snapshot: &FatigueSnapshot) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO fatigue_snapshots (value, recorded_at) VALUES (?1, ?2)",
                params![snapshot.value, snapshot.recorded_at.to_rfc3339()],
            )
            .map_err(DatabaseError::from)?;
        Ok(())
    }

    fn load_usage_seconds(&self, date: NaiveDate) -> Result<u64> {
        let total: i64 = self
            .conn
            .query_row(
                "SELECT COALESCE(SUM(seconds), 0) FROM usage_records WHERE date = ?1",
                params![date.format(DATE_FORMAT).to_string()],
                |row| row.get(0),
            )
            .map_err(DatabaseError::from)?;
        Ok(total.max(0) as u64)
    }

    fn add_usage(&self, record: &UsageRecord) -> Result<()> {
        if record.seconds == 0 {
            return Ok(());
        }
        self.conn
            .execute(
                "INSERT INTO usage_records (date, process_name, category, seconds)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(date, process_name, category)
                 DO UPDATE SET seconds = seconds + excluded.seconds",
                params![
                    record.date.format(DATE_FORMAT).to_string(),
                    record.process_name,
                    record.category.as_str(),
                    i64::try_from(record.seconds).unwrap_or(i64::MAX),
                ],
            )
            .map_err(DatabaseError::from)?;
        Ok(())
    }

    fn list_clusters(&self) -> Result<Vec<Cluster>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, name, process_names, keywords, load_weight, color, category
                 FROM clusters ORDER BY position, id",
            )
            .map_err(DatabaseError::from)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Cluster {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    process_names: parse_json_list(row, 2)?,
                    keywords: parse_json_list(row, 3)?,
                    load_weight: row.get(4)?,
                    color: row.get(5)?,
                    category: WorkloadCategory::parse(&row.get::<_, String>(6)?),
                    is_preset: false,
                })
            })
            .map_err(DatabaseError::from)?;
        collect(rows)
    }

    fn upsert_cluster(&self, cluster: &Cluster) -> Result<()> {
        if cluster.is_preset {
            return Err(CoreError::Custom(format!(
                "cluster '{}' is a system preset and cannot be stored",
                cluster.id
            )));
        }
        self.conn
            .execute(
                "INSERT INTO clusters (id, position, name, process_names, keywords, load_weight, color, category)
                 VALUES (
                    ?1,
                    COALESCE((SELECT position FROM clusters WHERE id = ?1),
                             (SELECT COALESCE(MAX(position), 0) + 1 FROM clusters)),
                    ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    process_names = excluded.process_names,
                    keywords = excluded.keywords,
                    load_weight = excluded.load_weight,
                    color = excluded.color,
                    category = excluded.category",
                params![
                    cluster.id,
                    cluster.name,
                    serde_json::to_string(&cluster.process_names)?,
                    serde_json::to_string(&cluster.keywords)?,
                    cluster.load_weight,
                    cluster.color,
                    cluster.category.as_str(),
                ],
            )
            .map_err(DatabaseError::from)?;
        Ok(())
    }

    fn delete_cluster(&self, id: &str) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM clusters WHERE id = ?1", params![id])
            .map_err(DatabaseError::from)?;
        Ok(changed > 0)
    }

    fn save_break_task(&self, task: &BreakTaskRecord) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO break_tasks
                    (id, created_at, task_type, duration_seconds, trigger_reason,
                     completed_at, result, recovery_credit, fatigue_at_trigger)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    task.id,
                    task.created_at.to_rfc3339(),
                    task.task_type.as_str(),
                    task.duration_seconds,
                    task.trigger_reason.as_str(),
                    task.completed_at.map(|t| t.to_rfc3339()),
                    task.result.as_str(),
                    task.recovery_credit,
                    task.fatigue_at_trigger,
                ],
            )
            .map_err(DatabaseError::from)?;
        Ok(())
    }

    fn list_break_tasks(&self, limit: usize) -> Result<Vec<BreakTaskRecord>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, created_at, task_type, duration_seconds, trigger_reason,
                        completed_at, result, recovery_credit, fatigue_at_trigger
                 FROM break_tasks ORDER BY created_at DESC, id LIMIT ?1",
            )
            .map_err(DatabaseError::from)?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map(params![limit], |row| {
                let task_type: String = row.get(2)?;
                let result: String = row.get(6)?;
                let completed_at: Option<String> = row.get(5)?;
                Ok(BreakTaskRecord {
                    id: row.get(0)?,
                    created_at: parse_ts(row, 1)?,
                    task_type: BreakTaskType::parse(&task_type)
                        .ok_or_else(|| conversion_error(2, format!("unknown task type '{task_type}'")))?,
                    duration_seconds: row.get(3)?,
                    trigger_reason: TriggerReason::parse(&row.get::<_, String>(4)?),
                    completed_at: completed_at
                        .map(|s| parse_rfc3339(5, &s))
                        .transpose()?,
                    result: BreakTaskResult::parse(&result)
                        .ok_or_else(|| conversion_error(6, format!("unknown result '{result}'")))?,
                    recovery_credit: row.get(7)?,
                    fatigue_at_trigger: row.get(8)?,
                })
            })
            .map_err(DatabaseError::from)?;
        collect(rows)
    }
}

fn collect<T>(
    rows: impl Iterator<Item = rusqlite::Result<T>>,
) -> Result<Vec<T>> {
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(DatabaseError::from)?);
    }
    Ok(out)
}

fn conversion_error(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, message.into())
}

fn parse_rfc3339(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_ts(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    parse_rfc3339(idx, &raw)
}

fn parse_date(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_json_list(row: &Row<'_>, idx: usize) -> rusqlite::Result<Vec<String>> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
