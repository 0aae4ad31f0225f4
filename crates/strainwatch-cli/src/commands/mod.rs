pub mod classify;
pub mod cluster;
pub mod config;
pub mod monitor;
pub mod simulate;
pub mod status;
pub mod tasks;

use strainwatch_core::storage::{Database, FatigueStore};
use strainwatch_core::{Clock, Config, Monitor};

/// Open the store and build a monitor restored from it.
pub(crate) fn restored_monitor(
    config: &Config,
    clock: std::sync::Arc<dyn Clock>,
) -> Result<(Database, Monitor), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut monitor = Monitor::new(config, db.list_clusters()?, clock.clone());
    let snapshot = db.load_latest_snapshot()?;
    let usage = db.load_usage_seconds(clock.today())?;
    monitor.restore(snapshot.as_ref(), usage);
    Ok((db, monitor))
}
