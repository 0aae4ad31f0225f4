//! Integration tests for the on-disk store and the background writer.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use strainwatch_core::storage::{Config, Database, FatigueStore, PersistenceWriter};
use strainwatch_core::{
    BreakTaskResult, BreakTaskType, Clock, Cluster, ForegroundContext, ManualClock, Monitor,
    TickSample, WorkloadCategory,
};

#[test]
fn test_monitor_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("strainwatch.db");
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap(),
    ));

    // First run: work for five minutes, take a break, persist everything.
    let value_at_shutdown = {
        let writer = PersistenceWriter::spawn(Database::open_at(&db_path).unwrap()).unwrap();
        let mut monitor = Monitor::new(&Config::default(), Vec::new(), clock.clone());
        monitor.restore(None, 0);

        let sample = TickSample::new(0.0, false)
            .with_foreground(ForegroundContext::new("code", "main.rs"));
        for _ in 0..300 {
            monitor.tick(&sample);
            clock.advance_secs(1);
        }
        let task = monitor.request_break(BreakTaskType::Eye).unwrap();
        writer.save_break_task(task.clone());
        let settled = monitor
            .settle_break_task(&task.id, BreakTaskResult::Completed)
            .unwrap();
        writer.save_break_task(settled.task);

        for record in monitor.take_usage() {
            writer.add_usage(record);
        }
        writer.save_snapshot(monitor.fatigue_snapshot());
        writer.shutdown();
        monitor.engine().value()
    };

    // Second run, same day.
    clock.advance_secs(600);
    let db = Database::open_at(&db_path).unwrap();
    let snapshot = db.load_latest_snapshot().unwrap();
    let usage = db.load_usage_seconds(clock.today()).unwrap();
    assert_eq!(usage, 300);

    let mut monitor = Monitor::new(&Config::default(), db.list_clusters().unwrap(), clock.clone());
    monitor.restore(snapshot.as_ref(), usage);
    assert!((monitor.engine().value() - value_at_shutdown).abs() < 1e-12);
    assert_eq!(monitor.activity().counters().today_active_seconds, 300);

    let tasks = db.list_break_tasks(10).unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].result, BreakTaskResult::Completed);
    assert!(tasks[0].recovery_credit > 3.0);
}

#[test]
fn test_stale_snapshot_is_not_restored() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open_at(dir.path().join("strainwatch.db")).unwrap();
    let now = Utc.with_ymd_and_hms(2026, 3, 5, 12, 0, 0).unwrap();
    db.save_snapshot(&strainwatch_core::FatigueSnapshot::new(70.0, now - Duration::days(1)))
        .unwrap();

    let clock = Arc::new(ManualClock::new(now));
    let mut monitor = Monitor::new(&Config::default(), Vec::new(), clock);
    monitor.restore(db.load_latest_snapshot().unwrap().as_ref(), 0);
    assert_eq!(monitor.engine().value(), 0.0);
}

#[test]
fn test_user_clusters_from_store_override_builtin() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open_at(dir.path().join("strainwatch.db")).unwrap();
    let cluster = Cluster::user("Deep reading", 1.3, "#224488")
        .with_keywords(["arxiv"])
        .with_category(WorkloadCategory::Work);
    db.upsert_cluster(&cluster).unwrap();

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let mut monitor = Monitor::new(&Config::default(), db.list_clusters().unwrap(), clock);
    monitor.tick(
        &TickSample::new(0.0, false)
            .with_foreground(ForegroundContext::new("firefox", "arXiv listing").with_url("https://arxiv.org/list")),
    );

    let classification = monitor.classification().unwrap();
    assert_eq!(classification.category, WorkloadCategory::Work);
    assert_eq!(classification.load_weight, 1.3);
    assert_eq!(
        classification.cluster.as_ref().map(|c| c.name.as_str()),
        Some("Deep reading")
    );
}

#[test]
fn test_user_cluster_wins_over_preset_process() {
    let db = Database::open_memory().unwrap();
    let editor = Cluster::user("Heavy editor", 1.5, "#aa3300")
        .with_processes(["code"])
        .with_category(WorkloadCategory::Work);
    db.upsert_cluster(&editor).unwrap();

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let mut monitor = Monitor::new(&Config::default(), db.list_clusters().unwrap(), clock);
    monitor.tick(
        &TickSample::new(0.0, false).with_foreground(ForegroundContext::new("Code.exe", "lib.rs")),
    );

    let classification = monitor.classification().unwrap();
    assert_eq!(classification.load_weight, 1.5);
    assert_eq!(
        classification.cluster.as_ref().map(|c| c.name.as_str()),
        Some("Heavy editor")
    );
}

#[test]
fn test_config_file_drives_monitor() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let mut config = Config::load_from(&path).unwrap();
    config.set("fatigue.base_increase_per_minute", "2").unwrap();
    config.save_to(&path).unwrap();

    let config = Config::load_from(&path).unwrap();
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let mut monitor = Monitor::new(&config, Vec::new(), clock.clone());
    for _ in 0..60 {
        monitor.tick(&TickSample::new(0.0, false));
        clock.advance_secs(1);
    }
    let value = monitor.engine().value();
    assert!(value > 2.0 && value < 4.0, "value {value}");
}
