//! End-to-end test: task activity forwarded into JSONL file output

use chrono::Utc;
use fleet_activity::{ActivitySink, Log};
use fleet_core::Booking;
use fleet_logging::{
    ACTIVITY_TARGET, FileConfig, FleetSubscriberBuilder, LogConfig, RotationStrategy,
    TaskContextGuard,
};

#[test]
fn test_activity_lands_in_jsonl_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = LogConfig {
        default_level: "info".to_string(),
        ..LogConfig::testing()
    };

    let (subscriber, guard) = FleetSubscriberBuilder::new()
        .with_config(config)
        .with_console(false)
        .with_file_output(FileConfig {
            directory: dir.path().to_path_buf(),
            prefix: "activity".to_string(),
            rotation: RotationStrategy::Never,
        })
        .build()
        .unwrap();
    assert!(guard.is_some());

    let log = Log::new();
    log.info("Going to pick up");
    log.warn("Door slow to open");

    let booking = Booking::new("delivery-42", Utc::now(), None, false);
    let mut sink = ActivitySink::new("robot-1");

    let (forwarded, instance_id) = tracing::subscriber::with_default(subscriber, || {
        let task = TaskContextGuard::new(&booking);
        let _span = task.span().entered();
        (sink.drain(&log.view()), task.data().instance_id)
    });
    assert_eq!(forwarded, 2);

    // Flush the non-blocking writer
    drop(guard);

    let lines = read_lines(&dir.path().join("activity.log"));

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["level"], "INFO");
    assert_eq!(lines[0]["message"], "Going to pick up");
    assert_eq!(lines[0]["sink"], "robot-1");
    assert_eq!(lines[0]["target"], ACTIVITY_TARGET);
    assert_eq!(lines[1]["level"], "WARN");
    for line in &lines {
        assert_eq!(line["span"]["name"], "task");
        assert_eq!(line["span"]["task_id"], "delivery-42");
        assert_eq!(line["span"]["instance_id"], instance_id.to_string());
    }
}

fn read_lines(path: &std::path::Path) -> Vec<serde_json::Value> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_activity_level_overrides_default_level() {
    let dir = tempfile::tempdir().unwrap();
    let config = LogConfig {
        default_level: "warn".to_string(),
        activity_level: Some("info".to_string()),
        ..LogConfig::testing()
    };

    let (subscriber, guard) = FleetSubscriberBuilder::new()
        .with_config(config)
        .with_console(false)
        .with_file_output(FileConfig {
            directory: dir.path().to_path_buf(),
            prefix: "filtered".to_string(),
            rotation: RotationStrategy::Never,
        })
        .build()
        .unwrap();

    let log = Log::new();
    log.info("Arrived at dock");
    let mut sink = ActivitySink::new("robot-2");

    tracing::subscriber::with_default(subscriber, || {
        tracing::info!("Planner tick");
        sink.drain(&log.view());
    });
    drop(guard);

    let lines = read_lines(&dir.path().join("filtered.log"));
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["message"], "Arrived at dock");
    assert_eq!(lines[0]["sink"], "robot-2");
}
