//! Periodic scheduling tests
//!
//! Tick selection runs synchronously; the timer loop runs on a short real
//! interval and is stopped through its cancellation token.

use playlog_export::{ConverterConfig, FileConverter, Scheduler};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

const ROW: &str = "2024-03-07,06:00:00,,0,Blue Monday,New Order,07:29,Gold\n";

fn write_log(dir: &Path, name: &str, age_secs: u64) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, ROW).unwrap();
    File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(SystemTime::now() - Duration::from_secs(age_secs))
        .unwrap();
    path
}

fn scheduler(source: &Path, dest: &Path) -> Scheduler {
    Scheduler::new(source, FileConverter::new(ConverterConfig::new(dest, 0)))
}

#[test]
fn test_tick_converts_only_newest_file() {
    let source = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    write_log(source.path(), "monday.csv", 7200);
    write_log(source.path(), "tuesday.csv", 60);

    let report = scheduler(source.path(), dest.path()).run_tick().unwrap();

    assert!(report.source.ends_with("tuesday.csv"));
    assert!(dest.path().join("tuesday.xml").is_file());
    assert!(!dest.path().join("monday.xml").exists());
}

#[test]
fn test_tick_follows_modification_time_not_name() {
    let source = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    write_log(source.path(), "a.csv", 10);
    write_log(source.path(), "z.csv", 3600);

    let report = scheduler(source.path(), dest.path()).run_tick().unwrap();
    assert!(report.source.ends_with("a.csv"));
}

#[test]
fn test_tick_on_empty_directory_does_nothing() {
    let source = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    std::fs::write(source.path().join("notes.txt"), "x").unwrap();

    assert!(scheduler(source.path(), dest.path()).run_tick().is_none());
    assert_eq!(std::fs::read_dir(dest.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_periodic_loop_converts_and_stops() {
    let source = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    write_log(source.path(), "live.csv", 0);

    let sched = Arc::new(scheduler(source.path(), dest.path()));
    let handle = sched.spawn_periodic(Duration::from_millis(50));

    tokio::time::sleep(Duration::from_millis(400)).await;
    handle.shutdown().await;

    assert!(dest.path().join("live.xml").is_file());
}

#[tokio::test]
async fn test_cancel_before_first_tick_converts_nothing() {
    let source = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    write_log(source.path(), "live.csv", 0);

    let sched = Arc::new(scheduler(source.path(), dest.path()));
    let handle = sched.spawn_periodic(Duration::from_secs(3600));
    handle.shutdown().await;

    assert!(!dest.path().join("live.xml").exists());
}

#[tokio::test]
async fn test_failing_ticks_keep_loop_alive() {
    let source = tempfile::tempdir().unwrap();
    let root = tempfile::tempdir().unwrap();
    let dest = root.path().join("exports");
    write_log(source.path(), "live.csv", 0);

    let sched = Arc::new(scheduler(source.path(), &dest));
    let handle = sched.spawn_periodic(Duration::from_millis(50));

    // Destination missing: every tick fails
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!dest.join("live.xml").exists());

    std::fs::create_dir(&dest).unwrap();
    tokio::time::sleep(Duration::from_millis(400)).await;
    handle.shutdown().await;

    assert!(dest.join("live.xml").is_file());
}
