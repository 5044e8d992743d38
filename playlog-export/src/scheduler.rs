//! Conversion scheduler
//!
//! Decides which source files to convert and when. Batch mode converts every
//! file once; periodic mode converts the newest file on every tick until
//! cancelled.
//!
//! Periodic state machine: `Idle → Selecting → Converting → Idle`. The tick
//! loop awaits each conversion before polling the timer again, so two ticks
//! never run at once; ticks that fall due during a slow conversion are skipped.

use crate::converter::{ConversionReport, FileConverter};
use crate::scanner::{select_latest, SourceScanner};
use chrono::Local;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Longest accepted periodic interval
pub const MAX_INTERVAL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// How the process schedules conversions, fixed at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Convert every source file once
    Batch,
    /// Convert the newest source file every `interval`
    Periodic { interval: Duration },
}

/// Totals for one batch pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub reports: Vec<ConversionReport>,
    /// Files whose conversion job failed
    pub failed: usize,
}

/// Drives conversions from a source directory
#[derive(Debug)]
pub struct Scheduler {
    source_dir: PathBuf,
    scanner: SourceScanner,
    converter: FileConverter,
}

impl Scheduler {
    pub fn new(source_dir: impl Into<PathBuf>, converter: FileConverter) -> Self {
        Self {
            source_dir: source_dir.into(),
            scanner: SourceScanner::default(),
            converter,
        }
    }

    /// Convert every source file in enumeration order
    ///
    /// Job failures are logged and counted; the pass always runs to the end.
    pub fn run_batch(&self) -> BatchSummary {
        let mut summary = BatchSummary::default();

        let files = match self.scanner.scan(&self.source_dir) {
            Ok(files) => files,
            Err(e) => {
                error!("ERROR: {}", e);
                return summary;
            }
        };

        for file in &files {
            match self.converter.convert(&file.path) {
                Ok(report) => summary.reports.push(report),
                Err(e) => {
                    error!("ERROR: {}", e);
                    summary.failed += 1;
                }
            }
        }

        info!("Conversion complete.");
        summary
    }

    /// One periodic tick: convert only the most recently modified file
    ///
    /// Returns `None` when nothing was converted (empty directory, scan
    /// failure or job failure; failures are logged).
    pub fn run_tick(&self) -> Option<ConversionReport> {
        let files = match self.scanner.scan(&self.source_dir) {
            Ok(files) => files,
            Err(e) => {
                error!("ERROR: {}", e);
                return None;
            }
        };

        let Some(latest) = select_latest(&files) else {
            debug!("No source files in {}", self.source_dir.display());
            return None;
        };

        match self.converter.convert(&latest.path) {
            Ok(report) => Some(report),
            Err(e) => {
                error!("ERROR: {}", e);
                None
            }
        }
    }

    /// Spawn the periodic loop; the first tick fires one interval from now
    pub fn spawn_periodic(self: Arc<Self>, interval: Duration) -> PeriodicHandle {
        let cancel = CancellationToken::new();
        let task = tokio::spawn(self.run_periodic(interval, cancel.clone()));
        log_next_run(interval);
        PeriodicHandle { cancel, task }
    }

    /// Periodic loop; returns once `cancel` fires
    ///
    /// A tick already converting finishes before cancellation is observed.
    pub async fn run_periodic(self: Arc<Self>, interval: Duration, cancel: CancellationToken) {
        let tick = move || {
            self.run_tick();
        };
        drive_ticks(interval, cancel, Arc::new(tick)).await;
    }
}

/// Run `tick` on the blocking pool every `interval` until `cancel` fires
///
/// Each tick is awaited before the timer is polled again.
async fn drive_ticks<F>(interval: Duration, cancel: CancellationToken, tick: Arc<F>)
where
    F: Fn() + Send + Sync + 'static,
{
    if interval.is_zero() || interval > MAX_INTERVAL {
        error!("Interval {:?} is out of range; periodic conversion not started", interval);
        return;
    }
    let Some(start) = Instant::now().checked_add(interval) else {
        error!("Interval {:?} is out of range; periodic conversion not started", interval);
        return;
    };

    let mut timer = interval_at(start, interval);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("Periodic conversion stopped");
                return;
            }
            _ = timer.tick() => {}
        }

        let started = Instant::now();
        let job = Arc::clone(&tick);
        if let Err(e) = tokio::task::spawn_blocking(move || job()).await {
            error!("ERROR: conversion task failed: {}", e);
        }

        let elapsed = started.elapsed();
        if elapsed > interval {
            warn!(
                "Conversion took {:?}, longer than the {:?} interval; missed ticks skipped",
                elapsed, interval
            );
        }

        log_next_run(interval);
    }
}

/// Running periodic loop
pub struct PeriodicHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl PeriodicHandle {
    /// Cancel the loop and wait for it to exit
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            error!("Periodic conversion task ended abnormally: {}", e);
        }
    }
}

fn log_next_run(interval: Duration) {
    let next = chrono::Duration::from_std(interval)
        .ok()
        .and_then(|d| Local::now().checked_add_signed(d));
    if let Some(next) = next {
        info!("Running next conversion at {}", format_short_clock(&next));
    }
}

/// `h:mmAM` wall-clock form used in scheduling messages
pub fn format_short_clock<Tz: chrono::TimeZone>(time: &chrono::DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format("%-I:%M%p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_format_short_clock() {
        let morning = NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap()
            .and_utc();
        assert_eq!(format_short_clock(&morning), "9:05AM");

        let evening = morning + chrono::Duration::hours(12);
        assert_eq!(format_short_clock(&evening), "9:05PM");
    }

    #[test]
    fn test_format_short_clock_midnight() {
        let midnight = Utc::now()
            .date_naive()
            .and_hms_opt(0, 30, 0)
            .unwrap()
            .and_utc();
        assert_eq!(format_short_clock(&midnight), "12:30AM");
    }

    #[tokio::test]
    async fn test_slow_ticks_never_overlap_or_pile_up() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_in_flight = Arc::new(AtomicUsize::new(0));
        let calls = Arc::new(AtomicUsize::new(0));

        let tick = {
            let in_flight = Arc::clone(&in_flight);
            let max_in_flight = Arc::clone(&max_in_flight);
            let calls = Arc::clone(&calls);
            move || {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                max_in_flight.fetch_max(now, Ordering::SeqCst);
                calls.fetch_add(1, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(120));
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }
        };

        let cancel = CancellationToken::new();
        let started = std::time::Instant::now();
        let task = tokio::spawn(drive_ticks(
            Duration::from_millis(20),
            cancel.clone(),
            Arc::new(tick),
        ));

        tokio::time::sleep(Duration::from_millis(600)).await;
        cancel.cancel();
        task.await.unwrap();
        let elapsed = started.elapsed();

        let calls = calls.load(Ordering::SeqCst);
        assert_eq!(max_in_flight.load(Ordering::SeqCst), 1);
        assert_eq!(in_flight.load(Ordering::SeqCst), 0);
        assert!(calls >= 1);
        // Every tick runs for 120ms, so skipped ticks must not be replayed
        let ceiling = (elapsed.as_millis() / 120) as usize + 1;
        assert!(calls <= ceiling, "{} ticks in {:?}", calls, elapsed);
    }

    #[tokio::test]
    async fn test_out_of_range_interval_returns_without_ticking() {
        let calls = Arc::new(AtomicUsize::new(0));
        let tick = {
            let calls = Arc::clone(&calls);
            move || {
                calls.fetch_add(1, Ordering::SeqCst);
            }
        };
        let tick = Arc::new(tick);

        for interval in [Duration::MAX, MAX_INTERVAL + Duration::from_secs(1), Duration::ZERO] {
            let finished = tokio::time::timeout(
                Duration::from_secs(1),
                drive_ticks(interval, CancellationToken::new(), Arc::clone(&tick)),
            )
            .await;
            assert!(finished.is_ok(), "loop kept running for {:?}", interval);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
