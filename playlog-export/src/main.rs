//! playlog-export - Play-log to playout XML exporter
//!
//! Batch mode converts every CSV in the source directory once. Periodic mode
//! converts the newest CSV every interval until Ctrl+C or SIGTERM.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use playlog_export::config::{Args, RunSettings};
use playlog_export::{FileConverter, RunMode, Scheduler};

#[tokio::main]
async fn main() -> Result<()> {
    // Prints usage and exits on a malformed invocation
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "playlog_export=info,playlog_common=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting playlog-export v{} ({}, {} build)",
        env!("CARGO_PKG_VERSION"),
        env!("PLAYLOG_BUILD_ID"),
        if cfg!(debug_assertions) { "debug" } else { "release" }
    );

    let settings = RunSettings::from(args);
    info!("Source folder: {}", settings.source_dir.display());
    info!("Destination folder: {}", settings.converter.dest_dir.display());
    info!("Play time offset: {}ms", settings.converter.offset_ms);

    let scheduler = Arc::new(Scheduler::new(
        settings.source_dir.clone(),
        FileConverter::new(settings.converter.clone()),
    ));

    match settings.mode {
        RunMode::Batch => {
            let batch = Arc::clone(&scheduler);
            let summary = tokio::task::spawn_blocking(move || batch.run_batch())
                .await
                .context("Batch conversion task failed")?;
            info!(
                "{} files converted, {} failed",
                summary.reports.len(),
                summary.failed
            );

            if settings.wait_after_batch {
                shutdown_signal().await;
            }
        }
        RunMode::Periodic { interval } => {
            let handle = scheduler.spawn_periodic(interval);
            shutdown_signal().await;
            handle.shutdown().await;
        }
    }

    info!("Shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
