//! Embeds a build identifier for the startup banner
//!
//! `PLAYLOG_BUILD_ID` is `<commit>` or `<commit>-dirty`, plus the UTC build
//! time. `SOURCE_DATE_EPOCH` pins the time for reproducible packages.

use chrono::{DateTime, Utc};
use std::process::Command;

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
}

fn build_time() -> DateTime<Utc> {
    std::env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|secs| secs.parse::<i64>().ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or_else(Utc::now)
}

fn main() {
    let commit = match git(&["rev-parse", "--short=8", "HEAD"]) {
        Some(hash) => {
            let dirty = git(&["status", "--porcelain", "--untracked-files=no"])
                .is_some_and(|status| !status.is_empty());
            if dirty {
                format!("{}-dirty", hash)
            } else {
                hash
            }
        }
        None => "unknown".to_string(),
    };

    println!(
        "cargo:rustc-env=PLAYLOG_BUILD_ID={} {}",
        commit,
        build_time().format("%Y-%m-%d %H:%M UTC")
    );
}
