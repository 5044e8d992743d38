//! Command-line configuration
//!
//! Four positional arguments, in the order the station batch files pass them:
//! `<SOURCE_DIR> <DEST_DIR> <MODE> <OFFSET_MS>`. Optional flags also read
//! `PLAYLOG_*` environment variables. There is no config file.

use crate::converter::ConverterConfig;
use crate::scheduler::{RunMode, MAX_INTERVAL};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Literal MODE value selecting batch conversion
pub const BATCH_FLAG: &str = "-all";

/// Command-line arguments for playlog-export
#[derive(Parser, Debug)]
#[command(name = "playlog-export")]
#[command(about = "Convert broadcast play-log CSV files into playout XML exports")]
#[command(version)]
#[command(after_help = "\
Process all files once:  playlog-export <SOURCE_DIR> <DEST_DIR> -all <OFFSET_MS>
Run periodically:        playlog-export <SOURCE_DIR> <DEST_DIR> <INTERVAL_MINUTES> <OFFSET_MS>")]
pub struct Args {
    /// Directory containing play-log .csv files
    pub source_dir: PathBuf,

    /// Directory receiving the .xml exports
    pub dest_dir: PathBuf,

    /// `-all` for a single batch pass, or an interval in minutes
    #[arg(value_parser = parse_run_mode, allow_hyphen_values = true)]
    pub mode: RunMode,

    /// Milliseconds added to every play time (may be negative)
    #[arg(allow_negative_numbers = true)]
    pub offset_ms: i64,

    /// First line of each source file is a header row
    #[arg(long, env = "PLAYLOG_HAS_HEADERS")]
    pub has_headers: bool,

    /// Field delimiter (single ASCII character)
    #[arg(long, default_value = ",", value_parser = parse_delimiter, env = "PLAYLOG_DELIMITER")]
    pub delimiter: u8,

    /// After a batch pass, stay resident until Ctrl+C instead of exiting
    #[arg(long, env = "PLAYLOG_WAIT")]
    pub wait: bool,
}

/// Everything the process needs after argument parsing
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub source_dir: PathBuf,
    pub mode: RunMode,
    pub converter: ConverterConfig,
    pub wait_after_batch: bool,
}

impl From<Args> for RunSettings {
    fn from(args: Args) -> Self {
        let mut converter = ConverterConfig::new(args.dest_dir, args.offset_ms);
        converter.has_headers = args.has_headers;
        converter.delimiter = args.delimiter;

        Self {
            source_dir: args.source_dir,
            mode: args.mode,
            converter,
            wait_after_batch: args.wait,
        }
    }
}

/// Parse MODE: the batch flag or a positive whole number of minutes
pub fn parse_run_mode(value: &str) -> Result<RunMode, String> {
    let value = value.trim();
    if value == BATCH_FLAG || value.eq_ignore_ascii_case("all") {
        return Ok(RunMode::Batch);
    }

    match value.parse::<u64>() {
        Ok(0) => Err("interval must be at least 1 minute".to_string()),
        Ok(minutes) => minutes
            .checked_mul(60)
            .map(Duration::from_secs)
            .filter(|interval| *interval <= MAX_INTERVAL)
            .map(|interval| RunMode::Periodic { interval })
            .ok_or_else(|| {
                format!(
                    "interval too large: {} minutes (max {})",
                    minutes,
                    MAX_INTERVAL.as_secs() / 60
                )
            }),
        Err(_) => Err(format!(
            "expected `{}` or an interval in minutes, got {:?}",
            BATCH_FLAG, value
        )),
    }
}

fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ if value == "\\t" => Ok(b'\t'),
        _ => Err(format!("delimiter must be one ASCII character, got {:?}", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("playlog-export").chain(argv.iter().copied()))
    }

    #[test]
    fn test_batch_mode() {
        let args = parse(&["in", "out", "-all", "0"]).unwrap();
        assert_eq!(args.mode, RunMode::Batch);
        assert_eq!(args.offset_ms, 0);
        assert!(!args.has_headers);
        assert_eq!(args.delimiter, b',');
    }

    #[test]
    fn test_periodic_mode_with_negative_offset() {
        let args = parse(&["in", "out", "5", "-1500"]).unwrap();
        assert_eq!(
            args.mode,
            RunMode::Periodic {
                interval: Duration::from_secs(300)
            }
        );
        assert_eq!(args.offset_ms, -1500);
    }

    #[test]
    fn test_wrong_argument_count_is_rejected() {
        assert!(parse(&["in", "out", "-all"]).is_err());
        assert!(parse(&["in", "out", "-all", "0", "extra"]).is_err());
        assert!(parse(&[]).is_err());
    }

    #[test]
    fn test_bad_mode_and_offset_rejected() {
        assert!(parse(&["in", "out", "often", "0"]).is_err());
        assert!(parse(&["in", "out", "0", "0"]).is_err());
        assert!(parse(&["in", "out", "-all", "soon"]).is_err());
    }

    #[test]
    fn test_interval_capped_at_one_week() {
        assert_eq!(
            parse_run_mode("10080"),
            Ok(RunMode::Periodic {
                interval: MAX_INTERVAL
            })
        );
        assert!(parse_run_mode("10081").is_err());
        assert!(parse_run_mode("300000000000000000").is_err());
        assert!(parse(&["in", "out", "300000000000000000", "0"]).is_err());
    }

    #[test]
    fn test_optional_flags() {
        let args = parse(&["in", "out", "-all", "250", "--has-headers", "--delimiter", ";", "--wait"])
            .unwrap();
        let settings = RunSettings::from(args);

        assert!(settings.converter.has_headers);
        assert_eq!(settings.converter.delimiter, b';');
        assert_eq!(settings.converter.offset_ms, 250);
        assert_eq!(settings.converter.dest_dir, PathBuf::from("out"));
        assert!(settings.wait_after_batch);
    }

    #[test]
    fn test_tab_delimiter_escape() {
        assert_eq!(parse_delimiter("\\t"), Ok(b'\t'));
        assert!(parse_delimiter(";;").is_err());
    }
}
