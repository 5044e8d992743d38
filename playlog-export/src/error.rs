//! Error types for playlog-export
//!
//! Failures are recovered at three granularities: a bad row is skipped, a
//! failed file ends that conversion job, a failed directory scan ends that
//! pass. None of them stop the scheduler.

use std::path::PathBuf;
use thiserror::Error;

/// Why a single row could not be converted
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RowFault {
    /// Row is shorter than the column layout requires
    #[error("missing column {index} ({name})")]
    MissingColumn { index: usize, name: &'static str },

    /// Row bytes are not valid UTF-8
    #[error("row is not valid UTF-8")]
    Encoding,

    /// Field-level parse failure (date, time, category, duration)
    #[error("{0}")]
    Field(#[from] playlog_common::Error),
}

/// One row failed to parse; carries the row's 1-based position in the file
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unable to parse row {row}: {fault}")]
pub struct RowParseError {
    pub row: usize,
    pub fault: RowFault,
}

impl RowParseError {
    pub fn new(row: usize, fault: impl Into<RowFault>) -> Self {
        Self {
            row,
            fault: fault.into(),
        }
    }
}

/// A conversion job failed as a whole
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Source file could not be opened
    #[error("Cannot read {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O failure while streaming source rows
    #[error("Read failed in {path}: {source}")]
    SourceStream {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Destination file could not be created or written
    #[error("Cannot write {path}: {source}")]
    DestinationUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Record set could not be rendered as XML
    #[error("XML serialization failed: {0}")]
    Serialize(String),
}

/// Source directory could not be enumerated
#[derive(Debug, Error)]
pub enum ScanError {
    /// Specified path does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Directory listing failed
    #[error("Cannot list {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}
