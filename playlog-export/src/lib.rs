//! playlog-export library
//!
//! Converts broadcast play-log CSV files into playout XML exports, either in
//! a single batch pass or periodically for the newest log.

pub mod config;
pub mod converter;
pub mod error;
pub mod row_parser;
pub mod scanner;
pub mod scheduler;
pub mod xml_export;

pub use converter::{ConversionReport, ConverterConfig, FileConverter};
pub use error::{ConvertError, RowFault, RowParseError, ScanError};
pub use row_parser::{ColumnLayout, RowParser};
pub use scheduler::{BatchSummary, RunMode, Scheduler};
