//! File converter: one play-log CSV to one export document
//!
//! Bad rows are logged and skipped. Only source or destination I/O failures
//! fail the job, and those never escape the caller's loop.

use crate::error::{ConvertError, RowFault, RowParseError};
use crate::row_parser::{ColumnLayout, RowParser};
use crate::xml_export::{render_export, EXPORT_EXTENSION};
use csv::{ReaderBuilder, StringRecord};
use playlog_common::PlayoutRecord;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Conversion settings shared by every job
#[derive(Debug, Clone)]
pub struct ConverterConfig {
    /// Directory receiving `<basename>.xml`
    pub dest_dir: PathBuf,
    /// Millisecond correction applied to every play time (may be negative)
    pub offset_ms: i64,
    /// Treat the first line as a header and skip it
    pub has_headers: bool,
    /// Field delimiter byte
    pub delimiter: u8,
    /// Source column positions
    pub layout: ColumnLayout,
}

impl ConverterConfig {
    pub fn new(dest_dir: impl Into<PathBuf>, offset_ms: i64) -> Self {
        Self {
            dest_dir: dest_dir.into(),
            offset_ms,
            has_headers: false,
            delimiter: b',',
            layout: ColumnLayout::default(),
        }
    }
}

/// Rows read from one source, split into records and failures
#[derive(Debug, Default)]
pub struct ParsedRows {
    pub records: Vec<PlayoutRecord>,
    pub failures: Vec<RowParseError>,
}

/// Outcome of a completed conversion job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Records written to the output document
    pub converted: usize,
    /// Rows skipped because they failed to parse
    pub skipped: usize,
}

/// Converts play-log files into export documents
#[derive(Debug, Clone)]
pub struct FileConverter {
    config: ConverterConfig,
    parser: RowParser,
}

impl FileConverter {
    pub fn new(config: ConverterConfig) -> Self {
        let parser = RowParser::with_layout(config.layout, config.offset_ms);
        Self { config, parser }
    }

    /// Destination path for a source file: same base name, `.xml` extension
    pub fn output_path(&self, source: &Path) -> PathBuf {
        let file_name = source
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("export"));
        self.config
            .dest_dir
            .join(file_name.with_extension(EXPORT_EXTENSION))
    }

    /// Run one conversion job end to end
    pub fn convert(&self, source: &Path) -> Result<ConversionReport, ConvertError> {
        info!("Reading {}...", source.display());

        let file = File::open(source).map_err(|e| ConvertError::SourceUnreadable {
            path: source.to_path_buf(),
            source: e,
        })?;

        let parsed = self.read_rows(file).map_err(|e| ConvertError::SourceStream {
            path: source.to_path_buf(),
            source: e,
        })?;

        let output = self.output_path(source);
        let document = render_export(&parsed.records)?;
        std::fs::write(&output, document).map_err(|e| ConvertError::DestinationUnwritable {
            path: output.clone(),
            source: e,
        })?;

        info!(
            "Converted {} entries to {}",
            parsed.records.len(),
            output.display()
        );

        Ok(ConversionReport {
            source: source.to_path_buf(),
            output,
            converted: parsed.records.len(),
            skipped: parsed.failures.len(),
        })
    }

    /// Stream rows through the row parser, logging and skipping failures
    ///
    /// Only an I/O error from the underlying reader is returned as `Err`.
    pub fn read_rows<R: Read>(&self, reader: R) -> Result<ParsedRows, csv::Error> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(self.config.has_headers)
            .delimiter(self.config.delimiter)
            .flexible(true)
            .from_reader(reader);

        let mut parsed = ParsedRows::default();
        let mut record = StringRecord::new();
        let mut ordinal = 0usize;

        loop {
            ordinal += 1;
            match csv_reader.read_record(&mut record) {
                Ok(false) => break,
                Ok(true) => match self.parser.parse(ordinal, &record) {
                    Ok(playout) => parsed.records.push(playout),
                    Err(e) => {
                        warn!("{}", e);
                        parsed.failures.push(e);
                    }
                },
                Err(e) if e.is_io_error() => return Err(e),
                Err(e) => {
                    debug!("Row {} rejected by reader: {}", ordinal, e);
                    let failure = RowParseError::new(ordinal, RowFault::Encoding);
                    warn!("{}", failure);
                    parsed.failures.push(failure);
                }
            }
        }

        Ok(parsed)
    }
}
