//! Row parser: one play-log row to one `PlayoutRecord`
//!
//! Source rows carry no usable header, so fields are addressed by position.
//! Positions live in [`ColumnLayout`]; the parser never hard-codes them.

use crate::error::{RowFault, RowParseError};
use csv::StringRecord;
use playlog_common::time::{
    format_time_of_day, offset_time_of_day, parse_clock_time, parse_date, parse_minutes_seconds,
};
use playlog_common::{CategoryType, PlayoutRecord};

/// Column positions of the fields the exporter reads
///
/// Column 2 of the standard log is not used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub date: usize,
    pub time: usize,
    pub category_code: usize,
    pub title: usize,
    pub artist: usize,
    pub duration: usize,
    pub category_label: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            date: 0,
            time: 1,
            category_code: 3,
            title: 4,
            artist: 5,
            duration: 6,
            category_label: 7,
        }
    }
}

/// Converts rows using a fixed layout and play-time offset
#[derive(Debug, Clone)]
pub struct RowParser {
    layout: ColumnLayout,
    offset_ms: i64,
}

impl RowParser {
    pub fn new(offset_ms: i64) -> Self {
        Self::with_layout(ColumnLayout::default(), offset_ms)
    }

    pub fn with_layout(layout: ColumnLayout, offset_ms: i64) -> Self {
        Self { layout, offset_ms }
    }

    /// Parse one row; `row` is its 1-based ordinal, used only for error context
    ///
    /// The duration column may be absent or empty (length 0). Every other
    /// mapped column must exist.
    pub fn parse(&self, row: usize, record: &StringRecord) -> Result<PlayoutRecord, RowParseError> {
        let layout = &self.layout;
        let field = |index: usize, name: &'static str| {
            record
                .get(index)
                .ok_or_else(|| RowParseError::new(row, RowFault::MissingColumn { index, name }))
        };
        let fail = |e: playlog_common::Error| RowParseError::new(row, e);

        let date = parse_date(field(layout.date, "date")?).map_err(fail)?;
        let time = parse_clock_time(field(layout.time, "time")?).map_err(fail)?;
        let played = offset_time_of_day(date, time, self.offset_ms).map_err(fail)?;

        let category_type: CategoryType = field(layout.category_code, "category code")?
            .parse()
            .map_err(fail)?;

        let length_seconds = match record.get(layout.duration).map(str::trim) {
            Some(text) if !text.is_empty() => parse_minutes_seconds(text).map_err(fail)?,
            _ => 0,
        };

        let title = field(layout.title, "title")?.to_string();
        let artist = field(layout.artist, "artist")?.to_string();
        let category_label = field(layout.category_label, "category")?.to_string();

        Ok(PlayoutRecord::playing(
            category_type,
            format_time_of_day(played),
            length_seconds,
            title,
            artist,
            category_label,
        ))
    }
}
