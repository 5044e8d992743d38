//! Playout record model
//!
//! A `PlayoutRecord` is one played audio event as the playout-management
//! system expects it. Field order here is the element order of the exported
//! `<audio>` element.

use crate::{Error, Result};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Status written for every exported record
pub const PLAYING_STATUS: &str = "Playing";

/// Kind of item that was played
///
/// Closed set; the discriminants are the codes used in the source logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryType {
    Song = 0,
    Promo = 1,
    M3U = 3,
    OtherPromo = 5,
    SkippedTrack = 7,
    OtherActionOrObject = 8,
    Error = 9,
}

impl CategoryType {
    /// Every category, in code order
    pub const ALL: [CategoryType; 7] = [
        CategoryType::Song,
        CategoryType::Promo,
        CategoryType::M3U,
        CategoryType::OtherPromo,
        CategoryType::SkippedTrack,
        CategoryType::OtherActionOrObject,
        CategoryType::Error,
    ];

    /// Decode a source log category code
    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            0 => Ok(CategoryType::Song),
            1 => Ok(CategoryType::Promo),
            3 => Ok(CategoryType::M3U),
            5 => Ok(CategoryType::OtherPromo),
            7 => Ok(CategoryType::SkippedTrack),
            8 => Ok(CategoryType::OtherActionOrObject),
            9 => Ok(CategoryType::Error),
            other => Err(Error::UnknownCategoryCode(other)),
        }
    }

    /// Source log code for this category
    pub fn code(self) -> i64 {
        self as i64
    }

    /// Name used in the exported document
    pub fn as_str(self) -> &'static str {
        match self {
            CategoryType::Song => "Song",
            CategoryType::Promo => "Promo",
            CategoryType::M3U => "M3U",
            CategoryType::OtherPromo => "OtherPromo",
            CategoryType::SkippedTrack => "SkippedTrack",
            CategoryType::OtherActionOrObject => "OtherActionOrObject",
            CategoryType::Error => "Error",
        }
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses either the numeric code or the category name (case-insensitive)
impl FromStr for CategoryType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<i64>() {
            return Self::from_code(code);
        }

        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| Error::InvalidCategory(s.to_string()))
    }
}

impl Serialize for CategoryType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One converted play-log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayoutRecord {
    /// External identifier, not assigned by the exporter
    #[serde(rename = "@ID", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "type")]
    pub category_type: CategoryType,

    pub status: String,

    /// Time of day, `HH:MM:SS`
    pub played_time: String,

    #[serde(rename = "length_in_seconds")]
    pub length_seconds: u32,

    pub title: String,

    pub artist: String,

    #[serde(rename = "category")]
    pub category_label: String,
}

impl PlayoutRecord {
    /// Build a record with the fixed "Playing" status and no identifier
    pub fn playing(
        category_type: CategoryType,
        played_time: String,
        length_seconds: u32,
        title: String,
        artist: String,
        category_label: String,
    ) -> Self {
        Self {
            id: None,
            category_type,
            status: PLAYING_STATUS.to_string(),
            played_time,
            length_seconds,
            title,
            artist,
            category_label,
        }
    }
}
