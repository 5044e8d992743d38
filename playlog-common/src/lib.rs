//! # Playlog Common Library
//!
//! Shared code for the playlog tools including:
//! - Playout record model (PlayoutRecord, CategoryType)
//! - Common error type
//! - Time-of-day parsing and offset arithmetic

pub mod error;
pub mod models;
pub mod time;

pub use error::{Error, Result};
pub use models::{CategoryType, PlayoutRecord};
