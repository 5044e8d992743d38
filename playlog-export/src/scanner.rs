//! Source directory scanner
//!
//! Lists play-log files directly inside the source directory (no recursion),
//! in lexical file name order.

use crate::error::ScanError;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

/// Extension of play-log source files
pub const SOURCE_EXTENSION: &str = "csv";

/// A candidate source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub modified: SystemTime,
}

/// Play-log file scanner
#[derive(Debug, Clone)]
pub struct SourceScanner {
    extension: String,
}

impl Default for SourceScanner {
    fn default() -> Self {
        Self::new(SOURCE_EXTENSION)
    }
}

impl SourceScanner {
    pub fn new(extension: &str) -> Self {
        Self {
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// List matching files in `dir`, sorted by file name
    ///
    /// Unreadable entries are logged and skipped; only failure to open the
    /// directory itself is an error.
    pub fn scan(&self, dir: &Path) -> Result<Vec<SourceFile>, ScanError> {
        if !dir.exists() {
            return Err(ScanError::PathNotFound(dir.to_path_buf()));
        }

        if !dir.is_dir() {
            return Err(ScanError::NotADirectory(dir.to_path_buf()));
        }

        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(ScanError::Walk {
                        path: dir.to_path_buf(),
                        source: e,
                    })
                }
                Err(e) => {
                    tracing::warn!("Error accessing entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.matches_extension(entry.path()) {
                continue;
            }

            match entry.metadata().map_err(std::io::Error::from).and_then(|m| m.modified()) {
                Ok(modified) => files.push(SourceFile {
                    path: entry.into_path(),
                    modified,
                }),
                Err(e) => tracing::warn!("Skipping {}: {}", entry.path().display(), e),
            }
        }

        tracing::debug!("{} source files in {}", files.len(), dir.display());
        Ok(files)
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(&self.extension))
            .unwrap_or(false)
    }
}

/// Most recently modified file; ties go to the earliest in scan order
pub fn select_latest(files: &[SourceFile]) -> Option<&SourceFile> {
    files.iter().fold(None, |best: Option<&SourceFile>, file| match best {
        Some(current) if current.modified >= file.modified => Some(current),
        _ => Some(file),
    })
}
