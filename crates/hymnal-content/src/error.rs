//! Error types for content loading.

use std::path::PathBuf;

use crate::timecode::TimecodeError;

/// Error returned when loading a site from a content source fails.
///
/// Loads are fail-fast: any of these aborts the whole load and nothing is
/// published to the cache. Malformed *rows* are not errors — they are
/// dropped during normalization.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Source file missing, unreadable, or not statable.
    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        /// Content source path.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Workbook could not be opened or read.
    #[error("workbook error in {}: {source}", .path.display())]
    Workbook {
        /// Content source path.
        path: PathBuf,
        #[source]
        source: calamine::XlsxError,
    },
    /// Pre-built JSON document is structurally invalid.
    #[error("JSON parse error in {}: {source}", .path.display())]
    Json {
        /// Content source path.
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A segment timestamp could not be parsed.
    #[error(transparent)]
    Timecode(#[from] TimecodeError),
}
