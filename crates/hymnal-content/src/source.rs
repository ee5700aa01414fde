//! Content sources: format detection and the loading seam.
//!
//! The two supported input formats are modeled as implementations of one
//! [`ContentSource`] capability:
//!
//! - [`WorkbookSource`] for `.xlsx` paths, routed through the table
//!   normalization pipeline
//! - [`JsonSource`] for everything else, deserialized directly as
//!   [`Site`] with no normalization — the document is expected to
//!   already match the site shape
//!
//! Both expose the source file's modification time as a [`SourceStamp`],
//! the freshness token the loader's cache is keyed on. Tests inject fake
//! sources with fabricated stamps through the same trait.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::LoadError;
use crate::normalize;
use crate::site::Site;
use crate::workbook::Workbook;

/// Freshness token for a content source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceStamp(SystemTime);

impl SourceStamp {
    #[must_use]
    pub fn new(time: SystemTime) -> Self {
        Self(time)
    }
}

/// A loadable content source.
///
/// `stamp` and `load` are deliberately separate: the loader re-stats on
/// every request and only rebuilds when the stamp changed.
pub trait ContentSource: Send + Sync {
    /// Current freshness stamp.
    ///
    /// # Errors
    ///
    /// Fails when the source cannot be statted; the loader propagates
    /// this instead of serving a stale tree.
    fn stamp(&self) -> Result<SourceStamp, LoadError>;

    /// Build the site tree from scratch.
    ///
    /// # Errors
    ///
    /// Fails on unreadable sources, workbook errors, invalid JSON
    /// documents, or malformed segment timestamps.
    fn load(&self) -> Result<Site, LoadError>;
}

fn mtime(path: &Path) -> Result<SourceStamp, LoadError> {
    let io_err = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };
    let modified = fs::metadata(path).map_err(io_err)?.modified().map_err(io_err)?;
    Ok(SourceStamp(modified))
}

/// Tabular source: an `.xlsx` workbook normalized through the table
/// pipeline.
pub struct WorkbookSource {
    path: PathBuf,
}

impl WorkbookSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ContentSource for WorkbookSource {
    fn stamp(&self) -> Result<SourceStamp, LoadError> {
        mtime(&self.path)
    }

    fn load(&self) -> Result<Site, LoadError> {
        let book = Workbook::open(&self.path)?;
        normalize::build_site(&book)
    }
}

/// Pre-built source: a JSON document already matching the site shape.
pub struct JsonSource {
    path: PathBuf,
}

impl JsonSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ContentSource for JsonSource {
    fn stamp(&self) -> Result<SourceStamp, LoadError> {
        mtime(&self.path)
    }

    fn load(&self) -> Result<Site, LoadError> {
        let content = fs::read_to_string(&self.path).map_err(|source| LoadError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| LoadError::Json {
            path: self.path.clone(),
            source,
        })
    }
}

/// Select the source implementation for a path.
///
/// Paths with an `xlsx` extension (case-insensitive) route through the
/// workbook pipeline; every other path is treated as a pre-built JSON
/// document.
#[must_use]
pub fn source_for_path(path: &Path) -> Box<dyn ContentSource> {
    let is_workbook = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"));
    if is_workbook {
        Box::new(WorkbookSource::new(path))
    } else {
        Box::new(JsonSource::new(path))
    }
}
