//! Content ingestion and normalization for Hymnal.
//!
//! This crate provides:
//! - [`Site`]: the normalized, immutable catalogue tree
//!   (languages, levels → years → hymns → recordings/segments)
//! - [`SiteLoader`]: cached loading keyed on the source file's
//!   modification time
//! - [`ContentSource`]: the seam between the two supported input
//!   formats (`.xlsx` workbook vs. pre-built JSON document)
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), hymnal_content::LoadError> {
//! use std::path::Path;
//!
//! use hymnal_content::SiteLoader;
//!
//! let loader = SiteLoader::new(Path::new("content/site.xlsx"));
//!
//! // Returns a cached snapshot while the file is unchanged
//! let site = loader.load()?;
//!
//! let hymn = site
//!     .find_level("beginners")
//!     .and_then(|level| level.find_year("year-1"))
//!     .and_then(|year| year.find_hymn("tai-shori"));
//! let _ = hymn;
//! # Ok(())
//! # }
//! ```

mod cell;
mod error;
mod loader;
mod normalize;
mod site;
mod source;
mod timecode;
mod workbook;

pub use error::LoadError;
pub use loader::SiteLoader;
pub use site::{Hymn, Language, Level, Recording, Segment, Site, Year};
pub use source::{ContentSource, JsonSource, SourceStamp, WorkbookSource, source_for_path};
pub use timecode::{TimecodeError, parse_time_to_ms};
