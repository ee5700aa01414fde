//! Cached site loading.
//!
//! [`SiteLoader`] is the cache gate in front of a [`ContentSource`]: it
//! holds at most one built tree together with the source stamp it was
//! built from, and re-stats the source on every request. The cache is an
//! explicit object owned by the composition root — there is no
//! process-wide global.
//!
//! # Thread Safety
//!
//! Designed for concurrent access without external locking:
//! - `load()` returns `Arc<Site>` snapshots with minimal locking
//! - rebuilds use double-checked locking so concurrent requests do not
//!   duplicate work
//! - a failed load publishes nothing; readers keep their snapshots

use std::path::Path;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Instant;

use crate::error::LoadError;
use crate::site::Site;
use crate::source::{ContentSource, SourceStamp, source_for_path};

/// Convert Duration to milliseconds as f64.
fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

struct CachedSite {
    stamp: SourceStamp,
    site: Arc<Site>,
}

/// Loads the site tree from a content source, reusing the previous build
/// while the source's modification stamp is unchanged.
pub struct SiteLoader {
    source: Box<dyn ContentSource>,
    /// Mutex for serializing rebuild operations.
    reload_lock: Mutex<()>,
    /// Current build and the stamp it corresponds to.
    current: RwLock<Option<CachedSite>>,
}

impl SiteLoader {
    /// Create a loader for a content path, picking the source format by
    /// extension.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self::with_source(source_for_path(path))
    }

    /// Create a loader with a custom content source.
    #[must_use]
    pub fn with_source(source: Box<dyn ContentSource>) -> Self {
        Self {
            source,
            reload_lock: Mutex::new(()),
            current: RwLock::new(None),
        }
    }

    /// Get the site tree, rebuilding only when the source changed.
    ///
    /// Uses double-checked locking:
    /// 1. Fast path: return the current snapshot if the stamp matches
    /// 2. Slow path: acquire the reload lock, recheck, then rebuild
    ///
    /// The stamp is read fresh on every call, so an unreadable source
    /// fails the load even when a previous build is cached — a stale
    /// tree is never served in place of an error.
    ///
    /// # Errors
    ///
    /// Propagates any [`LoadError`] from statting or rebuilding; the
    /// cached snapshot is left untouched on failure.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn load(&self) -> Result<Arc<Site>, LoadError> {
        let start = Instant::now();
        let stamp = self.source.stamp()?;

        // Fast path: source unchanged
        if let Some(site) = self.cached(stamp) {
            return Ok(site);
        }

        // Slow path: acquire reload lock
        let _guard = self.reload_lock.lock().unwrap();

        // Double-check after acquiring lock
        if let Some(site) = self.cached(stamp) {
            return Ok(site);
        }

        let site = Arc::new(self.source.load()?);
        *self.current.write().unwrap() = Some(CachedSite {
            stamp,
            site: Arc::clone(&site),
        });

        tracing::info!(
            language_count = site.languages.len(),
            level_count = site.levels.len(),
            elapsed_ms = elapsed_ms(start),
            "Site reloaded"
        );
        Ok(site)
    }

    /// Current snapshot if it matches the given stamp.
    fn cached(&self, stamp: SourceStamp) -> Option<Arc<Site>> {
        self.current
            .read()
            .unwrap()
            .as_ref()
            .filter(|cached| cached.stamp == stamp)
            .map(|cached| Arc::clone(&cached.site))
    }
}
