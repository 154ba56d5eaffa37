//! Write-through URL analysis cache.
//!
//! Maps a normalized URL to the analysis text first produced for it. Entries
//! are permanent: there is no TTL, no eviction and no in-place update, so
//! the first answer (live or canned) stored for a key is the one every later
//! caller receives.
//!
//! # Persistence
//!
//! The cache is backed by a single JSON file holding a flat object of
//! `cache key → analysis text`. It is read once by [`AnalysisCache::load`]
//! (best-effort: a missing or corrupt file yields an empty cache) and fully
//! rewritten after every new entry. Writes go to a temporary file that is
//! then renamed over the target, and are serialized by a mutex; the
//! snapshot is taken under that mutex, so the last writer always holds the
//! most complete view.
//!
//! Durability is best-effort. A failed write leaves the in-memory entry in
//! place and is surfaced as [`RelayError::Persistence`] (or logged, on the
//! coalescing path).
//!
//! # Concurrency
//!
//! Storage is a moka future cache without capacity bound or TTL. Its entry
//! API coalesces concurrent initialisations, so two simultaneous misses for
//! the same key run the expensive computation once and both receive its
//! result.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use moka::future::Cache;
use tracing::{debug, warn};

use crate::telemetry;
use crate::{RelayError, Result};

/// Default file name of the persisted cache, relative to the working directory.
pub const DEFAULT_CACHE_FILE: &str = "url_analysis_cache.json";

/// Outcome of [`AnalysisCache::get_or_insert_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLookup {
    /// The cached (or freshly computed) analysis text.
    pub value: String,
    /// `true` when this call computed and inserted the value.
    pub fresh: bool,
}

/// URL → analysis text cache with whole-file write-through persistence.
pub struct AnalysisCache {
    entries: Cache<String, String>,
    path: Option<PathBuf>,
    write_lock: Mutex<()>,
}

impl AnalysisCache {
    /// Create an empty cache with no backing file.
    pub fn in_memory() -> Self {
        Self {
            entries: Cache::builder().build(),
            path: None,
            write_lock: Mutex::new(()),
        }
    }

    /// Create an empty cache that persists to `path`, ignoring any
    /// existing file content (the first write replaces it).
    pub fn empty_at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::in_memory()
        }
    }

    /// Load the cache persisted at `path`.
    ///
    /// Never fails: a missing file yields an empty cache silently, an
    /// unreadable or malformed one yields an empty cache and a warning.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let cache = Self::empty_at(path);
        let Some(path) = cache.path.as_deref() else {
            return cache;
        };

        if let Some(entries) = read_cache_file(path) {
            let count = entries.len();
            for (key, value) in entries {
                cache.entries.insert(key, value).await;
            }
            debug!(path = %path.display(), count, "loaded analysis cache");
        }
        cache
    }

    /// Path of the backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Look up the analysis stored for `key`. Memory only.
    pub async fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).await
    }

    /// Store `value` under `key` unless an entry already exists, then
    /// rewrite the backing file.
    ///
    /// An existing entry is left untouched and nothing is written. A write
    /// failure is returned as [`RelayError::Persistence`]; the in-memory
    /// entry is kept either way.
    pub async fn put(&self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        let entry = self
            .entries
            .entry(key.into())
            .or_insert_with(async move { value })
            .await;
        if entry.is_fresh() {
            self.persist()?;
        }
        Ok(())
    }

    /// Return the entry for `key`, computing and storing it with `init` on a
    /// miss.
    ///
    /// Concurrent callers missing on the same key share a single `init`
    /// evaluation. A fresh entry is written through to disk; a write failure
    /// is logged and counted but does not affect the returned value.
    pub async fn get_or_insert_with<F>(&self, key: impl Into<String>, init: F) -> CacheLookup
    where
        F: Future<Output = String>,
    {
        let entry = self.entries.entry(key.into()).or_insert_with(init).await;
        let fresh = entry.is_fresh();

        if fresh {
            metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
            if let Err(e) = self.persist() {
                metrics::counter!(telemetry::CACHE_PERSIST_FAILURES_TOTAL).increment(1);
                warn!(key = %entry.key(), error = %e, "failed to persist analysis cache");
            }
        } else {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
        }

        CacheLookup {
            value: entry.into_value(),
            fresh,
        }
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.iter().count()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of all entries, ordered by key.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_ref().clone(), value))
            .collect()
    }

    /// Rewrite the backing file with the current contents.
    ///
    /// No-op for an in-memory cache.
    pub fn persist(&self) -> Result<()> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };

        // A panic in another writer leaves nothing half-updated in memory.
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let snapshot = self.snapshot();
        write_cache_file(path, &snapshot)
    }
}

/// Read and parse the cache file. `None` on any failure.
fn read_cache_file(path: &Path) -> Option<HashMap<String, String>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read analysis cache, starting empty");
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(entries) => Some(entries),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt analysis cache, starting empty");
            None
        }
    }
}

/// Write `entries` to `path` (atomic write via tmp + rename).
fn write_cache_file(path: &Path, entries: &BTreeMap<String, String>) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            RelayError::Persistence(format!(
                "failed to create cache dir {}: {e}",
                parent.display()
            ))
        })?;
    }

    let json = serde_json::to_string_pretty(entries)
        .map_err(|e| RelayError::Persistence(format!("failed to serialize cache: {e}")))?;

    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json).map_err(|e| {
        RelayError::Persistence(format!(
            "failed to write cache file {}: {e}",
            tmp_path.display()
        ))
    })?;
    std::fs::rename(&tmp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        RelayError::Persistence(format!(
            "failed to rename cache file {} → {}: {e}",
            tmp_path.display(),
            path.display()
        ))
    })?;

    Ok(())
}
