//! File-based caching of finished annotations.
//!
//! Entries are keyed by a SHA-256 digest of the sentence text and the raw
//! model reply, expire after a time-to-live, and are evicted oldest-first
//! once the cache holds more than `max_entries` files.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

use crate::types::ProsodyAnnotation;

/// Environment variable overriding the cache location.
pub const CACHE_DIR_ENV: &str = "ECHOCOACH_CACHE_DIR";
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_MAX_ENTRIES: usize = 256;

/// Get the cache directory.
///
/// Uses `ECHOCOACH_CACHE_DIR` env var if set, otherwise `~/.cache/echocoach`.
pub fn cache_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(CACHE_DIR_ENV) {
        return PathBuf::from(dir);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".cache").join("echocoach")
}

/// Cache key for a sentence and the model reply it was annotated from.
///
/// Returns a 64-character hex string.
pub fn cache_key(text: &str, response: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.trim().as_bytes());
    if let Some(response) = response {
        hasher.update([0u8]);
        hasher.update(response.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

/// Atomically write data to a file via temp file + rename.
pub(crate) fn atomic_write(target: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let tmp_path = target.with_extension("tmp");
    std::fs::write(&tmp_path, data)?;
    std::fs::rename(&tmp_path, target)?;
    Ok(())
}

fn short(key: &str) -> &str {
    &key[..12.min(key.len())]
}

/// Annotation cache stored as one JSON file per entry.
#[derive(Debug, Clone)]
pub struct AnnotationCache {
    dir: PathBuf,
    ttl: Duration,
    max_entries: usize,
}

impl AnnotationCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ttl: DEFAULT_TTL,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }

    /// Cache under [`cache_dir`].
    pub fn open_default() -> Self {
        Self::new(cache_dir().join("annotations"))
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries.max(1);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Return a cached annotation, or None if missing, expired or unreadable.
    pub fn get(&self, key: &str) -> Option<ProsodyAnnotation> {
        let path = self.entry_path(key);
        let modified = path.metadata().and_then(|m| m.modified()).ok()?;
        let age = SystemTime::now().duration_since(modified).unwrap_or_default();
        if age >= self.ttl {
            log::debug!("Cache expired: annotation ({}...)", short(key));
            return None;
        }
        let data = std::fs::read_to_string(&path).ok()?;
        let annotation: ProsodyAnnotation = serde_json::from_str(&data).ok()?;
        log::info!("Cache hit: annotation ({}...)", short(key));
        Some(annotation)
    }

    /// Store an annotation, then evict the oldest entries over the limit.
    pub fn store(&self, key: &str, annotation: &ProsodyAnnotation) -> Result<PathBuf> {
        let path = self.entry_path(key);
        let json = serde_json::to_string(annotation)?;
        atomic_write(&path, json.as_bytes())
            .with_context(|| format!("Failed to write cache entry: {}", path.display()))?;
        log::info!("Cached annotation ({}...)", short(key));
        self.evict_keeping(Some(path.as_path()))?;
        Ok(path)
    }

    fn entries(&self) -> Result<Vec<(PathBuf, SystemTime)>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read cache dir: {}", self.dir.display()))?
        {
            let path = entry?.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                let modified = path.metadata()?.modified()?;
                entries.push((path, modified));
            }
        }
        Ok(entries)
    }

    /// Number of entries currently on disk, expired ones included.
    pub fn len(&self) -> Result<usize> {
        Ok(self.entries()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Remove the oldest entries beyond `max_entries`. Returns how many were removed.
    pub fn evict(&self) -> Result<usize> {
        self.evict_keeping(None)
    }

    /// Evict oldest-first, never removing `keep`. Equal mtimes are ordered by path.
    fn evict_keeping(&self, keep: Option<&Path>) -> Result<usize> {
        let mut entries = self.entries()?;
        if entries.len() <= self.max_entries {
            return Ok(0);
        }
        entries.sort_by(|a, b| {
            let a_kept = keep == Some(a.0.as_path());
            let b_kept = keep == Some(b.0.as_path());
            b_kept
                .cmp(&a_kept)
                .then_with(|| b.1.cmp(&a.1))
                .then_with(|| a.0.cmp(&b.0))
        });
        let stale = entries.split_off(self.max_entries);
        for (path, _) in &stale {
            std::fs::remove_file(path)?;
        }
        log::debug!("Evicted {} cached annotation(s)", stale.len());
        Ok(stale.len())
    }

    /// Remove every entry.
    pub fn clear(&self) -> Result<()> {
        for (path, _) in self.entries()? {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProsodyAnnotation {
        ProsodyAnnotation {
            full_linked_sentence: "How‿is‿it going?".to_string(),
            intonation_map: "● · · ●↘".to_string(),
            full_linked_phonetic: "ˈhaʊ.ɪz.ɪt ˈgoʊɪŋ".to_string(),
        }
    }

    #[test]
    fn test_cache_key_deterministic() {
        let k1 = cache_key("How is it going?", None);
        let k2 = cache_key("How is it going?", None);
        assert_eq!(k1, k2);
        assert_eq!(k1.len(), 64);
    }

    #[test]
    fn test_cache_key_depends_on_response() {
        let plain = cache_key("Hi", None);
        let with_reply = cache_key("Hi", Some("{}"));
        assert_ne!(plain, with_reply);
        assert_ne!(cache_key("Hi", Some("a")), cache_key("Hi", Some("b")));
    }

    #[test]
    fn test_atomic_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("test.json");

        atomic_write(&path, b"{\"key\": \"value\"}").unwrap();
        assert!(path.exists());
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "{\"key\": \"value\"}");
    }

    #[test]
    fn test_store_and_retrieve() {
        let dir = tempfile::tempdir().unwrap();
        let cache = AnnotationCache::new(dir.path());
        let key = cache_key("How is it going?", None);

        assert!(cache.get(&key).is_none());
        let path = cache.store(&key, &sample()).unwrap();
        assert!(path.exists());
        assert_eq!(cache.get(&key), Some(sample()));
        assert_eq!(cache.len().unwrap(), 1);
    }

    #[test]
    fn test_expired_entries_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = AnnotationCache::new(dir.path()).with_ttl(Duration::ZERO);
        let key = cache_key("Hi", None);
        cache.store(&key, &sample()).unwrap();
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn test_eviction_caps_entries() {
        let dir = tempfile::tempdir().unwrap();
        let cache = AnnotationCache::new(dir.path()).with_max_entries(2);
        for text in ["one", "two", "three", "four"] {
            cache.store(&cache_key(text, None), &sample()).unwrap();
        }
        assert_eq!(cache.len().unwrap(), 2);
    }

    #[test]
    fn test_store_keeps_new_entry_when_evicting() {
        let dir = tempfile::tempdir().unwrap();
        let cache = AnnotationCache::new(dir.path()).with_max_entries(1);
        assert_eq!(cache.dir(), dir.path());
        for text in ["one", "two", "three", "four", "five"] {
            let key = cache_key(text, None);
            let path = cache.store(&key, &sample()).unwrap();
            assert!(path.exists(), "{} was evicted right after store", text);
            assert_eq!(cache.get(&key), Some(sample()));
        }
        assert_eq!(cache.len().unwrap(), 1);
    }

    #[test]
    fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let cache = AnnotationCache::new(dir.path());
        cache.store(&cache_key("Hi", None), &sample()).unwrap();
        cache.clear().unwrap();
        assert!(cache.is_empty().unwrap());
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = AnnotationCache::new(dir.path().join("absent"));
        assert!(cache.is_empty().unwrap());
        assert_eq!(cache.evict().unwrap(), 0);
    }

    #[test]
    fn test_cache_dir_default() {
        let dir = cache_dir();
        assert!(!dir.to_string_lossy().is_empty());
    }
}
