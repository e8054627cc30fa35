//! Practice history persisted as a JSON file.
//!
//! Newest items come first and the list is capped at [`MAX_HISTORY_ITEMS`].

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cache::atomic_write;
use crate::prosody::annotator::accept;
use crate::types::{ProsodyAnnotation, RawAnnotation, Sentence};

pub const MAX_HISTORY_ITEMS: usize = 50;
/// Environment variable overriding the history file location.
pub const HISTORY_FILE_ENV: &str = "ECHOCOACH_HISTORY_FILE";

/// Default history file: `ECHOCOACH_HISTORY_FILE`, else `~/.local/share/echocoach/history.json`.
pub fn default_history_path() -> PathBuf {
    if let Ok(path) = std::env::var(HISTORY_FILE_ENV) {
        return PathBuf::from(path);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home)
        .join(".local")
        .join("share")
        .join("echocoach")
        .join("history.json")
}

/// One practiced sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: Uuid,
    /// Unix time in seconds
    pub timestamp: u64,
    pub text: String,
    pub annotation: ProsodyAnnotation,
}

#[derive(Debug, Clone)]
pub struct PracticeHistory {
    path: PathBuf,
    items: Vec<HistoryItem>,
}

impl PracticeHistory {
    /// Load history from `path`. A missing file gives an empty history.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self {
                path,
                items: Vec::new(),
            });
        }
        let data = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read history: {}", path.display()))?;
        let mut items: Vec<HistoryItem> = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse history: {}", path.display()))?;
        items.truncate(MAX_HISTORY_ITEMS);
        Ok(Self { path, items })
    }

    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.items)?;
        atomic_write(&self.path, json.as_bytes())
            .with_context(|| format!("Failed to write history: {}", self.path.display()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    /// Add a practiced sentence at the front, dropping the oldest beyond the cap.
    pub fn record(&mut self, text: &str, annotation: ProsodyAnnotation) -> &HistoryItem {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.items.insert(
            0,
            HistoryItem {
                id: Uuid::new_v4(),
                timestamp,
                text: text.to_string(),
                annotation,
            },
        );
        self.items.truncate(MAX_HISTORY_ITEMS);
        &self.items[0]
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Re-check every stored annotation and regenerate the ones that no longer hold.
    ///
    /// Returns how many items changed.
    pub fn revalidate(&mut self) -> usize {
        let mut changed = 0;
        for item in &mut self.items {
            let sentence = Sentence::parse(&item.text);
            let raw = RawAnnotation::from(item.annotation.clone());
            let fixed = accept(&sentence, Some(&raw));
            if fixed != item.annotation {
                log::info!("Regenerated stored annotation for {:?}", item.text);
                item.annotation = fixed;
                changed += 1;
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prosody::annotator::annotate;

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let history = PracticeHistory::load(dir.path().join("history.json")).unwrap();
        assert!(history.items().is_empty());
    }

    #[test]
    fn test_record_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        let mut history = PracticeHistory::load(&path).unwrap();
        history.record("I love you", annotate("I love you", None));
        history.record("How is it going?", annotate("How is it going?", None));
        history.save().unwrap();

        let loaded = PracticeHistory::load(&path).unwrap();
        assert_eq!(loaded.path(), path.as_path());
        assert_eq!(loaded.items().len(), 2);
        assert_eq!(loaded.items()[0].text, "How is it going?");
        assert_eq!(loaded.items()[1].text, "I love you");
        assert_ne!(loaded.items()[0].id, loaded.items()[1].id);
    }

    #[test]
    fn test_record_caps_items() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = PracticeHistory::load(dir.path().join("h.json")).unwrap();
        for i in 0..(MAX_HISTORY_ITEMS + 5) {
            history.record(&format!("sentence {}", i), ProsodyAnnotation::default());
        }
        assert_eq!(history.items().len(), MAX_HISTORY_ITEMS);
        assert_eq!(history.items()[0].text, format!("sentence {}", MAX_HISTORY_ITEMS + 4));
    }

    #[test]
    fn test_revalidate_regenerates_stale_items() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = PracticeHistory::load(dir.path().join("h.json")).unwrap();
        history.record("How is it going?", annotate("How is it going?", None));
        history.record(
            "Do you like it?",
            ProsodyAnnotation {
                full_linked_sentence: "Do you like it?".into(),
                intonation_map: "· ●↗".into(),
                full_linked_phonetic: "du ju laɪk ɪt".into(),
            },
        );

        assert_eq!(history.revalidate(), 1);
        assert_eq!(history.items()[0].annotation.intonation_tokens().len(), 4);
        assert_eq!(history.revalidate(), 0);
    }

    #[test]
    fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = PracticeHistory::load(dir.path().join("h.json")).unwrap();
        history.record("Hi", annotate("Hi", None));
        history.clear();
        assert!(history.items().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("h.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(PracticeHistory::load(&path).is_err());
    }
}
