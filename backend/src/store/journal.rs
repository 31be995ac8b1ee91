use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::Local;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sha2::{Digest, Sha256};

use crate::error::{AppError, AppResult};
use crate::models::journal_entry::{JournalEntry, JournalStats};
use crate::mood::{suggestion_for, MoodClassifier, MoodLabel};

use super::{read_json_or_default, write_json_atomic};

/// Maximum entries kept per journal.
pub const RETENTION_CAP: usize = 50;
pub const DEFAULT_LIST_LIMIT: usize = 7;
pub const NO_DATA: &str = "No data";

const AVERAGE_THRESHOLD: f64 = 0.3;

/// Opaque identifier scoping a journal to one account or anonymous device.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserKey(String);

impl UserKey {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Deterministic, filesystem-safe name for this key's journal file.
    pub fn file_stem(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        hex::encode(digest)[..32].to_string()
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct JournalStore {
    root: PathBuf,
    classifier: MoodClassifier,
    rng: Mutex<StdRng>,
}

impl JournalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_parts(root, MoodClassifier::default(), StdRng::from_entropy())
    }

    pub fn with_parts(root: impl Into<PathBuf>, classifier: MoodClassifier, rng: StdRng) -> Self {
        Self {
            root: root.into(),
            classifier,
            rng: Mutex::new(rng),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &UserKey) -> PathBuf {
        self.root.join(format!("{}.json", key.file_stem()))
    }

    async fn load(&self, key: &UserKey) -> Vec<JournalEntry> {
        read_json_or_default(&self.path_for(key)).await
    }

    async fn save(&self, key: &UserKey, entries: &[JournalEntry]) -> AppResult<()> {
        write_json_atomic(&self.path_for(key), entries).await?;
        Ok(())
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Resolves the stored mood: an informal tag if given, else the classifier.
    fn resolve_mood(&self, text: &str, mood_override: Option<&str>) -> String {
        match mood_override.map(str::trim).filter(|m| !m.is_empty()) {
            Some(tag) => MoodLabel::from_tag(tag)
                .map(|label| label.as_str().to_string())
                .unwrap_or_else(|| tag.to_string()),
            None => self.classifier.classify(text).as_str().to_string(),
        }
    }

    pub async fn append(
        &self,
        key: &UserKey,
        text: &str,
        mood_override: Option<&str>,
    ) -> AppResult<JournalEntry> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Validation("Entry text is required".into()));
        }

        let mood = self.resolve_mood(text, mood_override);
        let suggestion = suggestion_for(&mood, &mut *self.rng()).to_string();

        let mut entries = self.load(key).await;

        let now = Local::now();
        let mut id = now.timestamp_millis();
        if let Some(max_id) = entries.iter().map(|e| e.id).max() {
            if id <= max_id {
                id = max_id + 1;
            }
        }

        let entry = JournalEntry::new(id, now, text.to_string(), mood, suggestion);
        entries.insert(0, entry.clone());
        entries.truncate(RETENTION_CAP);

        self.save(key, &entries).await?;

        tracing::debug!(
            user_key = %key,
            entry_id = entry.id,
            mood = %entry.mood,
            entries = entries.len(),
            "Journal entry appended"
        );

        Ok(entry)
    }

    pub async fn list(&self, key: &UserKey, limit: usize) -> Vec<JournalEntry> {
        let mut entries = self.load(key).await;
        entries.truncate(limit);
        entries
    }

    /// Returns `false` without touching the file when no entry has `id`.
    pub async fn delete(&self, key: &UserKey, id: i64) -> AppResult<bool> {
        let mut entries = self.load(key).await;
        let before = entries.len();
        entries.retain(|e| e.id != id);

        if entries.len() == before {
            return Ok(false);
        }

        self.save(key, &entries).await?;
        tracing::debug!(user_key = %key, entry_id = id, "Journal entry deleted");
        Ok(true)
    }

    pub async fn stats(&self, key: &UserKey) -> JournalStats {
        summarize(&self.load(key).await)
    }
}

/// Crisis and free-form tags count as 0 in the average.
fn mood_value(mood: &str) -> f64 {
    match mood.parse::<MoodLabel>() {
        Ok(MoodLabel::Positive) => 1.0,
        Ok(MoodLabel::Negative) => -1.0,
        _ => 0.0,
    }
}

pub fn summarize(entries: &[JournalEntry]) -> JournalStats {
    if entries.is_empty() {
        return JournalStats {
            total_entries: 0,
            mood_distribution: BTreeMap::new(),
            average_mood: NO_DATA.to_string(),
        };
    }

    let mut mood_distribution = BTreeMap::new();
    for entry in entries {
        *mood_distribution.entry(entry.mood.clone()).or_insert(0) += 1;
    }

    let total: f64 = entries.iter().map(|e| mood_value(&e.mood)).sum();
    let average = total / entries.len() as f64;

    let average_mood = if average > AVERAGE_THRESHOLD {
        MoodLabel::Positive
    } else if average < -AVERAGE_THRESHOLD {
        MoodLabel::Negative
    } else {
        MoodLabel::Neutral
    };

    JournalStats {
        total_entries: entries.len(),
        mood_distribution,
        average_mood: average_mood.to_string(),
    }
}
