use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Millisecond timestamp, unique within one user's journal.
    pub id: i64,
    pub date: String,
    pub time: String,
    #[serde(rename = "entry")]
    pub text: String,
    pub mood: String,
    pub suggestion: String,
}

impl JournalEntry {
    pub fn new(id: i64, at: DateTime<Local>, text: String, mood: String, suggestion: String) -> Self {
        Self {
            id,
            date: at.format("%Y-%m-%d").to_string(),
            time: at.format("%H:%M:%S").to_string(),
            text,
            mood,
            suggestion,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JournalStats {
    pub total_entries: usize,
    pub mood_distribution: std::collections::BTreeMap<String, usize>,
    pub average_mood: String,
}
