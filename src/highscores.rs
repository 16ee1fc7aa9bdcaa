//! Top-50 leaderboard
//!
//! Persisted under a fixed storage key, keeps the top 50 scores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StoreError};

/// Board length
pub const MAX_HIGH_SCORES: usize = 50;

/// Longest name shown on the board, in characters
pub const MAX_NAME_CHARS: usize = 8;

/// One finished run on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player's name (trimmed, at most 8 characters)
    pub name: String,
    pub score: u64,
    /// When the score was submitted (ISO-8601)
    pub date: DateTime<Utc>,
}

/// Trim surrounding whitespace and cap to the display length
pub fn clean_name(name: &str) -> String {
    name.trim().chars().take(MAX_NAME_CHARS).collect()
}

/// Entries, best first. Serialized as a bare JSON array.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "sucheng_leaderboard";

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Whether a score would make the board. Zero never does.
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|lowest| score > lowest.score)
    }

    /// 1-based rank a score would take
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let above = self.entries.iter().take_while(|e| e.score >= score).count();
        Some(above + 1)
    }

    /// Add a new score (if it qualifies and the name isn't blank).
    /// Returns the rank achieved (1-indexed).
    pub fn add_score(&mut self, name: &str, score: u64, date: DateTime<Utc>) -> Option<usize> {
        let name = clean_name(name);
        if name.is_empty() || !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry { name, score, date };

        // Ties go below existing entries
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Re-establish ordering and size after loading foreign data
    fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
    }

    /// Load the leaderboard. Missing, unreadable or corrupt data is an
    /// empty board.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let json = match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                return Self::new();
            }
            Err(e) => {
                log::warn!("High scores unavailable ({}), starting fresh", e);
                return Self::new();
            }
        };

        match serde_json::from_str::<HighScores>(&json) {
            Ok(mut scores) => {
                scores.normalize();
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Err(e) => {
                log::warn!("Discarding corrupt high scores: {}", e);
                Self::new()
            }
        }
    }

    /// Save the leaderboard
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        let json = serde_json::to_string(self)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }

    /// Read, append, write back. Returns the rank achieved, if any.
    pub fn submit(
        store: &mut dyn KeyValueStore,
        name: &str,
        score: u64,
        date: DateTime<Utc>,
    ) -> Result<Option<usize>, StoreError> {
        let mut scores = Self::load(store);
        let rank = scores.add_score(name, score, date);
        if rank.is_some() {
            scores.save(store)?;
        }
        Ok(rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).expect("valid timestamp")
    }

    #[test]
    fn test_sorted_insert_and_rank() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score("amy", 300, at(1)), Some(1));
        assert_eq!(scores.add_score("bo", 500, at(2)), Some(1));
        assert_eq!(scores.add_score("cy", 400, at(3)), Some(2));
        assert_eq!(scores.add_score("di", 400, at(4)), Some(3));

        let order: Vec<_> = scores.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(order, vec!["bo", "cy", "di", "amy"]);
        assert_eq!(scores.top_score(), Some(500));
    }

    #[test]
    fn test_zero_and_blank_are_refused() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score("amy", 0, at(1)), None);
        assert_eq!(scores.add_score("   ", 100, at(1)), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_names_are_trimmed_and_capped() {
        assert_eq!(clean_name("  速成大師一二三四五  "), "速成大師一二三四");
        assert_eq!(clean_name(" amy "), "amy");
    }

    #[test]
    fn test_keeps_top_fifty() {
        let mut scores = HighScores::new();
        for i in 1..=60u64 {
            scores.add_score("p", i * 10, at(i as i64));
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), Some(600));
        assert_eq!(scores.entries.last().map(|e| e.score), Some(110));
        assert!(!scores.qualifies(100));
        assert_eq!(scores.potential_rank(605), Some(1));
    }

    #[test]
    fn test_dates_serialize_as_iso8601() {
        let mut scores = HighScores::new();
        scores.add_score("amy", 100, at(0));
        let json = serde_json::to_string(&scores).expect("serialize");
        assert!(json.contains("1970-01-01T00:00:00Z"), "{json}");
        assert!(json.starts_with('['));
    }
}
