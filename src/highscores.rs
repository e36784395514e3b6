//! High score leaderboard system
//!
//! Persisted as JSON in the data directory, tracks the top 10 runs. The best
//! score shown in game is the first entry.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::persistence::{self, StoreError};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;
/// File name inside the data directory
pub const HIGHSCORES_FILE: &str = "highscores.json";

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Final score of the run
    pub score: u64,
    /// Simulation ticks the run lasted
    pub ticks: u64,
    /// Unix timestamp (seconds) when achieved
    pub timestamp: u64,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, score: u64, ticks: u64, timestamp: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            ticks,
            timestamp,
        };

        // Find insertion point (sorted descending by score)
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

    /// Best score so far (0 when empty)
    pub fn best(&self) -> u64 {
        self.entries.first().map(|e| e.score).unwrap_or(0)
    }

    /// Load from `dir`, starting fresh if missing or unreadable
    pub fn load(dir: &Path) -> Self {
        let scores: Self = persistence::load_or_default(&dir.join(HIGHSCORES_FILE));
        log::info!("Loaded {} high scores", scores.entries.len());
        scores
    }

    /// Write to `dir`
    pub fn save(&self, dir: &Path) -> Result<(), StoreError> {
        persistence::save_json(&dir.join(HIGHSCORES_FILE), self)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// Current Unix time in seconds (0 if the clock is before the epoch)
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_never_qualifies() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert_eq!(scores.best(), 0);
    }

    #[test]
    fn test_add_keeps_descending_order() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(50, 500, 1), Some(1));
        assert_eq!(scores.add_score(80, 800, 2), Some(1));
        assert_eq!(scores.add_score(60, 600, 3), Some(2));
        let values: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(values, vec![80, 60, 50]);
        assert_eq!(scores.best(), 80);
    }

    #[test]
    fn test_leaderboard_is_capped() {
        let mut scores = HighScores::new();
        for s in 1..=(MAX_HIGH_SCORES as u64 + 5) {
            scores.add_score(s, s * 10, s);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert!(!scores.qualifies(3));
        assert_eq!(scores.best(), MAX_HIGH_SCORES as u64 + 5);
        assert_eq!(scores.add_score(1000, 0, 0), Some(1));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
    }

    #[test]
    fn test_save_and_load() {
        let dir = crate::persistence::test_dir("highscores");
        let mut scores = HighScores::new();
        scores.add_score(123, 1230, 99);
        scores.save(&dir).unwrap();
        let loaded = HighScores::load(&dir);
        assert_eq!(loaded.entries, scores.entries);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_missing_is_empty() {
        let dir = crate::persistence::test_dir("highscores-missing");
        assert!(HighScores::load(&dir).is_empty());
    }
}
