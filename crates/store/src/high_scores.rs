//! Best-score lists, one per difficulty.
//!
//! Each list is sorted by descending score and capped at [`MAX_HIGH_SCORES`].
//! Among equal scores the older entry ranks first.

use blockfall_types::{Difficulty, MAX_HIGH_SCORES};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub score: u32,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub lines: u32,
    /// When the game ended (RFC 3339, UTC).
    #[serde(alias = "date")]
    pub timestamp: DateTime<Utc>,
}

impl ScoreEntry {
    /// Entry stamped with the current time.
    pub fn new(score: u32, level: u32, lines: u32) -> Self {
        Self::at(score, level, lines, Utc::now())
    }

    pub fn at(score: u32, level: u32, lines: u32, timestamp: DateTime<Utc>) -> Self {
        Self {
            score,
            level,
            lines,
            timestamp,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighScores {
    easy: Vec<ScoreEntry>,
    medium: Vec<ScoreEntry>,
    hard: Vec<ScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    fn list(&self, difficulty: Difficulty) -> &Vec<ScoreEntry> {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    fn list_mut(&mut self, difficulty: Difficulty) -> &mut Vec<ScoreEntry> {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        }
    }

    /// Add `entry` and return its 0-based rank, or `None` if it did not make the list.
    pub fn insert(&mut self, difficulty: Difficulty, entry: ScoreEntry) -> Option<usize> {
        let list = self.list_mut(difficulty);
        let rank = list.partition_point(|e| e.score >= entry.score);
        if rank >= MAX_HIGH_SCORES {
            return None;
        }
        list.insert(rank, entry);
        list.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    /// Entries for `difficulty`, best first.
    pub fn top(&self, difficulty: Difficulty) -> &[ScoreEntry] {
        self.list(difficulty)
    }

    pub fn best(&self, difficulty: Difficulty) -> Option<u32> {
        self.list(difficulty).first().map(|e| e.score)
    }

    /// Whether `score` would be kept by [`HighScores::insert`].
    pub fn qualifies(&self, difficulty: Difficulty, score: u32) -> bool {
        let list = self.list(difficulty);
        list.len() < MAX_HIGH_SCORES || list.last().is_some_and(|e| score > e.score)
    }

    pub fn clear(&mut self) {
        for difficulty in Difficulty::ALL {
            self.list_mut(difficulty).clear();
        }
    }

    pub fn is_empty(&self) -> bool {
        Difficulty::ALL.iter().all(|&d| self.list(d).is_empty())
    }

    /// Restore ordering and caps on data read from disk.
    pub(crate) fn normalize(&mut self) {
        for difficulty in Difficulty::ALL {
            let list = self.list_mut(difficulty);
            // Stable, so equal scores keep file order.
            list.sort_by(|a, b| b.score.cmp(&a.score));
            list.truncate(MAX_HIGH_SCORES);
        }
    }
}
