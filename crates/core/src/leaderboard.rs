//! Top-10 leaderboard.

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::types::LEADERBOARD_CAPACITY;

/// Format of [`LeaderboardEntry::date`]
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LeaderboardEntry {
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    /// Local time the score was recorded
    pub date: String,
}

impl LeaderboardEntry {
    /// Entry stamped with the current local time
    pub fn now(score: u32, level: u32, lines: u32) -> Self {
        Self {
            score,
            level,
            lines,
            date: Local::now().format(DATE_FORMAT).to_string(),
        }
    }
}

/// Entries sorted by descending score, at most [`LEADERBOARD_CAPACITY`].
///
/// Serialized as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the board has free slots or `score` beats the last entry.
    pub fn is_high_score(&self, score: u32) -> bool {
        match self.entries.get(LEADERBOARD_CAPACITY - 1) {
            Some(last) => score > last.score,
            None => true,
        }
    }

    /// Record a score stamped with the current local time. Returns its
    /// 0-based rank, or `None` when it did not make the cut.
    pub fn add_score(&mut self, score: u32, level: u32, lines: u32) -> Option<usize> {
        self.insert(LeaderboardEntry::now(score, level, lines))
    }

    /// Insert an entry after every entry with an equal or higher score.
    pub fn insert(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        let rank = self
            .entries
            .iter()
            .position(|e| e.score < entry.score)
            .unwrap_or(self.entries.len());
        if rank >= LEADERBOARD_CAPACITY {
            return None;
        }
        self.entries.insert(rank, entry);
        self.entries.truncate(LEADERBOARD_CAPACITY);
        Some(rank)
    }

    /// Best `n` entries (never more than are stored)
    pub fn top_scores(&self, n: usize) -> &[LeaderboardEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Restore ordering and capacity after loading a hand-edited file.
    pub fn normalized(mut self) -> Self {
        // Stable sort keeps file order among ties
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(LEADERBOARD_CAPACITY);
        self
    }
}
