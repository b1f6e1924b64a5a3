//! High score leaderboard
//!
//! Bounded top-N list ordered by score, highest first. Among equal scores
//! the earlier entry ranks higher.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::consts::LEADERBOARD_CAPACITY;
use crate::persistence::PersistenceError;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player's name, trimmed and non-empty
    pub name: String,
    pub score: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: u64,
}

/// What a submission did to the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Board had room (1-indexed rank)
    Inserted { rank: usize },
    /// Board was full; the lowest entry made way
    Replaced { rank: usize, evicted: HighScoreEntry },
    /// Board was full and the score did not beat its minimum
    Rejected,
}

/// Leaderboard collaborator consumed by the session on game over and by
/// the high-score display
pub trait LeaderboardStore {
    /// Entries, best first
    fn list(&self) -> Result<Vec<HighScoreEntry>, PersistenceError>;

    fn submit(&mut self, name: &str, score: u32) -> Result<SubmitOutcome, PersistenceError>;
}

fn default_capacity() -> usize {
    LEADERBOARD_CAPACITY
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScores {
    #[serde(default = "default_capacity")]
    capacity: usize,
    pub entries: Vec<HighScoreEntry>,
}

impl Default for HighScores {
    fn default() -> Self {
        Self::new(LEADERBOARD_CAPACITY)
    }
}

impl HighScores {
    /// Empty leaderboard holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Apply a capacity and restore ordering, e.g. after loading from disk.
    /// Entries beyond the capacity are dropped from the bottom.
    pub fn normalize(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        // Stable: equal scores keep timestamp order
        self.entries.sort_by_key(|e| e.timestamp);
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(self.capacity);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Lowest score on the board (if any)
    pub fn min_score(&self) -> Option<u32> {
        self.entries.last().map(|e| e.score)
    }

    /// Place an entry. Below capacity it always goes in; at capacity it
    /// must strictly beat the minimum, which is then evicted (one entry,
    /// the lowest-ranked of any tie at the minimum).
    pub fn add_entry(&mut self, entry: HighScoreEntry) -> SubmitOutcome {
        let evicted = if self.is_full() {
            match self.min_score() {
                Some(min) if entry.score > min => self.entries.pop(),
                _ => return SubmitOutcome::Rejected,
            }
        } else {
            None
        };

        // After all entries with an equal or better score
        let pos = self
            .entries
            .iter()
            .position(|e| entry.score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        let rank = pos + 1;

        match evicted {
            Some(evicted) => SubmitOutcome::Replaced { rank, evicted },
            None => SubmitOutcome::Inserted { rank },
        }
    }
}

impl LeaderboardStore for HighScores {
    fn list(&self) -> Result<Vec<HighScoreEntry>, PersistenceError> {
        Ok(self.entries.clone())
    }

    fn submit(&mut self, name: &str, score: u32) -> Result<SubmitOutcome, PersistenceError> {
        let name = normalize_name(name)?;
        Ok(self.add_entry(HighScoreEntry {
            name,
            score,
            timestamp: unix_millis(),
        }))
    }
}

/// Trim a submitted name; empty names are refused
pub fn normalize_name(name: &str) -> Result<String, PersistenceError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PersistenceError::EmptyName);
    }
    Ok(name.to_string())
}

/// Milliseconds since the Unix epoch (0 if the clock is before it)
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Format a timestamp as a relative date string
pub fn format_date(timestamp: u64, now: u64) -> String {
    let diff_mins = now.saturating_sub(timestamp) / 60_000;
    let diff_hours = diff_mins / 60;
    let diff_days = diff_hours / 24;

    if diff_days >= 1 {
        match diff_days {
            1 => "Yesterday".to_string(),
            d if d < 7 => format!("{d} days ago"),
            d if d < 14 => "1 week ago".to_string(),
            d => format!("{} weeks ago", d / 7),
        }
    } else if diff_hours >= 1 {
        if diff_hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{diff_hours} hours ago")
        }
    } else if diff_mins >= 1 {
        if diff_mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{diff_mins} mins ago")
        }
    } else {
        "Just now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, score: u32, timestamp: u64) -> HighScoreEntry {
        HighScoreEntry {
            name: name.to_string(),
            score,
            timestamp,
        }
    }

    fn full_board() -> HighScores {
        let mut board = HighScores::new(10);
        for (i, score) in [5, 12, 7, 30, 1, 18, 9, 22, 3, 14].into_iter().enumerate() {
            board.add_entry(entry(&format!("p{i}"), score, i as u64));
        }
        board
    }

    #[test]
    fn test_ten_distinct_scores_all_persist() {
        let board = full_board();
        assert_eq!(board.len(), 10);
        let scores: Vec<u32> = board.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![30, 22, 18, 14, 12, 9, 7, 5, 3, 1]);
    }

    #[test]
    fn test_eleventh_below_minimum_is_rejected() {
        let mut board = full_board();
        let before = board.clone();
        assert_eq!(board.add_entry(entry("late", 0, 99)), SubmitOutcome::Rejected);
        // Equal to the minimum is not enough either
        assert_eq!(board.add_entry(entry("tie", 1, 99)), SubmitOutcome::Rejected);
        assert_eq!(board, before);
    }

    #[test]
    fn test_eleventh_above_minimum_replaces_the_minimum() {
        let mut board = full_board();
        let outcome = board.add_entry(entry("new", 10, 99));
        assert_eq!(
            outcome,
            SubmitOutcome::Replaced {
                rank: 6,
                evicted: entry("p4", 1, 4)
            }
        );
        assert_eq!(board.len(), 10);
        assert_eq!(board.min_score(), Some(3));
    }

    #[test]
    fn test_full_board_evicts_only_one_of_tied_minimums() {
        let mut board = HighScores::new(3);
        board.add_entry(entry("a", 5, 1));
        board.add_entry(entry("b", 2, 2));
        board.add_entry(entry("c", 2, 3));
        board.add_entry(entry("d", 4, 4));

        let names: Vec<&str> = board.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "d", "b"]);
    }

    #[test]
    fn test_ties_rank_earlier_entries_first() {
        let mut board = HighScores::new(10);
        board.add_entry(entry("first", 8, 1));
        assert_eq!(
            board.add_entry(entry("second", 8, 2)),
            SubmitOutcome::Inserted { rank: 2 }
        );
        assert_eq!(
            board.add_entry(entry("third", 9, 3)),
            SubmitOutcome::Inserted { rank: 1 }
        );
        let names: Vec<&str> = board.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["third", "first", "second"]);
    }

    #[test]
    fn test_submit_trims_and_rejects_empty_names() {
        let mut board = HighScores::default();
        assert!(matches!(board.submit("   ", 4), Err(PersistenceError::EmptyName)));
        board.submit("  Ranger Smith ", 4).unwrap();
        assert_eq!(board.list().unwrap()[0].name, "Ranger Smith");
    }

    #[test]
    fn test_normalize_restores_order_and_capacity() {
        let mut board = HighScores::new(10);
        board.entries = vec![entry("x", 1, 5), entry("y", 9, 7), entry("z", 9, 2)];
        board.normalize(2);
        let names: Vec<&str> = board.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["z", "y"]);
        assert_eq!(board.capacity(), 2);
    }

    #[test]
    fn test_format_date() {
        let now = 10 * 24 * 3_600_000;
        assert_eq!(format_date(now - 30_000, now), "Just now");
        assert_eq!(format_date(now - 60_000, now), "1 min ago");
        assert_eq!(format_date(now - 5 * 60_000, now), "5 mins ago");
        assert_eq!(format_date(now - 3_600_000, now), "1 hour ago");
        assert_eq!(format_date(now - 24 * 3_600_000, now), "Yesterday");
        assert_eq!(format_date(now - 3 * 24 * 3_600_000, now), "3 days ago");
        assert_eq!(format_date(0, now), "1 week ago");
        assert_eq!(format_date(now + 1, now), "Just now");
    }
}
