//! High score leaderboard
//!
//! Keeps the top 10 runs, best first. Equal scores keep their insertion
//! order, so an older run stays ahead of a newer one with the same score.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub score: u64,
    /// Level reached
    pub level: u32,
    /// Final snake length
    pub length: u32,
    /// Difficulty label the run was played on
    pub difficulty: String,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score would make it onto the board
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert an entry, keeping the board sorted and trimmed.
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify.
    pub fn insert(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        let rank = self.potential_rank(entry.score)?;
        self.entries.insert(rank - 1, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Re-establish ordering and size after loading untrusted data
    pub fn normalize(&mut self) {
        // sort_by is stable, so equal scores keep their stored order
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
    }
}

/// Medal or ordinal shown next to a leaderboard row
pub fn rank_label(rank: usize) -> String {
    match rank {
        1 => "🥇".to_string(),
        2 => "🥈".to_string(),
        3 => "🥉".to_string(),
        n => format!("{}.", n),
    }
}

/// Format a timestamp as a relative date string
#[cfg(target_arch = "wasm32")]
pub fn format_date(timestamp: f64) -> String {
    let now = js_sys::Date::now();
    let diff_days = (now - timestamp) / 86_400_000.0;

    if diff_days < 1.0 {
        "Today".to_string()
    } else if diff_days < 2.0 {
        "Yesterday".to_string()
    } else if diff_days < 7.0 {
        format!("{} days ago", diff_days.floor() as i32)
    } else {
        let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(timestamp));
        format!(
            "{}/{}/{}",
            date.get_date(),
            date.get_month() + 1,
            date.get_full_year()
        )
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn format_date(_timestamp: f64) -> String {
    "N/A".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(score: u64, level: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            score,
            level,
            length: 3,
            difficulty: "medium".to_string(),
            timestamp: 0.0,
        }
    }

    #[test]
    fn test_insert_sorted_descending() {
        let mut board = Leaderboard::new();
        assert_eq!(board.insert(entry(30, 1)), Some(1));
        assert_eq!(board.insert(entry(50, 2)), Some(1));
        assert_eq!(board.insert(entry(40, 1)), Some(2));

        let scores: Vec<u64> = board.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![50, 40, 30]);
        assert_eq!(board.top_score(), Some(50));
    }

    #[test]
    fn test_keeps_top_ten_with_stable_ties() {
        let mut board = Leaderboard::new();
        let scores = [10, 80, 30, 30, 60, 20, 30, 90, 0, 70, 30];
        // level doubles as an insertion tag
        for (i, score) in scores.iter().enumerate() {
            board.insert(entry(*score, i as u32));
        }

        assert_eq!(board.len(), MAX_HIGH_SCORES);
        let kept: Vec<(u64, u32)> = board.entries.iter().map(|e| (e.score, e.level)).collect();
        assert_eq!(
            kept,
            vec![
                (90, 7),
                (80, 1),
                (70, 9),
                (60, 4),
                (30, 2),
                (30, 3),
                (30, 6),
                (30, 10),
                (20, 5),
                (10, 0),
            ]
        );
    }

    #[test]
    fn test_full_board_rejects_tie_with_last() {
        let mut board = Leaderboard::new();
        for score in (1..=10).map(|s| s * 10) {
            board.insert(entry(score, 1));
        }
        assert!(!board.qualifies(10));
        assert_eq!(board.insert(entry(10, 1)), None);
        assert_eq!(board.potential_rank(55), Some(6));
        assert_eq!(board.insert(entry(55, 1)), Some(6));
        assert_eq!(board.entries.last().map(|e| e.score), Some(20));
    }

    #[test]
    fn test_zero_score_recorded_on_empty_board() {
        let mut board = Leaderboard::new();
        assert_eq!(board.insert(entry(0, 1)), Some(1));
    }

    #[test]
    fn test_normalize_untrusted() {
        let mut board = Leaderboard {
            entries: (0..12).map(|i| entry(i * 5, i as u32)).collect(),
        };
        board.normalize();
        assert_eq!(board.len(), MAX_HIGH_SCORES);
        assert_eq!(board.top_score(), Some(55));
        assert_eq!(board.entries.last().map(|e| e.score), Some(10));
    }

    #[test]
    fn test_rank_labels() {
        assert_eq!(rank_label(1), "🥇");
        assert_eq!(rank_label(4), "4.");
    }
}
