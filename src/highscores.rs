//! High score leaderboard
//!
//! Keeps the top five `(initials, score)` pairs, best first. Storage lives in
//! [`persistence`](crate::persistence).

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 5;

/// Initials are padded or cut to this many letters
pub const INITIALS_LEN: usize = 3;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub initials: String,
    pub score: u32,
}

impl HighScoreEntry {
    pub fn new(initials: &str, score: u32) -> Self {
        Self {
            initials: normalize_initials(initials),
            score,
        }
    }
}

/// Uppercase letters only, at most [`INITIALS_LEN`], blanks filled with `-`
pub fn normalize_initials(initials: &str) -> String {
    let mut letters: String = initials
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .take(INITIALS_LEN)
        .collect();
    while letters.len() < INITIALS_LEN {
        letters.push('-');
    }
    letters
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard. A score equal to the lowest entry
    /// still gets in, above it.
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score >= e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score >= e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new score to the leaderboard (if it qualifies).
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify.
    pub fn add_score(&mut self, initials: &str, score: u32) -> Option<usize> {
        let rank = self.potential_rank(score)?;
        self.entries
            .insert(rank - 1, HighScoreEntry::new(initials, score));
        self.entries.truncate(MAX_HIGH_SCORES);
        log::info!("new high score {score} at rank {rank}");
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Board as display lines: `RANK. INITIALS SCORE`
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| format!("{}. {} {}", i + 1, e.initials, e.score))
            .collect()
    }

    /// Sort best first and drop anything past the table size, e.g. after loading a hand-edited
    /// file
    pub fn normalize(&mut self) {
        for entry in &mut self.entries {
            entry.initials = normalize_initials(&entry.initials);
        }
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
    }
}
