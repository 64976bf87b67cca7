//! High score leaderboard system
//!
//! Keeps the top scores for every (mode, difficulty) pair. How the table is
//! stored is up to the host; it only needs to be serializable.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::sim::{ScoreReport, ScoreSink};
use crate::tuning::{Difficulty, GameMode};

/// Maximum number of high scores kept per table
pub const MAX_HIGH_SCORES: usize = 5;

/// Name recorded when the score arrives through [`ScoreSink`]
pub const DEFAULT_NAME: &str = "Player";

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    /// Seconds survived or coins collected
    pub score: u32,
}

/// High score leaderboard, sorted descending per table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighScores {
    tables: HashMap<GameMode, HashMap<Difficulty, Vec<HighScoreEntry>>>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries for one table, best first
    pub fn scores(&self, mode: GameMode, difficulty: Difficulty) -> &[HighScoreEntry] {
        self.tables
            .get(&mode)
            .and_then(|t| t.get(&difficulty))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, mode: GameMode, difficulty: Difficulty, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        let scores = self.scores(mode, difficulty);
        if scores.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        scores.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the 0-based rank achieved or None if it didn't qualify
    pub fn add_score(
        &mut self,
        mode: GameMode,
        difficulty: Difficulty,
        name: &str,
        score: u32,
    ) -> Option<usize> {
        if !self.qualifies(mode, difficulty, score) {
            return None;
        }

        let entries = self
            .tables
            .entry(mode)
            .or_default()
            .entry(difficulty)
            .or_default();
        let entry = HighScoreEntry {
            name: name.to_string(),
            score,
        };

        // Ties go below existing entries
        let rank = entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(entries.len());
        entries.insert(rank, entry);
        entries.truncate(MAX_HIGH_SCORES);

        log::info!(
            "High score #{} in {}/{}: {} ({})",
            rank + 1,
            mode.as_str(),
            difficulty.as_str(),
            score,
            name
        );
        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.tables
            .values()
            .flat_map(|t| t.values())
            .all(|entries| entries.is_empty())
    }

    /// Get the top score of a table (if any)
    pub fn top_score(&self, mode: GameMode, difficulty: Difficulty) -> Option<u32> {
        self.scores(mode, difficulty).first().map(|e| e.score)
    }
}

impl ScoreSink for HighScores {
    fn submit_score(&mut self, report: ScoreReport) {
        self.add_score(report.mode, report.difficulty, DEFAULT_NAME, report.score);
    }
}
