//! High score leaderboard system
//!
//! Keeps the top 10 runs ranked by score (descending), with faster clear
//! times winning ties. Storage is someone else's problem; see
//! [`crate::persistence`].

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Name typed at the end of the run
    pub name: String,
    /// Player's score
    pub score: u64,
    /// Seconds of play the score took
    pub elapsed_seconds: f64,
}

impl ScoreRecord {
    pub fn new(name: impl Into<String>, score: u64, elapsed_seconds: f64) -> Self {
        Self {
            name: name.into(),
            score,
            elapsed_seconds,
        }
    }
}

/// Ranking key: higher score first, then shorter time.
///
/// `Ordering::Less` means `a` ranks above `b`.
pub fn ranking_order(a_score: u64, a_elapsed: f64, b_score: u64, b_elapsed: f64) -> Ordering {
    b_score
        .cmp(&a_score)
        .then_with(|| a_elapsed.total_cmp(&b_elapsed))
}

fn record_order(a: &ScoreRecord, b: &ScoreRecord) -> Ordering {
    ranking_order(a.score, a.elapsed_seconds, b.score, b.elapsed_seconds)
}

/// True if a run with `(score, elapsed)` earns a place among `records`.
///
/// `records` must already be ranked. An exact tie with the last place does not
/// displace it.
pub fn rank_qualifies(score: u64, elapsed: f64, records: &[ScoreRecord]) -> bool {
    if records.len() < MAX_HIGH_SCORES {
        return true;
    }
    records
        .get(MAX_HIGH_SCORES - 1)
        .map(|last| {
            ranking_order(score, elapsed, last.score, last.elapsed_seconds) == Ordering::Less
        })
        .unwrap_or(true)
}

/// Append, re-rank and truncate to [`MAX_HIGH_SCORES`].
pub fn insert(record: ScoreRecord, mut records: Vec<ScoreRecord>) -> Vec<ScoreRecord> {
    records.push(record);
    normalize(&mut records);
    records
}

/// Sort by the ranking key and drop anything past tenth place.
///
/// The sort is stable, so among identical keys the earlier record keeps the
/// better rank.
pub fn normalize(records: &mut Vec<ScoreRecord>) {
    records.sort_by(record_order);
    records.truncate(MAX_HIGH_SCORES);
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Leaderboard {
    entries: Vec<ScoreRecord>,
}

impl Leaderboard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build from records of unknown order (e.g. freshly loaded from disk)
    pub fn from_records(mut records: Vec<ScoreRecord>) -> Self {
        normalize(&mut records);
        Self { entries: records }
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.entries
    }

    /// Check if a run qualifies for the leaderboard
    pub fn qualifies(&self, score: u64, elapsed: f64) -> bool {
        rank_qualifies(score, elapsed, &self.entries)
    }

    /// Get the rank a run would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64, elapsed: f64) -> Option<usize> {
        if !self.qualifies(score, elapsed) {
            return None;
        }
        let rank = self.entries.iter().position(|e| {
            ranking_order(score, elapsed, e.score, e.elapsed_seconds) == Ordering::Less
        });
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a record to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add(&mut self, record: ScoreRecord) -> Option<usize> {
        let rank = self.potential_rank(record.score, record.elapsed_seconds)?;
        let entries = std::mem::take(&mut self.entries);
        self.entries = insert(record, entries);
        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}
