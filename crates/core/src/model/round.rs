use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Block, Complexity, Exercise, Operation, RoundId};
use crate::scoring::RoundStats;

//
// ─── ROUND RESULT ─────────────────────────────────────────────────────────────
//

/// Aggregate result for a completed round.
///
/// Appended to the round history at completion, ids strictly increasing;
/// immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    pub round_id: RoundId,
    pub date: DateTime<Utc>,
    pub total_time_ms: u64,
    pub avg_time_ms: f64,
    pub correct: u32,
    pub incorrect: u32,
    pub correctness_rate: f64,
    pub adjusted_time_ms: u64,
    pub star_rating: u8,
}

impl RoundResult {
    /// Stamp scored statistics with their id and completion date.
    #[must_use]
    pub fn from_stats(round_id: RoundId, date: DateTime<Utc>, stats: &RoundStats) -> Self {
        Self {
            round_id,
            date,
            total_time_ms: stats.total_time_ms,
            avg_time_ms: stats.avg_time_ms,
            correct: stats.correct,
            incorrect: stats.incorrect,
            correctness_rate: stats.correctness_rate,
            adjusted_time_ms: stats.adjusted_time_ms,
            star_rating: stats.star_rating,
        }
    }
}

//
// ─── ROUND STATE ──────────────────────────────────────────────────────────────
//

/// The single piece of resumable, mutable session state.
///
/// Persisted after every transition so an interrupted round can resume;
/// reset to initial values when a round completes or a new round starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub exercise_count: u32,
    pub round_number: u32,
    pub current_exercise: Option<Exercise>,
    pub current_input: String,
    pub round_started_at: Option<DateTime<Utc>>,
    pub exercise_started_at: Option<DateTime<Utc>>,
    pub current_block: Option<Block>,
    pub block_index: usize,
    pub current_operation: Operation,
    pub current_complexity: Complexity,
}

impl RoundState {
    /// State at the top of the very first round.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            exercise_count: 0,
            round_number: 1,
            current_exercise: None,
            current_input: String::new(),
            round_started_at: None,
            exercise_started_at: None,
            current_block: None,
            block_index: 0,
            current_operation: Operation::Add,
            current_complexity: Complexity::BothSmall,
        }
    }

    /// Reset to the top of a fresh round, keeping the round number.
    pub fn reset_for_new_round(&mut self) {
        self.exercise_count = 0;
        self.current_exercise = None;
        self.current_input.clear();
        self.round_started_at = None;
        self.exercise_started_at = None;
        self.current_block = None;
        self.block_index = 0;
        self.current_operation = Operation::Add;
        self.current_complexity = Complexity::BothSmall;
    }

    /// Whether the consumption cursor has run off the current block.
    #[must_use]
    pub fn needs_new_block(&self) -> bool {
        match &self.current_block {
            None => true,
            Some(block) => block.is_exhausted(self.block_index),
        }
    }
}

impl Default for RoundState {
    fn default() -> Self {
        Self::initial()
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
