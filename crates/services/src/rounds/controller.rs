use chrono::{DateTime, Utc};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::fmt;

use drill_core::generator::ExerciseGenerator;
use drill_core::model::{Exercise, ExerciseOutcome, Operation, RoundSettings, RoundState};
use drill_core::scoring::{self, RoundStats};
use drill_core::time::elapsed_ms;

use super::events::{AnswerDisposition, AnswerFeedback, AnswerRecord, Milestone};
use super::progress::RoundProgress;

/// In-memory working copy of one learner's drill round.
///
/// Drives the `Idle → InRound → RoundComplete` state machine: consumes the
/// generator block-by-block, books answers, and reports milestones. The
/// caller supplies `now` from the services clock and persists the state
/// after every transition.
pub struct RoundController {
    settings: RoundSettings,
    state: RoundState,
    outcomes: Vec<ExerciseOutcome>,
    generator: ExerciseGenerator,
    reward_rng: SmallRng,
}

impl RoundController {
    #[must_use]
    pub fn new(settings: RoundSettings) -> Self {
        Self::from_state(settings, RoundState::initial(), Vec::new())
    }

    /// Rebuild a controller around persisted state, e.g. to resume an
    /// interrupted round.
    #[must_use]
    pub fn from_state(
        settings: RoundSettings,
        state: RoundState,
        outcomes: Vec<ExerciseOutcome>,
    ) -> Self {
        Self {
            settings,
            state,
            outcomes,
            generator: ExerciseGenerator::new(),
            reward_rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }

    /// Replace both RNGs with seeded ones for deterministic tests.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.generator = ExerciseGenerator::seeded(seed);
        self.reward_rng = SmallRng::seed_from_u64(seed.wrapping_add(1));
        self
    }

    #[must_use]
    pub fn settings(&self) -> &RoundSettings {
        &self.settings
    }

    #[must_use]
    pub fn state(&self) -> &RoundState {
        &self.state
    }

    /// Outcomes recorded so far in the current round.
    #[must_use]
    pub fn outcomes(&self) -> &[ExerciseOutcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn current_exercise(&self) -> Option<&Exercise> {
        self.state.current_exercise.as_ref()
    }

    #[must_use]
    pub fn is_round_complete(&self) -> bool {
        self.state.exercise_count >= self.settings.exercises_per_round()
    }

    #[must_use]
    pub fn progress(&self) -> RoundProgress {
        let total = self.settings.exercises_per_round();
        RoundProgress {
            answered: self.state.exercise_count,
            total,
            remaining: total.saturating_sub(self.state.exercise_count),
            is_complete: self.is_round_complete(),
        }
    }

    /// Stage partial learner input; persisted with the state so it survives
    /// interruption.
    pub fn set_input(&mut self, input: String) {
        self.state.current_input = input;
    }

    /// Begin a fresh round: counters and buffers cleared, operation and
    /// complexity reset, round timer started, first exercise live.
    pub fn start_round(&mut self, now: DateTime<Utc>) -> Option<&Exercise> {
        self.state.reset_for_new_round();
        self.outcomes.clear();
        self.state.round_started_at = Some(now);
        self.advance(now)
    }

    /// Re-enter an interrupted round.
    ///
    /// A persisted live exercise is kept as-is (its timer restarts at resume
    /// time); otherwise the next exercise is generated from the persisted
    /// block/operation/complexity cursor.
    pub fn resume(&mut self, now: DateTime<Utc>) -> Option<&Exercise> {
        if self.state.round_started_at.is_none() {
            self.state.round_started_at = Some(now);
        }

        if self.state.current_exercise.is_some() {
            self.state.exercise_started_at = Some(now);
            self.state.current_exercise.as_ref()
        } else {
            self.advance(now)
        }
    }

    /// Move to the next exercise, opening a new block at block boundaries.
    ///
    /// The first exercise of a round is always addition; afterwards the
    /// operation alternates from the previous block's. Complexity follows
    /// the staged policy for the upcoming 1-based position. Returns `None`
    /// once the round is complete.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Option<&Exercise> {
        if self.is_round_complete() {
            return None;
        }

        if self.state.needs_new_block() {
            let operation = if self.state.exercise_count == 0 {
                Operation::Add
            } else {
                self.state.current_operation.other()
            };
            let complexity = self
                .generator
                .select_complexity(self.state.exercise_count + 1);
            let block = self.generator.generate_block(operation, complexity);

            self.state.current_operation = operation;
            self.state.current_complexity = complexity;
            self.state.current_block = Some(block);
            self.state.block_index = 0;
        }

        self.state.current_exercise = self
            .state
            .current_block
            .as_ref()
            .and_then(|block| block.get(self.state.block_index))
            .cloned();
        self.state.exercise_started_at = Some(now);
        self.state.current_input.clear();
        self.state.current_exercise.as_ref()
    }

    /// Record an answer for the live exercise.
    ///
    /// Returns `None`, with no state change, when there is no live exercise
    /// or the answer lies outside [0, 99]. Otherwise the outcome is booked,
    /// counters move, and the record says whether the next step is another
    /// exercise or round completion — both to be scheduled, not taken
    /// immediately.
    pub fn submit_answer(&mut self, answer: i32, now: DateTime<Utc>) -> Option<AnswerRecord> {
        if !(0..=99).contains(&answer) {
            return None;
        }
        let answer = u32::try_from(answer).ok()?;
        let exercise = self.state.current_exercise.take()?;

        let correct = exercise.is_correct(answer);
        let elapsed = self
            .state
            .exercise_started_at
            .map_or(0, |started| elapsed_ms(started, now));
        let amplified = correct && self.reward_rng.random_bool(self.settings.reward_probability());

        let outcome = ExerciseOutcome::new(exercise, elapsed, correct, now);
        self.outcomes.push(outcome.clone());

        self.state.exercise_count += 1;
        self.state.block_index += 1;
        self.state.current_input.clear();
        self.state.exercise_started_at = None;

        let disposition = if self.is_round_complete() {
            AnswerDisposition::RoundComplete
        } else {
            AnswerDisposition::AdvanceScheduled
        };

        Some(AnswerRecord {
            outcome,
            feedback: AnswerFeedback { correct, amplified },
            milestone: self.milestone_for(self.state.exercise_count),
            disposition,
        })
    }

    /// Score the finished round and reset the working state for the next
    /// one. The caller persists the result and updates the streak.
    pub fn complete_round(&mut self) -> RoundStats {
        let stats = scoring::score_round(&self.outcomes);

        self.outcomes.clear();
        self.state.round_number += 1;
        self.state.exercise_count = 0;
        self.state.current_exercise = None;
        self.state.current_input.clear();
        self.state.round_started_at = None;
        self.state.exercise_started_at = None;
        self.state.current_block = None;
        self.state.block_index = 0;

        stats
    }

    fn milestone_for(&self, count: u32) -> Option<Milestone> {
        if count == self.settings.minor_milestone() {
            Some(Milestone::Minor(count))
        } else if count == self.settings.major_milestone() {
            Some(Milestone::Major(count))
        } else {
            None
        }
    }
}

impl fmt::Debug for RoundController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoundController")
            .field("round_number", &self.state.round_number)
            .field("exercise_count", &self.state.exercise_count)
            .field("block_index", &self.state.block_index)
            .field("outcomes_len", &self.outcomes.len())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
