use chrono::Duration;
use tracing::{debug, info};

use drill_core::Clock;
use drill_core::model::{RoundResult, RoundSettings, RoundState, StreakInfo};
use drill_core::scoring::{self, AllTimeStats};
use storage::repository::ProgressStore;

use super::controller::RoundController;
use super::events::{AnswerDisposition, Milestone, RoundAdvance, SubmitResult};
use super::pacing::{AdvanceToken, Pacer, PendingAction};
use super::progress::{ProgressOverview, RoundProgress};
use crate::error::RoundError;

/// Orchestrates drill rounds against the persisted progress document.
///
/// Holds the working [`RoundController`] and persists its state after every
/// transition so an interrupted round can resume. Follow-up work (next
/// exercise, round completion, auto-submit) is never taken immediately:
/// it is scheduled on a [`Pacer`] and redeemed by the shell once the
/// presentation delay elapses. When persistence fails the error is reported
/// and the in-memory state stays authoritative for the session.
pub struct RoundLoopService {
    clock: Clock,
    store: ProgressStore,
    controller: RoundController,
    pacer: Pacer,
    input_pacer: Pacer,
}

impl RoundLoopService {
    /// Load persisted progress and build the service around it.
    ///
    /// # Errors
    ///
    /// Returns `RoundError::Storage` if the progress document cannot be read.
    pub async fn initialize(
        clock: Clock,
        store: ProgressStore,
        settings: RoundSettings,
    ) -> Result<Self, RoundError> {
        let document = store.load().await?;
        let outcomes = document.current_round_outcomes();
        let controller = RoundController::from_state(settings, document.current_state, outcomes);

        Ok(Self {
            clock,
            store,
            controller,
            pacer: Pacer::new(),
            input_pacer: Pacer::new(),
        })
    }

    /// Seed the controller RNGs for deterministic tests.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.controller = self.controller.with_seed(seed);
        self
    }

    #[must_use]
    pub fn round_state(&self) -> &RoundState {
        self.controller.state()
    }

    #[must_use]
    pub fn progress(&self) -> RoundProgress {
        self.controller.progress()
    }

    /// Start a brand-new round: streak credit, reset state, first exercise.
    ///
    /// # Errors
    ///
    /// Returns `RoundError::Storage` if the streak or state cannot be
    /// persisted; the in-memory round still starts.
    pub async fn start_new_round(&mut self) -> Result<(), RoundError> {
        let now = self.clock.now();
        self.pacer.cancel();
        self.input_pacer.cancel();
        self.controller.start_round(now);

        info!(
            round = self.controller.state().round_number,
            "round started"
        );
        self.store.update_streak(now).await?;
        self.store.save_state(self.controller.state()).await?;
        Ok(())
    }

    /// Re-enter an interrupted round from persisted state.
    ///
    /// # Errors
    ///
    /// Returns `RoundError::Storage` if the refreshed state cannot be
    /// persisted.
    pub async fn resume_round(&mut self) -> Result<(), RoundError> {
        let now = self.clock.now();
        self.pacer.cancel();
        self.input_pacer.cancel();
        self.controller.resume(now);

        debug!(
            round = self.controller.state().round_number,
            answered = self.controller.state().exercise_count,
            "round resumed"
        );
        self.store.save_state(self.controller.state()).await?;
        Ok(())
    }

    /// Forward a learner answer to the round.
    ///
    /// Returns `Ok(None)` when the answer is silently ignored (no live
    /// exercise, or outside [0, 99]). Otherwise the outcome is persisted and
    /// the follow-up continuation is scheduled; its token is in the result.
    ///
    /// # Errors
    ///
    /// Returns `RoundError::Storage` if the outcome or state cannot be
    /// persisted.
    pub async fn submit_answer(&mut self, answer: i32) -> Result<Option<SubmitResult>, RoundError> {
        let now = self.clock.now();
        let Some(record) = self.controller.submit_answer(answer, now) else {
            return Ok(None);
        };
        self.input_pacer.cancel();

        self.store.append_outcome(&record.outcome).await?;
        self.store.save_state(self.controller.state()).await?;

        let (action, delay_ms) = match record.disposition {
            AnswerDisposition::AdvanceScheduled => (
                PendingAction::NextExercise,
                self.controller.settings().advance_delay_ms(),
            ),
            AnswerDisposition::RoundComplete => (
                PendingAction::CompleteRound,
                self.controller.settings().completion_delay_ms(),
            ),
        };
        let due_at = now + Duration::milliseconds(i64::try_from(delay_ms).unwrap_or(i64::MAX));
        let advance = self.pacer.schedule(action, due_at);

        debug!(
            correct = record.feedback.correct,
            answered = self.controller.state().exercise_count,
            "answer recorded"
        );
        Ok(Some(SubmitResult {
            feedback: record.feedback,
            milestone: record.milestone,
            progress: self.controller.progress(),
            advance,
            completes_round: record.disposition == AnswerDisposition::RoundComplete,
        }))
    }

    /// Redeem a scheduled continuation. Superseded tokens are ignored.
    ///
    /// # Errors
    ///
    /// Returns `RoundError::Storage` if the resulting state, round, or
    /// streak cannot be persisted.
    pub async fn fire(&mut self, token: AdvanceToken) -> Result<Option<RoundAdvance>, RoundError> {
        let Some(action) = self.pacer.redeem(token) else {
            return Ok(None);
        };
        let now = self.clock.now();

        match action {
            PendingAction::NextExercise => {
                let exercise = self.controller.advance(now).cloned();
                self.store.save_state(self.controller.state()).await?;
                Ok(exercise.map(RoundAdvance::Next))
            }
            PendingAction::CompleteRound => {
                let completed = self.controller.settings().exercises_per_round();
                let stats = self.controller.complete_round();
                let result = self.store.append_round(&stats, now).await?;
                self.store.update_streak(now).await?;
                self.store.save_state(self.controller.state()).await?;

                info!(
                    round_id = result.round_id.value(),
                    stars = result.star_rating,
                    "round completed"
                );
                Ok(Some(RoundAdvance::Completed {
                    result,
                    milestone: Milestone::Completion(completed),
                }))
            }
            // Auto-submit continuations live on the input pacer.
            PendingAction::AutoSubmit => Ok(None),
        }
    }

    /// Stage the current input and invalidate any pending auto-submit.
    ///
    /// # Errors
    ///
    /// Returns `RoundError::Storage` if the state cannot be persisted.
    pub async fn set_input(&mut self, input: impl Into<String>) -> Result<(), RoundError> {
        self.input_pacer.cancel();
        self.controller.set_input(input.into());
        self.store.save_state(self.controller.state()).await?;
        Ok(())
    }

    /// Schedule an auto-submit of the staged input after the given delay.
    ///
    /// The returned token is invalidated if the input changes before it
    /// fires.
    pub fn request_auto_submit(&mut self, delay_ms: u64) -> AdvanceToken {
        let due_at = self.clock.now()
            + Duration::milliseconds(i64::try_from(delay_ms).unwrap_or(i64::MAX));
        self.input_pacer.schedule(PendingAction::AutoSubmit, due_at)
    }

    /// Fire a pending auto-submit. Stale tokens and unparseable input are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns `RoundError::Storage` if the submission cannot be persisted.
    pub async fn fire_auto_submit(
        &mut self,
        token: AdvanceToken,
    ) -> Result<Option<SubmitResult>, RoundError> {
        if self.input_pacer.redeem(token).is_none() {
            return Ok(None);
        }
        let Ok(answer) = self.controller.state().current_input.parse::<i32>() else {
            return Ok(None);
        };
        self.submit_answer(answer).await
    }

    /// The full round history in completion order.
    ///
    /// # Errors
    ///
    /// Returns `RoundError::Storage` if the history cannot be read.
    pub async fn round_history(&self) -> Result<Vec<RoundResult>, RoundError> {
        Ok(self.store.round_history().await?)
    }

    /// Aggregate statistics across all completed rounds.
    ///
    /// # Errors
    ///
    /// Returns `RoundError::Storage` if the history cannot be read.
    pub async fn all_time_stats(&self) -> Result<AllTimeStats, RoundError> {
        Ok(scoring::all_time_stats(&self.store.round_history().await?))
    }

    /// The current streak record.
    ///
    /// # Errors
    ///
    /// Returns `RoundError::Storage` if the streak cannot be read.
    pub async fn streak(&self) -> Result<StreakInfo, RoundError> {
        Ok(self.store.streak().await?)
    }

    /// One read for a results screen: aggregates, streak, and the most
    /// recent rounds, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RoundError::Storage` if the document cannot be read.
    pub async fn overview(&self, recent: usize) -> Result<ProgressOverview, RoundError> {
        let history = self.store.round_history().await?;
        let streak = self.store.streak().await?;
        let all_time = scoring::all_time_stats(&history);
        let recent_rounds = history.iter().rev().take(recent).cloned().collect();

        Ok(ProgressOverview {
            all_time,
            streak,
            recent_rounds,
        })
    }
}
