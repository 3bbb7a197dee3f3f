use drill_core::model::{Exercise, ExerciseOutcome, RoundResult};

use super::pacing::AdvanceToken;
use super::progress::RoundProgress;

/// What the feedback layer is told after each answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub correct: bool,
    /// Set by an independent random draw on correct answers, marking the
    /// outcome as eligible for amplified celebration. Presentation only;
    /// never affects scoring.
    pub amplified: bool,
}

/// Progress celebrations reported to presentation collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
    Minor(u32),
    Major(u32),
    Completion(u32),
}

impl Milestone {
    /// The exercise count the milestone was reached at.
    #[must_use]
    pub fn count(&self) -> u32 {
        match self {
            Milestone::Minor(count) | Milestone::Major(count) | Milestone::Completion(count) => {
                *count
            }
        }
    }
}

/// Whether the round continues after an answer or just finished.
///
/// Either way the follow-up is scheduled, not immediate, so external
/// feedback can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerDisposition {
    AdvanceScheduled,
    RoundComplete,
}

/// Controller-level record of one accepted answer.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerRecord {
    pub outcome: ExerciseOutcome,
    pub feedback: AnswerFeedback,
    pub milestone: Option<Milestone>,
    pub disposition: AnswerDisposition,
}

/// Result of a submitted answer, as reported by the round workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitResult {
    pub feedback: AnswerFeedback,
    pub milestone: Option<Milestone>,
    pub progress: RoundProgress,
    /// Token for the scheduled continuation (next exercise or completion).
    pub advance: AdvanceToken,
    pub completes_round: bool,
}

/// Outcome of redeeming a scheduled continuation.
#[derive(Debug, Clone, PartialEq)]
pub enum RoundAdvance {
    /// The next exercise is live.
    Next(Exercise),
    /// The round finished: the persisted result plus the completion
    /// milestone for the feedback layer.
    Completed {
        result: RoundResult,
        milestone: Milestone,
    },
}
