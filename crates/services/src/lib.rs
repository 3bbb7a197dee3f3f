#![forbid(unsafe_code)]

pub mod error;
pub mod rounds;

pub use drill_core::Clock;

pub use error::RoundError;
pub use rounds::{
    AdvanceToken, AnswerDisposition, AnswerFeedback, AnswerRecord, Milestone, Pacer,
    PendingAction, ProgressOverview, RoundAdvance, RoundController, RoundLoopService,
    RoundProgress, SubmitResult,
};
