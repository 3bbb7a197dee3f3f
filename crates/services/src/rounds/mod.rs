mod controller;
mod events;
mod pacing;
mod progress;
mod workflow;

// Public API of the round subsystem.
pub use crate::error::RoundError;
pub use controller::RoundController;
pub use events::{
    AnswerDisposition, AnswerFeedback, AnswerRecord, Milestone, RoundAdvance, SubmitResult,
};
pub use pacing::{AdvanceToken, Pacer, PendingAction};
pub use progress::{ProgressOverview, RoundProgress};
pub use workflow::RoundLoopService;
