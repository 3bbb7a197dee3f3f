mod block;
mod exercise;
mod ids;
mod outcome;
mod round;
mod settings;
mod streak;

pub use block::{BLOCK_SIZE, Block, BlockError};
pub use exercise::{Complexity, Exercise, ExerciseError, Operation};
pub use ids::RoundId;
pub use outcome::ExerciseOutcome;
pub use round::{RoundResult, RoundState};
pub use settings::{RoundSettings, SettingsError};
pub use streak::StreakInfo;
