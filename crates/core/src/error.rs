use thiserror::Error;

use crate::model::{BlockError, ExerciseError, SettingsError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Exercise(#[from] ExerciseError),
    #[error(transparent)]
    Block(#[from] BlockError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
