//! Shared error types for the services crate.

use thiserror::Error;

use drill_core::model::SettingsError;
use storage::repository::StorageError;

/// Errors emitted by the round services.
///
/// Persistence failures are reported to the caller while the in-memory state
/// stays authoritative for the session; nothing here is fatal.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RoundError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
