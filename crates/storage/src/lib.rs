#![forbid(unsafe_code)]

pub mod document;
pub mod repository;
pub mod sqlite;

pub use document::ProgressDocument;
pub use repository::{InMemoryProgress, ProgressRepository, ProgressStore, StorageError};
