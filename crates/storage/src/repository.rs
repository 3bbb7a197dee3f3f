use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use drill_core::model::{ExerciseOutcome, RoundResult, RoundState, StreakInfo};
use drill_core::scoring::RoundStats;

use crate::document::ProgressDocument;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Contract for the persistence medium, treated abstractly as a key-value
/// store holding one serialized document.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Load the persisted document, or `None` when nothing was stored yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be read or decoded.
    async fn load(&self) -> Result<Option<ProgressDocument>, StorageError>;

    /// Persist the full document, replacing whatever was stored before.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be written. A failed
    /// write never leaves a half-written document visible to readers.
    async fn save(&self, document: &ProgressDocument) -> Result<(), StorageError>;

    /// Remove the stored document entirely.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be removed.
    async fn clear(&self) -> Result<(), StorageError>;
}

/// Simple in-memory repository for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryProgress {
    document: Arc<Mutex<Option<ProgressDocument>>>,
}

impl InMemoryProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressRepository for InMemoryProgress {
    async fn load(&self) -> Result<Option<ProgressDocument>, StorageError> {
        let guard = self
            .document
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save(&self, document: &ProgressDocument) -> Result<(), StorageError> {
        let mut guard = self
            .document
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(document.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut guard = self
            .document
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Facade over a [`ProgressRepository`] implementing every progress
/// operation as a whole-document read-modify-write.
///
/// A missing or cleared document reads as the default empty document.
#[derive(Clone)]
pub struct ProgressStore {
    repo: Arc<dyn ProgressRepository>,
}

impl ProgressStore {
    #[must_use]
    pub fn new(repo: Arc<dyn ProgressRepository>) -> Self {
        Self { repo }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryProgress::new()))
    }

    /// Load the full document (empty default when nothing is stored).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be read.
    pub async fn load(&self) -> Result<ProgressDocument, StorageError> {
        Ok(self.repo.load().await?.unwrap_or_default())
    }

    /// Load the resumable round state.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be read.
    pub async fn load_state(&self) -> Result<RoundState, StorageError> {
        Ok(self.load().await?.current_state)
    }

    /// Persist the round state.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be read or written.
    pub async fn save_state(&self, state: &RoundState) -> Result<(), StorageError> {
        let mut document = self.load().await?;
        document.current_state = state.clone();
        self.repo.save(&document).await
    }

    /// Append an answered exercise to the global history.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be read or written.
    pub async fn append_outcome(&self, outcome: &ExerciseOutcome) -> Result<(), StorageError> {
        let mut document = self.load().await?;
        document.exercise_history.push(outcome.clone());
        self.repo.save(&document).await
    }

    /// The full exercise history in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be read.
    pub async fn outcome_history(&self) -> Result<Vec<ExerciseOutcome>, StorageError> {
        Ok(self.load().await?.exercise_history)
    }

    /// Append a completed round, assigning the next sequential round id.
    ///
    /// Returns the persisted result, stamped with its id and completion date.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be read or written.
    pub async fn append_round(
        &self,
        stats: &RoundStats,
        completed_at: DateTime<Utc>,
    ) -> Result<RoundResult, StorageError> {
        let mut document = self.load().await?;
        let result = RoundResult::from_stats(document.next_round_id(), completed_at, stats);
        document.round_history.push(result.clone());
        self.repo.save(&document).await?;
        Ok(result)
    }

    /// The full round history in insertion order, ids increasing.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be read.
    pub async fn round_history(&self) -> Result<Vec<RoundResult>, StorageError> {
        Ok(self.load().await?.round_history)
    }

    /// The current streak record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be read.
    pub async fn streak(&self) -> Result<StreakInfo, StorageError> {
        Ok(self.load().await?.streak)
    }

    /// Credit one activity event to the streak and return the updated record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be read or written.
    pub async fn update_streak(&self, now: DateTime<Utc>) -> Result<StreakInfo, StorageError> {
        let mut document = self.load().await?;
        document.streak.record_activity(now);
        self.repo.save(&document).await?;
        Ok(document.streak)
    }

    /// Drop all stored progress; subsequent reads see the default document.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be removed.
    pub async fn clear_all(&self) -> Result<(), StorageError> {
        tracing::info!("clearing all stored progress");
        self.repo.clear().await
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use drill_core::model::{Complexity, Exercise, Operation, RoundId};
    use drill_core::time::fixed_now;

    fn outcome(a: u32, correct: bool) -> ExerciseOutcome {
        let exercise = Exercise::new(a, 2, Operation::Add, Complexity::BothSmall).unwrap();
        ExerciseOutcome::new(exercise, 1_500, correct, fixed_now())
    }

    #[tokio::test]
    async fn missing_document_reads_as_the_empty_default() {
        let store = ProgressStore::in_memory();

        assert_eq!(store.load_state().await.unwrap(), RoundState::initial());
        assert!(store.outcome_history().await.unwrap().is_empty());
        assert!(store.round_history().await.unwrap().is_empty());
        assert_eq!(store.streak().await.unwrap().current, 0);
    }

    #[tokio::test]
    async fn state_round_trips_through_the_store() {
        let store = ProgressStore::in_memory();
        let mut state = RoundState::initial();
        state.exercise_count = 12;
        state.round_number = 2;
        state.current_operation = Operation::Subtract;

        store.save_state(&state).await.unwrap();

        assert_eq!(store.load_state().await.unwrap(), state);
    }

    #[tokio::test]
    async fn outcomes_append_in_insertion_order() {
        let store = ProgressStore::in_memory();
        store.append_outcome(&outcome(3, true)).await.unwrap();
        store.append_outcome(&outcome(5, false)).await.unwrap();

        let history = store.outcome_history().await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].exercise.a, 3);
        assert_eq!(history[1].exercise.a, 5);
    }

    #[tokio::test]
    async fn rounds_receive_sequential_ids_from_one() {
        let store = ProgressStore::in_memory();
        let stats = RoundStats::default();

        let first = store.append_round(&stats, fixed_now()).await.unwrap();
        let second = store.append_round(&stats, fixed_now()).await.unwrap();
        let third = store.append_round(&stats, fixed_now()).await.unwrap();

        assert_eq!(first.round_id, RoundId::new(1));
        assert_eq!(second.round_id, RoundId::new(2));
        assert_eq!(third.round_id, RoundId::new(3));

        let history = store.round_history().await.unwrap();
        assert_eq!(history.len(), 3);
        assert!(history.windows(2).all(|w| w[0].round_id < w[1].round_id));
    }

    #[tokio::test]
    async fn streak_updates_persist_across_reads() {
        let store = ProgressStore::in_memory();
        let start = fixed_now();

        let updated = store.update_streak(start).await.unwrap();
        assert_eq!(updated.current, 1);

        let updated = store.update_streak(start + Duration::days(1)).await.unwrap();
        assert_eq!(updated.current, 2);

        assert_eq!(store.streak().await.unwrap().current, 2);
    }

    #[tokio::test]
    async fn clear_all_returns_to_the_default_document() {
        let store = ProgressStore::in_memory();
        store.append_outcome(&outcome(1, true)).await.unwrap();
        store
            .append_round(&RoundStats::default(), fixed_now())
            .await
            .unwrap();
        store.update_streak(fixed_now()).await.unwrap();

        store.clear_all().await.unwrap();

        assert!(store.outcome_history().await.unwrap().is_empty());
        assert!(store.round_history().await.unwrap().is_empty());
        assert_eq!(store.streak().await.unwrap().current, 0);
        assert_eq!(store.load_state().await.unwrap(), RoundState::initial());
    }

    #[tokio::test]
    async fn layered_writes_do_not_lose_updates() {
        let store = ProgressStore::in_memory();

        store.append_outcome(&outcome(4, true)).await.unwrap();
        let mut state = RoundState::initial();
        state.exercise_count = 1;
        store.save_state(&state).await.unwrap();
        store.update_streak(fixed_now()).await.unwrap();

        // Each write re-read the whole document, so all three survive.
        let document = store.load().await.unwrap();
        assert_eq!(document.exercise_history.len(), 1);
        assert_eq!(document.current_state.exercise_count, 1);
        assert_eq!(document.streak.current, 1);
    }
}
