use sqlx::Row;
use tracing::debug;

use super::SqliteProgress;
use crate::document::ProgressDocument;
use crate::repository::{ProgressRepository, StorageError};

fn conn(e: sqlx::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

#[async_trait::async_trait]
impl ProgressRepository for SqliteProgress {
    async fn load(&self) -> Result<Option<ProgressDocument>, StorageError> {
        let row = sqlx::query("SELECT doc FROM progress_documents WHERE id = 1")
            .fetch_optional(self.pool())
            .await
            .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let payload: String = row.try_get("doc").map_err(ser)?;
        let document = serde_json::from_str(&payload).map_err(ser)?;
        Ok(Some(document))
    }

    async fn save(&self, document: &ProgressDocument) -> Result<(), StorageError> {
        let payload = serde_json::to_string(document).map_err(ser)?;

        sqlx::query(
            r"
                INSERT INTO progress_documents (id, doc, updated_at)
                VALUES (1, ?1, ?2)
                ON CONFLICT(id) DO UPDATE SET
                    doc = excluded.doc,
                    updated_at = excluded.updated_at
            ",
        )
        .bind(payload)
        .bind(chrono::Utc::now())
        .execute(self.pool())
        .await
        .map_err(conn)?;

        debug!(
            outcomes = document.exercise_history.len(),
            rounds = document.round_history.len(),
            "progress document persisted"
        );
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM progress_documents")
            .execute(self.pool())
            .await
            .map_err(conn)?;
        Ok(())
    }
}
