use crate::{
    errors::FacadeError,
    types::{ImageFields, InsertOutcome},
};
use std::fmt::{self, Debug};
use tracing::{debug, info, warn};
use turso::{params, Database, Value as TursoValue};

pub mod sql;

/// A provider for interacting with the local image archive using Turso.
///
/// This provider holds a `Database` instance, which manages a connection
/// pool. When cloned, it shares the same underlying database, allowing for
/// shared access to the same database file or in-memory instance.
///
/// Every operation acquires its own connection via `db.connect()` and
/// releases it on drop, on every exit path including the duplicate-key one.
#[derive(Clone)]
pub struct SqliteProvider {
    /// The Turso database instance. It's cloneable and thread-safe.
    pub db: Database,
}

impl SqliteProvider {
    /// Creates a new `SqliteProvider` from a file path or in-memory.
    ///
    /// # Arguments
    ///
    /// * `db_path`: The path to the SQLite database file. Use ":memory:" for
    ///   a unique, isolated in-memory database. To share an in-memory
    ///   database across multiple `SqliteProvider` instances (e.g., in
    ///   tests), create one provider and then `.clone()` it.
    pub async fn new(db_path: &str) -> Result<Self, FacadeError> {
        let db = turso::Builder::new_local(db_path)
            .build()
            .await
            .map_err(|e| FacadeError::StorageConnection(e.to_string()))?;

        // WAL mode helps file-based databases; it is a safe no-op in memory.
        let conn = db
            .connect()
            .map_err(|e| FacadeError::StorageConnection(e.to_string()))?;
        // Use `query` for PRAGMA statements that return a value to avoid "unexpected row" errors.
        conn.query("PRAGMA journal_mode=WAL;", ())
            .await
            .map_err(|e| FacadeError::StorageConnection(e.to_string()))?;

        Ok(Self { db })
    }

    /// Ensures that all required application tables exist.
    /// This function is idempotent and safe to call on every application startup.
    pub async fn initialize_schema(&self) -> Result<(), FacadeError> {
        let conn = self
            .db
            .connect()
            .map_err(|e| FacadeError::StorageConnection(e.to_string()))?;

        for statement in sql::ALL_TABLE_CREATION_SQL {
            conn.execute(statement, ())
                .await
                .map_err(|e| FacadeError::StorageOperationFailed(e.to_string()))?;
        }
        Ok(())
    }

    /// Returns true iff a record with this exact image name is present.
    ///
    /// Pure read with no side effect; the ingestion pipeline calls this
    /// before extraction to avoid redundant external calls.
    pub async fn image_exists(&self, image_name: &str) -> Result<bool, FacadeError> {
        debug!(image_name = %image_name, "Checking archive for existing record");

        let conn = self
            .db
            .connect()
            .map_err(|e| FacadeError::StorageConnection(e.to_string()))?;

        let mut rows = conn
            .query(sql::IMAGE_EXISTS, params![image_name.to_string()])
            .await
            .map_err(|e| FacadeError::StorageOperationFailed(e.to_string()))?;

        let row = rows
            .next()
            .await
            .map_err(|e| FacadeError::StorageOperationFailed(e.to_string()))?
            .ok_or_else(|| {
                FacadeError::StorageOperationFailed("COUNT query returned no row".to_string())
            })?;

        match row
            .get_value(0)
            .map_err(|e| FacadeError::StorageOperationFailed(e.to_string()))?
        {
            TursoValue::Integer(count) => Ok(count > 0),
            other => Err(FacadeError::StorageOperationFailed(format!(
                "Expected integer count, got {other:?}"
            ))),
        }
    }

    /// Attempts to persist one analyzed image.
    ///
    /// A violation of the `image_name` UNIQUE constraint is reported as
    /// `InsertOutcome::DuplicateSkipped`, not as an error: it is the expected
    /// result of the check-then-act race between a stale `image_exists` and
    /// this insert. Any other storage error propagates.
    pub async fn insert_image(
        &self,
        image_name: &str,
        fields: &ImageFields,
    ) -> Result<InsertOutcome, FacadeError> {
        let conn = self
            .db
            .connect()
            .map_err(|e| FacadeError::StorageConnection(e.to_string()))?;

        let insert_params = params![
            image_name.to_string(),
            fields.title.clone(),
            fields.buildings.clone(),
            fields.description.clone()
        ];

        match conn.execute(sql::INSERT_IMAGE, insert_params).await {
            Ok(_) => {
                info!(image_name = %image_name, "Archived analyzed image");
                Ok(InsertOutcome::Inserted)
            }
            Err(turso::Error::SqlExecutionFailure(msg))
                if msg.contains("UNIQUE constraint failed") =>
            {
                warn!(image_name = %image_name, "Image already archived, skipping insert");
                Ok(InsertOutcome::DuplicateSkipped)
            }
            Err(e) => Err(FacadeError::StorageOperationFailed(e.to_string())),
        }
    }
}

impl Debug for SqliteProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteProvider").finish_non_exhaustive()
    }
}

impl AsRef<Database> for SqliteProvider {
    fn as_ref(&self) -> &Database {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_i64(value: TursoValue) -> i64 {
        match value {
            TursoValue::Integer(i) => i,
            other => panic!("expected an integer, got {other:?}"),
        }
    }

    fn as_text(value: TursoValue) -> String {
        match value {
            TursoValue::Text(s) => s,
            other => panic!("expected text, got {other:?}"),
        }
    }

    fn sample_fields() -> ImageFields {
        ImageFields {
            title: "Old town hall".to_string(),
            buildings: "Town hall, clock tower".to_string(),
            description: "A market square at dusk".to_string(),
        }
    }

    async fn provider() -> SqliteProvider {
        let provider = SqliteProvider::new(":memory:").await.unwrap();
        provider.initialize_schema().await.unwrap();
        provider
    }

    #[tokio::test]
    async fn test_initialize_schema_is_idempotent() {
        let provider = provider().await;
        provider
            .insert_image("a.jpg", &sample_fields())
            .await
            .unwrap();

        // A second initialization must not touch existing rows.
        provider.initialize_schema().await.unwrap();

        assert!(provider.image_exists("a.jpg").await.unwrap());
    }

    #[tokio::test]
    async fn test_exists_before_and_after_insert() {
        let provider = provider().await;
        assert!(!provider.image_exists("a.jpg").await.unwrap());

        let outcome = provider
            .insert_image("a.jpg", &sample_fields())
            .await
            .unwrap();
        assert_eq!(outcome, InsertOutcome::Inserted);

        assert!(provider.image_exists("a.jpg").await.unwrap());
        // Dedup key is byte-sensitive; a differently cased name is distinct.
        assert!(!provider.image_exists("A.jpg").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_skipped_not_fatal() {
        let provider = provider().await;
        provider
            .insert_image("a.jpg", &sample_fields())
            .await
            .unwrap();

        let outcome = provider
            .insert_image("a.jpg", &sample_fields())
            .await
            .unwrap();
        assert_eq!(outcome, InsertOutcome::DuplicateSkipped);

        // Exactly one row persisted.
        let conn = provider.db.connect().unwrap();
        let mut rows = conn
            .query("SELECT COUNT(*) FROM image_data", ())
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(as_i64(row.get_value(0).unwrap()), 1);
    }

    #[tokio::test]
    async fn test_ids_increase_in_insert_order_and_time_added_is_set() {
        let provider = provider().await;
        provider
            .insert_image("a.jpg", &sample_fields())
            .await
            .unwrap();
        provider
            .insert_image("b.jpg", &sample_fields())
            .await
            .unwrap();

        let conn = provider.db.connect().unwrap();
        let mut rows = conn
            .query(
                "SELECT id, image_name, time_added FROM image_data ORDER BY id ASC",
                (),
            )
            .await
            .unwrap();

        let first = rows.next().await.unwrap().unwrap();
        assert_eq!(as_i64(first.get_value(0).unwrap()), 1);
        assert_eq!(as_text(first.get_value(1).unwrap()), "a.jpg");
        let ts = as_text(first.get_value(2).unwrap());
        assert!(!ts.is_empty(), "time_added should be assigned");

        let second = rows.next().await.unwrap().unwrap();
        assert_eq!(as_i64(second.get_value(0).unwrap()), 2);
        assert_eq!(as_text(second.get_value(1).unwrap()), "b.jpg");
    }
}
