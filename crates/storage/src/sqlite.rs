//! SQLite adapter for simulation storage.
//!
//! `data` is kept as JSON text and parsed on read. `created_at` is filled
//! by SQLite's `CURRENT_TIMESTAMP`, so the stored format is
//! `YYYY-MM-DD HH:MM:SS` in UTC.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

use crate::error::StorageError;
use crate::record::{NewSimulation, SimulationRecord};
use crate::traits::SimulationStore;

const CREATE_SIMULATIONS: &str = r#"
    CREATE TABLE IF NOT EXISTS simulations (
        id TEXT PRIMARY KEY NOT NULL,
        user_id TEXT NOT NULL,
        env_id TEXT NOT NULL,
        data_hash TEXT NOT NULL,
        data TEXT NOT NULL,
        result REAL NOT NULL,
        summary TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
"#;

const INSERT_SIMULATION: &str = r#"
    INSERT INTO simulations (id, user_id, env_id, data_hash, data, result, summary, created_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)
"#;

const SELECT_SIMULATION: &str = r#"
    SELECT id, user_id, env_id, data_hash, data, result, summary, created_at
    FROM simulations
    WHERE id = ?
"#;

/// SQLite-backed simulation store.
#[derive(Clone)]
pub struct SqliteSimulationStore {
    pool: SqlitePool,
}

impl SqliteSimulationStore {
    /// Connect to SQLite and create the `simulations` table if needed.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        Self::connect_with_options(database_url, 5, 5).await
    }

    /// Connect with explicit pool parameters.
    pub async fn connect_with_options(
        database_url: &str,
        max_connections: u32,
        connect_timeout_secs: u64,
    ) -> Result<Self, StorageError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(connect_timeout_secs))
            .connect(database_url)
            .await
            .map_err(|e| StorageError::Backend(format!("failed to connect sqlite: {e}")))?;
        Self::from_pool(pool).await
    }

    /// Private in-memory database.
    ///
    /// Every SQLite `:memory:` connection is its own database, so the pool is
    /// pinned to one connection that is never recycled.
    pub async fn in_memory() -> Result<Self, StorageError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| StorageError::Backend(format!("failed to open in-memory sqlite: {e}")))?;
        Self::from_pool(pool).await
    }

    /// Create adapter from an existing pool.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StorageError> {
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn init_schema(&self) -> Result<(), StorageError> {
        sqlx::query(CREATE_SIMULATIONS)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Backend(format!("schema init failed: {e}")))?;
        Ok(())
    }
}

fn insert_error(err: sqlx::Error, id: &str) -> StorageError {
    match err.as_database_error() {
        Some(db) if db.is_unique_violation() => StorageError::AlreadyExists { id: id.to_string() },
        _ => StorageError::Backend(format!("insert failed: {err}")),
    }
}

fn decode_row(row: &SqliteRow) -> Result<SimulationRecord, StorageError> {
    let get = |e: sqlx::Error| StorageError::Backend(format!("decode failed: {e}"));
    let data: String = row.try_get("data").map_err(get)?;
    let data = serde_json::from_str(&data)
        .map_err(|e| StorageError::Backend(format!("stored data is not valid JSON: {e}")))?;

    Ok(SimulationRecord {
        id: row.try_get("id").map_err(get)?,
        user_id: row.try_get("user_id").map_err(get)?,
        env_id: row.try_get("env_id").map_err(get)?,
        data_hash: row.try_get("data_hash").map_err(get)?,
        data,
        result: row.try_get("result").map_err(get)?,
        summary: row.try_get("summary").map_err(get)?,
        created_at: row.try_get("created_at").map_err(get)?,
    })
}

#[async_trait]
impl SimulationStore for SqliteSimulationStore {
    async fn insert_simulation(&self, record: NewSimulation) -> Result<(), StorageError> {
        let data = serde_json::to_string(&record.data)
            .map_err(|e| StorageError::Backend(format!("failed to serialize data: {e}")))?;

        sqlx::query(INSERT_SIMULATION)
            .bind(&record.id)
            .bind(&record.user_id)
            .bind(&record.env_id)
            .bind(&record.data_hash)
            .bind(data)
            .bind(record.result)
            .bind(&record.summary)
            .execute(&self.pool)
            .await
            .map_err(|e| insert_error(e, &record.id))?;

        tracing::debug!(id = %record.id, data_hash = %record.data_hash, "simulation inserted");
        Ok(())
    }

    async fn get_simulation(&self, id: &str) -> Result<Option<SimulationRecord>, StorageError> {
        let row = sqlx::query(SELECT_SIMULATION)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::Backend(format!("select failed: {e}")))?;

        row.as_ref().map(decode_row).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: &str) -> NewSimulation {
        NewSimulation {
            id: id.to_string(),
            user_id: "u1".to_string(),
            env_id: "e1".to_string(),
            data_hash: "00".repeat(32),
            data: serde_json::json!({"x": 1}),
            result: 3.5,
            summary: "ok".to_string(),
        }
    }

    #[tokio::test]
    async fn created_at_is_stamped_by_sqlite() {
        let store = SqliteSimulationStore::in_memory().await.unwrap();
        store.insert_simulation(sample("s1")).await.unwrap();

        let rec = store.get_simulation("s1").await.unwrap().unwrap();
        // "YYYY-MM-DD HH:MM:SS"
        assert_eq!(rec.created_at.len(), 19, "got {:?}", rec.created_at);
        assert_eq!(&rec.created_at[4..5], "-");
    }

    #[tokio::test]
    async fn schema_init_is_idempotent() {
        let store = SqliteSimulationStore::in_memory().await.unwrap();
        store.insert_simulation(sample("s1")).await.unwrap();

        let again = SqliteSimulationStore::from_pool(store.pool().clone())
            .await
            .unwrap();
        assert!(again.get_simulation("s1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn corrupt_stored_data_is_a_backend_error() {
        let store = SqliteSimulationStore::in_memory().await.unwrap();
        sqlx::query(
            "INSERT INTO simulations (id, user_id, env_id, data_hash, data, result, summary) \
             VALUES ('bad', 'u', 'e', 'h', '{not json', 0, '')",
        )
        .execute(store.pool())
        .await
        .unwrap();

        match store.get_simulation("bad").await {
            Err(StorageError::Backend(msg)) => assert!(msg.contains("not valid JSON"), "{msg}"),
            other => panic!("expected Backend error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn integer_result_reads_back_as_float() {
        let store = SqliteSimulationStore::in_memory().await.unwrap();
        let mut rec = sample("s1");
        rec.result = 7.0;
        store.insert_simulation(rec).await.unwrap();
        assert_eq!(store.get_simulation("s1").await.unwrap().unwrap().result, 7.0);
    }
}
