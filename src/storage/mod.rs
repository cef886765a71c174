//! Local key/value store.
//!
//! Mirrors browser local storage: string keys mapped to free-form JSON text,
//! last write wins. Backed by a single SQLite table so the demo state
//! survives restarts.

use anyhow::Result;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::{info, warn};

/// Current demo session: `{ email, role, fullName }`
pub const DEMO_USER_KEY: &str = "demo_user";
/// Accounts created through sign-up
pub const DEMO_USERS_KEY: &str = "demo_users";
/// Appointments booked from the patient dashboard
pub const APPOINTMENTS_KEY: &str = "patient_appointments";
/// Prescriptions keyed by patient id
pub const PRESCRIPTIONS_KEY: &str = "prescriptions";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    #[error("{kind} {id} already exists")]
    Duplicate { kind: &'static str, id: String },

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LocalStore {
    pool: SqlitePool,
}

/// Execute a SQL migration file, properly handling comments
async fn execute_sql(pool: &SqlitePool, sql: &str) -> Result<()> {
    // Strip comment lines first so a `;` inside a comment never splits a statement
    let cleaned = sql
        .lines()
        .filter(|line| !line.trim().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n");
    for statement in cleaned.split(';') {
        let trimmed = statement.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed).execute(pool).await?;
        }
    }
    Ok(())
}

impl LocalStore {
    /// Open (or create) the store file inside `data_dir`.
    pub async fn open(data_dir: &Path) -> Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;
        let db_path = data_dir.join("clinic.db");
        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

        info!("Opening local store at {}", db_path.display());

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await?;

        sqlx::query("PRAGMA journal_mode = WAL")
            .execute(&pool)
            .await?;
        sqlx::query("PRAGMA synchronous = NORMAL")
            .execute(&pool)
            .await?;

        Self::migrate(pool).await
    }

    /// Store that lives for as long as the returned handle (and its clones).
    pub async fn in_memory() -> Result<Self> {
        // Every connection to `:memory:` is its own database, so pin the
        // pool to exactly one connection that never expires.
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        Self::migrate(pool).await
    }

    async fn migrate(pool: SqlitePool) -> Result<Self> {
        execute_sql(&pool, include_str!("../../migrations/001_local_storage.sql")).await?;
        Ok(Self { pool })
    }

    /// Close the pool; later reads and writes fail with a storage error.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM local_storage WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(value,)| value))
    }

    pub async fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO local_storage (key, value, updated_at) VALUES (?, ?, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM local_storage WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn keys(&self) -> Result<Vec<String>, StoreError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT key FROM local_storage ORDER BY key")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|(key,)| key).collect())
    }

    pub async fn clear(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM local_storage")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Read and decode a JSON value.
    ///
    /// A value that fails to decode is logged and reported as absent; callers
    /// never see a decode error.
    pub async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.get_item(key).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key = key, error = %e, "Discarding malformed value in local store");
                Ok(None)
            }
        }
    }

    pub async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(value)?;
        self.set_item(key, &encoded).await
    }
}
