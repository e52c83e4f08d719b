//! `PostgreSQL` storage backend.
//!
//! # Table: `cart_storage`
//!
//! | column | type |
//! |--------|------|
//! | `key` | `TEXT PRIMARY KEY` |
//! | `value` | `TEXT NOT NULL` |
//! | `updated_at` | `TIMESTAMPTZ NOT NULL DEFAULT NOW()` |
//!
//! # Migrations
//!
//! Migrations are stored in `crates/cart/migrations/` and run via:
//! ```bash
//! cargo run -p go-marketplace-cli -- migrate
//! ```

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::{CartStorage, StorageError};

/// Storage backed by the `cart_storage` table.
#[derive(Debug, Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Connect a small pool to `database_url`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Database` if the connection cannot be established.
    pub async fn connect(database_url: &SecretString) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url.expose_secret())
            .await?;
        Ok(Self { pool })
    }

    /// Apply the `cart_storage` migrations.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Migration` if a migration fails.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl CartStorage for PgStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = sqlx::query_scalar::<_, String>(
            r"
            SELECT value FROM cart_storage
            WHERE key = $1
            ",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO cart_storage (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = $2, updated_at = NOW()
            ",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
