//! Storage migration commands.
//!
//! # Usage
//!
//! ```bash
//! CART_STORAGE_BACKEND=postgres CART_DATABASE_URL=postgres://localhost/go_marketplace \
//!     gm-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `CART_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! `crates/cart/migrations/`. The `memory` and `file` backends need no
//! migrations.

use go_marketplace_cart::{BackendKind, CartConfig, PgStorage, StorageConfig, StorageError};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("migrations only apply to the postgres backend (configured: {0:?})")]
    NotPostgres(BackendKind),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Run cart storage migrations.
///
/// # Errors
///
/// Returns an error if the configured backend is not `postgres`, the
/// database is unreachable, or a migration fails.
pub async fn run(config: &CartConfig) -> Result<(), MigrationError> {
    let StorageConfig::Postgres { database_url } = &config.storage else {
        return Err(MigrationError::NotPostgres(config.storage.kind()));
    };

    info!("Connecting to cart database...");
    let storage = PgStorage::connect(database_url).await?;

    info!("Running cart storage migrations...");
    storage.migrate().await?;

    info!("Cart storage migrations complete!");
    Ok(())
}
