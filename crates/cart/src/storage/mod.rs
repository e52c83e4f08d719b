//! Key-value storage the cart blob is persisted to.
//!
//! The store treats storage as opaque: one text value per key, read once at
//! startup and overwritten after every mutation.
//!
//! # Backends
//!
//! - [`MemoryStorage`] - in-process map, lost on exit
//! - [`FileStorage`] - one file per key under a directory
//! - `PgStorage` - `cart_storage` table in `PostgreSQL` (`postgres` feature)

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::StorageConfig;

mod file;
mod memory;
#[cfg(feature = "postgres")]
mod postgres;

pub use file::FileStorage;
pub use memory::MemoryStorage;
#[cfg(feature = "postgres")]
pub use postgres::PgStorage;

/// Key the cart blob is stored under unless configured otherwise.
pub const STORAGE_KEY: &str = "@GoMarketplace:cart";

/// Error type for storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[cfg(feature = "postgres")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[cfg(feature = "postgres")]
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("storage backend '{0}' is not available in this build")]
    Unsupported(&'static str),
}

/// An external key-value store holding serialized carts.
#[async_trait]
pub trait CartStorage: Send + Sync + 'static {
    /// Read the value stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Open the backend selected by `config`.
///
/// # Errors
///
/// Returns an error if the file directory cannot be created, the database is
/// unreachable, or the backend was compiled out.
pub async fn open(config: &StorageConfig) -> Result<Arc<dyn CartStorage>, StorageError> {
    match config {
        StorageConfig::Memory => Ok(Arc::new(MemoryStorage::new())),
        StorageConfig::File { dir } => Ok(Arc::new(FileStorage::open(dir).await?)),
        #[cfg(feature = "postgres")]
        StorageConfig::Postgres { database_url } => {
            Ok(Arc::new(PgStorage::connect(database_url).await?))
        }
        #[cfg(not(feature = "postgres"))]
        StorageConfig::Postgres { .. } => Err(StorageError::Unsupported("postgres")),
    }
}
