//! Unified error handling for the cart store.

use thiserror::Error;

use crate::config::ConfigError;
use crate::storage::StorageError;

/// Error type for cart store setup and access.
///
/// Mutations never fail: storage failures after a mutation are logged and
/// swallowed, and hydration failures fall back to an empty cart. What remains
/// are setup errors and misuse of the provider scope.
#[derive(Debug, Error)]
pub enum CartError {
    /// The cart was requested from a scope no provider created.
    #[error("use_cart must be used within a CartProvider")]
    MissingProvider,

    /// Opening the storage backend failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Loading configuration failed.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
