//! Go Marketplace cart store.
//!
//! Holds the shopping cart in memory, persists it to a key-value store after
//! every change, and reloads it once at startup.
//!
//! # Architecture
//!
//! - [`store::CartStore`] - the cart state and its three mutations
//! - [`storage`] - the key-value backends the cart blob is written to
//! - [`provider`] - explicit provider/scope passing instead of global state
//! - [`config`] - backend selection from environment variables
//!
//! # Persistence
//!
//! Mutations return as soon as the in-memory cart is updated. The new cart is
//! serialized and queued for a background task that writes it to storage;
//! write failures are logged and otherwise ignored. Call
//! [`CartStore::flush`] to wait for queued writes.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod provider;
pub mod storage;
pub mod store;

pub use config::{BackendKind, CartConfig, StorageConfig};
pub use error::CartError;
pub use provider::{CartProvider, CartScope, use_cart};
pub use storage::{CartStorage, FileStorage, MemoryStorage, STORAGE_KEY, StorageError};
pub use store::CartStore;

#[cfg(feature = "postgres")]
pub use storage::PgStorage;

pub use go_marketplace_core::{Cart, CartChange, LineItem, Price, Product, ProductId, Quantity};
