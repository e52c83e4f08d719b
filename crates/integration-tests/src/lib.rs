//! Integration tests for the Go Marketplace cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p go-marketplace-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_lifecycle` - Mutations, hydration, and restart across backends
//! - `cart_failures` - Storage failures and provider misuse
//! - `postgres_storage` - `PostgreSQL` backend (`--features postgres`, ignored
//!   by default; needs `CART_DATABASE_URL`)
//!
//! This crate holds the shared helpers: product fixtures and a storage
//! wrapper that records every write and can be told to fail.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use go_marketplace_cart::{CartStorage, MemoryStorage, StorageError};
use go_marketplace_core::{Price, Product, ProductId};

/// A product fixture priced at ten.
#[must_use]
pub fn product(id: &str) -> Product {
    Product {
        id: ProductId::new(id),
        title: format!("Product {id}"),
        image_url: format!("https://cdn.example.com/{id}.png"),
        price: Price::from(10),
    }
}

/// Memory storage that keeps a log of every value written.
#[derive(Debug, Default)]
pub struct RecordingStorage {
    inner: MemoryStorage,
    writes: Mutex<Vec<String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl RecordingStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent read fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent write fail. Failed writes are still recorded.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Every value passed to `set`, in call order.
    #[must_use]
    pub fn writes(&self) -> Vec<String> {
        self.writes
            .lock()
            .map(|writes| writes.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CartStorage for RecordingStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(std::io::Error::other("read refused").into());
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Ok(mut writes) = self.writes.lock() {
            writes.push(value.to_string());
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(std::io::Error::other("write refused").into());
        }
        self.inner.set(key, value).await
    }
}
