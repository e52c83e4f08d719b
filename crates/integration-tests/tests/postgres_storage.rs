//! Integration tests for the `PostgreSQL` storage backend.
//!
//! These require a running database and are ignored by default:
//!
//! ```bash
//! CART_DATABASE_URL=postgres://localhost/go_marketplace_test \
//!     cargo test -p go-marketplace-integration-tests --features postgres -- --ignored
//! ```

#![cfg(feature = "postgres")]
#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use go_marketplace_cart::{
    CartConfig, CartProvider, CartStorage, PgStorage, StorageConfig, use_cart,
};
use go_marketplace_core::ProductId;
use go_marketplace_integration_tests::product;

/// Connect to the test database and apply migrations.
async fn connect() -> PgStorage {
    let config = CartConfig::from_lookup(|key| match key {
        "CART_STORAGE_BACKEND" => Some("postgres".to_string()),
        other => std::env::var(other).ok(),
    })
    .unwrap();
    let StorageConfig::Postgres { database_url } = &config.storage else {
        panic!("expected postgres backend, got {:?}", config.storage.kind());
    };

    let storage = PgStorage::connect(database_url).await.unwrap();
    storage.migrate().await.unwrap();
    storage
}

/// A key no earlier run has written.
fn unique_key(name: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("@GoMarketplace:test:{name}:{}:{nanos}", std::process::id())
}

// =============================================================================
// Key-Value Contract
// =============================================================================

#[tokio::test]
#[ignore = "Requires running database"]
async fn test_get_missing_key() {
    let storage = connect().await;
    assert_eq!(storage.get(&unique_key("missing")).await.unwrap(), None);
}

#[tokio::test]
#[ignore = "Requires running database"]
async fn test_set_overwrites() {
    let storage = connect().await;
    let key = unique_key("overwrite");

    storage.set(&key, "[]").await.unwrap();
    storage.set(&key, "[1]").await.unwrap();

    assert_eq!(storage.get(&key).await.unwrap().as_deref(), Some("[1]"));
}

#[tokio::test]
#[ignore = "Requires running database"]
async fn test_migrate_is_idempotent() {
    let storage = connect().await;
    storage.migrate().await.unwrap();
}

// =============================================================================
// Restart Simulation
// =============================================================================

#[tokio::test]
#[ignore = "Requires running database"]
async fn test_restart_with_postgres_storage() {
    let storage = Arc::new(connect().await);
    let key = unique_key("restart");

    {
        let provider = CartProvider::mount(storage.clone(), key.clone()).await;
        let cart = use_cart(&provider.scope()).unwrap();
        cart.add_to_cart(product("p1"));
        cart.add_to_cart(product("p2"));
        cart.increment(&ProductId::new("p1"));
        cart.decrement(&ProductId::new("p2"));
        cart.flush().await;
    }

    let provider = CartProvider::mount(storage, key).await;
    let products = use_cart(&provider.scope()).unwrap().products();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id.as_str(), "p1");
    assert_eq!(products[0].quantity.get(), 2);
}
