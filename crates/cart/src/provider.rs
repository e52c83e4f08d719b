//! Provider and scope for handing the cart to the rest of the application.
//!
//! A [`CartProvider`] owns the hydrated [`CartStore`] and hands out
//! [`CartScope`]s. Components receive a scope from their parent and call
//! [`use_cart`] to reach the store. A scope that no provider created has no
//! cart, and asking it for one is a programming error reported as
//! [`CartError::MissingProvider`].
//!
//! ```rust,ignore
//! let provider = CartProvider::mount(storage, STORAGE_KEY).await;
//! render_cart_badge(&provider.scope())?;
//!
//! fn render_cart_badge(scope: &CartScope) -> Result<String, CartError> {
//!     let cart = use_cart(scope)?;
//!     Ok(format!("{} items", cart.snapshot().total_quantity()))
//! }
//! ```

use std::sync::Arc;

use tracing::info;

use crate::config::CartConfig;
use crate::error::{CartError, Result};
use crate::storage::{self, CartStorage};
use crate::store::CartStore;

/// Owner of the cart for a subtree of the application.
///
/// Dropping the provider and every scope handed out tears the cart down; the
/// persistence task finishes the writes already queued and exits.
#[derive(Debug, Clone)]
pub struct CartProvider {
    store: CartStore,
}

impl CartProvider {
    /// Hydrate the cart stored under `key` in `storage`.
    pub async fn mount(storage: Arc<dyn CartStorage>, key: impl Into<String>) -> Self {
        Self {
            store: CartStore::hydrate(storage, key).await,
        }
    }

    /// Open the configured backend and hydrate the cart from it.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the backend cannot be opened. A cart
    /// that cannot be read once the backend is open is not an error.
    pub async fn from_config(config: &CartConfig) -> Result<Self> {
        let backend = storage::open(&config.storage).await?;
        info!(
            backend = ?config.storage.kind(),
            key = %config.storage_key,
            "Mounting cart provider"
        );
        Ok(Self::mount(backend, config.storage_key.clone()).await)
    }

    /// A scope descendants can pull the cart from.
    #[must_use]
    pub fn scope(&self) -> CartScope {
        CartScope {
            cart: Some(self.store.clone()),
        }
    }

    /// The store this provider owns.
    #[must_use]
    pub const fn store(&self) -> &CartStore {
        &self.store
    }
}

/// What a component receives from its parent.
///
/// `CartScope::default()` is a scope outside any provider.
#[derive(Debug, Clone, Default)]
pub struct CartScope {
    cart: Option<CartStore>,
}

impl CartScope {
    /// A scope with no provider above it.
    #[must_use]
    pub fn detached() -> Self {
        Self::default()
    }

    /// Whether a provider created this scope.
    #[must_use]
    pub const fn is_provided(&self) -> bool {
        self.cart.is_some()
    }
}

/// The cart store for `scope`.
///
/// # Errors
///
/// Returns `CartError::MissingProvider` if `scope` was not created by a
/// [`CartProvider`]. Callers must treat this as fatal.
pub fn use_cart(scope: &CartScope) -> Result<CartStore> {
    scope.cart.clone().ok_or(CartError::MissingProvider)
}
