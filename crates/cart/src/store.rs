//! The cart store: in-memory cart state with fire-and-forget persistence.
//!
//! Mutations apply to the in-memory [`Cart`] immediately and return without
//! waiting on storage. Each mutation that changes the cart serializes the
//! post-mutation snapshot and queues it for a single background task, which
//! writes snapshots to storage one at a time in the order they were queued.
//!
//! The snapshot is taken and queued while the cart's write lock is held, so
//! the queue order matches the mutation order and the last queued snapshot is
//! always the visible cart.

use std::sync::{Arc, PoisonError, RwLock};

use go_marketplace_core::{Cart, CartChange, LineItem, Product, ProductId};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, instrument, warn};

use crate::storage::CartStorage;

/// Work for the persistence task.
enum PersistCommand {
    /// Store this serialized cart.
    Write(String),
    /// Signal once every earlier command has been handled.
    Flush(oneshot::Sender<()>),
}

/// Handle to a hydrated cart.
///
/// This struct is cheaply cloneable via `Arc`; clones share the same cart.
/// The persistence task stops once every handle has been dropped and the
/// queued writes have been attempted.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    key: String,
    cart: RwLock<Cart>,
    persist: mpsc::UnboundedSender<PersistCommand>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.inner.key)
            .field("items", &self.snapshot().len())
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Load the cart stored under `key` and start the persistence task.
    ///
    /// Issues a single read. A missing, unreadable, or unparseable value
    /// yields an empty cart; the failure is logged and not retried.
    ///
    /// Must be called from within a tokio runtime.
    #[instrument(skip_all, fields(storage_key = tracing::field::Empty))]
    pub async fn hydrate(storage: Arc<dyn CartStorage>, key: impl Into<String>) -> Self {
        let key = key.into();
        tracing::Span::current().record("storage_key", key.as_str());

        let cart = load_cart(storage.as_ref(), &key).await;

        let (persist, commands) = mpsc::unbounded_channel();
        tokio::spawn(run_persistence(storage, key.clone(), commands));

        Self {
            inner: Arc::new(CartStoreInner {
                key,
                cart: RwLock::new(cart),
                persist,
            }),
        }
    }

    /// The storage key this cart persists under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.inner.key
    }

    /// The current line items in display order.
    #[must_use]
    pub fn products(&self) -> Vec<LineItem> {
        self.read(|cart| cart.items().to_vec())
    }

    /// A copy of the current cart.
    #[must_use]
    pub fn snapshot(&self) -> Cart {
        self.read(Cart::clone)
    }

    /// Add one unit of `product`, appending it if it is not in the cart yet.
    #[instrument(skip_all, fields(product_id = %product.id))]
    pub fn add_to_cart(&self, product: Product) -> CartChange {
        self.mutate(|cart| cart.add(product))
    }

    /// Add one unit to the line item with `id`. No-op if absent.
    #[instrument(skip_all, fields(product_id = %id))]
    pub fn increment(&self, id: &ProductId) -> CartChange {
        self.mutate(|cart| cart.increment(id))
    }

    /// Remove one unit from the line item with `id`, dropping the line item
    /// when its last unit goes. No-op if absent.
    #[instrument(skip_all, fields(product_id = %id))]
    pub fn decrement(&self, id: &ProductId) -> CartChange {
        self.mutate(|cart| cart.decrement(id))
    }

    /// Wait until every write queued so far has been attempted.
    ///
    /// Mutations never need this; it exists for callers that are about to
    /// exit and for tests.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.inner.persist.send(PersistCommand::Flush(done)).is_err() {
            warn!(key = %self.inner.key, "Persistence task stopped, nothing to flush");
            return;
        }
        // A dropped sender means the task stopped, so nothing is pending
        let _ = wait.await;
    }

    fn read<T>(&self, f: impl FnOnce(&Cart) -> T) -> T {
        let cart = self.inner.cart.read().unwrap_or_else(PoisonError::into_inner);
        f(&*cart)
    }

    fn mutate(&self, f: impl FnOnce(&mut Cart) -> CartChange) -> CartChange {
        let mut cart = self
            .inner
            .cart
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let change = f(&mut *cart);
        if change.is_changed() {
            self.schedule_write(&cart);
        }
        let items = cart.len();
        drop(cart);

        match change {
            CartChange::Unchanged => debug!("No matching line item"),
            CartChange::Added => info!(items, "Added line item"),
            CartChange::Updated { quantity } => info!(items, %quantity, "Updated quantity"),
            CartChange::Removed => info!(items, "Removed line item"),
        }
        change
    }

    fn schedule_write(&self, cart: &Cart) {
        let blob = match serde_json::to_string(cart) {
            Ok(blob) => blob,
            Err(e) => {
                error!(error = %e, "Failed to serialize cart");
                return;
            }
        };
        if self.inner.persist.send(PersistCommand::Write(blob)).is_err() {
            warn!(key = %self.inner.key, "Persistence task stopped, cart not saved");
        }
    }
}

/// Read and parse the stored cart, falling back to an empty one.
async fn load_cart(storage: &dyn CartStorage, key: &str) -> Cart {
    match storage.get(key).await {
        Ok(Some(blob)) => match serde_json::from_str::<Cart>(&blob) {
            Ok(cart) => {
                info!(items = cart.len(), "Hydrated cart from storage");
                cart
            }
            Err(e) => {
                warn!(error = %e, "Stored cart is unreadable, starting empty");
                Cart::new()
            }
        },
        Ok(None) => {
            debug!("No stored cart, starting empty");
            Cart::new()
        }
        Err(e) => {
            warn!(error = %e, "Failed to read stored cart, starting empty");
            Cart::new()
        }
    }
}

/// Apply queued commands in order until every sender is gone.
async fn run_persistence(
    storage: Arc<dyn CartStorage>,
    key: String,
    mut commands: mpsc::UnboundedReceiver<PersistCommand>,
) {
    while let Some(command) = commands.recv().await {
        match command {
            PersistCommand::Write(blob) => match storage.set(&key, &blob).await {
                Ok(()) => debug!(key = %key, bytes = blob.len(), "Persisted cart"),
                Err(e) => warn!(key = %key, error = %e, "Failed to persist cart"),
            },
            PersistCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!(key = %key, "Persistence task stopped");
}
