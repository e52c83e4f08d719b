//! Cart commands: mutate the stored cart and print it.
//!
//! Each invocation hydrates the cart from the configured backend, applies at
//! most one operation, waits for the write to land, and prints the result.

use std::fmt::Write as _;

use go_marketplace_cart::{
    Cart, CartChange, CartConfig, CartError, CartProvider, Product, ProductId, use_cart,
};
use tracing::info;

/// One cart operation requested on the command line.
#[derive(Debug)]
pub enum CartAction {
    Add(Product),
    Increment(ProductId),
    Decrement(ProductId),
    List { json: bool },
}

/// Apply `action` to the configured cart and print the cart afterwards.
///
/// # Errors
///
/// Returns an error if the backend cannot be opened or the cart cannot be
/// rendered as JSON.
pub async fn run(config: &CartConfig, action: CartAction) -> Result<(), CartCommandError> {
    let output = execute(config, action).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("{output}");
    }
    Ok(())
}

/// Apply `action` and render the resulting cart.
async fn execute(config: &CartConfig, action: CartAction) -> Result<String, CartCommandError> {
    let provider = CartProvider::from_config(config).await?;
    let cart = use_cart(&provider.scope())?;

    let json = match action {
        CartAction::Add(product) => {
            let id = product.id.clone();
            report(&id, cart.add_to_cart(product));
            false
        }
        CartAction::Increment(id) => {
            report(&id, cart.increment(&id));
            false
        }
        CartAction::Decrement(id) => {
            report(&id, cart.decrement(&id));
            false
        }
        CartAction::List { json } => json,
    };

    cart.flush().await;

    let snapshot = cart.snapshot();
    if json {
        Ok(serde_json::to_string_pretty(&snapshot)?)
    } else {
        Ok(render_table(&snapshot))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CartCommandError {
    #[error(transparent)]
    Cart(#[from] CartError),
    #[error("failed to render cart: {0}")]
    Render(#[from] serde_json::Error),
}

fn report(id: &ProductId, change: CartChange) {
    match change {
        CartChange::Added => info!(product_id = %id, "Added to cart"),
        CartChange::Updated { quantity } => {
            info!(product_id = %id, %quantity, "Quantity updated");
        }
        CartChange::Removed => info!(product_id = %id, "Removed from cart"),
        CartChange::Unchanged => info!(product_id = %id, "Not in cart, nothing changed"),
    }
}

/// Plain-text cart listing with a totals line.
fn render_table(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "{:<16} {:<32} {:>5} {:>10}", "ID", "TITLE", "QTY", "PRICE");
    for item in cart {
        let _ = writeln!(
            out,
            "{:<16} {:<32} {:>5} {:>10}",
            item.id,
            item.title,
            item.quantity,
            item.line_price().to_string()
        );
    }
    let _ = write!(
        out,
        "{} item(s), subtotal {}",
        cart.total_quantity(),
        cart.subtotal()
    );
    out
}
