//! Go Marketplace CLI - Cart operations and storage management.
//!
//! # Usage
//!
//! ```bash
//! # Add one unit of a product (appends it if new)
//! gm-cli add --id p1 --title Shirt --image-url https://cdn.example.com/p1.png --price 10
//!
//! # Change quantities
//! gm-cli increment p1
//! gm-cli decrement p1
//!
//! # Show the cart
//! gm-cli list
//! gm-cli list --json
//!
//! # Create the cart_storage table (postgres backend)
//! gm-cli migrate
//! ```
//!
//! # Commands
//!
//! - `add`, `increment`, `decrement` - Mutate the cart, then print it
//! - `list` - Print the cart
//! - `migrate` - Run storage migrations
//!
//! Storage is selected with `CART_STORAGE_BACKEND`; see
//! `go_marketplace_cart::config` for every variable.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use commands::cart::CartAction;
use go_marketplace_cart::{CartConfig, Price, Product, ProductId};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "gm-cli")]
#[command(author, version, about = "Go Marketplace cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add one unit of a product to the cart
    Add {
        /// Product ID
        #[arg(long)]
        id: String,

        /// Product title
        #[arg(long)]
        title: String,

        /// Product image URL
        #[arg(long)]
        image_url: String,

        /// Unit price (e.g. 19.99)
        #[arg(long)]
        price: Price,
    },
    /// Add one unit to a product already in the cart
    Increment {
        /// Product ID
        id: String,
    },
    /// Remove one unit of a product, dropping it at zero
    Decrement {
        /// Product ID
        id: String,
    },
    /// Print the cart
    List {
        /// Print the stored JSON form instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Run storage migrations (postgres backend only)
    Migrate,
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "go_marketplace_cart=info,gm_cli=info".into());

    // Logs go to stderr so cart output on stdout stays clean
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = CartConfig::from_env()?;

    let action = match cli.command {
        Commands::Migrate => {
            commands::migrate::run(&config).await?;
            return Ok(());
        }
        Commands::Add {
            id,
            title,
            image_url,
            price,
        } => CartAction::Add(Product {
            id: ProductId::new(id),
            title,
            image_url,
            price,
        }),
        Commands::Increment { id } => CartAction::Increment(ProductId::new(id)),
        Commands::Decrement { id } => CartAction::Decrement(ProductId::new(id)),
        Commands::List { json } => CartAction::List { json },
    };

    commands::cart::run(&config, action).await?;
    Ok(())
}
