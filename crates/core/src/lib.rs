//! Go Marketplace Core - Shared cart domain types.
//!
//! This crate provides the types used across all Go Marketplace components:
//! - `cart` - The cart store with persistence and the provider scope
//! - `cli` - Command-line driver for the cart store
//!
//! # Architecture
//!
//! The core crate contains only types and pure list operations - no I/O, no
//! storage access, no async runtime. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices, and quantities
//! - [`cart`] - Line items and the ordered, id-unique [`Cart`] sequence

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartChange, CartLoadError, LineItem, Product};
pub use types::*;
