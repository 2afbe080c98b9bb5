//! Core types for Baba Boutique.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod id;
pub mod order;
pub mod price;
pub mod product;

pub use category::{Category, CategoryFilter, CategoryParseError};
pub use id::*;
pub use order::{Order, OrderItem, OrderDraft, OrderLineInput};
pub use price::Price;
pub use product::Product;
