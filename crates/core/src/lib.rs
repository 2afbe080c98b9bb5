//! Baba Boutique Core - Shared domain library.
//!
//! This crate provides the types and pure components used across all Baba
//! Boutique components:
//! - `storefront` - Public-facing shop site
//! - `admin` - Internal administration console
//!
//! # Architecture
//!
//! The core crate contains only types and platform-independent logic - no
//! I/O, no HTTP clients, no session handling. This keeps it lightweight and
//! allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers and domain records (ids, prices,
//!   categories, products, orders)
//! - [`cart`] - The persisted cart ledger over an injected storage backend
//! - [`listing`] - The free-text listing filter shared by the category page
//!   and the admin product table

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod listing;
pub mod types;

pub use types::*;
