//! Souk Core - Shared types library.
//!
//! This crate provides common types used across all Souk components:
//! - `storefront` - Public-facing e-commerce service
//!
//! # Architecture
//!
//! The core crate contains only types and pure state containers - no I/O, no
//! storage access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails and
//!   languages, plus the user profile and order record types
//! - [`cart`] - The in-memory shopping cart container

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartItem};
pub use types::*;
