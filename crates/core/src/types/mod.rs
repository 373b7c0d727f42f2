//! Core types for Souk.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod lang;
pub mod order;
pub mod price;
pub mod profile;

pub use email::{Email, EmailError};
pub use id::*;
pub use lang::Lang;
pub use order::OrderRecord;
pub use price::{Price, PriceError};
pub use profile::UserProfile;
