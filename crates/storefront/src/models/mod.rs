//! Shared model types for the HTTP layer.

pub mod session;
