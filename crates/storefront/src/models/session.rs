//! Session-stored state.
//!
//! The cart lives entirely in the session: it does not survive a session
//! expiry and is never written to the local store.

/// Session keys.
pub mod keys {
    /// Key for the session's shopping cart.
    pub const CART: &str = "cart";
}
