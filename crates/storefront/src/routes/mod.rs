//! Route definitions for the storefront.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod language;
pub mod orders;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the storefront router.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/categories", get(catalog::categories))
        .route("/categories/{id}", get(catalog::category))
        .route("/categories/{id}/products", get(catalog::products_by_category))
        .route("/products", get(catalog::products))
        .route("/products/{id}", get(catalog::product))
        // Cart
        .route("/cart", get(cart::show))
        .route("/cart/items", post(cart::add))
        .route(
            "/cart/items/{id}",
            axum::routing::patch(cart::update).delete(cart::remove),
        )
        .route("/cart/clear", post(cart::clear))
        .route("/cart/count", get(cart::count))
        .route("/cart/checkout", post(cart::checkout))
        // Orders
        .route("/orders", post(orders::create).get(orders::local_history))
        .route("/orders/remote", get(orders::remote_history))
        // Auth
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/session", get(auth::session))
        // Language
        .route("/language", get(language::show).put(language::update))
}
