//! Catalog route handlers.
//!
//! Thin JSON pass-throughs over the catalog client; caching happens in the
//! client, not here.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use souk_core::{CategoryId, ProductId};

use crate::catalog::{Category, Product};
use crate::error::Result;
use crate::state::AppState;

/// List all categories.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    Ok(Json(state.catalog().categories().await?))
}

/// Show one category.
#[instrument(skip(state))]
pub async fn category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Category>> {
    Ok(Json(state.catalog().category(CategoryId::new(id)).await?))
}

/// List all products.
#[instrument(skip(state))]
pub async fn products(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.catalog().products().await?))
}

/// Show one product.
#[instrument(skip(state))]
pub async fn product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>> {
    Ok(Json(state.catalog().product(ProductId::new(id)).await?))
}

/// List the products of one category.
#[instrument(skip(state))]
pub async fn products_by_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Product>>> {
    Ok(Json(
        state
            .catalog()
            .products_by_category(CategoryId::new(id))
            .await?,
    ))
}
