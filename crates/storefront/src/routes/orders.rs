//! Order route handlers.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use souk_core::OrderRecord;

use crate::error::Result;
use crate::locale;
use crate::services::orders::{OrderLine, RemoteOrder};
use crate::state::AppState;

/// Submission outcome notification.
#[derive(Debug, Clone, Serialize)]
pub struct OrderResponse {
    pub ok: bool,
    pub message: &'static str,
}

/// Submit a single product order ("buy now", bypassing the cart).
#[instrument(skip(state, line))]
pub async fn create(
    State(state): State<AppState>,
    Json(line): Json<OrderLine>,
) -> Result<Json<OrderResponse>> {
    let lang = state.lang();
    state.orders().submit(vec![line]).await?;

    Ok(Json(OrderResponse {
        ok: true,
        message: locale::message(lang, "cart.order_success"),
    }))
}

/// The local order history, scoped to the current profile's email.
#[instrument(skip(state))]
pub async fn local_history(State(state): State<AppState>) -> Json<Vec<OrderRecord>> {
    Json(state.orders().local_orders())
}

/// The authenticated order history kept by the accounts service.
#[instrument(skip(state))]
pub async fn remote_history(State(state): State<AppState>) -> Result<Json<Vec<RemoteOrder>>> {
    Ok(Json(state.orders().remote_orders().await?))
}
