//! Cart route handlers.
//!
//! The cart is session-scoped: every handler loads it from the session,
//! mutates it in memory and writes it back. Checkout converts the cart
//! lines into an order submission and clears the cart on success.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use souk_core::{Cart, CartItem, Price, ProductId, UserProfile};

use crate::error::{AppError, Result};
use crate::locale;
use crate::models::session::keys;
use crate::services::orders::{OrderError, OrderLine};
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub id: ProductId,
    pub name: String,
    pub price: String,
    pub line_price: String,
    pub image: String,
    pub quantity: u32,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            subtotal: cart.subtotal().to_string(),
            count: cart.count(),
        }
    }
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            price: item.price.to_string(),
            line_price: item.price.times(item.quantity).to_string(),
            image: item.image.clone(),
            quantity: item.quantity,
        }
    }
}

/// Cart count badge data.
#[derive(Debug, Clone, Serialize)]
pub struct CartCountView {
    pub count: u32,
}

/// Checkout outcome notification.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResponse {
    pub ok: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted: Option<usize>,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the session's cart, defaulting to an empty one.
pub(crate) async fn load_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Write the cart back to the session.
pub(crate) async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session
        .insert(keys::CART, cart)
        .await
        .map_err(|e| AppError::Internal(format!("failed to save cart to session: {e}")))
}

// =============================================================================
// Payloads
// =============================================================================

/// Add to cart payload. The price arrives as a formatted string and is
/// normalized by [`Price`]'s deserializer.
#[derive(Debug, Deserialize)]
pub struct AddToCartPayload {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub image: String,
    pub quantity: Option<u32>,
}

/// Update quantity payload.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityPayload {
    pub quantity: u32,
}

/// Checkout payload: optionally carries the order form's contact details.
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutPayload {
    #[serde(default)]
    pub contact: Option<UserProfile>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Json<CartView> {
    let cart = load_cart(&session).await;
    Json(CartView::from(&cart))
}

/// Add an item to the cart.
///
/// A repeated product ID increments the existing line's quantity.
#[instrument(skip(session, payload))]
pub async fn add(
    session: Session,
    Json(payload): Json<AddToCartPayload>,
) -> Result<Json<CartCountView>> {
    let mut cart = load_cart(&session).await;
    cart.add(CartItem {
        id: payload.id,
        name: payload.name,
        price: payload.price,
        image: payload.image,
        quantity: payload.quantity.unwrap_or(1),
    });
    save_cart(&session, &cart).await?;

    Ok(Json(CartCountView { count: cart.count() }))
}

/// Update a line's quantity (clamped to a minimum of 1).
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateQuantityPayload>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await;
    if !cart.update_quantity(ProductId::new(id), payload.quantity) {
        return Err(AppError::NotFound(format!("no cart line for product {id}")));
    }
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// Remove a line from the cart.
#[instrument(skip(session))]
pub async fn remove(session: Session, Path(id): Path<i64>) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await;
    cart.remove(ProductId::new(id));
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await;
    cart.clear();
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// Cart count badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Json<CartCountView> {
    let cart = load_cart(&session).await;
    Json(CartCountView { count: cart.count() })
}

/// Submit the whole cart as an order.
///
/// The optional contact payload saves the profile first (the order form
/// shown to users who never signed up). Requires a stored profile with at
/// least a name and phone number.
#[instrument(skip(state, session, payload))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CheckoutPayload>,
) -> Result<Response> {
    let lang = state.lang();
    let cart = load_cart(&session).await;

    if cart.is_empty() {
        return Err(AppError::BadRequest(
            locale::message(lang, "cart.empty_warning").to_owned(),
        ));
    }

    if let Some(contact) = payload.contact {
        if !contact.has_contact_details() {
            return Err(AppError::BadRequest(
                locale::message(lang, "cart.missing_fields").to_owned(),
            ));
        }
        state.store().save_profile(&contact)?;
    }

    let profile_ready = state
        .store()
        .profile()
        .is_some_and(|profile| profile.has_contact_details());
    if !profile_ready {
        return Err(AppError::BadRequest(
            locale::message(lang, "cart.missing_fields").to_owned(),
        ));
    }

    let lines: Vec<OrderLine> = cart
        .items()
        .iter()
        .map(|item| OrderLine {
            productname: item.name.clone(),
            id: item.id,
            price: item.price,
            quantity: item.quantity,
            image: (!item.image.is_empty()).then(|| item.image.clone()),
        })
        .collect();

    match state.orders().submit(lines).await {
        Ok(submitted) => {
            let mut cart = cart;
            cart.clear();
            save_cart(&session, &cart).await?;

            Ok(Json(CheckoutResponse {
                ok: true,
                message: locale::message(lang, "cart.order_success"),
                submitted: Some(submitted),
            })
            .into_response())
        }
        Err(OrderError::Sink { failed, total }) => {
            // The history entries are already written; report the failure
            // as a user-facing notification without clearing the cart.
            tracing::warn!(failed, total, "order submission partially failed");
            Ok((
                StatusCode::BAD_GATEWAY,
                Json(CheckoutResponse {
                    ok: false,
                    message: locale::message(lang, "cart.order_failed"),
                    submitted: None,
                }),
            )
                .into_response())
        }
        Err(other) => Err(other.into()),
    }
}
