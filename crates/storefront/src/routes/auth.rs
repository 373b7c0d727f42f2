//! Auth route handlers.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::error::Result;
use crate::locale;
use crate::services::auth::{Credentials, Registration};
use crate::state::AppState;

/// Auth outcome notification.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub ok: bool,
    pub message: &'static str,
}

/// Refreshed access token.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshResponse {
    pub access: String,
}

/// Current session state: token presence plus the stored contact identity.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Register a new account.
#[instrument(skip(state, registration))]
pub async fn register(
    State(state): State<AppState>,
    Json(registration): Json<Registration>,
) -> Result<Json<AuthResponse>> {
    let lang = state.lang();
    state.auth().register(&registration).await?;

    Ok(Json(AuthResponse {
        ok: true,
        message: locale::message(lang, "auth.registered"),
    }))
}

/// Log in with email and password.
#[instrument(skip(state, credentials))]
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<AuthResponse>> {
    let lang = state.lang();
    state.auth().login(&credentials).await?;

    Ok(Json(AuthResponse {
        ok: true,
        message: locale::message(lang, "auth.logged_in"),
    }))
}

/// Log out: drop tokens and the stored profile.
#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> Result<Json<AuthResponse>> {
    let lang = state.lang();
    state.auth().logout()?;

    Ok(Json(AuthResponse {
        ok: true,
        message: locale::message(lang, "auth.logged_out"),
    }))
}

/// Explicitly refresh the access token.
#[instrument(skip(state))]
pub async fn refresh(State(state): State<AppState>) -> Result<Json<RefreshResponse>> {
    let access = state.auth().refresh().await?;
    Ok(Json(RefreshResponse { access }))
}

/// Whether a session is active, and who it belongs to.
#[instrument(skip(state))]
pub async fn session(State(state): State<AppState>) -> Json<SessionResponse> {
    let authenticated = state.auth().is_authenticated();
    let profile = authenticated.then(|| state.store().profile()).flatten();

    Json(SessionResponse {
        authenticated,
        name: profile.as_ref().map(|p| p.name.clone()),
        email: profile.map(|p| p.email),
    })
}
