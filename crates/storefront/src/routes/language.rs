//! Language preference handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use souk_core::Lang;

use crate::error::Result;
use crate::locale;
use crate::state::AppState;

/// Language payload and response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguagePayload {
    pub language: String,
}

/// Language update confirmation.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageResponse {
    pub language: Lang,
    pub message: &'static str,
}

/// The active interface language.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<LanguagePayload> {
    Json(LanguagePayload {
        language: state.lang().as_tag().to_owned(),
    })
}

/// Persist a new language preference. Unknown tags fall back to French.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Json(payload): Json<LanguagePayload>,
) -> Result<Json<LanguageResponse>> {
    let lang = Lang::from_tag(&payload.language);
    state.store().set_language(lang)?;

    Ok(Json(LanguageResponse {
        language: lang,
        message: locale::message(lang, "language.updated"),
    }))
}
