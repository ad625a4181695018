use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::{
    dto::waitlist_dto::{WaitlistPayload, WaitlistSignupResponse},
    error::{Error, Result},
    AppState,
};

/// Pre-launch signup. The email check lives here so a missing field
/// answers with the fixed message the landing page expects.
#[axum::debug_handler]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<WaitlistPayload>,
) -> Result<impl IntoResponse> {
    let email = payload
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| Error::BadRequest("Email required".to_string()))?;

    state.waitlist_service.create(email).await?;
    Ok(Json(json!({ "success": true })))
}

#[axum::debug_handler]
pub async fn list_signups(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let signups = state.waitlist_service.list().await?;
    let signups: Vec<WaitlistSignupResponse> = signups
        .into_iter()
        .map(WaitlistSignupResponse::from)
        .collect();
    Ok(Json(signups))
}
