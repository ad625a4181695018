use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Redirect, Response},
    Extension,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::json;
use tracing::error;
use validator::Validate;

use crate::{
    config::get_config,
    dto::auth_dto::{IdentityClaims, SessionExchangePayload, SessionResponse},
    dto::profile_dto::{OnboardingPayload, ProfileResponse},
    error::{Error, Result},
    middleware::auth::{clear_session_cookie, session_cookie, SessionUser, LOGIN_PATH},
    middleware::rate_limit::{rate_limited_response, LOGIN},
    AppState,
};

/// Exchanges the identity provider's JWT for a first-party session
/// cookie. The JWT only proves who the caller is; session state lives
/// server-side so it can be revoked.
#[axum::debug_handler]
pub async fn exchange_session(
    State(state): State<AppState>,
    Json(payload): Json<SessionExchangePayload>,
) -> Result<Response> {
    payload.validate()?;

    let config = get_config();
    let key = DecodingKey::from_secret(config.auth_jwt_secret.as_bytes());
    let claims = decode::<IdentityClaims>(&payload.token, &key, &Validation::new(Algorithm::HS256))
        .map_err(|_| Error::Unauthorized("Invalid identity token".to_string()))?
        .claims;

    let decision = state.rate_limiter.check(LOGIN, &claims.sub).await;
    if !decision.allowed {
        return Ok(rate_limited_response(&decision));
    }

    let (token, session) = state
        .session_service
        .create(&claims.sub, config.session_ttl_hours)
        .await?;
    let onboarded = state.profile_service.get(&session.user_id).await?.is_some();

    let cookie = session_cookie(&token, config.session_ttl_hours * 3600);
    let body = SessionResponse {
        user_id: session.user_id,
        expires_at: session.expires_at,
        onboarded,
    };
    Ok((StatusCode::CREATED, [(header::SET_COOKIE, cookie)], Json(body)).into_response())
}

/// Revokes the session the request rode in on. The cookie is cleared and
/// the client bounced to login even if revocation fails; the row expires
/// on its own.
#[axum::debug_handler]
pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> Response {
    if let Err(err) = state.session_service.revoke(&user.token).await {
        error!("session revoke failed for {}: {err}", user.user_id);
    }

    (
        [(header::SET_COOKIE, clear_session_cookie())],
        Redirect::temporary(LOGIN_PATH),
    )
        .into_response()
}

#[axum::debug_handler]
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> Result<Response> {
    match state.profile_service.get(&user.user_id).await? {
        Some(profile) => Ok(Json(ProfileResponse::from(profile)).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "onboarding_required" })),
        )
            .into_response()),
    }
}

/// One-time role pick. A repeat attempt answers with the role already on
/// file so the client can route to the right dashboard instead of
/// retrying onboarding.
#[axum::debug_handler]
pub async fn onboard(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<OnboardingPayload>,
) -> Result<Response> {
    payload.validate()?;

    match state.profile_service.create(&user.user_id, payload).await {
        Ok(profile) => {
            Ok((StatusCode::CREATED, Json(ProfileResponse::from(profile))).into_response())
        }
        Err(Error::Conflict(_)) => {
            let existing = state.profile_service.get(&user.user_id).await?;
            Ok((
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "Profile already exists",
                    "user_type": existing.map(|p| p.user_type),
                })),
            )
                .into_response())
        }
        Err(err) => Err(err),
    }
}
