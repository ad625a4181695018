use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Redirect, Response},
};
use serde_json::json;
use tracing::error;

use crate::models::profile::{UserProfile, UserType};
use crate::AppState;

pub const SESSION_COOKIE: &str = "hb_session";

pub const LOGIN_PATH: &str = "/auth/login";
pub const ONBOARDING_PATH: &str = "/auth/onboarding";

/// Inserted by `require_session`; carries the raw token so logout can
/// revoke the exact session it rode in on.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user_id: String,
    pub token: String,
}

/// Inserted by the role guards so handlers skip a profile lookup.
#[derive(Debug, Clone)]
pub struct CurrentProfile(pub UserProfile);

pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
    })
}

pub fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}")
}

pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

fn login_redirect() -> Response {
    Redirect::temporary(LOGIN_PATH).into_response()
}

fn onboarding_redirect() -> Response {
    Redirect::temporary(ONBOARDING_PATH).into_response()
}

/// Gate for everything behind a login: resolves the session cookie
/// against the store and redirects to the login page when it cannot.
/// Validation errors also redirect; auth never fails open.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = session_token(req.headers()) else {
        return login_redirect();
    };

    match state.session_service.validate(&token).await {
        Ok(Some(session)) => {
            req.extensions_mut().insert(SessionUser {
                user_id: session.user_id,
                token,
            });
            next.run(req).await
        }
        Ok(None) => login_redirect(),
        Err(err) => {
            error!("session validation failed: {err}");
            login_redirect()
        }
    }
}

/// Business-namespace gate. Runs inside `require_session`.
pub async fn require_business(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    require_user_type(state, req, next, UserType::Business).await
}

/// Advertiser-namespace gate. Runs inside `require_session`.
pub async fn require_advertiser(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    require_user_type(state, req, next, UserType::Advertiser).await
}

async fn require_user_type(
    state: AppState,
    mut req: Request,
    next: Next,
    wanted: UserType,
) -> Response {
    let Some(user) = req.extensions().get::<SessionUser>().cloned() else {
        return login_redirect();
    };

    match state.profile_service.get(&user.user_id).await {
        Ok(Some(profile)) if profile.user_type() == Some(wanted) => {
            req.extensions_mut().insert(CurrentProfile(profile));
            next.run(req).await
        }
        Ok(Some(_)) => (
            StatusCode::FORBIDDEN,
            Json(json!({"error": "wrong_account_type"})),
        )
            .into_response(),
        Ok(None) => onboarding_redirect(),
        Err(err) => {
            error!("profile lookup failed for {}: {err}", user.user_id);
            login_redirect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn finds_the_session_cookie_among_others() {
        let headers = headers_with_cookie("theme=dark; hb_session=tok123; lang=en");
        assert_eq!(session_token(&headers), Some("tok123".to_string()));
    }

    #[test]
    fn missing_or_empty_cookie_yields_none() {
        assert_eq!(session_token(&HeaderMap::new()), None);
        let headers = headers_with_cookie("hb_session=");
        assert_eq!(session_token(&headers), None);
        let headers = headers_with_cookie("other=value");
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn set_and_clear_cookies_share_attributes() {
        let set = session_cookie("tok123", 3600);
        assert!(set.starts_with("hb_session=tok123;"));
        assert!(set.contains("HttpOnly"));
        assert!(set.contains("Max-Age=3600"));

        let clear = clear_session_cookie();
        assert!(clear.starts_with("hb_session=;"));
        assert!(clear.contains("Max-Age=0"));
    }
}
