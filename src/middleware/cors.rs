use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::config::get_config;

/// Browser clients authenticate with the session cookie, so CORS must
/// name the site origin exactly; wildcards cannot be combined with
/// credentials.
pub fn site_cors() -> CorsLayer {
    let origin = get_config().site_url.trim_end_matches('/');
    match origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
            ])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true),
        Err(_) => {
            warn!("SITE_URL is not a usable CORS origin, falling back to permissive");
            CorsLayer::new()
                .allow_methods(Any)
                .allow_headers(Any)
                .allow_origin(Any)
        }
    }
}
