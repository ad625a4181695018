use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

/// Named sliding-window scope on the external counter service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateScope {
    pub name: &'static str,
    pub limit: u32,
    pub window_secs: u64,
}

pub const GLOBAL: RateScope = RateScope {
    name: "global",
    limit: 100,
    window_secs: 3600,
};
pub const CAMPAIGN_CREATE: RateScope = RateScope {
    name: "campaign:create",
    limit: 5,
    window_secs: 86400,
};
pub const CAMPAIGN_UPDATE: RateScope = RateScope {
    name: "campaign:update",
    limit: 20,
    window_secs: 3600,
};
pub const APPLICATION: RateScope = RateScope {
    name: "application",
    limit: 10,
    window_secs: 3600,
};
pub const LOGIN: RateScope = RateScope {
    name: "login",
    limit: 5,
    window_secs: 900,
};

#[derive(Debug, Clone, Serialize)]
struct LimitCheckRequest<'a> {
    scope: &'a str,
    identifier: &'a str,
    limit: u32,
    window_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct LimitCheckResponse {
    success: bool,
    limit: Option<u32>,
    remaining: Option<u32>,
    /// Unix millis at which the window resets.
    reset: Option<u64>,
}

#[derive(Debug, Clone, Copy)]
pub struct LimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub retry_after_secs: u64,
}

impl LimitDecision {
    fn allow(scope: RateScope) -> Self {
        Self {
            allowed: true,
            limit: scope.limit,
            remaining: scope.limit,
            retry_after_secs: 0,
        }
    }
}

/// Client for the external sliding-window counter. All the window
/// arithmetic lives on the service side; this end only asks and decides
/// what to do when the answer never arrives: every failure allows.
#[derive(Clone)]
pub struct RateLimiter {
    client: Client,
    base_url: Option<String>,
    token: Option<String>,
}

impl RateLimiter {
    pub fn new(base_url: Option<String>, token: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(3))
            .build()
            .expect("Failed to create HTTP client for rate limiter");

        let base_url = base_url.filter(|url| !url.trim().is_empty());
        if base_url.is_some() {
            info!("Rate limiting enabled via external counter service");
        } else {
            info!("Rate limiting disabled (RATELIMIT_REST_URL not set or empty)");
        }

        Self {
            client,
            base_url,
            token,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.base_url.is_some()
    }

    /// Consumes one unit of `scope` for `identifier`.
    pub async fn check(&self, scope: RateScope, identifier: &str) -> LimitDecision {
        let Some(base_url) = &self.base_url else {
            return LimitDecision::allow(scope);
        };

        let url = format!("{}/check", base_url.trim_end_matches('/'));
        let payload = LimitCheckRequest {
            scope: scope.name,
            identifier,
            limit: scope.limit,
            window_secs: scope.window_secs,
        };

        let mut request = self.client.post(&url).json(&payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                warn!("rate limit service unreachable, allowing: {err}");
                return LimitDecision::allow(scope);
            }
        };

        if !response.status().is_success() {
            warn!(
                "rate limit service returned {}, allowing",
                response.status()
            );
            return LimitDecision::allow(scope);
        }

        match response.json::<LimitCheckResponse>().await {
            Ok(body) => LimitDecision {
                allowed: body.success,
                limit: body.limit.unwrap_or(scope.limit),
                remaining: body.remaining.unwrap_or(0),
                retry_after_secs: body.reset.map(retry_after_from_reset).unwrap_or(0),
            },
            Err(err) => {
                warn!("rate limit service sent an unreadable body, allowing: {err}");
                LimitDecision::allow(scope)
            }
        }
    }
}

fn retry_after_from_reset(reset_millis: u64) -> u64 {
    let now_secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    (reset_millis / 1000).saturating_sub(now_secs)
}

pub fn rate_limited_response(decision: &LimitDecision) -> Response {
    (
        StatusCode::TOO_MANY_REQUESTS,
        [(header::RETRY_AFTER, decision.retry_after_secs.to_string())],
        Json(json!({
            "error": "rate_limit_exceeded",
            "retry_after": decision.retry_after_secs,
        })),
    )
        .into_response()
}

/// Router-level limiter keyed by client IP.
pub async fn global_middleware(
    State(limiter): State<RateLimiter>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let ip = client_ip(req.headers());
    let decision = limiter.check(GLOBAL, &ip).await;
    if !decision.allowed {
        return rate_limited_response(&decision);
    }
    next.run(req).await
}

pub fn client_ip(headers: &HeaderMap) -> String {
    for name in ["x-forwarded-for", "x-real-ip", "cf-connecting-ip"] {
        if let Some(value) = headers.get(name).and_then(|v| v.to_str().ok()) {
            let first = value.split(',').next().unwrap_or("").trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }
    "unknown".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn unconfigured_limiter_allows_everything() {
        let limiter = RateLimiter::new(None, None);
        assert!(!limiter.is_enabled());
        let decision = tokio_test::block_on(limiter.check(APPLICATION, "user_1"));
        assert!(decision.allowed);
        assert_eq!(decision.limit, APPLICATION.limit);
    }

    #[tokio::test]
    async fn unreachable_service_fails_open() {
        // Nothing listens on port 1; the connection error must allow.
        let limiter = RateLimiter::new(Some("http://127.0.0.1:1".to_string()), None);
        assert!(limiter.is_enabled());
        let decision = limiter.check(LOGIN, "user_1").await;
        assert!(decision.allowed);
    }

    #[test]
    fn scope_table_matches_the_published_limits() {
        assert_eq!((GLOBAL.limit, GLOBAL.window_secs), (100, 3600));
        assert_eq!((CAMPAIGN_CREATE.limit, CAMPAIGN_CREATE.window_secs), (5, 86400));
        assert_eq!((CAMPAIGN_UPDATE.limit, CAMPAIGN_UPDATE.window_secs), (20, 3600));
        assert_eq!((APPLICATION.limit, APPLICATION.window_secs), (10, 3600));
        assert_eq!((LOGIN.limit, LOGIN.window_secs), (5, 900));
    }

    #[test]
    fn client_ip_prefers_forwarded_for_then_falls_back() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.1, 10.0.0.2"));
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.3"));
        assert_eq!(client_ip(&headers), "10.0.0.1");

        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.3"));
        assert_eq!(client_ip(&headers), "10.0.0.3");

        let mut headers = HeaderMap::new();
        headers.insert("cf-connecting-ip", HeaderValue::from_static("10.0.0.4"));
        assert_eq!(client_ip(&headers), "10.0.0.4");

        assert_eq!(client_ip(&HeaderMap::new()), "unknown");
    }
}
