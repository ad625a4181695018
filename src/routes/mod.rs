use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::get_config;
use crate::AppState;

pub mod advertiser;
pub mod auth;
pub mod campaign;
pub mod health;
pub mod media;
pub mod profile;
pub mod waitlist;

pub fn router(state: AppState) -> Router {
    let config = get_config();

    let public_api = Router::new()
        .route("/health", get(health::health))
        .route("/api/auth/session", post(auth::exchange_session))
        .route(
            "/api/waitlist",
            post(waitlist::signup).get(waitlist::list_signups),
        )
        .route("/api/media/:name", get(media::stream_media));

    // Needs a session but works for both account types.
    let account_api = Router::new()
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/onboarding", post(auth::onboard))
        .route(
            "/api/profile/picture",
            post(profile::upload_picture).delete(profile::delete_picture),
        )
        .layer(from_fn_with_state(
            state.clone(),
            crate::middleware::auth::require_session,
        ));

    // Layers run bottom-up: the session gate resolves the cookie before
    // the role gate looks at the profile.
    let business_api = Router::new()
        .route(
            "/api/business/campaigns",
            get(campaign::list_campaigns).post(campaign::create_campaign),
        )
        .route(
            "/api/business/campaigns/limit",
            get(campaign::get_campaign_limits),
        )
        .route(
            "/api/business/campaigns/:id",
            get(campaign::get_campaign)
                .patch(campaign::update_campaign)
                .delete(campaign::delete_campaign),
        )
        .route(
            "/api/business/campaigns/:id/applications",
            get(campaign::list_campaign_applications),
        )
        .route(
            "/api/business/applications/:id/decision",
            post(campaign::decide_application),
        )
        .route("/api/business/dashboard", get(campaign::business_dashboard))
        .route(
            "/api/business/profile",
            get(profile::get_business_profile).put(profile::update_business_profile),
        )
        .layer(from_fn_with_state(
            state.clone(),
            crate::middleware::auth::require_business,
        ))
        .layer(from_fn_with_state(
            state.clone(),
            crate::middleware::auth::require_session,
        ));

    let advertiser_api = Router::new()
        .route(
            "/api/advertiser/campaigns",
            get(advertiser::browse_campaigns),
        )
        .route(
            "/api/advertiser/campaigns/:id",
            get(advertiser::campaign_detail),
        )
        .route(
            "/api/advertiser/campaigns/:id/apply",
            post(advertiser::apply_to_campaign),
        )
        .route(
            "/api/advertiser/applications",
            get(advertiser::my_applications),
        )
        .route(
            "/api/advertiser/dashboard",
            get(advertiser::advertiser_dashboard),
        )
        .route(
            "/api/advertiser/profile",
            get(profile::get_advertiser_profile).put(profile::update_advertiser_profile),
        )
        .layer(from_fn_with_state(
            state.clone(),
            crate::middleware::auth::require_advertiser,
        ))
        .layer(from_fn_with_state(
            state.clone(),
            crate::middleware::auth::require_session,
        ));

    Router::new()
        .merge(public_api)
        .merge(account_api)
        .merge(business_api)
        .merge(advertiser_api)
        .layer(from_fn_with_state(
            state.rate_limiter.clone(),
            crate::middleware::rate_limit::global_middleware,
        ))
        // Static uploads stay outside the per-IP limiter.
        .nest_service("/uploads", ServeDir::new(&config.uploads_dir))
        .with_state(state)
        .layer(crate::middleware::cors::site_cors())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
}
