pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use sqlx::PgPool;

use crate::middleware::rate_limit::RateLimiter;
use crate::services::{
    application_service::ApplicationService, campaign_service::CampaignService,
    email_service::EmailService, profile_service::ProfileService,
    session_service::SessionService, waitlist_service::WaitlistService,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub session_service: SessionService,
    pub profile_service: ProfileService,
    pub campaign_service: CampaignService,
    pub application_service: ApplicationService,
    pub waitlist_service: WaitlistService,
    pub email_service: EmailService,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let config = crate::config::get_config();

        let session_service = SessionService::new(pool.clone());
        let profile_service = ProfileService::new(pool.clone());
        let campaign_service = CampaignService::new(pool.clone());
        let application_service = ApplicationService::new(pool.clone());
        let waitlist_service = WaitlistService::new(pool.clone());
        let email_service = EmailService::new(
            config.resend_api_key.clone(),
            config.email_from.clone(),
            &config.site_url,
            config.email_test_mode,
            config.email_test_address.clone(),
        );
        let rate_limiter = RateLimiter::new(
            config.ratelimit_rest_url.clone(),
            config.ratelimit_rest_token.clone(),
        );

        Self {
            pool,
            session_service,
            profile_service,
            campaign_service,
            application_service,
            waitlist_service,
            email_service,
            rate_limiter,
        }
    }
}
