use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub site_url: String,
    pub auth_jwt_secret: String,
    pub session_ttl_hours: i64,
    pub resend_api_key: Option<String>,
    pub email_from: String,
    pub email_test_mode: bool,
    pub email_test_address: String,
    pub ratelimit_rest_url: Option<String>,
    pub ratelimit_rest_token: Option<String>,
    pub uploads_dir: String,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            database_url: get_env("DATABASE_URL")?,
            site_url: get_env_or("SITE_URL", "http://localhost:3000"),
            auth_jwt_secret: get_env("AUTH_JWT_SECRET")?,
            session_ttl_hours: get_env_parse_or("SESSION_TTL_HOURS", 168)?,
            resend_api_key: env::var("RESEND_API_KEY").ok().filter(|v| !v.is_empty()),
            email_from: get_env_or("EMAIL_FROM", "Human Billboard <onboarding@resend.dev>"),
            // Test mode is on unless explicitly switched off.
            email_test_mode: env::var("EMAIL_TEST_MODE").map(|v| v != "false").unwrap_or(true),
            email_test_address: get_env_or("EMAIL_TEST_ADDRESS", "delivered@resend.dev"),
            ratelimit_rest_url: env::var("RATELIMIT_REST_URL").ok().filter(|v| !v.is_empty()),
            ratelimit_rest_token: env::var("RATELIMIT_REST_TOKEN").ok().filter(|v| !v.is_empty()),
            uploads_dir: get_env_or("UPLOADS_DIR", "./uploads"),
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
