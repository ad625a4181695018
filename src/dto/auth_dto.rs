use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Claims carried by the identity-provider JWT exchanged for a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub exp: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SessionExchangePayload {
    #[validate(length(min = 1))]
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
    /// Whether a profile already exists, so clients know to route to
    /// onboarding or a dashboard.
    pub onboarded: bool,
}
