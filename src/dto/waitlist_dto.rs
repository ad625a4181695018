use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::waitlist::WaitlistSignup;

/// Email presence is checked in the handler so the missing-field case can
/// answer with the fixed "Email required" message instead of a
/// deserialization error.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WaitlistPayload {
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitlistSignupResponse {
    pub id: i64,
    pub email: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<WaitlistSignup> for WaitlistSignupResponse {
    fn from(value: WaitlistSignup) -> Self {
        Self {
            id: value.id,
            email: value.email,
            created_at: value.created_at,
        }
    }
}
