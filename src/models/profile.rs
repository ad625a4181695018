use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Marketplace role a profile was onboarded with. Stored as TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Business,
    Advertiser,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Business => "business",
            UserType::Advertiser => "advertiser",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "business" => Some(UserType::Business),
            "advertiser" => Some(UserType::Advertiser),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub user_type: String,
    pub company_name: Option<String>,
    pub phone: Option<String>,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub profile_picture_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    pub fn user_type(&self) -> Option<UserType> {
        UserType::parse(&self.user_type)
    }

    /// Name shown to the other side of the marketplace: businesses go by
    /// company name when they have one, advertisers by full name.
    pub fn display_name(&self) -> &str {
        self.company_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or(self.full_name.as_deref())
            .unwrap_or(&self.email)
    }
}
