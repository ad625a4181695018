use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::profile::{UserProfile, UserType};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OnboardingPayload {
    pub user_type: UserType,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 100))]
    pub full_name: Option<String>,
    #[validate(length(max = 100))]
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BusinessProfilePayload {
    #[validate(length(min = 1, max = 100))]
    pub company_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 20))]
    pub phone: String,
    #[validate(length(min = 1, max = 100))]
    pub industry: Option<String>,
    #[validate(length(min = 1, max = 1000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub address: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,
    #[validate(length(equal = 2))]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AdvertiserProfilePayload {
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 20))]
    pub phone: String,
    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,
    #[validate(length(equal = 2))]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
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

impl From<UserProfile> for ProfileResponse {
    fn from(value: UserProfile) -> Self {
        Self {
            id: value.id,
            email: value.email,
            full_name: value.full_name,
            user_type: value.user_type,
            company_name: value.company_name,
            phone: value.phone,
            industry: value.industry,
            description: value.description,
            address: value.address,
            city: value.city,
            state: value.state,
            profile_picture_url: value.profile_picture_url,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PictureUploadResponse {
    pub profile_picture_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn state_code_must_be_two_characters() {
        let payload = AdvertiserProfilePayload {
            full_name: "Jordan Walker".to_string(),
            email: "jordan@example.com".to_string(),
            phone: "5125550134".to_string(),
            city: Some("Austin".to_string()),
            state: Some("Texas".to_string()),
        };
        assert!(payload.validate().is_err());

        let payload = AdvertiserProfilePayload {
            state: Some("TX".to_string()),
            ..payload
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn business_profile_requires_company_name() {
        let payload = BusinessProfilePayload {
            company_name: String::new(),
            email: "ads@acme.test".to_string(),
            phone: "5125550000".to_string(),
            industry: None,
            description: None,
            address: None,
            city: None,
            state: None,
        };
        assert!(payload.validate().is_err());
    }
}
