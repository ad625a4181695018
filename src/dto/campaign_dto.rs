use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::campaign::{Campaign, CampaignStatus, CampaignWithCounts, CompensationType};
use crate::services::visibility::BrowseFilters;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCampaignPayload {
    #[validate(length(min = 3, max = 100))]
    pub title: String,
    #[validate(length(min = 10, max = 2000))]
    pub description: String,
    #[validate(range(min = 0.01, max = 10000.0))]
    pub compensation_amount: f64,
    pub compensation_type: CompensationType,
    #[validate(length(min = 3, max = 100))]
    pub location: String,
    #[validate(range(min = 1, max = 168))]
    pub duration_hours: Option<i32>,
    #[validate(length(max = 1000))]
    pub requirements: Option<String>,
    pub status: Option<CampaignStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateCampaignPayload {
    #[validate(length(min = 3, max = 100))]
    pub title: Option<String>,
    #[validate(length(min = 10, max = 2000))]
    pub description: Option<String>,
    #[validate(range(min = 0.01, max = 10000.0))]
    pub compensation_amount: Option<f64>,
    pub compensation_type: Option<CompensationType>,
    #[validate(length(min = 3, max = 100))]
    pub location: Option<String>,
    #[validate(range(min = 1, max = 168))]
    pub duration_hours: Option<i32>,
    #[validate(length(max = 1000))]
    pub requirements: Option<String>,
    pub status: Option<CampaignStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignResponse {
    pub id: Uuid,
    pub business_id: String,
    pub title: String,
    pub description: String,
    pub compensation_amount: Decimal,
    pub compensation_type: String,
    pub location: String,
    pub duration_hours: Option<i32>,
    pub requirements: Option<String>,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Campaign> for CampaignResponse {
    fn from(value: Campaign) -> Self {
        Self {
            id: value.id,
            business_id: value.business_id,
            title: value.title,
            description: value.description,
            compensation_amount: value.compensation_amount,
            compensation_type: value.compensation_type,
            location: value.location,
            duration_hours: value.duration_hours,
            requirements: value.requirements,
            status: value.status,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Free-text browse filters; numeric bounds stay raw strings here because
/// malformed input downgrades to "no bound" instead of a 400.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BrowseQuery {
    pub location: Option<String>,
    pub merchandise: Option<String>,
    pub gender: Option<String>,
    pub age_range: Option<String>,
    pub min_comp: Option<String>,
    pub max_comp: Option<String>,
}

impl BrowseQuery {
    pub fn into_filters(self) -> BrowseFilters {
        BrowseFilters::new(
            self.location,
            self.merchandise,
            self.gender,
            self.age_range,
            self.min_comp,
            self.max_comp,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignLimitResponse {
    pub active_campaigns: i64,
    pub total_campaigns: i64,
    pub max_active: i64,
    pub max_total: i64,
    pub can_create: bool,
    pub remaining_active: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessStats {
    pub total_campaigns: i64,
    pub active_campaigns: i64,
    pub total_applications: i64,
    pub pending_applications: i64,
    pub accepted_applications: i64,
    pub rejected_applications: i64,
    pub average_compensation: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessDashboardResponse {
    pub stats: BusinessStats,
    pub campaigns: Vec<CampaignWithCounts>,
}

/// Short campaign card for the advertiser dashboard. Sample suggestions
/// shown to brand-new advertisers have no id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestedCampaign {
    pub id: Option<Uuid>,
    pub title: String,
    pub location: String,
    pub compensation_amount: Option<Decimal>,
}

impl From<Campaign> for SuggestedCampaign {
    fn from(value: Campaign) -> Self {
        Self {
            id: Some(value.id),
            title: value.title,
            location: value.location,
            compensation_amount: Some(value.compensation_amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_payload() -> CreateCampaignPayload {
        CreateCampaignPayload {
            title: "Wear our rooftop bar tee".to_string(),
            description: "Walk the 6th Street crowd in our merch on Friday nights.".to_string(),
            compensation_amount: 25.0,
            compensation_type: CompensationType::Hourly,
            location: "Austin, TX".to_string(),
            duration_hours: Some(4),
            requirements: None,
            status: None,
        }
    }

    #[test]
    fn accepts_a_well_formed_campaign() {
        assert!(base_payload().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_compensation() {
        let mut payload = base_payload();
        payload.compensation_amount = 0.0;
        assert!(payload.validate().is_err());

        payload.compensation_amount = 10001.0;
        assert!(payload.validate().is_err());
    }

    #[test]
    fn rejects_short_titles_and_week_plus_durations() {
        let mut payload = base_payload();
        payload.title = "ad".to_string();
        assert!(payload.validate().is_err());

        let mut payload = base_payload();
        payload.duration_hours = Some(169);
        assert!(payload.validate().is_err());
    }

    #[test]
    fn browse_query_downgrades_bad_bounds() {
        let query = BrowseQuery {
            min_comp: Some("lots".to_string()),
            max_comp: Some("50".to_string()),
            ..Default::default()
        };
        let filters = query.into_filters();
        assert_eq!(filters.min_compensation, None);
        assert_eq!(filters.max_compensation, Some(50.0));
    }
}
