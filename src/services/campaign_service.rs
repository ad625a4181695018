use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use tracing::{error, warn};
use uuid::Uuid;

use crate::dto::campaign_dto::{
    BusinessDashboardResponse, BusinessStats, CampaignLimitResponse, CreateCampaignPayload,
    SuggestedCampaign, UpdateCampaignPayload,
};
use crate::error::{Error, Result};
use crate::models::campaign::{Campaign, CampaignStatus, CampaignWithCounts};
use crate::models::ApplicationStatus;
use crate::utils::validation::normalize_optional;

pub const MAX_ACTIVE_CAMPAIGNS: i64 = 20;
pub const MAX_TOTAL_CAMPAIGNS: i64 = 50;
pub const MAX_CAMPAIGN_DURATION_HOURS: i32 = 168;

/// How many rows the advertiser browse pulls before filtering.
pub const BROWSE_FETCH_LIMIT: i64 = 100;

const SUGGESTION_LIMIT: i64 = 3;

#[derive(Clone)]
pub struct CampaignService {
    pool: PgPool,
}

impl CampaignService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, business_id: &str, payload: CreateCampaignPayload) -> Result<Campaign> {
        let amount = Decimal::from_f64_retain(payload.compensation_amount)
            .ok_or_else(|| Error::BadRequest("Invalid compensation amount".to_string()))?;
        let status = payload.status.unwrap_or(CampaignStatus::Active);

        let campaign = sqlx::query_as::<_, Campaign>(
            r#"
            INSERT INTO campaigns (
                business_id, title, description, compensation_amount,
                compensation_type, location, duration_hours, requirements, status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(business_id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(amount)
        .bind(payload.compensation_type.as_str())
        .bind(&payload.location)
        .bind(payload.duration_hours)
        .bind(normalize_optional(payload.requirements))
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(campaign)
    }

    pub async fn update(
        &self,
        id: Uuid,
        business_id: &str,
        payload: UpdateCampaignPayload,
    ) -> Result<Campaign> {
        let amount = match payload.compensation_amount {
            Some(raw) => Some(
                Decimal::from_f64_retain(raw)
                    .ok_or_else(|| Error::BadRequest("Invalid compensation amount".to_string()))?,
            ),
            None => None,
        };

        let campaign = sqlx::query_as::<_, Campaign>(
            r#"
            UPDATE campaigns
            SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                compensation_amount = COALESCE($5, compensation_amount),
                compensation_type = COALESCE($6, compensation_type),
                location = COALESCE($7, location),
                duration_hours = COALESCE($8, duration_hours),
                requirements = COALESCE($9, requirements),
                status = COALESCE($10, status),
                updated_at = NOW()
            WHERE id = $1 AND business_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(business_id)
        .bind(payload.title)
        .bind(payload.description)
        .bind(amount)
        .bind(payload.compensation_type.map(|t| t.as_str()))
        .bind(payload.location)
        .bind(payload.duration_hours)
        .bind(normalize_optional(payload.requirements))
        .bind(payload.status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await?;

        campaign.ok_or_else(|| Error::NotFound("Campaign not found".to_string()))
    }

    pub async fn delete(&self, id: Uuid, business_id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = $1 AND business_id = $2")
            .bind(id)
            .bind(business_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Campaign not found".to_string()));
        }
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Campaign>> {
        let campaign = sqlx::query_as::<_, Campaign>("SELECT * FROM campaigns WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(campaign)
    }

    pub async fn list_for_business(&self, business_id: &str) -> Result<Vec<Campaign>> {
        let campaigns = sqlx::query_as::<_, Campaign>(
            r#"
            SELECT * FROM campaigns
            WHERE business_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(campaigns)
    }

    /// Newest rows of every status, serialized to loose JSON for the
    /// visibility filter. Campaign records predating the current schema
    /// do not all share column names, which is why filtering happens on
    /// the JSON form rather than on typed rows.
    pub async fn browse_rows(&self) -> Result<Vec<JsonValue>> {
        let campaigns = sqlx::query_as::<_, Campaign>(
            r#"
            SELECT * FROM campaigns
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(BROWSE_FETCH_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        let mut rows = Vec::with_capacity(campaigns.len());
        for campaign in campaigns {
            rows.push(serde_json::to_value(campaign)?);
        }
        Ok(rows)
    }

    pub async fn count_active(&self, business_id: &str) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM campaigns WHERE business_id = $1 AND status = 'active'",
        )
        .bind(business_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    pub async fn count_total(&self, business_id: &str) -> Result<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM campaigns WHERE business_id = $1")
                .bind(business_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Creation guard. Fails open: if the count cannot be read, creation
    /// is allowed and the error only logged.
    pub async fn can_create(&self, business_id: &str) -> bool {
        match self.count_active(business_id).await {
            Ok(active) => under_campaign_limit(active),
            Err(err) => {
                error!(business_id, "campaign limit check failed, allowing: {err}");
                true
            }
        }
    }

    /// Limit report for the dashboard. Unlike the guard this fails
    /// closed: on error it reports zeros with can_create = false.
    pub async fn limit_status(&self, business_id: &str) -> CampaignLimitResponse {
        let counts = async {
            let active = self.count_active(business_id).await?;
            let total = self.count_total(business_id).await?;
            Ok::<_, Error>((active, total))
        }
        .await;

        match counts {
            Ok((active, total)) => CampaignLimitResponse {
                active_campaigns: active,
                total_campaigns: total,
                max_active: MAX_ACTIVE_CAMPAIGNS,
                max_total: MAX_TOTAL_CAMPAIGNS,
                can_create: under_campaign_limit(active),
                remaining_active: (MAX_ACTIVE_CAMPAIGNS - active).max(0),
            },
            Err(err) => {
                warn!(business_id, "campaign limit status unavailable: {err}");
                CampaignLimitResponse {
                    active_campaigns: 0,
                    total_campaigns: 0,
                    max_active: MAX_ACTIVE_CAMPAIGNS,
                    max_total: MAX_TOTAL_CAMPAIGNS,
                    can_create: false,
                    remaining_active: 0,
                }
            }
        }
    }

    pub async fn business_dashboard(&self, business_id: &str) -> Result<BusinessDashboardResponse> {
        let (total_campaigns, active_campaigns, average_compensation) =
            sqlx::query_as::<_, (i64, i64, Option<f64>)>(
                r#"
                SELECT
                    COUNT(*),
                    COUNT(*) FILTER (WHERE status = 'active'),
                    AVG(compensation_amount)::FLOAT8
                FROM campaigns
                WHERE business_id = $1
                "#,
            )
            .bind(business_id)
            .fetch_one(&self.pool)
            .await?;

        let status_counts = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT a.status, COUNT(*)
            FROM applications a
            JOIN campaigns c ON c.id = a.campaign_id
            WHERE c.business_id = $1
            GROUP BY a.status
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;

        let mut stats = BusinessStats {
            total_campaigns,
            active_campaigns,
            total_applications: 0,
            pending_applications: 0,
            accepted_applications: 0,
            rejected_applications: 0,
            average_compensation,
        };
        for (status, count) in status_counts {
            stats.total_applications += count;
            match ApplicationStatus::parse(&status) {
                Some(ApplicationStatus::Pending) => stats.pending_applications = count,
                Some(ApplicationStatus::Accepted) => stats.accepted_applications = count,
                Some(ApplicationStatus::Rejected) => stats.rejected_applications = count,
                None => {}
            }
        }

        let campaigns = sqlx::query_as::<_, CampaignWithCounts>(
            r#"
            SELECT
                c.*,
                COUNT(a.id) AS application_count,
                COUNT(a.id) FILTER (WHERE a.status = 'pending') AS pending_count
            FROM campaigns c
            LEFT JOIN applications a ON a.campaign_id = c.id
            WHERE c.business_id = $1
            GROUP BY c.id
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(BusinessDashboardResponse { stats, campaigns })
    }

    /// Recent active campaigns from other businesses, with canned
    /// samples for a marketplace that has none yet.
    pub async fn suggestions_for(&self, user_id: &str) -> Result<Vec<SuggestedCampaign>> {
        let campaigns = sqlx::query_as::<_, Campaign>(
            r#"
            SELECT * FROM campaigns
            WHERE status = 'active' AND business_id <> $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(SUGGESTION_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        if campaigns.is_empty() {
            return Ok(sample_suggestions());
        }
        Ok(campaigns.into_iter().map(SuggestedCampaign::from).collect())
    }
}

pub fn under_campaign_limit(active: i64) -> bool {
    active < MAX_ACTIVE_CAMPAIGNS
}

fn sample_suggestions() -> Vec<SuggestedCampaign> {
    vec![
        SuggestedCampaign {
            id: None,
            title: "Downtown coffee crawl tee".to_string(),
            location: "Austin, TX".to_string(),
            compensation_amount: Some(Decimal::new(2500, 2)),
        },
        SuggestedCampaign {
            id: None,
            title: "Weekend farmers market hoodie".to_string(),
            location: "Portland, OR".to_string(),
            compensation_amount: Some(Decimal::new(4000, 2)),
        },
        SuggestedCampaign {
            id: None,
            title: "Gym launch tank top".to_string(),
            location: "Miami, FL".to_string(),
            compensation_amount: Some(Decimal::new(3000, 2)),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nineteen_active_campaigns_still_admit() {
        assert!(under_campaign_limit(19));
    }

    #[test]
    fn twenty_active_campaigns_reject() {
        assert!(!under_campaign_limit(20));
        assert!(!under_campaign_limit(21));
    }

    #[test]
    fn sample_suggestions_have_no_ids() {
        let samples = sample_suggestions();
        assert_eq!(samples.len(), 3);
        assert!(samples.iter().all(|s| s.id.is_none()));
    }
}
