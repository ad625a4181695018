use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::application_dto::{
        AdvertiserDashboardResponse, ApplicationResponse, ApplyPayload, MyApplicationResponse,
    },
    dto::campaign_dto::{BrowseQuery, CampaignResponse},
    error::{Error, Result},
    middleware::auth::CurrentProfile,
    middleware::rate_limit::{rate_limited_response, APPLICATION},
    services::visibility::visible_campaigns,
    AppState,
};

/// Browse feed: everyone else's campaigns with the query filters
/// applied. Rows flow through as loose JSON, see services::visibility.
#[axum::debug_handler]
pub async fn browse_campaigns(
    State(state): State<AppState>,
    Extension(CurrentProfile(profile)): Extension<CurrentProfile>,
    Query(query): Query<BrowseQuery>,
) -> Result<impl IntoResponse> {
    let filters = query.into_filters();
    let rows = state.campaign_service.browse_rows().await?;
    Ok(Json(visible_campaigns(rows, &profile.id, &filters)))
}

#[axum::debug_handler]
pub async fn campaign_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let campaign = state
        .campaign_service
        .get(id)
        .await?
        .filter(|c| c.is_active())
        .ok_or_else(|| Error::NotFound("Campaign not found".to_string()))?;
    Ok(Json(CampaignResponse::from(campaign)))
}

/// Applying re-checks that the campaign is still active: paused and
/// closed campaigns vanish from detail and apply alike.
#[axum::debug_handler]
pub async fn apply_to_campaign(
    State(state): State<AppState>,
    Extension(CurrentProfile(profile)): Extension<CurrentProfile>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApplyPayload>,
) -> Result<Response> {
    payload.validate()?;

    let campaign = state
        .campaign_service
        .get(id)
        .await?
        .filter(|c| c.is_active())
        .ok_or_else(|| Error::NotFound("Campaign not found".to_string()))?;

    let decision = state.rate_limiter.check(APPLICATION, &profile.id).await;
    if !decision.allowed {
        return Ok(rate_limited_response(&decision));
    }

    let application = state
        .application_service
        .create(campaign.id, &profile.id, payload.message)
        .await?;

    // Tell the business somebody applied, off the request path.
    let email_service = state.email_service.clone();
    let profile_service = state.profile_service.clone();
    let advertiser_name = profile.display_name().to_string();
    let business_id = campaign.business_id.clone();
    let campaign_title = campaign.title.clone();
    let message = application.message.clone();
    tokio::spawn(async move {
        if let Some(business) = profile_service.get(&business_id).await.ok().flatten() {
            let _ = email_service
                .send_application_received(
                    &business.email,
                    business.display_name(),
                    &campaign_title,
                    &advertiser_name,
                    message.as_deref(),
                )
                .await;
        }
    });

    Ok((StatusCode::CREATED, Json(ApplicationResponse::from(application))).into_response())
}

#[axum::debug_handler]
pub async fn my_applications(
    State(state): State<AppState>,
    Extension(CurrentProfile(profile)): Extension<CurrentProfile>,
) -> Result<impl IntoResponse> {
    let applications = state
        .application_service
        .list_for_advertiser(&profile.id)
        .await?;
    let applications: Vec<MyApplicationResponse> = applications
        .into_iter()
        .map(MyApplicationResponse::from)
        .collect();
    Ok(Json(applications))
}

#[axum::debug_handler]
pub async fn advertiser_dashboard(
    State(state): State<AppState>,
    Extension(CurrentProfile(profile)): Extension<CurrentProfile>,
) -> Result<impl IntoResponse> {
    let stats = state
        .application_service
        .advertiser_stats(&profile.id)
        .await?;
    let applications = state
        .application_service
        .list_for_advertiser(&profile.id)
        .await?;
    let suggested = state.campaign_service.suggestions_for(&profile.id).await?;

    Ok(Json(AdvertiserDashboardResponse {
        stats,
        applications: applications
            .into_iter()
            .map(MyApplicationResponse::from)
            .collect(),
        suggested,
    }))
}
