use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::application_dto::{ApplicationResponse, CampaignApplicationResponse, DecisionPayload},
    dto::campaign_dto::{
        BusinessDashboardResponse, CampaignLimitResponse, CampaignResponse, CreateCampaignPayload,
        UpdateCampaignPayload,
    },
    error::{Error, Result},
    middleware::auth::CurrentProfile,
    middleware::rate_limit::{rate_limited_response, CAMPAIGN_CREATE, CAMPAIGN_UPDATE},
    models::application::Decision,
    models::campaign::Campaign,
    services::campaign_service::MAX_ACTIVE_CAMPAIGNS,
    AppState,
};

/// Other businesses' campaigns answer 404 rather than 403 so ids cannot
/// be probed for existence.
async fn owned_campaign(state: &AppState, id: Uuid, business_id: &str) -> Result<Campaign> {
    state
        .campaign_service
        .get(id)
        .await?
        .filter(|c| c.business_id == business_id)
        .ok_or_else(|| Error::NotFound("Campaign not found".to_string()))
}

#[utoipa::path(
    get,
    path = "/api/business/campaigns",
    responses(
        (status = 200, description = "Campaigns owned by the calling business", body = Json<Vec<CampaignResponse>>)
    )
)]
#[axum::debug_handler]
pub async fn list_campaigns(
    State(state): State<AppState>,
    Extension(CurrentProfile(profile)): Extension<CurrentProfile>,
) -> Result<impl IntoResponse> {
    let campaigns = state.campaign_service.list_for_business(&profile.id).await?;
    let campaigns: Vec<CampaignResponse> =
        campaigns.into_iter().map(CampaignResponse::from).collect();
    Ok(Json(campaigns))
}

#[utoipa::path(
    post,
    path = "/api/business/campaigns",
    request_body = CreateCampaignPayload,
    responses(
        (status = 201, description = "Campaign created successfully", body = Json<CampaignResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Active campaign limit reached"),
        (status = 429, description = "Creation rate exceeded")
    )
)]
#[axum::debug_handler]
pub async fn create_campaign(
    State(state): State<AppState>,
    Extension(CurrentProfile(profile)): Extension<CurrentProfile>,
    Json(payload): Json<CreateCampaignPayload>,
) -> Result<Response> {
    payload.validate()?;

    let decision = state.rate_limiter.check(CAMPAIGN_CREATE, &profile.id).await;
    if !decision.allowed {
        return Ok(rate_limited_response(&decision));
    }

    if !state.campaign_service.can_create(&profile.id).await {
        return Err(Error::Conflict(format!(
            "You have reached the maximum of {MAX_ACTIVE_CAMPAIGNS} active campaigns. Pause or close one first."
        )));
    }

    let campaign = state.campaign_service.create(&profile.id, payload).await?;
    Ok((StatusCode::CREATED, Json(CampaignResponse::from(campaign))).into_response())
}

#[utoipa::path(
    get,
    path = "/api/business/campaigns/limit",
    responses(
        (status = 200, description = "Campaign counts against the caps", body = Json<CampaignLimitResponse>)
    )
)]
#[axum::debug_handler]
pub async fn get_campaign_limits(
    State(state): State<AppState>,
    Extension(CurrentProfile(profile)): Extension<CurrentProfile>,
) -> impl IntoResponse {
    let status: CampaignLimitResponse = state.campaign_service.limit_status(&profile.id).await;
    Json(status)
}

#[utoipa::path(
    get,
    path = "/api/business/campaigns/{id}",
    params(
        ("id" = Uuid, Path, description = "Campaign ID")
    ),
    responses(
        (status = 200, description = "Campaign found", body = Json<CampaignResponse>),
        (status = 404, description = "Campaign not found")
    )
)]
#[axum::debug_handler]
pub async fn get_campaign(
    State(state): State<AppState>,
    Extension(CurrentProfile(profile)): Extension<CurrentProfile>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let campaign = owned_campaign(&state, id, &profile.id).await?;
    Ok(Json(CampaignResponse::from(campaign)))
}

#[utoipa::path(
    patch,
    path = "/api/business/campaigns/{id}",
    params(
        ("id" = Uuid, Path, description = "Campaign ID")
    ),
    request_body = UpdateCampaignPayload,
    responses(
        (status = 200, description = "Campaign updated successfully", body = Json<CampaignResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Campaign not found"),
        (status = 429, description = "Update rate exceeded")
    )
)]
#[axum::debug_handler]
pub async fn update_campaign(
    State(state): State<AppState>,
    Extension(CurrentProfile(profile)): Extension<CurrentProfile>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCampaignPayload>,
) -> Result<Response> {
    payload.validate()?;

    let decision = state.rate_limiter.check(CAMPAIGN_UPDATE, &profile.id).await;
    if !decision.allowed {
        return Ok(rate_limited_response(&decision));
    }

    let campaign = state
        .campaign_service
        .update(id, &profile.id, payload)
        .await?;
    Ok(Json(CampaignResponse::from(campaign)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/business/campaigns/{id}",
    params(
        ("id" = Uuid, Path, description = "Campaign ID")
    ),
    responses(
        (status = 204, description = "Campaign deleted successfully"),
        (status = 404, description = "Campaign not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_campaign(
    State(state): State<AppState>,
    Extension(CurrentProfile(profile)): Extension<CurrentProfile>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.campaign_service.delete(id, &profile.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/business/campaigns/{id}/applications",
    params(
        ("id" = Uuid, Path, description = "Campaign ID")
    ),
    responses(
        (status = 200, description = "Applications for the campaign, newest first", body = Json<Vec<CampaignApplicationResponse>>),
        (status = 404, description = "Campaign not found")
    )
)]
#[axum::debug_handler]
pub async fn list_campaign_applications(
    State(state): State<AppState>,
    Extension(CurrentProfile(profile)): Extension<CurrentProfile>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let campaign = owned_campaign(&state, id, &profile.id).await?;
    let applications = state
        .application_service
        .list_for_campaign(campaign.id)
        .await?;
    let applications: Vec<CampaignApplicationResponse> = applications
        .into_iter()
        .map(CampaignApplicationResponse::from)
        .collect();
    Ok(Json(applications))
}

#[utoipa::path(
    post,
    path = "/api/business/applications/{id}/decision",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    request_body = DecisionPayload,
    responses(
        (status = 200, description = "Application decided", body = Json<ApplicationResponse>),
        (status = 404, description = "Application not found"),
        (status = 409, description = "Application already decided")
    )
)]
#[axum::debug_handler]
pub async fn decide_application(
    State(state): State<AppState>,
    Extension(CurrentProfile(profile)): Extension<CurrentProfile>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DecisionPayload>,
) -> Result<impl IntoResponse> {
    let application = state
        .application_service
        .decide(id, &profile.id, payload.status)
        .await?;

    // Outcome mail goes out after the transition is durable and never
    // blocks or fails the response.
    let email_service = state.email_service.clone();
    let campaign_service = state.campaign_service.clone();
    let profile_service = state.profile_service.clone();
    let business_name = profile.display_name().to_string();
    let accepted = payload.status == Decision::Accepted;
    let campaign_id = application.campaign_id;
    let advertiser_id = application.advertiser_id.clone();
    tokio::spawn(async move {
        let campaign = campaign_service.get(campaign_id).await.ok().flatten();
        let advertiser = profile_service.get(&advertiser_id).await.ok().flatten();
        if let (Some(campaign), Some(advertiser)) = (campaign, advertiser) {
            let _ = email_service
                .send_application_decided(
                    &advertiser.email,
                    advertiser.display_name(),
                    &campaign.title,
                    &business_name,
                    accepted,
                )
                .await;
        }
    });

    Ok(Json(ApplicationResponse::from(application)))
}

#[utoipa::path(
    get,
    path = "/api/business/dashboard",
    responses(
        (status = 200, description = "Aggregate stats plus campaigns with application counts", body = Json<BusinessDashboardResponse>)
    )
)]
#[axum::debug_handler]
pub async fn business_dashboard(
    State(state): State<AppState>,
    Extension(CurrentProfile(profile)): Extension<CurrentProfile>,
) -> Result<impl IntoResponse> {
    let dashboard: BusinessDashboardResponse = state
        .campaign_service
        .business_dashboard(&profile.id)
        .await?;
    Ok(Json(dashboard))
}
