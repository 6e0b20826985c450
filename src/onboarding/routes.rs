//! REST endpoints for onboarding submissions and created organizations.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use super::creator::OrganizationCreator;
use super::model::{AgencyDraft, EcomDraft, Organization, OrganizationKind};
use super::schema::{AgencySchema, EcomSchema, WizardSchema};
use super::wizard::Wizard;
use crate::api_error::ApiError;
use crate::store::Database;

pub const DEFAULT_LIST_LIMIT: usize = 50;
pub const MAX_LIST_LIMIT: usize = 200;

/// Shared state for onboarding routes.
#[derive(Clone)]
pub struct OnboardingRouteState {
    pub db: Arc<dyn Database>,
    pub creator: Arc<dyn OrganizationCreator>,
    pub submit_timeout: Duration,
}

/// Replay a submitted draft through the wizard rules, then create it.
async fn onboard<S: WizardSchema>(
    state: &OnboardingRouteState,
    draft: S::Draft,
) -> Result<(StatusCode, Json<Organization>), ApiError> {
    let mut wizard = Wizard::<S>::replay(draft)?.with_submit_timeout(state.submit_timeout);
    debug!(kind = %S::KIND, team = wizard.team_members().len(), "Draft replayed");
    let org = wizard.submit(state.creator.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(org)))
}

/// POST /api/onboarding/agency
async fn create_agency(
    State(state): State<OnboardingRouteState>,
    body: Result<Json<AgencyDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Organization>), ApiError> {
    let Json(draft) = body?;
    onboard::<AgencySchema>(&state, draft).await
}

/// POST /api/onboarding/ecom
async fn create_ecom(
    State(state): State<OnboardingRouteState>,
    body: Result<Json<EcomDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Organization>), ApiError> {
    let Json(draft) = body?;
    onboard::<EcomSchema>(&state, draft).await
}

/// GET /api/organizations/{id}
async fn get_organization(
    State(state): State<OnboardingRouteState>,
    Path(id): Path<String>,
) -> Result<Json<Organization>, ApiError> {
    let id = Uuid::parse_str(&id)
        .map_err(|_| ApiError::BadRequest(format!("Invalid organization id: {id}")))?;
    state
        .db
        .get_organization(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Organization {id} not found")))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(rename = "type")]
    kind: Option<String>,
    limit: Option<usize>,
}

/// GET /api/organizations?type=agency&limit=N
async fn list_organizations(
    State(state): State<OnboardingRouteState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Organization>>, ApiError> {
    let Query(query) = query?;
    let kind = query
        .kind
        .as_deref()
        .map(str::parse::<OrganizationKind>)
        .transpose()
        .map_err(ApiError::BadRequest)?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);

    Ok(Json(state.db.list_organizations(kind, limit).await?))
}

/// GET /health
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "campaign-dash",
    }))
}

/// Build the onboarding REST routes.
pub fn onboarding_routes(state: OnboardingRouteState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/onboarding/agency", post(create_agency))
        .route("/api/onboarding/ecom", post(create_ecom))
        .route("/api/organizations", get(list_organizations))
        .route("/api/organizations/{id}", get(get_organization))
        .with_state(state)
}
