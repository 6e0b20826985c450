//! REST endpoint for the dashboard overview.

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use super::demo::{DEFAULT_DAYS, Overview, generate_overview};
use crate::api_error::ApiError;
use crate::store::Database;

#[derive(Clone)]
pub struct DashboardRouteState {
    pub db: Arc<dyn Database>,
}

#[derive(Debug, Deserialize)]
struct OverviewQuery {
    days: Option<u32>,
}

/// GET /api/dashboard/{org_id}/overview?days=N
async fn get_overview(
    State(state): State<DashboardRouteState>,
    Path(org_id): Path<String>,
    query: Result<Query<OverviewQuery>, QueryRejection>,
) -> Result<Json<Overview>, ApiError> {
    let Query(query) = query?;
    let org_id = Uuid::parse_str(&org_id)
        .map_err(|_| ApiError::BadRequest(format!("Invalid organization id: {org_id}")))?;

    if state.db.get_organization(org_id).await?.is_none() {
        return Err(ApiError::NotFound(format!("Organization {org_id} not found")));
    }

    let overview = generate_overview(org_id, query.days.unwrap_or(DEFAULT_DAYS));
    Ok(Json(overview))
}

/// Build the dashboard REST routes.
pub fn dashboard_routes(state: DashboardRouteState) -> Router {
    Router::new()
        .route("/api/dashboard/{org_id}/overview", get(get_overview))
        .with_state(state)
}
