//! HTTP router assembly and serving.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::dashboard::{DashboardRouteState, dashboard_routes};
use crate::error::{ConfigError, Error};
use crate::onboarding::{OnboardingRouteState, OrganizationCreator, onboarding_routes};
use crate::store::Database;

/// Shared handles every route group is built from.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Database>,
    pub creator: Arc<dyn OrganizationCreator>,
    pub submit_timeout: Duration,
}

fn cors_layer(origin: Option<&str>) -> Result<CorsLayer, ConfigError> {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origin {
        Some(origin) => {
            let value = HeaderValue::from_str(origin).map_err(|e| ConfigError::InvalidValue {
                key: "DASH_CORS_ORIGIN".into(),
                message: e.to_string(),
            })?;
            Ok(cors.allow_origin(value))
        }
        None => Ok(cors.allow_origin(Any)),
    }
}

/// Build the API router with all routes.
pub fn build_router(state: AppState, cors_origin: Option<&str>) -> Result<Router, ConfigError> {
    let onboarding = onboarding_routes(OnboardingRouteState {
        db: Arc::clone(&state.db),
        creator: Arc::clone(&state.creator),
        submit_timeout: state.submit_timeout,
    });
    let dashboard = dashboard_routes(DashboardRouteState { db: state.db });

    Ok(onboarding
        .merge(dashboard)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origin)?))
}

/// Bind and serve until the process is stopped.
pub async fn serve(state: AppState, config: &ServerConfig) -> Result<(), Error> {
    let app = build_router(state, config.cors_origin.as_deref())?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("REST API listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::store::{LibSqlBackend, StoreCreator};

    async fn test_router() -> Router {
        let db: Arc<dyn Database> = Arc::new(LibSqlBackend::new_memory().await.unwrap());
        let creator = Arc::new(StoreCreator::new(Arc::clone(&db)));
        build_router(
            AppState {
                db,
                creator,
                submit_timeout: Duration::from_secs(1),
            },
            None,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn router_serves_health() {
        let response = test_router()
            .await
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn router_rejects_malformed_json() {
        let response = test_router()
            .await
            .oneshot(
                Request::post("/api/onboarding/ecom")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn cors_accepts_explicit_origin() {
        assert!(cors_layer(Some("https://app.example")).is_ok());
        assert!(cors_layer(None).is_ok());
    }

    #[test]
    fn cors_rejects_unprintable_origin() {
        let err = cors_layer(Some("bad\norigin")).unwrap_err();
        assert!(err.to_string().contains("DASH_CORS_ORIGIN"));
    }
}
