//! API service routes

use auth::models::Identity;
use axum::{
    Extension, Json, Router,
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;

use crate::{
    AppState,
    error::ApiResult,
    middleware::auth_middleware,
    models::{ProjectPage, ProjectsQuery},
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/projects", get(list_projects))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let (database, sessions) = tokio::join!(
        state.projects.health_check(),
        state.sessions.health_check()
    );
    let healthy = database && sessions;
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if healthy { "ok" } else { "degraded" },
            "service": "api-service"
        })),
    )
}

/// Projects the caller has been granted, one page at a time
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<ProjectsQuery>,
) -> ApiResult<Json<ProjectPage>> {
    let page = state
        .projects
        .list(&identity.tenant_id, identity.user_id, &query)
        .await?;
    Ok(Json(page))
}
