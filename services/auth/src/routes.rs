//! Authentication service routes

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use tracing::{error, info};

use crate::{
    AppState,
    cookie::session_reference,
    models::Identity,
    service::LoginOutcome,
    validation::{LoginRequest, validate_login},
};

/// Response for user login
///
/// The session reference is only ever sent as a cookie.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LoginResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            identity: None,
            message: Some(message.into()),
        }
    }
}

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let healthy = state.auth.health_check().await;
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(serde_json::json!({
            "status": if healthy { "ok" } else { "degraded" },
            "service": "auth-service"
        })),
    )
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Response {
    let fields = match validate_login(&payload) {
        Ok(fields) => fields,
        Err(message) => {
            return (StatusCode::BAD_REQUEST, Json(LoginResponse::failure(message))).into_response();
        }
    };

    let outcome = state
        .auth
        .login(fields.company_key, fields.username, fields.password)
        .await;

    match outcome {
        Ok(LoginOutcome::Authenticated {
            reference,
            identity,
        }) => {
            let jar = jar.add(state.cookies.session_cookie(reference));
            let body = LoginResponse {
                success: true,
                identity: Some(identity),
                message: None,
            };
            (jar, Json(body)).into_response()
        }
        Ok(LoginOutcome::Rejected(rejection)) => {
            Json(LoginResponse::failure(rejection.message())).into_response()
        }
        Err(e) => {
            error!("Login failed: {}", e);
            let status = if e.is_transient() {
                StatusCode::SERVICE_UNAVAILABLE
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, Json(LoginResponse::failure("Login failed"))).into_response()
        }
    }
}

/// Logout endpoint
///
/// Always succeeds for the caller; a store failure only leaves the
/// reference to expire on its own.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(reference) = session_reference(&jar) {
        if let Err(e) = state.auth.logout(&reference).await {
            error!("Failed to revoke session: {}", e);
        } else {
            info!("Logout completed");
        }
    }

    let jar = jar.remove(state.cookies.removal_cookie());
    (jar, Json(serde_json::json!({ "success": true })))
}

/// Current identity, or `null` when not logged in
pub async fn me(State(state): State<AppState>, jar: CookieJar) -> Response {
    let Some(reference) = session_reference(&jar) else {
        return Json(None::<Identity>).into_response();
    };

    match state.auth.authenticate(&reference).await {
        Ok(Some(identity)) => Json(Some(identity)).into_response(),
        Ok(None) => {
            let jar = jar.remove(state.cookies.removal_cookie());
            (jar, Json(None::<Identity>)).into_response()
        }
        Err(e) => {
            error!("Failed to resolve session: {}", e);
            e.into_response()
        }
    }
}
