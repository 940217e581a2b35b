//! Session middleware
//!
//! Resolves the `auth_ref` cookie to the caller's identity. Tenant and user
//! for every downstream query come from that identity, never from the
//! request itself.

use auth::cookie::session_reference;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use crate::{error::ApiError, state::AppState};

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let reference = session_reference(&jar).ok_or(ApiError::Unauthorized)?;

    let session = state
        .sessions
        .resolve(&reference)
        .await?
        .ok_or_else(|| {
            debug!("Session reference did not resolve");
            ApiError::Unauthorized
        })?;

    req.extensions_mut().insert(session.identity());

    Ok(next.run(req).await)
}
