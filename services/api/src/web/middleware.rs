//! services/api/src/web/middleware.rs
//!
//! Authentication middleware protecting the asset mutation routes.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::warn;

use crate::web::state::AppState;

/// Middleware that checks the bearer token on upload and delete requests.
///
/// The expected token comes from `ADMIN_TOKEN`; anything else is rejected
/// with 401 Unauthorized before the handler runs.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if token != state.config.admin_token {
        warn!("rejected asset mutation with an invalid admin token");
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(next.run(req).await)
}
