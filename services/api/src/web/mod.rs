//! services/api/src/web/mod.rs

pub mod middleware;
pub mod rest;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

pub use middleware::require_admin;
pub use rest::{
    delete_assets_handler, get_document_handler, get_watermark_handler, preview_handler,
    status_handler, upload_assets_handler,
};
pub use state::AppState;

/// Uploads carry up to a 50 MiB document plus a 5 MiB watermark in one
/// request, so the body limit sits a little above their sum.
const MAX_UPLOAD_BODY_BYTES: usize = 60 * 1024 * 1024;

/// Assembles the full API router. Shared between the server binary and the
/// integration tests so both exercise the same middleware stack.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([header::RANGE, header::IF_NONE_MATCH, header::IF_MODIFIED_SINCE]);

    let public_routes = Router::new()
        .route("/profile-pdf", get(get_document_handler))
        .route("/profile-pdf/status", get(status_handler))
        .route("/profile-pdf/watermark", get(get_watermark_handler))
        .route("/profile-pdf/preview", get(preview_handler));

    let admin_routes = Router::new()
        .route(
            "/profile-pdf",
            post(upload_assets_handler).delete(delete_assets_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_admin,
        ));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY_BYTES))
        .layer(cors)
        .with_state(state)
}
