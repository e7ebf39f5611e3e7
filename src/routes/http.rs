// HTTP handlers: version, disk stats, SMART cache invalidation

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use super::AppState;
use crate::error::DiskStatsError;

const NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/disks/stats — latest snapshot; 503 until the first pass has completed.
pub(super) async fn disk_stats_handler(State(state): State<AppState>) -> Response {
    match state.service.get_disk_stats().await {
        Ok(snapshot) => axum::Json(snapshot.as_ref().clone()).into_response(),
        Err(e @ DiskStatsError::NotInitialized) => (
            StatusCode::SERVICE_UNAVAILABLE,
            axum::Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, operation = "get_disk_stats", "disk stats query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct InvalidateParams {
    device: Option<String>,
}

/// POST /api/disks/smart-cache/invalidate — drops one device's SMART cache entry, or all.
pub(super) async fn invalidate_smart_cache_handler(
    State(state): State<AppState>,
    Query(params): Query<InvalidateParams>,
) -> StatusCode {
    state
        .service
        .invalidate_health_cache(params.device.as_deref());
    StatusCode::NO_CONTENT
}
