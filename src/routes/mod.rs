// HTTP routes: version, disk stats snapshot, SMART cache invalidation

mod http;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::service::DiskStatsService;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) service: Arc<DiskStatsService>,
}

pub fn app(service: Arc<DiskStatsService>) -> Router {
    let state = AppState { service };
    Router::new()
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/disks/stats", get(http::disk_stats_handler)) // GET /api/disks/stats
        .route(
            "/api/disks/smart-cache/invalidate",
            post(http::invalidate_smart_cache_handler),
        ) // POST /api/disks/smart-cache/invalidate[?device=/dev/sda]
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
