// file: src/server/router.rs
// description: axum router mapping api paths to handlers
// reference: json api surface plus cors and request tracing

use crate::server::handlers::{
    clear, get_cves, get_iocs, get_item, get_items, get_stats, get_threats, health, search,
    search_get, sync, upload_files,
};
use crate::server::SharedState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build and return the full router.
pub fn build_router(state: SharedState) -> Router {
    let max_upload_bytes = state.config.ingest.max_upload_mb * 1024 * 1024;

    Router::new()
        .route("/", get(health))
        .route("/api/stats", get(get_stats))
        .route("/api/items", get(get_items))
        .route("/api/items/{item_id}", get(get_item))
        .route("/api/cves", get(get_cves))
        .route("/api/iocs", get(get_iocs))
        .route("/api/threats", get(get_threats))
        .route("/api/sync", post(sync))
        .route("/api/upload", post(upload_files))
        .route("/api/search", post(search).get(search_get))
        .route("/api/clear", delete(clear))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
