// file: src/server/handlers.rs
// description: json api handlers over the corpus store
// reference: stats, items, rollups, sync, upload, search, clear

use crate::extractor::{EntityExtractor, EvidenceCollector};
use crate::ingest::{self, upload};
use crate::models::{CveEntry, IocCollection, SearchResult, Stats, ThreatEntry, ThreatItem};
use crate::query;
use crate::server::error::ApiError;
use crate::server::SharedState;
use crate::store::aggregate;
use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

const DEFAULT_ITEM_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct ItemsQuery {
    pub source: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SyncRequest {
    pub sources: Option<Vec<String>>,
    pub limit_per_source: Option<usize>,
    pub fetch_full_content: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
}

#[derive(Serialize)]
pub struct ItemsResponse {
    pub items: Vec<ThreatItem>,
    pub total: usize,
}

#[derive(Serialize)]
pub struct CvesResponse {
    pub cves: Vec<CveEntry>,
}

#[derive(Serialize)]
pub struct ThreatsResponse {
    pub threats: Vec<ThreatEntry>,
}

/// GET / - health check
pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok", "service": "threatlens"}))
}

/// GET /api/stats - dashboard statistics
pub async fn get_stats(State(state): State<SharedState>) -> Json<Stats> {
    let snapshot = state.store.snapshot();
    Json(aggregate::stats(snapshot.items()))
}

/// GET /api/items - all items newest first, optionally filtered by source
pub async fn get_items(
    State(state): State<SharedState>,
    Query(params): Query<ItemsQuery>,
) -> Json<ItemsResponse> {
    let snapshot = state.store.snapshot();
    let mut items = match &params.source {
        Some(source) => snapshot.items_for_source(source),
        None => snapshot.items().to_vec(),
    };
    items.sort_by(|a, b| b.date.cmp(&a.date));

    let total = items.len();
    let limit = params.limit.unwrap_or(DEFAULT_ITEM_LIMIT);
    let items = items
        .into_iter()
        .take(limit)
        .map(|i| i.as_ref().clone())
        .collect();

    Json(ItemsResponse { items, total })
}

/// GET /api/items/{id} - one item with its evidence
pub async fn get_item(
    State(state): State<SharedState>,
    Path(item_id): Path<String>,
) -> Result<Json<ThreatItem>, ApiError> {
    let snapshot = state.store.snapshot();
    let item = snapshot
        .get(&item_id)
        .ok_or_else(|| ApiError::not_found(format!("item {item_id} not found")))?;
    Ok(Json(item.as_ref().clone()))
}

/// GET /api/cves - every CVE with counts and back-references
pub async fn get_cves(State(state): State<SharedState>) -> Json<CvesResponse> {
    let snapshot = state.store.snapshot();
    Json(CvesResponse {
        cves: aggregate::cve_entries(snapshot.items()),
    })
}

/// GET /api/iocs - all IoCs grouped by kind
pub async fn get_iocs(State(state): State<SharedState>) -> Json<IocCollection> {
    let snapshot = state.store.snapshot();
    Json(aggregate::ioc_collection(snapshot.items()))
}

/// GET /api/threats - malware and actors with counts
pub async fn get_threats(State(state): State<SharedState>) -> Json<ThreatsResponse> {
    let snapshot = state.store.snapshot();
    Json(ThreatsResponse {
        threats: aggregate::threat_entries(snapshot.items()),
    })
}

/// POST /api/sync - pull configured feeds into the corpus
pub async fn sync(
    State(state): State<SharedState>,
    Json(request): Json<SyncRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut cfg = state.config.ingest.clone();
    if let Some(limit) = request.limit_per_source {
        cfg.limit_per_source = limit;
    }
    if let Some(fetch_full) = request.fetch_full_content {
        cfg.fetch_full_content = fetch_full;
    }

    let outcome = ingest::sync_sources(&state.store, &cfg, request.sources).await?;
    let snapshot = state.store.snapshot();

    Ok(Json(json!({
        "success": true,
        "message": format!(
            "Synced {} articles from {} sources",
            outcome.articles_processed,
            outcome.sources.len()
        ),
        "articles_processed": outcome.articles_processed,
        "sources": outcome.sources,
        "errors": outcome.errors,
        "stats": aggregate::stats(snapshot.items()),
    })))
}

/// POST /api/upload - process uploaded pdf or text reports
pub async fn upload_files(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let extractor = EntityExtractor::new();
    let collector = EvidenceCollector::new(
        state.config.extraction.snippet_max_chars,
        state.config.extraction.max_evidence_snippets,
    );

    let mut results: Vec<Value> = Vec::new();
    let mut successful = 0;
    let mut total = 0;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("invalid multipart body: {e}")))?
    {
        let filename = match field.file_name() {
            Some(name) => name.to_string(),
            None => continue,
        };
        total += 1;

        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                results.push(json!({
                    "filename": filename,
                    "success": false,
                    "error": format!("failed to read upload: {e}"),
                }));
                continue;
            }
        };

        match upload::process_upload(&extractor, &collector, &filename, &bytes) {
            Ok(item) => {
                let outcome = upload::outcome_for(&filename, &item);
                state.store.append(item);
                successful += 1;
                results.push(json!({
                    "filename": outcome.filename,
                    "success": true,
                    "id": outcome.id,
                    "char_count": outcome.char_count,
                    "entities": outcome.entities,
                }));
            }
            Err(e) => {
                results.push(json!({
                    "filename": filename,
                    "success": false,
                    "error": e.to_string(),
                }));
            }
        }
    }

    let snapshot = state.store.snapshot();
    Ok(Json(json!({
        "success": true,
        "message": format!("Processed {successful}/{total} files"),
        "results": results,
        "stats": aggregate::stats(snapshot.items()),
    })))
}

/// POST /api/search - natural language search over the corpus
pub async fn search(
    State(state): State<SharedState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResult>, ApiError> {
    if request.query.trim().is_empty() {
        return Err(ApiError::bad_request("query cannot be empty"));
    }

    let parsed = query::parser::parse(&request.query);
    let snapshot = state.store.snapshot();
    let result = query::executor::execute(&parsed, snapshot.items());
    info!(query = %request.query, results = result.result_count, "search executed");

    Ok(Json(result))
}

/// GET /api/search?q= - convenience form of the search endpoint
pub async fn search_get(
    state: State<SharedState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResult>, ApiError> {
    search(state, Json(SearchRequest { query: params.q })).await
}

/// DELETE /api/clear - drop the whole corpus
pub async fn clear(State(state): State<SharedState>) -> Json<Value> {
    state.store.clear();
    info!("corpus cleared");
    Json(json!({"success": true, "message": "All data cleared"}))
}
