//! End-to-end tests for the JSON API.
//!
//! Each test seeds the corpus store directly and drives the router with
//! in-process requests; nothing touches the network.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Duration, Utc};
use std::sync::Arc;
use threatlens::{AppState, Config, EntityExtractor, ThreatItem};
use tower::ServiceExt;

fn test_state() -> Arc<AppState> {
    Arc::new(AppState::new(Config::default_config()))
}

fn seed_item(state: &AppState, title: &str, source: &str, text: &str, age_days: i64) -> String {
    let extracted = EntityExtractor::new().extract(text);
    let item = ThreatItem::new(
        title.to_string(),
        source.to_string(),
        Utc::now() - Duration::days(age_days),
        text.to_string(),
    )
    .with_content(text.to_string())
    .with_extracted(extracted);
    state.store.append(item)
}

async fn get_json(
    state: Arc<AppState>,
    uri: &str,
) -> (StatusCode, serde_json::Value) {
    let app = threatlens::build_router(state);
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_health_endpoint() {
    let (status, json) = get_json(test_state(), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"].as_str(), Some("ok"));
}

#[tokio::test]
async fn test_stats_empty_corpus_is_all_zeros() {
    let (status, json) = get_json(test_state(), "/api/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_items"].as_u64(), Some(0));
    assert_eq!(json["total_cves"].as_u64(), Some(0));
    assert_eq!(json["total_iocs"].as_u64(), Some(0));
    assert_eq!(json["ioc_breakdown"]["ips"].as_u64(), Some(0));
}

#[tokio::test]
async fn test_stats_reflect_seeded_corpus() {
    let state = test_state();
    seed_item(&state, "A", "cisa", "APT29 exploited CVE-2024-3400", 1);
    seed_item(&state, "B", "pdf", "Emotet C2 at 203.0.113.7", 1);

    let (status, json) = get_json(state, "/api/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_items"].as_u64(), Some(2));
    assert_eq!(json["articles"].as_u64(), Some(1));
    assert_eq!(json["pdfs"].as_u64(), Some(1));
    assert_eq!(json["total_cves"].as_u64(), Some(1));
    assert_eq!(json["ioc_breakdown"]["ips"].as_u64(), Some(1));
}

#[tokio::test]
async fn test_items_list_and_source_filter() {
    let state = test_state();
    seed_item(&state, "Old", "cisa", "advisory", 5);
    seed_item(&state, "Fresh", "cisa", "advisory", 1);
    seed_item(&state, "Report", "pdf", "report text", 2);

    let (status, json) = get_json(state.clone(), "/api/items").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"].as_u64(), Some(3));
    // Newest first
    assert_eq!(json["items"][0]["title"].as_str(), Some("Fresh"));

    let (_, filtered) = get_json(state, "/api/items?source=pdf&limit=10").await;
    assert_eq!(filtered["total"].as_u64(), Some(1));
    assert_eq!(filtered["items"][0]["title"].as_str(), Some("Report"));
}

#[tokio::test]
async fn test_get_item_by_id_and_missing_id() {
    let state = test_state();
    let id = seed_item(&state, "Alert", "cisa", "CVE-2024-3400 details", 1);

    let (status, json) = get_json(state.clone(), &format!("/api/items/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"].as_str(), Some("Alert"));
    assert_eq!(json["extracted"]["cves"][0].as_str(), Some("CVE-2024-3400"));

    let (status, json) = get_json(state, "/api/items/nope1234").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"].as_str(), Some("not_found"));
}

#[tokio::test]
async fn test_cve_rollup_endpoint() {
    let state = test_state();
    seed_item(&state, "A", "cisa", "CVE-2024-3400 exploited", 1);
    seed_item(&state, "B", "gbhackers", "CVE-2024-3400 again", 1);

    let (status, json) = get_json(state, "/api/cves").await;

    assert_eq!(status, StatusCode::OK);
    let cves = json["cves"].as_array().unwrap();
    assert_eq!(cves.len(), 1);
    assert_eq!(cves[0]["id"].as_str(), Some("CVE-2024-3400"));
    assert_eq!(cves[0]["count"].as_u64(), Some(2));
    assert_eq!(cves[0]["sources"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_threats_endpoint_reports_kind() {
    let state = test_state();
    seed_item(&state, "A", "cisa", "APT29 deployed Emotet", 1);

    let (status, json) = get_json(state, "/api/threats").await;

    assert_eq!(status, StatusCode::OK);
    let threats = json["threats"].as_array().unwrap();
    let apt = threats
        .iter()
        .find(|t| t["name"].as_str() == Some("APT29"))
        .unwrap();
    assert_eq!(apt["type"].as_str(), Some("actor"));
}

#[tokio::test]
async fn test_search_post_end_to_end() {
    let state = test_state();
    seed_item(&state, "Espionage", "cisa", "APT29 campaign against embassies", 1);
    seed_item(&state, "Ransomware", "gbhackers", "LockBit hits hospital", 1);

    let app = threatlens::build_router(state);
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/search")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"query": "apt29"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["result_count"].as_u64(), Some(1));
    assert_eq!(json["results"][0]["title"].as_str(), Some("Espionage"));
    assert!(json["answer_summary"]
        .as_str()
        .unwrap()
        .starts_with("Found 1 item"));
}

#[tokio::test]
async fn test_search_get_variant_matches_post() {
    let state = test_state();
    seed_item(&state, "Espionage", "cisa", "APT29 campaign", 1);

    let (status, json) = get_json(state, "/api/search?q=apt29").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result_count"].as_u64(), Some(1));
    assert_eq!(json["parsed_query"]["raw_query"].as_str(), Some("apt29"));
}

#[tokio::test]
async fn test_search_rejects_empty_query() {
    let state = test_state();

    let app = threatlens::build_router(state);
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/search")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"query": "  "}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_clear_resets_stats() {
    let state = test_state();
    seed_item(&state, "A", "cisa", "CVE-2024-3400", 1);

    let app = threatlens::build_router(state.clone());
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/clear")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (_, json) = get_json(state, "/api/stats").await;
    assert_eq!(json["total_items"].as_u64(), Some(0));
}

#[tokio::test]
async fn test_upload_txt_via_multipart() {
    let state = test_state();

    let boundary = "test-boundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"files\"; filename=\"note.txt\"\r\n\
         Content-Type: text/plain\r\n\r\n\
         APT29 exploited CVE-2024-3400 from 203.0.113.7.\r\n\
         --{boundary}--\r\n"
    );

    let app = threatlens::build_router(state.clone());
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/upload")
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(json["results"][0]["success"].as_bool(), Some(true));
    assert_eq!(json["results"][0]["entities"]["cves"].as_u64(), Some(1));
    assert_eq!(json["stats"]["total_items"].as_u64(), Some(1));
    assert_eq!(state.store.snapshot().len(), 1);
}
