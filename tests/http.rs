//! HTTP surface: handlers called directly, plus one round trip over a socket.

mod common;

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use meter_corr::data::loader::LoadOptions;
use meter_corr::server::{self, SharedState};
use meter_corr::{AppState, SeriesId};
use serde_json::Value;
use tokio::net::TcpListener;

fn shared_state() -> SharedState {
    state_from(common::four_meter_file())
}

fn state_from(file: tempfile::NamedTempFile) -> SharedState {
    let state = AppState::load(file.path(), &LoadOptions::default(), "MT_")
        .unwrap_or_else(|e| panic!("fixture should load: {e}"));
    Arc::new(state)
}

async fn spawn_server(state: SharedState) -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server::serve_on(listener, state));
    addr
}

#[tokio::test]
async fn corr_handler_returns_best_meter() {
    let state = shared_state();
    let axum::Json(hit) = server::corr(State(state), Path("MT_000".to_string()))
        .await
        .unwrap();
    assert_eq!(hit.meter, SeriesId(1));
    assert!((hit.corr - 0.9).abs() < 1e-9);
}

#[tokio::test]
async fn corr_handler_maps_unknown_to_404() {
    let state = shared_state();
    for bad in ["MT_004", "MT_abc", "nope"] {
        let err = server::corr(State(state.clone()), Path(bad.to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND, "{bad}");
    }
}

#[tokio::test]
async fn memory_handler_reports_positive_megabytes() {
    let axum::Json(mb) = server::memory().await.unwrap();
    assert!(mb > 0.0);
}

#[tokio::test]
async fn round_trip_over_tcp() {
    let addr = spawn_server(shared_state()).await;

    let client = reqwest::Client::new();

    let ok = client
        .get(format!("http://{addr}/corr/MT_000"))
        .send()
        .await
        .unwrap();
    assert_eq!(ok.status().as_u16(), 200);
    let body: Value = ok.json().await.unwrap();
    assert_eq!(body["meter"], "MT_001");
    assert!((body["corr"].as_f64().unwrap() - 0.9).abs() < 1e-9);

    let missing = client
        .get(format!("http://{addr}/corr/MT_999"))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);
    let body: Value = missing.json().await.unwrap();
    assert_eq!(body["error"], "unknown_series");
    assert_eq!(body["meter"], "MT_999");

    let memory: Value = client
        .get(format!("http://{addr}/metrics/memory"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(memory.as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn constant_meter_reports_no_correlation_over_tcp() {
    let addr = spawn_server(state_from(common::constant_meter_file())).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("http://{addr}/corr/MT_000"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "no_correlation_found");
    assert_eq!(body["meter"], "MT_000");
    assert!(body.get("corr").is_none());

    // The other meters still answer normally.
    let ok: Value = client
        .get(format!("http://{addr}/corr/MT_001"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ok["meter"], "MT_002");
}
