// tests/api_http.rs
//
// HTTP-level tests for the read API without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as Json;
use tower::ServiceExt as _; // for `oneshot`

use hot_list_aggregator::api::{self, AppState};
use hot_list_aggregator::{Record, Snapshot, SnapshotStore, SourceError, SourceResult};

const BODY_LIMIT: usize = 1024 * 1024;

fn test_router(store: Arc<SnapshotStore>) -> Router {
    api::router(AppState { store })
}

async fn body_json(resp: axum::response::Response) -> Json {
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn health_returns_ok() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(Arc::new(SnapshotStore::new(dir.path().join("r.json"))));

    let resp = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn hot_before_first_cycle_says_no_data_yet() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(Arc::new(SnapshotStore::new(dir.path().join("r.json"))));

    let resp = app
        .oneshot(Request::get("/api/hot").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let v = body_json(resp).await;
    assert_eq!(v["error"], "no data yet");
}

#[tokio::test]
async fn hot_with_corrupt_file_says_no_data_yet() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("r.json");
    std::fs::write(&path, b"{not json").unwrap();
    let app = test_router(Arc::new(SnapshotStore::new(path)));

    let resp = app
        .oneshot(Request::get("/api/hot").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn hot_serves_latest_snapshot_with_cors() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SnapshotStore::new(dir.path().join("r.json")));
    let snap = Snapshot::from_results(vec![
        SourceResult::success("贴吧", vec![Record::new("话题", "https://tieba.baidu.com/1")]),
        SourceResult::failure("抖音热榜", &SourceError::Timeout(std::time::Duration::from_secs(5))),
    ]);
    store.write(&snap).await.unwrap();

    let req = Request::get("/api/hot")
        .header("origin", "https://viewer.example")
        .body(Body::empty())
        .unwrap();
    let resp = test_router(store).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.headers().contains_key("access-control-allow-origin"),
        "read API must allow cross-origin reads"
    );

    let v = body_json(resp).await;
    let arr = v.as_array().expect("array");
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["hot_name"], snap.results[0].source_name.as_str());
    let tieba = arr.iter().find(|e| e["hot_name"] == "贴吧").unwrap();
    assert_eq!(tieba["content"][0]["title"], "话题");
    assert_eq!(tieba["content"][0]["href"], "https://tieba.baidu.com/1");
    let douyin = arr.iter().find(|e| e["hot_name"] == "抖音热榜").unwrap();
    assert_eq!(douyin["ok"], false);
    assert_eq!(douyin["content"].as_array().unwrap().len(), 0);
}
