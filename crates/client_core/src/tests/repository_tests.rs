use super::*;
use axum::{extract::Path, http::StatusCode, routing::get, Json, Router};
use serde_json::json;
use tokio::net::TcpListener;

async fn spawn_server() -> String {
    let app = Router::new()
        .route(
            "/api/snapshots",
            get(|| async {
                Json(json!([
                    { "name": "devices_1.json", "device_count": 2 },
                    { "name": "devices_2.json" }
                ]))
            }),
        )
        .route(
            "/api/snapshots/:name",
            get(|Path(name): Path<String>| async move {
                if name == "devices_1.json" {
                    Ok(Json(json!({ "run_id": "r1", "devices": [{}, {}] })))
                } else {
                    Err(StatusCode::NOT_FOUND)
                }
            }),
        );
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

#[test]
fn rejects_non_http_server_urls() {
    assert!(HttpSnapshotRepository::new("ftp://example.com").is_err());
    assert!(HttpSnapshotRepository::new("not a url").is_err());
    assert!(HttpSnapshotRepository::new("https://example.com/").is_ok());
}

#[test]
fn builds_endpoints_under_base_path() {
    let repo = HttpSnapshotRepository::new("http://example.com/viewer/").expect("repo");
    let url = repo
        .endpoint(SNAPSHOTS_ROUTE, Some("devices 1.json"))
        .expect("url");
    assert_eq!(
        url.as_str(),
        "http://example.com/viewer/api/snapshots/devices%201.json"
    );
}

#[tokio::test]
async fn lists_and_loads_over_http() {
    let base = spawn_server().await;
    let repo = HttpSnapshotRepository::new(&base).expect("repo");

    let listed = repo.list().await.expect("list");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].device_count, Some(2));
    assert_eq!(listed[1].device_count, None);

    let payload = repo.get("devices_1.json").await.expect("get");
    assert_eq!(payload["run_id"], "r1");
}

#[tokio::test]
async fn http_status_failures_surface_as_unavailable() {
    let base = spawn_server().await;
    let repo = HttpSnapshotRepository::new(&base).expect("repo");
    let err = repo.get("devices_9.json").await.expect_err("missing");
    assert!(matches!(err, RepositoryError::Unavailable { .. }));
    assert!(err.to_string().contains("devices_9.json"));
}

#[tokio::test]
async fn directory_repository_reads_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("devices_a.json"), b"[]").expect("write");
    let repo = DirectorySnapshotRepository::new(dir.path());

    let listed = repo.list().await.expect("list");
    assert_eq!(listed[0].name, "devices_a.json");
    assert_eq!(repo.get("devices_a.json").await.expect("get"), json!([]));
    assert!(repo.get("devices_b.json").await.is_err());

    let missing = DirectorySnapshotRepository::new(dir.path().join("nope"));
    assert!(missing.list().await.is_err());
}
