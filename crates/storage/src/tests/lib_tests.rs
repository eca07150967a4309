use super::*;
use serde_json::json;

fn write(dir: &Path, name: &str, value: &Value) {
    std::fs::write(dir.join(name), serde_json::to_vec(value).expect("json")).expect("write");
}

#[tokio::test]
async fn lists_snapshots_oldest_first_with_counts() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(
        dir.path(),
        "devices_20240102T000000Z.json",
        &json!({ "device_count": 3, "devices": [{}, {}, {}] }),
    );
    write(dir.path(), "devices_20240101T000000Z.json", &json!([{}, {}]));
    write(dir.path(), "device_bandwidth_20240101.json", &json!({}));
    std::fs::write(dir.path().join("devices_broken.json"), b"{not json").expect("write");

    let store = SnapshotStore::open(dir.path());
    let listed = store.list_snapshots().await.expect("list");
    let names: Vec<_> = listed.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "devices_20240101T000000Z.json",
            "devices_20240102T000000Z.json",
            "devices_broken.json"
        ]
    );
    assert_eq!(listed[0].device_count, Some(2));
    assert_eq!(listed[1].device_count, Some(3));
    assert_eq!(listed[2].device_count, None);
}

#[tokio::test]
async fn loads_raw_snapshot_payload() {
    let dir = tempfile::tempdir().expect("tempdir");
    let payload = json!({ "run_id": "r1", "devices": [{ "name": "TV" }] });
    write(dir.path(), "devices_1.json", &payload);

    let store = SnapshotStore::open(dir.path());
    let loaded = store.load_snapshot("devices_1.json").await.expect("load");
    assert_eq!(loaded, payload);
}

#[tokio::test]
async fn rejects_unknown_and_traversal_names() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SnapshotStore::open(dir.path());

    let missing = store.load_snapshot("devices_missing.json").await;
    assert!(matches!(missing, Err(StoreError::NotFound(_))));

    for name in ["../devices_x.json", "devices_../../etc.json", "other.json"] {
        let result = store.load_snapshot(name).await;
        assert!(matches!(result, Err(StoreError::InvalidName(_))), "{name}");
    }
}

#[tokio::test]
async fn missing_directory_fails_listing_but_not_bandwidth() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SnapshotStore::open(dir.path().join("absent"));
    assert!(matches!(store.list_snapshots().await, Err(StoreError::Io(_))));
    assert!(store.health_check().await.is_err());
    assert!(store.load_bandwidth_samples().await.expect("samples").is_empty());
}

#[tokio::test]
async fn reads_bandwidth_samples_and_skips_bad_logs() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(
        dir.path(),
        "device_bandwidth_1.json",
        &json!({
            "collected_at": "2024-01-01T00:00:00+00:00",
            "lan_devices": [
                { "device_name": " laptop ", "ip_address": "10.0.0.2", "upload_1hr": "1 KB", "download_1hr": 2048 }
            ]
        }),
    );
    write(
        dir.path(),
        "device_bandwidth_2.json",
        &json!({ "collected_at": "not a time", "lan_devices": [{ "device_name": "x" }] }),
    );
    std::fs::write(dir.path().join("device_bandwidth_3.json"), b"[").expect("write");

    let store = SnapshotStore::open(dir.path());
    let samples = store.load_bandwidth_samples().await.expect("samples");
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].device_name, "laptop");
    assert_eq!(samples[0].ip_address, "10.0.0.2");
    assert_eq!(samples[0].upload_bytes, 1024.0);
    assert_eq!(samples[0].download_bytes, 2048.0);
}

#[test]
fn parses_router_size_strings() {
    assert_eq!(parse_size(&json!("512")), 512.0);
    assert_eq!(parse_size(&json!("1.5 MB")), 1.5 * 1024.0 * 1024.0);
    assert_eq!(parse_size(&json!("2gb")), 2.0 * 1024.0 * 1024.0 * 1024.0);
    assert_eq!(parse_size(&json!("3 bytes")), 3.0);
    assert_eq!(parse_size(&json!("7 furlongs")), 7.0);
    assert_eq!(parse_size(&json!("n/a")), 0.0);
    assert_eq!(parse_size(&json!("")), 0.0);
    assert_eq!(parse_size(&json!(null)), 0.0);
    assert_eq!(parse_size(&json!(12.5)), 12.5);
}

#[test]
fn parses_naive_and_offset_timestamps() {
    let naive = parse_timestamp("2024-01-01T10:00:00.5").expect("naive");
    let offset = parse_timestamp("2024-01-01T12:00:00.5+02:00").expect("offset");
    assert_eq!(naive, offset);
    assert!(parse_timestamp("01/01/2024").is_none());
}
