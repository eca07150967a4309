use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::Value;
use shared::{
    domain::SnapshotSummary,
    error::{ApiError, ErrorCode},
    protocol::{BandwidthResponse, DeviceThroughput, ThroughputPoint},
};
use storage::{BandwidthSample, SnapshotStore, StoreError};
use tracing::warn;

#[derive(Clone)]
pub struct ApiContext {
    pub store: SnapshotStore,
}

pub async fn list_snapshots(ctx: &ApiContext) -> Result<Vec<SnapshotSummary>, ApiError> {
    ctx.store.list_snapshots().await.map_err(store_error)
}

pub async fn get_snapshot(ctx: &ApiContext, name: &str) -> Result<Value, ApiError> {
    ctx.store.load_snapshot(name).await.map_err(store_error)
}

pub async fn bandwidth(ctx: &ApiContext, now: DateTime<Utc>) -> Result<BandwidthResponse, ApiError> {
    let samples = ctx
        .store
        .load_bandwidth_samples()
        .await
        .map_err(store_error)?;
    Ok(BandwidthResponse {
        last_updated: now,
        devices: throughput_series(samples),
    })
}

/// Turns cumulative byte counters into per-interval Mbps, one series per
/// (name, ip) pair. Intervals with a non-positive time delta or a counter
/// reset are skipped; devices left without any interval are dropped.
pub fn throughput_series(samples: Vec<BandwidthSample>) -> Vec<DeviceThroughput> {
    let mut order: Vec<(String, String)> = Vec::new();
    let mut grouped: HashMap<(String, String), Vec<BandwidthSample>> = HashMap::new();
    for sample in samples {
        let name = [&sample.device_name, &sample.ip_address]
            .into_iter()
            .find(|value| !value.is_empty())
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string());
        let key = (name, sample.ip_address.clone());
        grouped
            .entry(key.clone())
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(sample);
    }

    let mut devices = Vec::new();
    for key in order {
        let Some(mut samples) = grouped.remove(&key) else {
            continue;
        };
        samples.sort_by_key(|sample| sample.collected_at);

        let mut series = Vec::new();
        let mut previous: Option<&BandwidthSample> = None;
        for sample in &samples {
            let Some(prev) = previous.replace(sample) else {
                continue;
            };
            let seconds = (sample.collected_at - prev.collected_at).num_milliseconds() as f64 / 1000.0;
            if seconds <= 0.0 {
                continue;
            }
            let upload = sample.upload_bytes - prev.upload_bytes;
            let download = sample.download_bytes - prev.download_bytes;
            if upload < 0.0 || download < 0.0 {
                continue;
            }
            series.push(ThroughputPoint {
                timestamp: sample.collected_at,
                upload_mbps: bytes_per_second_to_mbps(upload / seconds),
                download_mbps: bytes_per_second_to_mbps(download / seconds),
            });
        }

        if series.is_empty() {
            continue;
        }
        let (device_name, ip_address) = key;
        devices.push(DeviceThroughput {
            device_name,
            ip_address,
            series,
        });
    }

    devices.sort_by_key(|device| device.device_name.to_lowercase());
    devices
}

pub fn bytes_per_second_to_mbps(value: f64) -> f64 {
    (value * 8.0 / 1_000_000.0 * 10_000.0).round() / 10_000.0
}

fn store_error(err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound(name) => {
            ApiError::new(ErrorCode::NotFound, format!("snapshot '{name}' not found"))
        }
        StoreError::InvalidName(name) => {
            ApiError::new(ErrorCode::Validation, format!("invalid snapshot name '{name}'"))
        }
        StoreError::Io(err) => {
            warn!(error = %err, "snapshot store unavailable");
            ApiError::new(ErrorCode::Unavailable, err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + seconds, 0)
            .single()
            .expect("timestamp")
    }

    fn sample(name: &str, ip: &str, seconds: i64, up: f64, down: f64) -> BandwidthSample {
        BandwidthSample {
            device_name: name.to_string(),
            ip_address: ip.to_string(),
            collected_at: at(seconds),
            upload_bytes: up,
            download_bytes: down,
        }
    }

    #[test]
    fn computes_mbps_between_consecutive_samples() {
        let series = throughput_series(vec![
            sample("laptop", "10.0.0.2", 10, 1_000_000.0, 3_000_000.0),
            sample("laptop", "10.0.0.2", 0, 0.0, 0.0),
        ]);
        assert_eq!(series.len(), 1);
        let points = &series[0].series;
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].timestamp, at(10));
        assert_eq!(points[0].upload_mbps, 0.8);
        assert_eq!(points[0].download_mbps, 2.4);
    }

    #[test]
    fn skips_counter_resets_and_duplicate_timestamps() {
        let series = throughput_series(vec![
            sample("tv", "10.0.0.3", 0, 500.0, 500.0),
            sample("tv", "10.0.0.3", 0, 600.0, 600.0),
            sample("tv", "10.0.0.3", 10, 100.0, 100.0),
            sample("tv", "10.0.0.3", 20, 1_350.0, 100.0),
        ]);
        let points = &series[0].series;
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].timestamp, at(20));
        assert_eq!(points[0].upload_mbps, 0.001);
        assert_eq!(points[0].download_mbps, 0.0);
    }

    #[test]
    fn drops_single_sample_devices_and_sorts_by_name() {
        let series = throughput_series(vec![
            sample("Zed", "10.0.0.9", 0, 0.0, 0.0),
            sample("Zed", "10.0.0.9", 1, 0.0, 0.0),
            sample("", "10.0.0.7", 0, 0.0, 0.0),
            sample("", "10.0.0.7", 1, 0.0, 0.0),
            sample("alpha", "10.0.0.5", 0, 0.0, 0.0),
            sample("lonely", "10.0.0.6", 0, 0.0, 0.0),
        ]);
        let names: Vec<_> = series.iter().map(|d| d.device_name.as_str()).collect();
        assert_eq!(names, vec!["10.0.0.7", "Zed"]);
    }

    #[test]
    fn rounds_to_four_decimals() {
        assert_eq!(bytes_per_second_to_mbps(12_345.0), 0.0988);
    }

    #[tokio::test]
    async fn maps_store_errors_to_api_codes() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("devices_1.json"),
            serde_json::to_vec(&json!([])).expect("json"),
        )
        .expect("write");
        let ctx = ApiContext {
            store: SnapshotStore::open(dir.path()),
        };

        let listed = list_snapshots(&ctx).await.expect("list");
        assert_eq!(listed.len(), 1);

        let missing = get_snapshot(&ctx, "devices_2.json").await.expect_err("missing");
        assert!(matches!(missing.code, ErrorCode::NotFound));
        let invalid = get_snapshot(&ctx, "../secret").await.expect_err("invalid");
        assert!(matches!(invalid.code, ErrorCode::Validation));

        let gone = ApiContext {
            store: SnapshotStore::open(dir.path().join("gone")),
        };
        let err = list_snapshots(&gone).await.expect_err("unavailable");
        assert!(matches!(err.code, ErrorCode::Unavailable));
    }
}
