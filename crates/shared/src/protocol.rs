use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SNAPSHOTS_ROUTE: &str = "/api/snapshots";
pub const BANDWIDTH_ROUTE: &str = "/api/bandwidth";

pub fn snapshot_route(name: &str) -> String {
    format!("{SNAPSHOTS_ROUTE}/{name}")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThroughputPoint {
    pub timestamp: DateTime<Utc>,
    pub upload_mbps: f64,
    pub download_mbps: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceThroughput {
    pub device_name: String,
    pub ip_address: String,
    pub series: Vec<ThroughputPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandwidthResponse {
    pub last_updated: DateTime<Utc>,
    pub devices: Vec<DeviceThroughput>,
}
