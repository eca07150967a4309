//! Read-only access to the scraper output directory.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use shared::domain::SnapshotSummary;
use thiserror::Error;
use tracing::warn;

const SNAPSHOT_PREFIX: &str = "devices_";
const BANDWIDTH_PREFIX: &str = "device_bandwidth_";
const JSON_SUFFIX: &str = ".json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snapshot '{0}' not found")]
    NotFound(String),
    #[error("invalid snapshot name '{0}'")]
    InvalidName(String),
    #[error(transparent)]
    Io(#[from] anyhow::Error),
}

/// Snapshot files and bandwidth logs in one directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

/// One device's cumulative byte counters at one collection time.
#[derive(Debug, Clone, PartialEq)]
pub struct BandwidthSample {
    pub device_name: String,
    pub ip_address: String,
    pub collected_at: DateTime<Utc>,
    pub upload_bytes: f64,
    pub download_bytes: f64,
}

impl SnapshotStore {
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn health_check(&self) -> anyhow::Result<()> {
        let metadata = tokio::fs::metadata(&self.dir)
            .await
            .with_context(|| format!("output directory '{}' is not readable", self.dir.display()))?;
        anyhow::ensure!(
            metadata.is_dir(),
            "output path '{}' is not a directory",
            self.dir.display()
        );
        Ok(())
    }

    /// Snapshots ordered by file name; names embed the collection timestamp,
    /// so the last entry is the most recent.
    pub async fn list_snapshots(&self) -> Result<Vec<SnapshotSummary>, StoreError> {
        let mut names = self.files_with_prefix(SNAPSHOT_PREFIX).await?;
        names.sort();

        let mut summaries = Vec::with_capacity(names.len());
        for name in names {
            let device_count = match self.read_json(&name).await {
                Ok(raw) => reported_device_count(&raw),
                Err(error) => {
                    warn!(%name, %error, "unable to read snapshot while listing");
                    None
                }
            };
            summaries.push(SnapshotSummary { name, device_count });
        }
        Ok(summaries)
    }

    /// Raw payload of one snapshot, unvalidated beyond being JSON.
    pub async fn load_snapshot(&self, name: &str) -> Result<Value, StoreError> {
        validate_snapshot_name(name)?;
        if !tokio::fs::try_exists(self.dir.join(name))
            .await
            .with_context(|| format!("failed to stat snapshot '{name}'"))?
        {
            return Err(StoreError::NotFound(name.to_string()));
        }
        Ok(self.read_json(name).await?)
    }

    /// Every LAN device sample across all bandwidth logs. Unreadable files and
    /// files with a bad timestamp are skipped.
    pub async fn load_bandwidth_samples(&self) -> Result<Vec<BandwidthSample>, StoreError> {
        if !tokio::fs::try_exists(&self.dir).await.unwrap_or(false) {
            warn!(dir = %self.dir.display(), "output directory does not exist");
            return Ok(Vec::new());
        }

        let mut names = self.files_with_prefix(BANDWIDTH_PREFIX).await?;
        names.sort();

        let mut samples = Vec::new();
        for name in names {
            let raw = match self.read_json(&name).await {
                Ok(raw) => raw,
                Err(error) => {
                    warn!(%name, %error, "failed to read bandwidth log");
                    continue;
                }
            };
            let Some(collected_at) = raw
                .get("collected_at")
                .and_then(Value::as_str)
                .and_then(parse_timestamp)
            else {
                warn!(%name, "invalid timestamp in bandwidth log");
                continue;
            };
            let Some(devices) = raw.get("lan_devices").and_then(Value::as_array) else {
                continue;
            };
            for device in devices {
                samples.push(BandwidthSample {
                    device_name: trimmed_field(device, "device_name"),
                    ip_address: trimmed_field(device, "ip_address"),
                    collected_at,
                    upload_bytes: device.get("upload_1hr").map_or(0.0, parse_size),
                    download_bytes: device.get("download_1hr").map_or(0.0, parse_size),
                });
            }
        }
        Ok(samples)
    }

    async fn files_with_prefix(&self, prefix: &str) -> anyhow::Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .with_context(|| format!("failed to list '{}'", self.dir.display()))?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.starts_with(prefix) && name.ends_with(JSON_SUFFIX) {
                names.push(name);
            }
        }
        Ok(names)
    }

    async fn read_json(&self, name: &str) -> anyhow::Result<Value> {
        let path = self.dir.join(name);
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("failed to read '{}'", path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("'{}' is not valid JSON", path.display()))
    }
}

fn validate_snapshot_name(name: &str) -> Result<(), StoreError> {
    let well_formed = name.starts_with(SNAPSHOT_PREFIX)
        && name.ends_with(JSON_SUFFIX)
        && !name.contains(['/', '\\'])
        && !name.contains("..");
    if well_formed {
        Ok(())
    } else {
        Err(StoreError::InvalidName(name.to_string()))
    }
}

fn reported_device_count(raw: &Value) -> Option<u64> {
    match raw {
        Value::Array(devices) => Some(devices.len() as u64),
        Value::Object(fields) => fields
            .get("device_count")
            .and_then(Value::as_u64)
            .filter(|count| *count > 0)
            .or_else(|| {
                fields
                    .get("devices")
                    .and_then(Value::as_array)
                    .map(|devices| devices.len() as u64)
            }),
        _ => None,
    }
}

fn trimmed_field(device: &Value, key: &str) -> String {
    device
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default()
        .to_string()
}

/// RFC 3339, or a naive ISO timestamp taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Byte count from a router usage cell such as `"1.5 MB"` or `2048`.
pub fn parse_size(raw: &Value) -> f64 {
    match raw {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => parse_size_text(text),
        _ => 0.0,
    }
}

fn parse_size_text(text: &str) -> f64 {
    let text = text.trim();
    let split = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(text.len());
    let (number, unit) = text.split_at(split);
    let unit = unit.trim();

    let number_ok = !number.is_empty()
        && !number.ends_with('.')
        && number.matches('.').count() <= 1;
    if !number_ok || !unit.chars().all(|c| c.is_ascii_alphabetic()) {
        return 0.0;
    }
    let Ok(value) = number.parse::<f64>() else {
        return 0.0;
    };

    let multiplier = match unit.to_ascii_lowercase().as_str() {
        "kb" | "kilobytes" => 1024.0,
        "mb" | "megabytes" => 1024.0 * 1024.0,
        "gb" | "gigabytes" => 1024.0 * 1024.0 * 1024.0,
        _ => 1.0,
    };
    value * multiplier
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
