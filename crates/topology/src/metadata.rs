use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::domain::SnapshotMetadata;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataPanel {
    pub run_id: String,
    pub collected_at: String,
    pub device_count: u64,
}

impl MetadataPanel {
    pub fn from_metadata(metadata: &SnapshotMetadata) -> Self {
        Self {
            run_id: metadata.run_id.clone(),
            collected_at: format_collected_at(metadata.collected_at.as_deref()),
            device_count: metadata.device_count,
        }
    }
}

/// RFC 3339 and naive ISO timestamps are shown in UTC; anything else verbatim.
pub fn format_collected_at(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return "Unknown".to_string();
    };
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed
            .with_timezone(&Utc)
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string();
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.format("%Y-%m-%d %H:%M:%S").to_string();
    }
    raw.to_string()
}
