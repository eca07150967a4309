use serde::{Deserialize, Serialize};

/// Grouping key used when a device does not report the hub it is attached to.
pub const UNKNOWN_HUB: &str = "Unknown Hub";
/// Grouping key used when a device does not report its connection type.
pub const UNKNOWN_CONNECTION: &str = "Unknown Connection";
/// Run id shown when a payload does not carry one.
pub const UNKNOWN_RUN_ID: &str = "Unknown";

/// One row of the router's device inventory.
///
/// Every field is optional and none of them is an identity: two devices may
/// share a name or MAC address, so devices are kept in order instead of keyed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connected_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Device {
    pub fn hub_key(&self) -> &str {
        non_empty(&self.connected_to).unwrap_or(UNKNOWN_HUB)
    }

    pub fn connection_key(&self) -> &str {
        non_empty(&self.connection).unwrap_or(UNKNOWN_CONNECTION)
    }

    pub fn display_name(&self) -> &str {
        non_empty(&self.name).unwrap_or("Unnamed")
    }

    pub fn display_mac(&self) -> &str {
        non_empty(&self.mac_address).unwrap_or("Unknown MAC")
    }

    pub fn display_status(&self) -> &str {
        non_empty(&self.status).unwrap_or("Unknown")
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub run_id: String,
    /// Passed through exactly as the payload carried it.
    pub collected_at: Option<String>,
    /// Display-only; layout always uses the length of `Snapshot::devices`.
    pub device_count: u64,
}

/// Canonical shape of one point-in-time inventory capture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub metadata: Option<SnapshotMetadata>,
    pub devices: Vec<Device>,
}

/// Entry of the snapshot listing, in the order the repository returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_count: Option<u64>,
}

impl SnapshotSummary {
    pub fn choice_label(&self) -> String {
        match self.device_count {
            Some(count) => format!("{} ({count} devices)", self.name),
            None => format!("{} (? devices)", self.name),
        }
    }
}
