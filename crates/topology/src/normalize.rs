use serde_json::{Map, Value};
use shared::domain::{Device, Snapshot, SnapshotMetadata, UNKNOWN_RUN_ID};

/// Canonicalizes a raw snapshot payload.
///
/// A bare array is a device list, an object is a keyed snapshot, and anything
/// else becomes an empty snapshot without metadata. This never fails: the
/// worst case is an empty but valid snapshot.
pub fn normalize(raw: &Value) -> Snapshot {
    match raw {
        Value::Array(items) => {
            let devices = devices_from(items);
            Snapshot {
                metadata: Some(SnapshotMetadata {
                    run_id: UNKNOWN_RUN_ID.to_string(),
                    collected_at: None,
                    device_count: devices.len() as u64,
                }),
                devices,
            }
        }
        Value::Object(fields) => normalize_keyed(fields),
        _ => Snapshot::default(),
    }
}

fn normalize_keyed(fields: &Map<String, Value>) -> Snapshot {
    let devices = match fields.get("devices") {
        Some(Value::Array(items)) => devices_from(items),
        _ => Vec::new(),
    };

    let run_id = fields
        .get("run_id")
        .and_then(truthy_text)
        .unwrap_or_else(|| UNKNOWN_RUN_ID.to_string());
    let collected_at = fields.get("collected_at").and_then(text_value);
    let device_count = fields
        .get("device_count")
        .and_then(positive_count)
        .unwrap_or(devices.len() as u64);

    Snapshot {
        metadata: Some(SnapshotMetadata {
            run_id,
            collected_at,
            device_count,
        }),
        devices,
    }
}

fn devices_from(items: &[Value]) -> Vec<Device> {
    items.iter().map(device_from).collect()
}

/// Non-object entries still count as devices, all of whose fields are absent.
fn device_from(value: &Value) -> Device {
    let Value::Object(fields) = value else {
        return Device::default();
    };
    let field = |key: &str| fields.get(key).and_then(text_value);
    Device {
        name: field("name"),
        mac_address: field("mac_address"),
        connected_to: field("connected_to"),
        connection: field("connection"),
        status: field("status"),
    }
}

fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn truthy_text(value: &Value) -> Option<String> {
    match value {
        Value::Bool(false) => None,
        Value::Number(number) if number.as_f64() == Some(0.0) => None,
        other => text_value(other).filter(|text| !text.is_empty()),
    }
}

/// Positive whole counts only; `3.0` is read as 3, while fractions, negatives
/// and zero fall back to the array length.
fn positive_count(value: &Value) -> Option<u64> {
    let count = match value {
        Value::Number(number) => number.as_u64().or_else(|| {
            number
                .as_f64()
                .filter(|count| {
                    count.fract() == 0.0 && *count >= 1.0 && *count <= u64::MAX as f64
                })
                .map(|count| count as u64)
        }),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    };
    count.filter(|count| *count > 0)
}
