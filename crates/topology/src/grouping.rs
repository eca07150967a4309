use std::collections::HashMap;

use shared::domain::Device;

/// Devices that share one hub and one connection, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionGroup<'a> {
    pub label: &'a str,
    pub devices: Vec<&'a Device>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HubGroup<'a> {
    pub label: &'a str,
    /// Buckets in first-encounter order.
    pub connections: Vec<ConnectionGroup<'a>>,
}

impl HubGroup<'_> {
    pub fn device_count(&self) -> usize {
        self.connections.iter().map(|c| c.devices.len()).sum()
    }
}

/// Two-level hub -> connection partition of a device list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grouping<'a> {
    /// Hubs in first-encounter order.
    pub hubs: Vec<HubGroup<'a>>,
}

impl<'a> Grouping<'a> {
    pub fn is_empty(&self) -> bool {
        self.hubs.is_empty()
    }

    pub fn hub(&self, label: &str) -> Option<&HubGroup<'a>> {
        self.hubs.iter().find(|hub| hub.label == label)
    }

    /// Every device in bucket order; a permutation of the input.
    pub fn devices(&self) -> impl Iterator<Item = &'a Device> + '_ {
        self.hubs
            .iter()
            .flat_map(|hub| hub.connections.iter())
            .flat_map(|connection| connection.devices.iter().copied())
    }
}

/// Single pass over `devices`; each device lands in exactly one bucket.
pub fn group_devices(devices: &[Device]) -> Grouping<'_> {
    let mut hubs: Vec<HubGroup<'_>> = Vec::new();
    let mut hub_index: HashMap<&str, usize> = HashMap::new();
    let mut connection_index: HashMap<(usize, &str), usize> = HashMap::new();

    for device in devices {
        let hub_key = device.hub_key();
        let connection_key = device.connection_key();

        let h = *hub_index.entry(hub_key).or_insert_with(|| {
            hubs.push(HubGroup {
                label: hub_key,
                connections: Vec::new(),
            });
            hubs.len() - 1
        });
        let connections = &mut hubs[h].connections;
        let c = *connection_index
            .entry((h, connection_key))
            .or_insert_with(|| {
                connections.push(ConnectionGroup {
                    label: connection_key,
                    devices: Vec::new(),
                });
                connections.len() - 1
            });
        connections[c].devices.push(device);
    }

    Grouping { hubs }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::{UNKNOWN_CONNECTION, UNKNOWN_HUB};

    fn device(name: &str, hub: Option<&str>, connection: Option<&str>) -> Device {
        Device {
            name: Some(name.to_string()),
            connected_to: hub.map(str::to_string),
            connection: connection.map(str::to_string),
            ..Device::default()
        }
    }

    #[test]
    fn groups_by_hub_then_connection_preserving_order() {
        let devices = vec![
            device("tv", Some("Hub1"), Some("Wi-Fi")),
            device("nas", Some("Hub2"), Some("Ethernet")),
            device("phone", Some("Hub1"), Some("Wi-Fi")),
            device("printer", Some("Hub1"), Some("Ethernet")),
        ];
        let grouping = group_devices(&devices);

        let hub_labels: Vec<_> = grouping.hubs.iter().map(|h| h.label).collect();
        assert_eq!(hub_labels, vec!["Hub1", "Hub2"]);

        let hub1 = grouping.hub("Hub1").expect("hub1");
        assert_eq!(hub1.connections[0].label, "Wi-Fi");
        let names: Vec<_> = hub1.connections[0]
            .devices
            .iter()
            .map(|d| d.display_name())
            .collect();
        assert_eq!(names, vec!["tv", "phone"]);
        assert_eq!(hub1.connections[1].label, "Ethernet");
        assert_eq!(hub1.device_count(), 3);
    }

    #[test]
    fn missing_keys_use_sentinel_buckets() {
        let devices = vec![
            device("a", None, None),
            device("b", Some(""), Some("Wi-Fi")),
            device("c", Some("Hub1"), None),
        ];
        let grouping = group_devices(&devices);

        let unknown = grouping.hub(UNKNOWN_HUB).expect("unknown hub");
        let labels: Vec<_> = unknown.connections.iter().map(|c| c.label).collect();
        assert_eq!(labels, vec![UNKNOWN_CONNECTION, "Wi-Fi"]);
        let hub1 = grouping.hub("Hub1").expect("hub1");
        assert_eq!(hub1.connections[0].label, UNKNOWN_CONNECTION);
    }

    #[test]
    fn partition_is_total_and_lossless() {
        let devices = vec![
            device("a", Some("H2"), Some("x")),
            device("b", None, Some("y")),
            device("c", Some("H1"), None),
            device("d", Some("H2"), Some("x")),
            Device::default(),
            Device::default(),
        ];
        let grouping = group_devices(&devices);

        let mut seen: Vec<*const Device> = grouping.devices().map(|d| d as *const Device).collect();
        let mut expected: Vec<*const Device> = devices.iter().map(|d| d as *const Device).collect();
        seen.sort();
        expected.sort();
        assert_eq!(seen, expected);
    }

    #[test]
    fn empty_input_has_no_hubs() {
        assert!(group_devices(&[]).is_empty());
    }
}
