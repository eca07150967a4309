use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use shared::domain::Device;

use crate::{grouping::HubGroup, palette::ColorTable, palette::Rgb};

/// Side of the square viewport each hub diagram is drawn in.
pub const VIEWPORT_SIZE: f64 = 320.0;
/// Distance from the hub to each connection node.
pub const CONNECTION_ORBIT: f64 = 110.0;
/// Distance from a connection node to each of its devices.
pub const DEVICE_ORBIT: f64 = 42.0;

pub const HUB_NODE_RADIUS: f64 = 18.0;
pub const CONNECTION_NODE_RADIUS: f64 = 12.0;
pub const DEVICE_NODE_RADIUS: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn center() -> Self {
        Self::new(VIEWPORT_SIZE / 2.0, VIEWPORT_SIZE / 2.0)
    }

    /// Point at `radius` from `self`; angle 0 is +x and grows toward +y.
    pub fn on_circle(self, radius: f64, angle: f64) -> Self {
        Self::new(self.x + radius * angle.cos(), self.y + radius * angle.sin())
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Angle of slot `index` among `count` evenly spaced slots.
pub fn slot_angle(index: usize, count: usize) -> f64 {
    2.0 * PI * index as f64 / count.max(1) as f64
}

/// Address of one device node inside a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceRef {
    pub hub: usize,
    pub connection: usize,
    pub device: usize,
}

/// Text shown while the pointer is over a device node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceTooltip {
    pub name: String,
    pub mac_address: String,
    pub connection: String,
    pub status: String,
}

impl DeviceTooltip {
    pub fn for_device(device: &Device, connection: &str) -> Self {
        Self {
            name: device.display_name().to_string(),
            mac_address: device.display_mac().to_string(),
            connection: connection.to_string(),
            status: device.display_status().to_string(),
        }
    }

    pub fn lines(&self) -> [String; 4] {
        [
            self.name.clone(),
            format!("MAC: {}", self.mac_address),
            format!("Connection: {}", self.connection),
            format!("Status: {}", self.status),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceNode {
    pub position: Point,
    /// Angle around the parent connection node.
    pub angle: f64,
    pub tooltip: DeviceTooltip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionNode {
    pub label: String,
    pub position: Point,
    /// Angle around the hub.
    pub angle: f64,
    pub color: Rgb,
    /// Original input order, never sorted.
    pub devices: Vec<DeviceNode>,
}

impl ConnectionNode {
    /// Spokes from this node to each of its devices.
    pub fn spokes(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.devices.iter().map(|d| (self.position, d.position))
    }
}

/// One hub's positioned diagram inside its own `VIEWPORT_SIZE` square.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubLayout {
    pub label: String,
    pub center: Point,
    /// Sorted lexicographically by label.
    pub connections: Vec<ConnectionNode>,
}

impl HubLayout {
    /// Edges from the hub center to each connection node.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.connections.iter().map(|c| (self.center, c.position))
    }

    pub fn device_count(&self) -> usize {
        self.connections.iter().map(|c| c.devices.len()).sum()
    }
}

/// Positions one hub's connections and devices.
///
/// Connections are sorted by label for placement only; `colors` was filled
/// in input order beforehand, so sorting here never changes a color.
pub fn layout_hub(hub: &HubGroup<'_>, colors: &ColorTable) -> HubLayout {
    let center = Point::center();
    let mut connections: Vec<_> = hub.connections.iter().collect();
    connections.sort_by(|a, b| a.label.cmp(b.label));

    let count = connections.len();
    let nodes = connections
        .into_iter()
        .enumerate()
        .map(|(i, group)| {
            let angle = slot_angle(i, count);
            let position = center.on_circle(CONNECTION_ORBIT, angle);
            let device_total = group.devices.len();
            let devices = group
                .devices
                .iter()
                .enumerate()
                .map(|(j, device)| {
                    let angle = slot_angle(j, device_total);
                    DeviceNode {
                        position: position.on_circle(DEVICE_ORBIT, angle),
                        angle,
                        tooltip: DeviceTooltip::for_device(device, group.label),
                    }
                })
                .collect();
            ConnectionNode {
                label: group.label.to_string(),
                position,
                angle,
                color: colors.color_for(group.label),
                devices,
            }
        })
        .collect();

    HubLayout {
        label: hub.label.to_string(),
        center,
        connections: nodes,
    }
}

#[cfg(test)]
#[path = "tests/layout_tests.rs"]
mod tests;
