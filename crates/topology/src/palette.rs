use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use shared::domain::Device;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

pub const HUB_COLOR: Rgb = Rgb::new(0x33, 0x41, 0x55);
pub const DEVICE_COLOR: Rgb = Rgb::new(0xe2, 0xe8, 0xf0);
pub const EDGE_COLOR: Rgb = Rgb::new(0x94, 0xa3, 0xb8);

/// Connection colors, handed out cyclically in first-seen order.
pub const PALETTE: [Rgb; 13] = [
    Rgb::new(0x25, 0x63, 0xeb),
    Rgb::new(0x16, 0xa3, 0x4a),
    Rgb::new(0xf9, 0x73, 0x16),
    Rgb::new(0xdb, 0x27, 0x77),
    Rgb::new(0x93, 0x33, 0xea),
    Rgb::new(0x0d, 0x94, 0x88),
    Rgb::new(0xea, 0xb3, 0x08),
    Rgb::new(0xdc, 0x26, 0x26),
    Rgb::new(0x4f, 0x46, 0xe5),
    Rgb::new(0x65, 0xa3, 0x0d),
    Rgb::new(0x08, 0x91, 0xb2),
    Rgb::new(0xc0, 0x26, 0xd3),
    Rgb::new(0x78, 0x71, 0x6c),
];

/// Connection label -> palette color for one render pass.
///
/// Built from scratch for every pass and passed into layout by reference; the
/// same label gets the same color in every hub of that pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorTable {
    assigned: HashMap<String, Rgb>,
    order: Vec<String>,
}

impl ColorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns colors to every connection label in device input order.
    pub fn from_devices(devices: &[Device]) -> Self {
        let mut table = Self::new();
        for device in devices {
            table.assign(device.connection_key());
        }
        table
    }

    /// Returns the label's color, assigning the next palette slot on first sight.
    pub fn assign(&mut self, label: &str) -> Rgb {
        if let Some(color) = self.assigned.get(label) {
            return *color;
        }
        let color = PALETTE[self.order.len() % PALETTE.len()];
        self.assigned.insert(label.to_string(), color);
        self.order.push(label.to_string());
        color
    }

    pub fn get(&self, label: &str) -> Option<Rgb> {
        self.assigned.get(label).copied()
    }

    /// Lookup for labels that were not seen while building; falls back to the
    /// last palette entry.
    pub fn color_for(&self, label: &str) -> Rgb {
        self.get(label).unwrap_or(PALETTE[PALETTE.len() - 1])
    }

    /// Labels in the order they were first assigned.
    pub fn labels(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on(connection: &str) -> Device {
        Device {
            connection: Some(connection.to_string()),
            ..Device::default()
        }
    }

    #[test]
    fn assigns_in_first_seen_order_and_reuses_colors() {
        let devices = vec![on("A"), on("B"), on("A"), on("C")];
        let table = ColorTable::from_devices(&devices);
        assert_eq!(table.get("A"), Some(PALETTE[0]));
        assert_eq!(table.get("B"), Some(PALETTE[1]));
        assert_eq!(table.get("C"), Some(PALETTE[2]));
        assert_eq!(table.labels(), &["A", "B", "C"]);
    }

    #[test]
    fn cycles_through_palette() {
        let mut table = ColorTable::new();
        for i in 0..PALETTE.len() {
            table.assign(&format!("conn-{i}"));
        }
        assert_eq!(table.assign("overflow"), PALETTE[0]);
        assert_eq!(table.len(), PALETTE.len() + 1);
    }

    #[test]
    fn missing_connection_uses_sentinel_label() {
        let table = ColorTable::from_devices(&[Device::default()]);
        assert_eq!(table.get("Unknown Connection"), Some(PALETTE[0]));
    }

    #[test]
    fn formats_hex() {
        assert_eq!(Rgb::new(0x25, 0x63, 0xeb).hex(), "#2563eb");
    }
}
