use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::domain::Device;

use crate::{
    grouping::group_devices,
    layout::{layout_hub, DeviceNode, DeviceRef, HubLayout, Point, DEVICE_NODE_RADIUS},
    metadata::MetadataPanel,
    normalize::normalize,
    palette::{ColorTable, Rgb},
};

pub const NO_SELECTION_MESSAGE: &str = "Select a snapshot to view its topology.";
pub const LOAD_FAILED_MESSAGE: &str = "Unable to load the selected snapshot.";
pub const NO_DEVICES_MESSAGE: &str = "No devices found in this snapshot.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgb,
    pub device_count: usize,
}

impl LegendEntry {
    pub fn caption(&self) -> String {
        format!("{} ({})", self.label, self.device_count)
    }
}

/// One hub's diagram plus its legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubPanel {
    pub layout: HubLayout,
    pub legend: Vec<LegendEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Sorted lexicographically by hub label.
    pub hubs: Vec<HubPanel>,
}

impl Scene {
    pub fn device(&self, target: DeviceRef) -> Option<&DeviceNode> {
        self.hubs
            .get(target.hub)?
            .layout
            .connections
            .get(target.connection)?
            .devices
            .get(target.device)
    }

    /// Device node under `point`, in the hub's own viewport coordinates.
    /// Later nodes are drawn on top, so they win ties.
    pub fn hit_test(&self, hub: usize, point: Point) -> Option<DeviceRef> {
        let panel = self.hubs.get(hub)?;
        let mut hit = None;
        for (c, connection) in panel.layout.connections.iter().enumerate() {
            for (d, node) in connection.devices.iter().enumerate() {
                if node.position.distance(point) <= DEVICE_NODE_RADIUS {
                    hit = Some(DeviceRef {
                        hub,
                        connection: c,
                        device: d,
                    });
                }
            }
        }
        hit
    }

    pub fn device_count(&self) -> usize {
        self.hubs.iter().map(|h| h.layout.device_count()).sum()
    }
}

/// Runs grouping, color assignment and layout for one render pass.
pub fn build_scene(devices: &[Device]) -> Scene {
    let grouping = group_devices(devices);
    let colors = ColorTable::from_devices(devices);

    let mut hubs: Vec<HubPanel> = grouping
        .hubs
        .iter()
        .map(|hub| {
            let layout = layout_hub(hub, &colors);
            let legend = layout
                .connections
                .iter()
                .map(|connection| LegendEntry {
                    label: connection.label.clone(),
                    color: connection.color,
                    device_count: connection.devices.len(),
                })
                .collect();
            HubPanel { layout, legend }
        })
        .collect();
    hubs.sort_by(|a, b| a.layout.label.cmp(&b.layout.label));

    Scene { hubs }
}

/// What the renderer was handed for this pass.
#[derive(Debug, Clone, Copy)]
pub enum LoadOutcome<'a> {
    NotSelected,
    Failed,
    Loaded(&'a Value),
}

/// Exactly one of these is on screen at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewState {
    NoSelection,
    LoadFailed,
    NoDevices,
    Topology(Scene),
}

impl ViewState {
    pub fn message(&self) -> Option<&'static str> {
        match self {
            ViewState::NoSelection => Some(NO_SELECTION_MESSAGE),
            ViewState::LoadFailed => Some(LOAD_FAILED_MESSAGE),
            ViewState::NoDevices => Some(NO_DEVICES_MESSAGE),
            ViewState::Topology(_) => None,
        }
    }

    pub fn scene(&self) -> Option<&Scene> {
        match self {
            ViewState::Topology(scene) => Some(scene),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedView {
    pub state: ViewState,
    pub metadata: Option<MetadataPanel>,
}

impl Default for RenderedView {
    fn default() -> Self {
        Self {
            state: ViewState::NoSelection,
            metadata: None,
        }
    }
}

/// Builds a complete view from scratch; nothing from a previous pass survives.
pub fn build_view(outcome: LoadOutcome<'_>) -> RenderedView {
    match outcome {
        LoadOutcome::NotSelected => RenderedView::default(),
        LoadOutcome::Failed => RenderedView {
            state: ViewState::LoadFailed,
            metadata: None,
        },
        LoadOutcome::Loaded(raw) => {
            let snapshot = normalize(raw);
            let metadata = snapshot.metadata.as_ref().map(MetadataPanel::from_metadata);
            let scene = build_scene(&snapshot.devices);
            let state = if scene.hubs.is_empty() {
                ViewState::NoDevices
            } else {
                ViewState::Topology(scene)
            };
            tracing::debug!(
                devices = snapshot.devices.len(),
                hubs = state.scene().map_or(0, |s| s.hubs.len()),
                "rebuilt topology view"
            );
            RenderedView { state, metadata }
        }
    }
}

#[cfg(test)]
#[path = "tests/scene_tests.rs"]
mod tests;
