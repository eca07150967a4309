//! Snapshot-to-scene pipeline for the network topology viewer.
//!
//! `normalize` turns an arbitrary JSON payload into a [`Snapshot`], `grouping`
//! partitions its devices by hub and connection, `layout` places them on a
//! radial diagram using a per-pass [`ColorTable`], and `scene` assembles the
//! view the renderer draws. `interaction` holds the hover state machine.

pub mod grouping;
pub mod interaction;
pub mod layout;
pub mod metadata;
pub mod normalize;
pub mod palette;
pub mod scene;

pub use grouping::{group_devices, ConnectionGroup, Grouping, HubGroup};
pub use interaction::{HoverTracker, PointerEvent, TooltipState};
pub use layout::{
    layout_hub, ConnectionNode, DeviceNode, DeviceRef, DeviceTooltip, HubLayout, Point,
};
pub use metadata::MetadataPanel;
pub use normalize::normalize;
pub use palette::{ColorTable, Rgb, PALETTE};
pub use scene::{
    build_scene, build_view, HubPanel, LegendEntry, LoadOutcome, RenderedView, Scene, ViewState,
};
pub use shared::domain::{Device, Snapshot, SnapshotMetadata};
