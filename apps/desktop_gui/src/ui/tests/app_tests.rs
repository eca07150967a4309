use client_core::{LoadResponse, RefreshResponse, RepositoryError};
use crossbeam_channel::{bounded, Receiver, Sender};
use serde_json::json;
use shared::domain::SnapshotSummary;
use topology::{DeviceRef, ViewState};

use super::TopologyViewerApp;
use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::canvas::HubHit;

struct Harness {
    app: TopologyViewerApp,
    cmd_rx: Receiver<BackendCommand>,
    _ui_tx: Sender<UiEvent>,
}

fn harness() -> Harness {
    let (cmd_tx, cmd_rx) = bounded(16);
    let (ui_tx, ui_rx) = bounded(16);
    Harness {
        app: TopologyViewerApp::new(cmd_tx, ui_rx),
        cmd_rx,
        _ui_tx: ui_tx,
    }
}

fn summary(name: &str, count: u64) -> SnapshotSummary {
    SnapshotSummary {
        name: name.to_string(),
        device_count: Some(count),
    }
}

fn snapshot() -> serde_json::Value {
    json!({
        "run_id": "run-7",
        "collected_at": "2024-05-01T10:00:00Z",
        "device_count": 2,
        "devices": [
            {"name": "laptop", "mac_address": "aa:bb", "connected_to": "Core", "connection": "wifi", "status": "online"},
            {"name": "printer", "connected_to": "Core", "connection": "ethernet"}
        ]
    })
}

/// Drives the app through startup: list two snapshots and load the newest.
fn loaded(h: &mut Harness) {
    let refresh = match h.cmd_rx.try_recv().expect("startup refresh") {
        BackendCommand::RefreshSnapshots(request) => request,
        other => panic!("unexpected command {other:?}"),
    };
    h.app.handle_event(UiEvent::SnapshotListLoaded(RefreshResponse {
        seq: refresh.seq,
        result: Ok(vec![summary("devices_1.json", 1), summary("devices_2.json", 2)]),
    }));
    let load = match h.cmd_rx.try_recv().expect("default load") {
        BackendCommand::LoadSnapshot(request) => request,
        other => panic!("unexpected command {other:?}"),
    };
    assert_eq!(load.name, "devices_2.json");
    h.app.handle_event(UiEvent::SnapshotLoaded(LoadResponse {
        seq: load.seq,
        name: load.name,
        result: Ok(snapshot()),
    }));
}

fn first_device_hit(app: &TopologyViewerApp) -> HubHit {
    let target = DeviceRef {
        hub: 0,
        connection: 0,
        device: 0,
    };
    let scene = app.viewer().view().state.scene().expect("topology scene");
    let position = scene.device(target).expect("device node").position;
    HubHit {
        target,
        pointer: position,
        origin: egui::Pos2::new(20.0, 80.0),
    }
}

#[test]
fn startup_requests_the_snapshot_list() {
    let h = harness();
    assert!(matches!(
        h.cmd_rx.try_recv(),
        Ok(BackendCommand::RefreshSnapshots(_))
    ));
    assert!(!h.app.viewer().selection_enabled());
}

#[test]
fn listing_selects_last_entry_and_renders_it() {
    let mut h = harness();
    loaded(&mut h);

    assert_eq!(h.app.viewer().selected(), Some("devices_2.json"));
    assert!(h.app.viewer().selection_enabled());
    let view = h.app.viewer().view();
    let scene = view.state.scene().expect("topology scene");
    assert_eq!(scene.hubs.len(), 1);
    let metadata = view.metadata.as_ref().expect("metadata panel");
    assert_eq!(metadata.run_id, "run-7");
    assert_eq!(metadata.collected_at, "2024-05-01 10:00:00 UTC");
    assert_eq!(metadata.device_count, 2);
}

#[test]
fn hovering_a_device_shows_and_hides_its_tooltip() {
    let mut h = harness();
    loaded(&mut h);
    let hit = first_device_hit(&h.app);

    h.app.observe_hover(Some(hit));
    let tooltip = h.app.tooltip();
    assert!(tooltip.visible);
    let content = tooltip.content.as_ref().expect("tooltip content");
    // connections are laid out in lexical order, so "ethernet" comes first
    assert_eq!(content.name, "printer");
    assert_eq!(content.mac_address, "Unknown MAC");
    assert_eq!(content.connection, "ethernet");

    h.app.observe_hover(Some(hit));
    assert!(h.app.tooltip().visible);

    h.app.observe_hover(None);
    assert!(!h.app.tooltip().visible);
}

#[test]
fn new_view_discards_previous_tooltip() {
    let mut h = harness();
    loaded(&mut h);
    let hit = first_device_hit(&h.app);
    h.app.observe_hover(Some(hit));
    assert!(h.app.tooltip().visible);

    h.app.reload();
    let load = match h.cmd_rx.try_recv().expect("reload") {
        BackendCommand::LoadSnapshot(request) => request,
        other => panic!("unexpected command {other:?}"),
    };
    h.app.handle_event(UiEvent::SnapshotLoaded(LoadResponse {
        seq: load.seq,
        name: load.name,
        result: Err(RepositoryError::unavailable(
            "load snapshot",
            anyhow::anyhow!("connection refused"),
        )),
    }));

    assert_eq!(h.app.viewer().view().state, ViewState::LoadFailed);
    assert!(!h.app.tooltip().visible);
}

#[test]
fn backend_failure_surfaces_in_status() {
    let mut h = harness();
    h.app.handle_event(UiEvent::BackendFailed(
        "backend worker startup failure: bad url".to_string(),
    ));
    assert!(h.app.status().contains("startup failure"));
}

#[test]
fn undelivered_reload_does_not_leave_a_spinner() {
    let mut h = harness();
    loaded(&mut h);
    let Harness {
        mut app, cmd_rx, ..
    } = h;
    drop(cmd_rx);

    app.reload();
    assert!(!app.viewer().is_loading());
    assert!(app.viewer().selection_enabled());
    assert!(app.status().contains("disconnected"));
    assert!(app.viewer().view().state.scene().is_some());

    app.refresh();
    assert!(app.viewer().selection_enabled());
}
