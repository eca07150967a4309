//! Plain-text renderings of views and bandwidth series for the terminal.

use std::fmt::Write as _;

use shared::{domain::SnapshotSummary, protocol::BandwidthResponse};
use topology::{HubPanel, RenderedView};

pub fn snapshot_list(summaries: &[SnapshotSummary]) -> String {
    let mut out = String::new();
    let newest = summaries.len().checked_sub(1);
    for (index, summary) in summaries.iter().enumerate() {
        let marker = if Some(index) == newest { '*' } else { ' ' };
        let _ = writeln!(out, "{marker} {}", summary.choice_label());
    }
    out
}

pub fn view(view: &RenderedView) -> String {
    let mut out = String::new();
    if let Some(metadata) = &view.metadata {
        let _ = writeln!(out, "run:       {}", metadata.run_id);
        let _ = writeln!(out, "collected: {}", metadata.collected_at);
        let _ = writeln!(out, "devices:   {}", metadata.device_count);
        out.push('\n');
    }
    if let Some(message) = view.state.message() {
        let _ = writeln!(out, "{message}");
        return out;
    }
    if let Some(scene) = view.state.scene() {
        for panel in &scene.hubs {
            hub(&mut out, panel);
        }
    }
    out
}

fn hub(out: &mut String, panel: &HubPanel) {
    let layout = &panel.layout;
    let _ = writeln!(out, "{} ({} devices)", layout.label, layout.device_count());
    for connection in &layout.connections {
        let _ = writeln!(
            out,
            "  {} {} @ ({:.1}, {:.1})",
            connection.color.hex(),
            connection.label,
            connection.position.x,
            connection.position.y
        );
        for device in &connection.devices {
            let tip = &device.tooltip;
            let _ = writeln!(
                out,
                "    - {} [{}] {}",
                tip.name, tip.mac_address, tip.status
            );
        }
    }
    let legend: Vec<String> = panel.legend.iter().map(|entry| entry.caption()).collect();
    let _ = writeln!(out, "  legend: {}", legend.join(", "));
    out.push('\n');
}

pub fn bandwidth(response: &BandwidthResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "last updated {}",
        response.last_updated.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if response.devices.is_empty() {
        out.push_str("no throughput samples\n");
        return out;
    }
    for device in &response.devices {
        let Some(latest) = device.series.last() else {
            continue;
        };
        let _ = writeln!(
            out,
            "{} ({}): up {:.4} Mbps, down {:.4} Mbps over {} intervals",
            device.device_name,
            device.ip_address,
            latest.upload_mbps,
            latest.download_mbps,
            device.series.len()
        );
    }
    out
}
