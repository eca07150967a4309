//! Painter-level drawing of one hub diagram and its legend.

use egui::{Align2, Color32, CornerRadius, FontId, Pos2, Sense, Stroke};
use topology::{
    layout::{CONNECTION_NODE_RADIUS, DEVICE_NODE_RADIUS, HUB_NODE_RADIUS, VIEWPORT_SIZE},
    palette::{DEVICE_COLOR, EDGE_COLOR, HUB_COLOR},
    DeviceRef, HubPanel, Point, Rgb, Scene,
};

const PANEL_BACKGROUND: Color32 = Color32::from_rgb(15, 23, 42);
const LABEL_COLOR: Color32 = Color32::from_rgb(226, 232, 240);
const SWATCH_SIZE: f32 = 12.0;

pub fn to_color32(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.r, rgb.g, rgb.b)
}

/// Maps viewport coordinates onto the allocated rect.
pub fn to_screen(origin: Pos2, point: Point) -> Pos2 {
    origin + egui::vec2(point.x as f32, point.y as f32)
}

pub fn to_viewport(origin: Pos2, pos: Pos2) -> Point {
    let local = pos - origin;
    Point::new(f64::from(local.x), f64::from(local.y))
}

/// A device under the pointer, with the pointer in the hub's viewport
/// coordinates and the screen origin of that viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HubHit {
    pub target: DeviceRef,
    pub pointer: Point,
    pub origin: Pos2,
}

/// Draws one hub's radial diagram. Returns the hovered device, if any.
pub fn hub_diagram(ui: &mut egui::Ui, scene: &Scene, hub: usize) -> Option<HubHit> {
    let panel = scene.hubs.get(hub)?;
    let side = VIEWPORT_SIZE as f32;
    let (response, painter) = ui.allocate_painter(egui::vec2(side, side), Sense::hover());
    let origin = response.rect.min;

    painter.rect_filled(response.rect, CornerRadius::same(8), PANEL_BACKGROUND);
    paint_hub(&painter, origin, panel);

    let pointer = response.hover_pos()?;
    let local = to_viewport(origin, pointer);
    scene.hit_test(hub, local).map(|target| HubHit {
        target,
        pointer: local,
        origin,
    })
}

fn paint_hub(painter: &egui::Painter, origin: Pos2, panel: &HubPanel) {
    let layout = &panel.layout;
    let edge = Stroke::new(1.5, to_color32(EDGE_COLOR));
    for (from, to) in layout.edges() {
        painter.line_segment([to_screen(origin, from), to_screen(origin, to)], edge);
    }

    for connection in &layout.connections {
        let color = to_color32(connection.color);
        for (from, to) in connection.spokes() {
            painter.line_segment(
                [to_screen(origin, from), to_screen(origin, to)],
                Stroke::new(1.0, color),
            );
        }
        painter.circle_filled(
            to_screen(origin, connection.position),
            CONNECTION_NODE_RADIUS as f32,
            color,
        );
        for device in &connection.devices {
            painter.circle(
                to_screen(origin, device.position),
                DEVICE_NODE_RADIUS as f32,
                to_color32(DEVICE_COLOR),
                Stroke::new(1.5, color),
            );
        }
    }

    let center = to_screen(origin, layout.center);
    painter.circle_filled(center, HUB_NODE_RADIUS as f32, to_color32(HUB_COLOR));
    painter.text(
        center,
        Align2::CENTER_CENTER,
        &layout.label,
        FontId::proportional(11.0),
        LABEL_COLOR,
    );
}

pub fn legend(ui: &mut egui::Ui, panel: &HubPanel) {
    for entry in &panel.legend {
        ui.horizontal(|ui| {
            let (rect, _) =
                ui.allocate_exact_size(egui::vec2(SWATCH_SIZE, SWATCH_SIZE), Sense::hover());
            ui.painter()
                .rect_filled(rect, CornerRadius::same(2), to_color32(entry.color));
            ui.label(entry.caption());
        });
    }
}
