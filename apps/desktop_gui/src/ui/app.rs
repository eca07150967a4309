//! Viewer shell: snapshot picker, metadata panel, hub diagrams and tooltip.

use std::time::Duration;

use client_core::ViewerState;
use crossbeam_channel::{Receiver, Sender};
use topology::{HoverTracker, PointerEvent, TooltipState};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{events::UiEvent, orchestration::dispatch_backend_command};
use crate::ui::canvas::{self, HubHit};

pub const WINDOW_TITLE: &str = "Network Topology Viewer";

pub struct TopologyViewerApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    viewer: ViewerState,
    hover: HoverTracker,
    tooltip: TooltipState,
    tooltip_origin: egui::Pos2,
    status: String,
}

impl TopologyViewerApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            viewer: ViewerState::new(),
            hover: HoverTracker::new(),
            tooltip: TooltipState::hidden(),
            tooltip_origin: egui::Pos2::ZERO,
            status: String::new(),
        };
        app.refresh();
        app
    }

    pub fn viewer(&self) -> &ViewerState {
        &self.viewer
    }

    pub fn tooltip(&self) -> &TooltipState {
        &self.tooltip
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn refresh(&mut self) {
        let request = self.viewer.begin_refresh();
        self.dispatch(BackendCommand::RefreshSnapshots(request));
    }

    pub fn select(&mut self, name: &str) {
        if let Some(request) = self.viewer.select(name) {
            self.dispatch(BackendCommand::LoadSnapshot(request));
        }
    }

    pub fn reload(&mut self) {
        match self.viewer.reload() {
            Some(request) => self.dispatch(BackendCommand::LoadSnapshot(request)),
            None => self.clear_hover(),
        }
    }

    pub fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.handle_event(event);
        }
    }

    pub fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => self.status = message,
            UiEvent::SnapshotListLoaded(response) => {
                let follow_up = self.viewer.complete_refresh(response);
                self.clear_hover();
                if let Some(request) = follow_up {
                    self.dispatch(BackendCommand::LoadSnapshot(request));
                }
            }
            UiEvent::SnapshotLoaded(response) => {
                if self.viewer.complete_load(response) {
                    self.clear_hover();
                }
            }
            UiEvent::BackendFailed(message) => {
                tracing::error!("{message}");
                self.status = message;
            }
        }
    }

    /// Feeds this frame's hit test into the hover state machine.
    pub fn observe_hover(&mut self, hit: Option<HubHit>) {
        let Some(scene) = self.viewer.view().state.scene() else {
            self.clear_hover();
            return;
        };
        if let Some(hit) = hit {
            self.tooltip_origin = hit.origin;
        }
        let events: Vec<PointerEvent> = self
            .hover
            .observe(hit.map(|hit| (hit.target, hit.pointer)));
        for event in events {
            self.tooltip = self.tooltip.apply(event, scene);
        }
    }

    fn clear_hover(&mut self) {
        self.hover.reset();
        self.tooltip = TooltipState::hidden();
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        if !dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status) {
            self.viewer.abandon_pending();
        }
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("snapshot_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label("Snapshot:");
                let selected_text = self
                    .viewer
                    .selected()
                    .and_then(|name| {
                        self.viewer
                            .choices()
                            .iter()
                            .find(|choice| choice.name == name)
                    })
                    .map(|choice| choice.label.clone())
                    .unwrap_or_default();

                let mut picked = None;
                ui.add_enabled_ui(self.viewer.selection_enabled(), |ui| {
                    egui::ComboBox::from_id_salt("snapshot_choice")
                        .selected_text(selected_text)
                        .width(320.0)
                        .show_ui(ui, |ui| {
                            for choice in self.viewer.choices() {
                                let is_selected =
                                    self.viewer.selected() == Some(choice.name.as_str());
                                if ui.selectable_label(is_selected, choice.label.as_str()).clicked()
                                    && !is_selected
                                {
                                    picked = Some(choice.name.clone());
                                }
                            }
                        });
                });
                if let Some(name) = picked {
                    self.select(&name);
                }

                if ui.button("Reload").clicked() {
                    self.reload();
                }
                if ui.button("Refresh list").clicked() {
                    self.refresh();
                }
                if self.viewer.is_loading() {
                    ui.spinner();
                }
                if let Some(notice) = self.viewer.list_notice() {
                    ui.weak(notice);
                }
            });

            if let Some(metadata) = &self.viewer.view().metadata {
                ui.horizontal(|ui| {
                    ui.label(format!("Run: {}", metadata.run_id));
                    ui.separator();
                    ui.label(format!("Collected: {}", metadata.collected_at));
                    ui.separator();
                    ui.label(format!("Devices: {}", metadata.device_count));
                });
            }
            ui.add_space(4.0);
        });
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.small(self.status.as_str());
        });
    }

    fn show_view(&mut self, ctx: &egui::Context) {
        let mut hit = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            let view = self.viewer.view();
            if let Some(message) = view.state.message() {
                ui.centered_and_justified(|ui| {
                    ui.heading(message);
                });
                return;
            }
            let Some(scene) = view.state.scene() else {
                return;
            };

            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    for (index, panel) in scene.hubs.iter().enumerate() {
                        ui.group(|ui| {
                            ui.vertical(|ui| {
                                ui.strong(panel.layout.label.as_str());
                                if let Some(found) = canvas::hub_diagram(ui, scene, index) {
                                    hit = Some(found);
                                }
                                canvas::legend(ui, panel);
                            });
                        });
                    }
                });
            });
        });
        self.observe_hover(hit);
    }

    fn show_tooltip(&self, ctx: &egui::Context) {
        if !self.tooltip.visible {
            return;
        }
        let (Some(position), Some(content)) = (self.tooltip.position, &self.tooltip.content)
        else {
            return;
        };
        egui::Area::new(egui::Id::new("device_tooltip"))
            .order(egui::Order::Tooltip)
            .fixed_pos(canvas::to_screen(self.tooltip_origin, position))
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::popup(&ctx.style()).show(ui, |ui| {
                    for line in content.lines() {
                        ui.label(line);
                    }
                });
            });
    }
}

impl eframe::App for TopologyViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.show_top_bar(ctx);
        self.show_status_bar(ctx);
        self.show_view(ctx);
        self.show_tooltip(ctx);
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
