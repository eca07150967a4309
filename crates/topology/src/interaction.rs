//! Hover interaction without a rendering surface.
//!
//! The renderer reports which device node (if any) is under the pointer each
//! frame; [`HoverTracker`] turns that into enter/move/leave events and
//! [`TooltipState::apply`] reduces them into what the tooltip should show.

use serde::{Deserialize, Serialize};

use crate::{
    layout::{DeviceRef, DeviceTooltip, Point},
    scene::Scene,
};

/// Tooltip offset from the pointer, applied on both axes.
pub const TOOLTIP_OFFSET: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Enter { target: DeviceRef, pointer: Point },
    Move { target: DeviceRef, pointer: Point },
    Leave { target: DeviceRef },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TooltipState {
    pub visible: bool,
    pub target: Option<DeviceRef>,
    pub position: Option<Point>,
    pub content: Option<DeviceTooltip>,
}

impl TooltipState {
    pub fn hidden() -> Self {
        Self::default()
    }

    pub fn apply(&self, event: PointerEvent, scene: &Scene) -> Self {
        match event {
            PointerEvent::Enter { target, pointer } | PointerEvent::Move { target, pointer } => {
                match scene.device(target) {
                    Some(node) => Self {
                        visible: true,
                        target: Some(target),
                        position: Some(pointer.offset(TOOLTIP_OFFSET, TOOLTIP_OFFSET)),
                        content: Some(node.tooltip.clone()),
                    },
                    None => Self::hidden(),
                }
            }
            PointerEvent::Leave { .. } => Self::hidden(),
        }
    }
}

/// Converts per-frame hit tests into pointer events.
#[derive(Debug, Clone, Default)]
pub struct HoverTracker {
    current: Option<DeviceRef>,
}

impl HoverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<DeviceRef> {
        self.current
    }

    /// `hit` is the node under the pointer together with the pointer position.
    pub fn observe(&mut self, hit: Option<(DeviceRef, Point)>) -> Vec<PointerEvent> {
        let mut events = Vec::new();
        match (self.current, hit) {
            (Some(previous), Some((target, pointer))) if previous == target => {
                events.push(PointerEvent::Move { target, pointer });
            }
            (previous, Some((target, pointer))) => {
                if let Some(previous) = previous {
                    events.push(PointerEvent::Leave { target: previous });
                }
                events.push(PointerEvent::Enter { target, pointer });
                self.current = Some(target);
            }
            (Some(previous), None) => {
                events.push(PointerEvent::Leave { target: previous });
                self.current = None;
            }
            (None, None) => {}
        }
        events
    }

    /// Forget the hovered node; the scene it pointed into was replaced.
    pub fn reset(&mut self) {
        self.current = None;
    }
}
