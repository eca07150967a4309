//! UI layer for desktop GUI: app shell and hub diagram painting.

pub mod app;
pub mod canvas;

pub use app::{TopologyViewerApp, WINDOW_TITLE};
