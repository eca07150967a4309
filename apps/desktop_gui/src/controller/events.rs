//! Events delivered from the backend worker to the UI thread.

use client_core::{LoadResponse, RefreshResponse};

#[derive(Debug)]
pub enum UiEvent {
    Info(String),
    SnapshotListLoaded(RefreshResponse),
    SnapshotLoaded(LoadResponse),
    BackendFailed(String),
}
