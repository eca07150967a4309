//! Backend commands queued from UI to backend worker.

use client_core::{LoadRequest, RefreshRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    RefreshSnapshots(RefreshRequest),
    LoadSnapshot(LoadRequest),
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::RefreshSnapshots(_) => "refresh_snapshots",
            BackendCommand::LoadSnapshot(_) => "load_snapshot",
        }
    }
}
