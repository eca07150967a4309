//! Runtime bridge between UI command queue and backend event intake.

use std::{path::PathBuf, sync::Arc, thread};

use anyhow::Result;
use client_core::{
    fetch_snapshot, fetch_snapshot_list, DirectorySnapshotRepository, HttpSnapshotRepository,
    SnapshotRepository,
};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

/// Where the worker reads snapshots from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositorySource {
    Http(String),
    Directory(PathBuf),
}

impl RepositorySource {
    pub fn describe(&self) -> String {
        match self {
            RepositorySource::Http(url) => url.clone(),
            RepositorySource::Directory(dir) => dir.display().to_string(),
        }
    }

    pub fn open(&self) -> Result<Arc<dyn SnapshotRepository>> {
        let repo: Arc<dyn SnapshotRepository> = match self {
            RepositorySource::Http(url) => Arc::new(HttpSnapshotRepository::new(url)?),
            RepositorySource::Directory(dir) => {
                Arc::new(DirectorySnapshotRepository::new(dir.clone()))
            }
        };
        Ok(repo)
    }
}

pub fn launch(source: RepositorySource, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info(format!(
            "Reading snapshots from {}",
            source.describe()
        )));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::BackendFailed(format!(
                    "backend worker startup failure: failed to build runtime: {err}"
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let repo = match source.open() {
            Ok(repo) => repo,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::BackendFailed(format!(
                    "backend worker startup failure: {err:#}"
                )));
                tracing::error!(source = %source.describe(), "failed to open snapshot source: {err:#}");
                return;
            }
        };

        // Each command runs on its own task so a slow load never blocks a
        // newer refresh; the view state drops whichever completion is stale.
        while let Ok(cmd) = cmd_rx.recv() {
            let repo = Arc::clone(&repo);
            let ui_tx = ui_tx.clone();
            runtime.spawn(async move {
                let event = run_command(repo.as_ref(), cmd).await;
                if ui_tx.send(event).is_err() {
                    tracing::debug!("ui event receiver dropped");
                }
            });
        }
        tracing::info!("backend command channel closed; worker exiting");
    });
}

pub async fn run_command(repo: &dyn SnapshotRepository, cmd: BackendCommand) -> UiEvent {
    match cmd {
        BackendCommand::RefreshSnapshots(request) => {
            UiEvent::SnapshotListLoaded(fetch_snapshot_list(repo, request).await)
        }
        BackendCommand::LoadSnapshot(request) => {
            UiEvent::SnapshotLoaded(fetch_snapshot(repo, request).await)
        }
    }
}
