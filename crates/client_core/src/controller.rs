//! Selected-snapshot state and the refresh/select/reload orchestration.
//!
//! Every request carries the sequence number that was current when it was
//! dispatched. A completion is applied only if no newer request of the same
//! kind has been dispatched since, so a slow fetch can never overwrite the
//! result of a faster, newer one.

use serde_json::Value;
use shared::domain::SnapshotSummary;
use topology::{build_view, LoadOutcome, RenderedView};
use tracing::{debug, error, info, warn};

use crate::{error::RepositoryError, SnapshotRepository};

pub const NO_SNAPSHOTS_MESSAGE: &str = "No snapshots available yet.";
pub const LIST_FAILED_MESSAGE: &str = "Unable to load the snapshot list.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotChoice {
    pub name: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshRequest {
    pub seq: u64,
}

#[derive(Debug)]
pub struct RefreshResponse {
    pub seq: u64,
    pub result: Result<Vec<SnapshotSummary>, RepositoryError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub seq: u64,
    pub name: String,
}

#[derive(Debug)]
pub struct LoadResponse {
    pub seq: u64,
    pub name: String,
    pub result: Result<Value, RepositoryError>,
}

/// Everything the viewer shows, minus the drawing itself.
#[derive(Debug, Clone, Default)]
pub struct ViewerState {
    choices: Vec<SnapshotChoice>,
    selected: Option<String>,
    selection_enabled: bool,
    list_notice: Option<&'static str>,
    view: RenderedView,
    loading: bool,
    latest_refresh: u64,
    latest_load: u64,
}

impl ViewerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn choices(&self) -> &[SnapshotChoice] {
        &self.choices
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selection_enabled(&self) -> bool {
        self.selection_enabled
    }

    pub fn list_notice(&self) -> Option<&'static str> {
        self.list_notice
    }

    pub fn view(&self) -> &RenderedView {
        &self.view
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The last request never reached the backend, so no completion will
    /// arrive for it. Clears the pending indicators so the user can retry;
    /// the current view is left as it was.
    pub fn abandon_pending(&mut self) {
        warn!("pending snapshot request was not dispatched");
        self.loading = false;
        self.selection_enabled = !self.choices.is_empty();
    }

    /// Disables the choice control and supersedes any in-flight load; the
    /// refresh ends by loading its own default selection.
    pub fn begin_refresh(&mut self) -> RefreshRequest {
        self.selection_enabled = false;
        self.latest_refresh += 1;
        self.latest_load += 1;
        self.loading = false;
        RefreshRequest {
            seq: self.latest_refresh,
        }
    }

    /// Applies a snapshot listing. Returns the load for the default selection
    /// (the last listed entry) when there is one.
    pub fn complete_refresh(&mut self, response: RefreshResponse) -> Option<LoadRequest> {
        if response.seq != self.latest_refresh {
            debug!(
                seq = response.seq,
                latest = self.latest_refresh,
                "discarding stale snapshot list"
            );
            return None;
        }

        let summaries = match response.result {
            Ok(summaries) => summaries,
            Err(err) => {
                error!(error = %err, "failed to list snapshots");
                self.choices.clear();
                self.selected = None;
                self.list_notice = Some(LIST_FAILED_MESSAGE);
                self.view = build_view(LoadOutcome::Failed);
                return None;
            }
        };

        self.choices = summaries
            .iter()
            .map(|summary| SnapshotChoice {
                name: summary.name.clone(),
                label: summary.choice_label(),
            })
            .collect();

        let Some(last) = self.choices.last().map(|choice| choice.name.clone()) else {
            info!("no snapshots available");
            self.selected = None;
            self.list_notice = Some(NO_SNAPSHOTS_MESSAGE);
            self.view = build_view(LoadOutcome::NotSelected);
            return None;
        };

        self.list_notice = None;
        self.selection_enabled = true;
        self.selected = Some(last.clone());
        Some(self.begin_load(last))
    }

    /// User picked an entry of the choice control.
    pub fn select(&mut self, name: &str) -> Option<LoadRequest> {
        if !self.choices.iter().any(|choice| choice.name == name) {
            warn!(%name, "ignoring selection of unlisted snapshot");
            return None;
        }
        self.selected = Some(name.to_string());
        Some(self.begin_load(name.to_string()))
    }

    /// Re-fetches the current selection.
    pub fn reload(&mut self) -> Option<LoadRequest> {
        match self.selected.clone() {
            Some(name) => Some(self.begin_load(name)),
            None => {
                self.view = build_view(LoadOutcome::NotSelected);
                None
            }
        }
    }

    /// Runs the render pipeline for a completed fetch. Returns `false` when
    /// the response was superseded and dropped.
    pub fn complete_load(&mut self, response: LoadResponse) -> bool {
        if response.seq != self.latest_load {
            debug!(
                snapshot = %response.name,
                seq = response.seq,
                latest = self.latest_load,
                "discarding stale snapshot load"
            );
            return false;
        }

        self.loading = false;
        self.view = match &response.result {
            Ok(raw) => build_view(LoadOutcome::Loaded(raw)),
            Err(err) => {
                error!(snapshot = %response.name, error = %err, "failed to load snapshot");
                build_view(LoadOutcome::Failed)
            }
        };
        true
    }

    fn begin_load(&mut self, name: String) -> LoadRequest {
        self.latest_load += 1;
        self.loading = true;
        LoadRequest {
            seq: self.latest_load,
            name,
        }
    }
}

pub async fn fetch_snapshot_list<R>(repo: &R, request: RefreshRequest) -> RefreshResponse
where
    R: SnapshotRepository + ?Sized,
{
    RefreshResponse {
        seq: request.seq,
        result: repo.list().await,
    }
}

pub async fn fetch_snapshot<R>(repo: &R, request: LoadRequest) -> LoadResponse
where
    R: SnapshotRepository + ?Sized,
{
    let result = repo.get(&request.name).await;
    LoadResponse {
        seq: request.seq,
        name: request.name,
        result,
    }
}

/// Drives a [`ViewerState`] against a repository from a single task.
pub struct StateController<R: SnapshotRepository> {
    repo: R,
    state: ViewerState,
}

impl<R: SnapshotRepository> StateController<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            state: ViewerState::new(),
        }
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub async fn refresh(&mut self) -> &ViewerState {
        let request = self.state.begin_refresh();
        let response = fetch_snapshot_list(&self.repo, request).await;
        if let Some(load) = self.state.complete_refresh(response) {
            let response = fetch_snapshot(&self.repo, load).await;
            self.state.complete_load(response);
        }
        &self.state
    }

    pub async fn select(&mut self, name: &str) -> &ViewerState {
        if let Some(load) = self.state.select(name) {
            let response = fetch_snapshot(&self.repo, load).await;
            self.state.complete_load(response);
        }
        &self.state
    }

    pub async fn reload(&mut self) -> &ViewerState {
        if let Some(load) = self.state.reload() {
            let response = fetch_snapshot(&self.repo, load).await;
            self.state.complete_load(response);
        }
        &self.state
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
