//! Client side of the topology viewer: where snapshots come from and the
//! state controller that turns selections into rendered views.

use async_trait::async_trait;
use serde_json::Value;
use shared::domain::SnapshotSummary;

pub mod controller;
pub mod error;
pub mod repository;

pub use controller::{
    fetch_snapshot, fetch_snapshot_list, LoadRequest, LoadResponse, RefreshRequest,
    RefreshResponse, SnapshotChoice, StateController, ViewerState,
};
pub use error::RepositoryError;
pub use repository::{DirectorySnapshotRepository, HttpSnapshotRepository};

/// Source of snapshots. Listing order is trusted as recency order (oldest
/// first) and never re-sorted by callers.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<SnapshotSummary>, RepositoryError>;
    async fn get(&self, name: &str) -> Result<Value, RepositoryError>;
}

#[async_trait]
impl<R: SnapshotRepository + ?Sized> SnapshotRepository for std::sync::Arc<R> {
    async fn list(&self) -> Result<Vec<SnapshotSummary>, RepositoryError> {
        (**self).list().await
    }

    async fn get(&self, name: &str) -> Result<Value, RepositoryError> {
        (**self).get(name).await
    }
}
