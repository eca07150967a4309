use std::path::PathBuf;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use shared::{
    domain::SnapshotSummary,
    protocol::{BandwidthResponse, BANDWIDTH_ROUTE, SNAPSHOTS_ROUTE},
};
use storage::SnapshotStore;
use url::Url;

use crate::{error::RepositoryError, SnapshotRepository};

/// Repository backed by the snapshot HTTP service.
#[derive(Clone)]
pub struct HttpSnapshotRepository {
    http: Client,
    base_url: Url,
}

impl HttpSnapshotRepository {
    pub fn new(server_url: &str) -> anyhow::Result<Self> {
        let base_url = Url::parse(server_url.trim_end_matches('/'))
            .with_context(|| format!("invalid server url '{server_url}'"))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(anyhow!("server_url must start with http:// or https://"));
        }
        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, route: &str, tail: Option<&str>) -> anyhow::Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| anyhow!("server url cannot be a base"))?;
            segments.pop_if_empty();
            segments.extend(route.trim_start_matches('/').split('/'));
            if let Some(tail) = tail {
                segments.push(tail);
            }
        }
        Ok(url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> anyhow::Result<T> {
        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(body)
    }

    /// Bandwidth time series for the charting view.
    pub async fn fetch_bandwidth(&self) -> Result<BandwidthResponse, RepositoryError> {
        let url = self
            .endpoint(BANDWIDTH_ROUTE, None)
            .map_err(|e| RepositoryError::unavailable("fetch bandwidth", e))?;
        self.get_json(url)
            .await
            .map_err(|e| RepositoryError::unavailable("fetch bandwidth", e))
    }
}

#[async_trait]
impl SnapshotRepository for HttpSnapshotRepository {
    async fn list(&self) -> Result<Vec<SnapshotSummary>, RepositoryError> {
        let url = self
            .endpoint(SNAPSHOTS_ROUTE, None)
            .map_err(|e| RepositoryError::unavailable("list snapshots", e))?;
        self.get_json(url)
            .await
            .map_err(|e| RepositoryError::unavailable("list snapshots", e))
    }

    async fn get(&self, name: &str) -> Result<Value, RepositoryError> {
        let operation = format!("load snapshot '{name}'");
        let url = self
            .endpoint(SNAPSHOTS_ROUTE, Some(name))
            .map_err(|e| RepositoryError::unavailable(operation.clone(), e))?;
        self.get_json(url)
            .await
            .map_err(|e| RepositoryError::unavailable(operation, e))
    }
}

/// Repository reading the scraper output directory directly.
#[derive(Debug, Clone)]
pub struct DirectorySnapshotRepository {
    store: SnapshotStore,
}

impl DirectorySnapshotRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            store: SnapshotStore::open(dir),
        }
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }
}

#[async_trait]
impl SnapshotRepository for DirectorySnapshotRepository {
    async fn list(&self) -> Result<Vec<SnapshotSummary>, RepositoryError> {
        self.store
            .list_snapshots()
            .await
            .map_err(|e| RepositoryError::unavailable("list snapshots", e))
    }

    async fn get(&self, name: &str) -> Result<Value, RepositoryError> {
        self.store
            .load_snapshot(name)
            .await
            .map_err(|e| RepositoryError::unavailable(format!("load snapshot '{name}'"), e))
    }
}

#[cfg(test)]
#[path = "tests/repository_tests.rs"]
mod tests;
