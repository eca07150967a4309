use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Any failure of `list` or `get`: transport, status, decoding or disk.
    #[error("snapshot repository unavailable while trying to {operation}: {source}")]
    Unavailable {
        operation: String,
        #[source]
        source: anyhow::Error,
    },
}

impl RepositoryError {
    pub fn unavailable(operation: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::Unavailable {
            operation: operation.into(),
            source: source.into(),
        }
    }
}
