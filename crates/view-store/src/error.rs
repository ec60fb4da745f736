use thiserror::Error;

/// Errors that can occur when interacting with the view store.
#[derive(Debug, Error)]
pub enum ViewStoreError {
    /// A storage backend failure, for adapters persisting beyond process
    /// lifetime. The in-memory adapter never produces this.
    #[error("Storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type for view store operations.
pub type Result<T> = std::result::Result<T, ViewStoreError>;
