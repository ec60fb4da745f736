use common::AggregateId;
use thiserror::Error;

/// Errors that can occur when interacting with the event log.
#[derive(Debug, Error)]
pub enum EventStoreError {
    /// The expected event count did not match the stored count.
    ///
    /// Another writer appended events between this caller's load and save;
    /// the caller must reload and retry. Nothing was applied.
    #[error(
        "Concurrency conflict for aggregate {aggregate_id}: expected {expected} stored events, found {actual}"
    )]
    ConcurrencyConflict {
        aggregate_id: AggregateId,
        expected: usize,
        actual: usize,
    },

    /// A storage backend failure, for adapters persisting beyond process
    /// lifetime. The in-memory adapter never produces this.
    #[error("Storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type for event log operations.
pub type Result<T> = std::result::Result<T, EventStoreError>;
