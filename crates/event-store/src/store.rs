use std::sync::Arc;

use async_trait::async_trait;
use common::AggregateId;
use domain::DomainEvent;

use crate::Result;

/// Core trait for event log implementations.
///
/// The event log exclusively owns history storage: per aggregate it keeps
/// an ordered, append-only sequence of events, and the stored count of that
/// sequence is the aggregate's version. All implementations must be
/// thread-safe (Send + Sync).
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Returns all events for the aggregate, in append order.
    ///
    /// An unknown aggregate id yields an empty sequence, never an error.
    async fn load(&self, aggregate_id: AggregateId) -> Result<Vec<Arc<dyn DomainEvent>>>;

    /// Appends `new_events` iff the stored count equals `expected_count`.
    ///
    /// `expected_count` is the number of events the caller had loaded before
    /// deriving `new_events`; a mismatch means another writer raced ahead
    /// and the save fails with
    /// [`ConcurrencyConflict`](crate::EventStoreError::ConcurrencyConflict)
    /// applying nothing. On success the stored sequence becomes
    /// `old ++ new_events`, preserving the caller-given order. Events are
    /// not reordered, deduplicated, or validated. Retrying after a conflict
    /// is the caller's concern.
    async fn save(
        &self,
        aggregate_id: AggregateId,
        expected_count: usize,
        new_events: Vec<Arc<dyn DomainEvent>>,
    ) -> Result<()>;
}

/// Extension trait providing convenience methods for event logs.
#[async_trait]
pub trait EventStoreExt: EventStore {
    /// Returns the stored event count (the aggregate's version).
    async fn stored_count(&self, aggregate_id: AggregateId) -> Result<usize> {
        Ok(self.load(aggregate_id).await?.len())
    }

    /// Appends a single event.
    async fn append_event(
        &self,
        aggregate_id: AggregateId,
        expected_count: usize,
        event: Arc<dyn DomainEvent>,
    ) -> Result<()> {
        self.save(aggregate_id, expected_count, vec![event]).await
    }
}

// Blanket implementation for all EventStore implementations
impl<T: EventStore + ?Sized> EventStoreExt for T {}
