use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::AggregateId;
use domain::DomainEvent;
use tokio::sync::RwLock;

use crate::{
    EventStoreError, Result,
    store::EventStore,
};

/// In-memory event log for tests and single-process use.
///
/// Histories are plain vectors guarded by a read-write lock; the
/// expected-count check and the append happen under one write guard, so a
/// conflicting save applies nothing.
#[derive(Clone, Default)]
pub struct InMemoryEventStore {
    streams: Arc<RwLock<HashMap<AggregateId, Vec<Arc<dyn DomainEvent>>>>>,
}

impl InMemoryEventStore {
    /// Creates a new empty in-memory event log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of events stored, across all aggregates.
    pub async fn event_count(&self) -> usize {
        self.streams.read().await.values().map(Vec::len).sum()
    }

    /// Removes all stored histories.
    pub async fn clear(&self) {
        self.streams.write().await.clear();
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    #[tracing::instrument(skip(self))]
    async fn load(&self, aggregate_id: AggregateId) -> Result<Vec<Arc<dyn DomainEvent>>> {
        let streams = self.streams.read().await;
        Ok(streams.get(&aggregate_id).cloned().unwrap_or_default())
    }

    #[tracing::instrument(skip(self, new_events), fields(batch = new_events.len()))]
    async fn save(
        &self,
        aggregate_id: AggregateId,
        expected_count: usize,
        new_events: Vec<Arc<dyn DomainEvent>>,
    ) -> Result<()> {
        let mut streams = self.streams.write().await;
        let actual = streams.get(&aggregate_id).map_or(0, Vec::len);
        if actual != expected_count {
            return Err(EventStoreError::ConcurrencyConflict {
                aggregate_id,
                expected: expected_count,
                actual,
            });
        }

        let appended = new_events.len();
        streams.entry(aggregate_id).or_default().extend(new_events);

        metrics::counter!("event_store_events_appended_total").increment(appended as u64);
        tracing::debug!(%aggregate_id, appended, version = actual + appended, "events appended");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::EventStoreExt;
    use chrono::{DateTime, Utc};
    use domain::{DomainObject, IdentityComponent};

    struct ThingHappened {
        id: AggregateId,
        label: String,
        at: DateTime<Utc>,
    }

    impl DomainObject for ThingHappened {
        fn identity_components(&self) -> Vec<IdentityComponent> {
            vec![self.id.into(), self.label.clone().into(), self.at.into()]
        }
    }

    impl DomainEvent for ThingHappened {
        fn entity_id(&self) -> AggregateId {
            self.id
        }

        fn moment(&self) -> DateTime<Utc> {
            self.at
        }

        fn event_type(&self) -> &'static str {
            "ThingHappened"
        }
    }

    fn make_event(id: AggregateId, label: &str) -> Arc<dyn DomainEvent> {
        Arc::new(ThingHappened {
            id,
            label: label.to_string(),
            at: Utc::now(),
        })
    }

    #[tokio::test]
    async fn save_then_load_returns_events_in_order() {
        let store = InMemoryEventStore::new();
        let id = AggregateId::new();
        let e1 = make_event(id, "first");

        store.save(id, 0, vec![Arc::clone(&e1)]).await.unwrap();

        let history = store.load(id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert!(Arc::ptr_eq(&history[0], &e1));
    }

    #[tokio::test]
    async fn load_unknown_aggregate_returns_empty() {
        let store = InMemoryEventStore::new();
        let history = store.load(AggregateId::new()).await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn stale_expected_count_conflicts_and_applies_nothing() {
        let store = InMemoryEventStore::new();
        let id = AggregateId::new();
        let e1 = make_event(id, "first");
        store.save(id, 0, vec![Arc::clone(&e1)]).await.unwrap();

        let result = store.save(id, 0, vec![make_event(id, "stale")]).await;
        assert!(matches!(
            result,
            Err(EventStoreError::ConcurrencyConflict {
                expected: 0,
                actual: 1,
                ..
            })
        ));

        let history = store.load(id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert!(Arc::ptr_eq(&history[0], &e1));
    }

    #[tokio::test]
    async fn matching_expected_count_appends_after_existing() {
        let store = InMemoryEventStore::new();
        let id = AggregateId::new();
        let e1 = make_event(id, "first");
        let e2 = make_event(id, "second");

        store.save(id, 0, vec![Arc::clone(&e1)]).await.unwrap();
        store.save(id, 1, vec![Arc::clone(&e2)]).await.unwrap();

        let history = store.load(id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(Arc::ptr_eq(&history[0], &e1));
        assert!(Arc::ptr_eq(&history[1], &e2));
    }

    #[tokio::test]
    async fn batch_append_preserves_caller_order() {
        let store = InMemoryEventStore::new();
        let id = AggregateId::new();
        let batch: Vec<_> = ["a", "b", "c"].iter().map(|l| make_event(id, l)).collect();

        store.save(id, 0, batch.clone()).await.unwrap();

        let history = store.load(id).await.unwrap();
        assert_eq!(history.len(), 3);
        for (stored, given) in history.iter().zip(&batch) {
            assert!(Arc::ptr_eq(stored, given));
        }
    }

    #[tokio::test]
    async fn conflicting_batch_applies_nothing() {
        let store = InMemoryEventStore::new();
        let id = AggregateId::new();
        store.save(id, 0, vec![make_event(id, "first")]).await.unwrap();

        let batch = vec![make_event(id, "x"), make_event(id, "y")];
        let result = store.save(id, 0, batch).await;
        assert!(result.is_err());
        assert_eq!(store.load(id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn histories_are_isolated_per_aggregate() {
        let store = InMemoryEventStore::new();
        let id1 = AggregateId::new();
        let id2 = AggregateId::new();

        store.save(id1, 0, vec![make_event(id1, "one")]).await.unwrap();
        store.save(id2, 0, vec![make_event(id2, "two")]).await.unwrap();

        assert_eq!(store.load(id1).await.unwrap().len(), 1);
        assert_eq!(store.load(id2).await.unwrap().len(), 1);
        assert_eq!(store.event_count().await, 2);
    }

    #[tokio::test]
    async fn stored_count_tracks_history_length() {
        let store = InMemoryEventStore::new();
        let id = AggregateId::new();
        assert_eq!(store.stored_count(id).await.unwrap(), 0);

        store
            .append_event(id, 0, make_event(id, "first"))
            .await
            .unwrap();
        assert_eq!(store.stored_count(id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn clear_removes_all_histories() {
        let store = InMemoryEventStore::new();
        let id = AggregateId::new();
        store.save(id, 0, vec![make_event(id, "first")]).await.unwrap();

        store.clear().await;

        assert_eq!(store.event_count().await, 0);
        assert!(store.load(id).await.unwrap().is_empty());
    }
}
