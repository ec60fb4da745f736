use std::any::{Any, TypeId};
use std::sync::Arc;

use async_trait::async_trait;
use common::AggregateId;
use domain::View;

use crate::Result;

/// Core trait for view store implementations.
///
/// A view store holds the latest derived read state per
/// `(view type, aggregate id)` key. It makes no ordering guarantee between
/// concurrent saves for the same key beyond "the call that physically
/// completes last is retained"; callers needing deterministic ordering must
/// serialize externally.
#[async_trait]
pub trait ViewStore: Send + Sync {
    /// Returns the stored view for the key, or `None` if absent.
    async fn load(
        &self,
        view_type: TypeId,
        aggregate_id: AggregateId,
    ) -> Result<Option<Arc<dyn View>>>;

    /// Upserts the view under its `(runtime type, aggregate id)` key.
    ///
    /// The last write for a key always wins; there is no version check and
    /// no conflict detection.
    async fn save(&self, view: Arc<dyn View>) -> Result<()>;

    /// Removes all stored views.
    ///
    /// Used to reset state between test runs or before a full projection
    /// rebuild.
    async fn clear(&self) -> Result<()>;
}

/// Extension trait providing typed access to view stores.
#[async_trait]
pub trait ViewStoreExt: ViewStore {
    /// Loads a view and downcasts it to its concrete type.
    async fn load_as<V: View>(&self, aggregate_id: AggregateId) -> Result<Option<Arc<V>>> {
        let Some(view) = self.load(TypeId::of::<V>(), aggregate_id).await? else {
            return Ok(None);
        };
        let any: Arc<dyn Any + Send + Sync> = view;
        Ok(any.downcast::<V>().ok())
    }
}

// Blanket implementation for all ViewStore implementations
impl<T: ViewStore + ?Sized> ViewStoreExt for T {}
