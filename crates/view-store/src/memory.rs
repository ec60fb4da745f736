use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::AggregateId;
use domain::View;
use tokio::sync::RwLock;

use crate::{Result, store::ViewStore};

/// In-memory view store for tests and single-process use.
#[derive(Clone, Default)]
pub struct InMemoryViewStore {
    views: Arc<RwLock<HashMap<(TypeId, AggregateId), Arc<dyn View>>>>,
}

impl InMemoryViewStore {
    /// Creates a new empty in-memory view store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored views.
    pub async fn view_count(&self) -> usize {
        self.views.read().await.len()
    }
}

#[async_trait]
impl ViewStore for InMemoryViewStore {
    #[tracing::instrument(skip(self))]
    async fn load(
        &self,
        view_type: TypeId,
        aggregate_id: AggregateId,
    ) -> Result<Option<Arc<dyn View>>> {
        let views = self.views.read().await;
        Ok(views.get(&(view_type, aggregate_id)).cloned())
    }

    #[tracing::instrument(skip(self, view), fields(view_type = view.view_type()))]
    async fn save(&self, view: Arc<dyn View>) -> Result<()> {
        let view_type = {
            let any: &dyn Any = &*view;
            any.type_id()
        };
        let aggregate_id = view.aggregate_id();
        tracing::debug!(view_type = view.view_type(), %aggregate_id, "view saved");

        let mut views = self.views.write().await;
        views.insert((view_type, aggregate_id), view);
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn clear(&self) -> Result<()> {
        self.views.write().await.clear();
        Ok(())
    }
}
