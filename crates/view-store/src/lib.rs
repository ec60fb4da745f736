//! Latest-state store for projected read models.
//!
//! The [`ViewStore`] port keeps at most one view per
//! `(view type, aggregate id)` key: [`ViewStore::save`] upserts with
//! last-write-wins semantics and no version check — an intentional
//! asymmetry with the event log, since views are disposable and rebuildable
//! while events are the source of truth. [`InMemoryViewStore`] is the
//! embedded adapter.

pub mod error;
pub mod memory;
pub mod store;

pub use common::AggregateId;
pub use error::{Result, ViewStoreError};
pub use memory::InMemoryViewStore;
pub use store::{ViewStore, ViewStoreExt};
