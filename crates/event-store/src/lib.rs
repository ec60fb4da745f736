//! Per-aggregate append-only event log with optimistic concurrency control.
//!
//! The [`EventStore`] port exposes two operations: [`EventStore::load`]
//! returns an aggregate's full event history in append order, and
//! [`EventStore::save`] appends new events only when the caller's expected
//! count matches the stored count, failing with a concurrency conflict
//! otherwise. [`InMemoryEventStore`] is the embedded adapter for tests and
//! single-process use.

pub mod error;
pub mod memory;
pub mod store;

pub use common::AggregateId;
pub use error::{EventStoreError, Result};
pub use memory::InMemoryEventStore;
pub use store::{EventStore, EventStoreExt};
