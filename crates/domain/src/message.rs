//! Command and event message traits.

use std::any::Any;

use chrono::{DateTime, Utc};
use common::AggregateId;

use crate::identity::DomainObject;

/// An intent to change one aggregate.
///
/// Commands carry no identity beyond their runtime type and payload; they
/// are routed through the message bus to the single registered handler,
/// which may be rejected by the aggregate's current state.
pub trait Command: Any + Send + Sync {
    /// The aggregate this command targets.
    fn aggregate_id(&self) -> AggregateId;

    /// Command name, in imperative mood. Used for routing diagnostics and
    /// error reporting.
    fn command_type(&self) -> &'static str;
}

/// An immutable fact that occurred for one aggregate.
///
/// Events are value objects: they expose identity components through
/// [`DomainObject`] and are compared structurally. Events for one aggregate
/// form a strictly ordered sequence in the event log; append order is
/// causal order.
pub trait DomainEvent: DomainObject {
    /// The aggregate this event belongs to.
    fn entity_id(&self) -> AggregateId;

    /// When the event was created.
    fn moment(&self) -> DateTime<Utc>;

    /// Event name, in past tense. Used for logging and error reporting.
    fn event_type(&self) -> &'static str;
}
