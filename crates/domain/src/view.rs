//! View trait for derived read state.

use std::any::Any;

use common::AggregateId;

/// Latest derived read state for one aggregate.
///
/// Views are disposable: they hold no history, are overwritten wholesale on
/// each save and can always be rebuilt from the event log. The view store
/// keys them by `(runtime type, aggregate id)`.
pub trait View: Any + Send + Sync {
    /// The aggregate this view is derived for.
    fn aggregate_id(&self) -> AggregateId;

    /// View name, used for logging.
    fn view_type(&self) -> &'static str;
}
