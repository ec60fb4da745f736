use thiserror::Error;

/// Error produced by a command handler or event listener callback.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur when dispatching messages.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A command was dequeued with no registered handler. Fatal for this
    /// dispatch cycle; remaining messages stay queued.
    #[error("No command handler registered (command: {command_type})")]
    MissingHandler { command_type: &'static str },

    /// A second handler registration on a bus that already has one. At most
    /// one command handler may exist per bus instance for its lifetime.
    #[error("A command handler is already registered on this bus")]
    DuplicateHandler,

    /// The command handler itself failed while processing a command.
    #[error("Command handler failed for {command_type}")]
    Handler {
        command_type: &'static str,
        #[source]
        source: CallbackError,
    },

    /// An event listener failed while processing an event.
    #[error("Event listener failed for {event_type}")]
    Listener {
        event_type: &'static str,
        #[source]
        source: CallbackError,
    },
}

/// Result type for dispatch operations.
pub type Result<T> = std::result::Result<T, DispatchError>;
