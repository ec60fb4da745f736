//! In-process message bus routing commands and events between handlers.
//!
//! The bus holds one FIFO queue for all pending messages and drains it from
//! a single logical thread of control: a `send`/`publish` on an idle bus
//! drains until the queue is empty, while a reentrant call from inside a
//! running handler or listener only enqueues and returns. Dispatch
//! therefore never recurses, stack depth stays bounded, and arrival order
//! is preserved across reentrant calls.

pub mod bus;
pub mod error;

pub use bus::{CommandHandler, EventListener, MessageBus};
pub use error::{CallbackError, DispatchError, Result};
