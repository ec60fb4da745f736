use std::any::{Any, TypeId};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use domain::{Command, DomainEvent};
use futures_core::future::BoxFuture;
use tokio::sync::Mutex;

use crate::error::{CallbackError, DispatchError, Result};

/// The single handler invoked for every dequeued command.
pub type CommandHandler =
    Arc<dyn Fn(Arc<dyn Command>) -> BoxFuture<'static, std::result::Result<(), CallbackError>> + Send + Sync>;

/// A listener invoked for every dequeued event of its registered type.
pub type EventListener =
    Arc<dyn Fn(Arc<dyn DomainEvent>) -> BoxFuture<'static, std::result::Result<(), CallbackError>> + Send + Sync>;

enum Message {
    Command(Arc<dyn Command>),
    Event(Arc<dyn DomainEvent>),
}

#[derive(Default)]
struct BusState {
    /// True while a drain loop is running somewhere above us on the stack
    /// (or on another task). Producers seeing this flag only enqueue.
    dispatching: bool,
    queue: VecDeque<Message>,
    command_handler: Option<CommandHandler>,
    event_listeners: HashMap<TypeId, Vec<EventListener>>,
}

/// In-process message bus for commands and events.
///
/// Commands are routed to the single registered handler; events fan out to
/// every listener registered for their runtime type. One FIFO queue holds
/// all pending messages in arrival order, and only one message is ever in
/// flight through a callback at a time, even when callbacks suspend or call
/// back into the bus.
///
/// If a callback fails mid-drain the error surfaces from the
/// `send`/`publish` call that was draining; messages still queued behind
/// the failing one stay queued and are drained by the next successful
/// `send` or `publish`.
#[derive(Default)]
pub struct MessageBus {
    state: Mutex<BusState>,
}

impl MessageBus {
    /// Creates a new bus with no handler and no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the handler invoked for every dispatched command.
    ///
    /// Fails with [`DispatchError::DuplicateHandler`] if a handler is
    /// already installed; a bus carries at most one for its lifetime.
    pub async fn register_command_handler(&self, handler: CommandHandler) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.command_handler.is_some() {
            return Err(DispatchError::DuplicateHandler);
        }
        state.command_handler = Some(handler);
        Ok(())
    }

    /// Registers `listener` for every dispatched event whose runtime type
    /// equals `event_type`.
    ///
    /// Registering the same listener reference (same `Arc`) twice for the
    /// same type is a no-op; distinct listeners for one type are invoked in
    /// registration order.
    pub async fn listen(&self, event_type: TypeId, listener: EventListener) {
        let mut state = self.state.lock().await;
        let listeners = state.event_listeners.entry(event_type).or_default();
        if listeners.iter().any(|known| Arc::ptr_eq(known, &listener)) {
            return;
        }
        listeners.push(listener);
    }

    /// Registers `listener` for events of type `E`.
    pub async fn listen_to<E: DomainEvent>(&self, listener: EventListener) {
        self.listen(TypeId::of::<E>(), listener).await;
    }

    /// Enqueues the command and, if the bus is idle, drains the queue
    /// before returning.
    ///
    /// On an idle bus the handler runs exactly once, synchronously with
    /// respect to this call. From inside a running callback the command is
    /// only enqueued; the outer drain loop picks it up in FIFO order.
    pub async fn send(&self, command: Arc<dyn Command>) -> Result<()> {
        tracing::debug!(
            command_type = command.command_type(),
            aggregate_id = %command.aggregate_id(),
            "command accepted"
        );
        self.enqueue(Message::Command(command)).await
    }

    /// Enqueues the event and, if the bus is idle, drains the queue before
    /// returning. Reentrant calls only enqueue, exactly like [`send`](Self::send).
    pub async fn publish(&self, event: Arc<dyn DomainEvent>) -> Result<()> {
        tracing::debug!(
            event_type = event.event_type(),
            aggregate_id = %event.entity_id(),
            "event published"
        );
        self.enqueue(Message::Event(event)).await
    }

    async fn enqueue(&self, message: Message) -> Result<()> {
        {
            let mut state = self.state.lock().await;
            state.queue.push_back(message);
            if state.dispatching {
                // A drain loop is already running; it will reach this
                // message once the current one finishes.
                return Ok(());
            }
            state.dispatching = true;
        }
        self.drain().await
    }

    /// Processes queued messages one at a time until the queue is empty.
    ///
    /// The state lock is held only to pop; it is never held across a
    /// callback await, so callbacks are free to call back into the bus.
    async fn drain(&self) -> Result<()> {
        loop {
            let message = {
                let mut state = self.state.lock().await;
                match state.queue.pop_front() {
                    Some(message) => message,
                    None => {
                        state.dispatching = false;
                        return Ok(());
                    }
                }
            };

            if let Err(err) = self.dispatch(message).await {
                // Remaining messages stay queued; the next send/publish
                // drains them.
                self.state.lock().await.dispatching = false;
                return Err(err);
            }
        }
    }

    async fn dispatch(&self, message: Message) -> Result<()> {
        metrics::counter!("bus_messages_dispatched_total").increment(1);
        match message {
            Message::Command(command) => {
                let command_type = command.command_type();
                let handler = self.state.lock().await.command_handler.clone();
                let Some(handler) = handler else {
                    return Err(DispatchError::MissingHandler { command_type });
                };
                tracing::trace!(command_type, "dispatching command");
                handler(command)
                    .await
                    .map_err(|source| DispatchError::Handler {
                        command_type,
                        source,
                    })
            }
            Message::Event(event) => {
                let event_type = event.event_type();
                let type_id = {
                    let any: &dyn Any = &*event;
                    any.type_id()
                };
                // Snapshot the list so registrations made by a listener
                // apply to later events only.
                let listeners = {
                    let state = self.state.lock().await;
                    state
                        .event_listeners
                        .get(&type_id)
                        .cloned()
                        .unwrap_or_default()
                };
                tracing::trace!(event_type, listeners = listeners.len(), "dispatching event");
                for listener in listeners {
                    listener(Arc::clone(&event))
                        .await
                        .map_err(|source| DispatchError::Listener { event_type, source })?;
                }
                Ok(())
            }
        }
    }
}
