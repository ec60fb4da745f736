//! Domain language for the CQRS runtime.
//!
//! This crate provides the vocabulary shared by the event log, the view
//! store and the message bus:
//! - [`DomainObject`] and the structural-identity kernel
//!   ([`identity_eq`], [`identity_hash`])
//! - [`Command`] and [`DomainEvent`] message traits
//! - [`View`] trait for derived read state

pub mod identity;
pub mod message;
pub mod view;

pub use identity::{DomainObject, IdentityComponent, identity_eq, identity_hash};
pub use message::{Command, DomainEvent};
pub use view::View;
