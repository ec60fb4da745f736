//! Shared identifier types used across the CQRS runtime crates.

pub mod types;

pub use types::AggregateId;
