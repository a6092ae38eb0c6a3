//! Request lifecycle management for oracle randomness: who may request,
//! which requests are in flight, when they expire, and how fulfillment
//! callbacks are routed back to the requesting component.
#![deny(
    unused,
    warnings,
    future_incompatible,
    nonstandard_style,
    rust_2018_idioms,
    missing_docs,
    unused_imports
)]
#![forbid(unsafe_code)]

/// Addresses, request records, registry entries and process-wide config
mod types;
pub use types::*;

/// Coordinator boundary
mod coordinator;
pub use coordinator::*;

/// Requester boundary: consumer trait, callback routing, manager gate
mod requester;
pub use requester::*;

/// The request state machine
mod manager;
pub use manager::*;

/// Error handling
mod error;
pub use error::Error;

/// Observability events
mod events;
pub use events::*;
