//! All necessary modules for the oracle node
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

/// JSON RPC
pub mod rpc;

/// Hex encoded proof payloads
pub mod proof;

/// Error handling
mod error;
pub use error::Error;

mod quick_response;
pub use quick_response::*;

mod node_context;
pub use node_context::*;
