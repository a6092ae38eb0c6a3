//! ECVRF over secp256k1 with an on-chain verifiable proof encoding.
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

/// EC-VRF engine: key material, cipher suites, prove and verify
mod ecvrf;
pub use ecvrf::*;

/// On-chain optimized proof encoding
mod contract;
pub use contract::ContractProof;

/// EC-VRF error handling
pub mod error;

/// Extended Affine, Jacobian, Scalar, Field
pub mod extends;

/// Curve hash
pub mod hash;

/// Helper functions
pub mod helper;

/// Re-export libsecp256k1
pub mod secp256k1 {
    pub use libsecp256k1::*;
}

/// Re-export rand::thread_rng
pub mod util {
    pub use rand::thread_rng;
}
