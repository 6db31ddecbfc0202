//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external libraries:
//! - `chacha`: ChaCha20 Gaussian noise for the bootstrap interval
//! - `json_store`: JSON file persistence of the input snapshot
//! - `redact`: Identifier redaction for log output

pub mod chacha;
pub mod json_store;
pub mod redact;

// Re-export storage error for lib.rs
pub use json_store::StorageError;
