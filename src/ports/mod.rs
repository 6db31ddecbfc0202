//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the engine and its collaborators (random source, snapshot storage).

mod noise;
mod storage;

pub use noise::NoiseSource;
pub use storage::{SnapshotStore, SNAPSHOT_KEY};
