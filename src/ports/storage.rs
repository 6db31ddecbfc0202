//! Storage port: Trait for persisting the raw input snapshot.
//!
//! Only the uncomputed user input is stored, under one fixed key. Results are
//! always recomputed and never persisted.

use crate::domain::Assessment;

/// Fixed key under which the input snapshot is stored.
pub const SNAPSHOT_KEY: &str = "adl_state_v1";

/// Trait for local snapshot storage.
///
/// All data is stored locally and never transmitted.
pub trait SnapshotStore {
    /// Error type for storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Save the input snapshot, replacing any previous one.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn save(&self, assessment: &Assessment) -> Result<(), Self::Error>;

    /// Load the input snapshot.
    ///
    /// # Returns
    /// `None` if no snapshot is stored.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn load(&self) -> Result<Option<Assessment>, Self::Error>;

    /// Check if a snapshot exists.
    fn exists(&self) -> Result<bool, Self::Error>;

    /// Delete the stored snapshot.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn clear(&self) -> Result<(), Self::Error>;
}
