//! # ADL Prognosis
//!
//! Post-stroke functional recovery and home-discharge estimation engine.
//!
//! This crate provides:
//! - Log-linear recovery-curve projection from two functional-score measurements
//! - Per-item ADL milestone attainment probabilities
//! - Home-discharge probability with a bootstrap interval
//! - Sensitivity analysis and counterfactual scenarios
//!
//! Not a medical device. All coefficients are illustrative.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types and the pure numeric models
//! - `ports`: Trait definitions for randomness and persistence
//! - `adapters`: Concrete implementations (ChaCha20 noise, JSON file store, log redaction)
//! - `application`: Use cases orchestrating domain and ports
//! - `report`: Plain-text presentation

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;
pub mod report;

pub use application::{
    compute_interval, compute_sensitivity, run_checks, PrognosisService, SensitivityInput,
};
pub use domain::{
    compute_discharge_probability, compute_item_attainments, estimate_rate, project_score,
    Assessment, Covariates, DecisionBucket, MeasurementPair, ModelConfig, Prognosis,
};

/// Result type for prognosis operations
pub type Result<T> = std::result::Result<T, PrognosisError>;

/// Main error type for the prognosis engine
///
/// Numeric input never produces an error; see the crate docs on non-finite
/// propagation.
#[derive(Debug, thiserror::Error)]
pub enum PrognosisError {
    #[error("Configuration error: {0}")]
    Config(#[from] domain::ConfigError),

    #[error("Storage operation failed: {0}")]
    Storage(#[from] adapters::StorageError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
