//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application.

pub mod diagnostics;
mod prognosis;
pub mod sensitivity;
pub mod uncertainty;

pub use diagnostics::{run_checks, CheckResult};
pub use prognosis::{PrognosisService, TRAJECTORY_HALF_WINDOW};
pub use sensitivity::{compute_sensitivity, SensitivityInput};
pub use uncertainty::{compute_interval, DEFAULT_TRIALS};
