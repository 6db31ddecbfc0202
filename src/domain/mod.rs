//! Domain layer: Core prognosis types and pure models.
//!
//! Everything in this module is deterministic and free of I/O. Failures are
//! signalled by non-finite values, never by panics.

mod attainment;
pub mod config;
mod covariates;
mod discharge;
pub mod input;
pub mod math;
mod outcome;
mod recovery;

pub use attainment::{
    attainment_probability, compute_item_attainments, threshold_shift, ItemAttainment,
};
pub use config::{
    ConfigError, DecisionThresholds, DeficitWeights, DischargeCoefficients, DischargeModel,
    ExplorationPreset, ItemModel, ItemSpec, ModelConfig,
};
pub use covariates::{
    Covariates, DeficitFlags, DeficitMagnitudes, HemiparesisSide, MrsBand, Nihss, NihssBand,
};
pub use discharge::{
    compute_discharge_probability, discharge_probability_with_band, linear_predictor,
    LinearPredictor,
};
pub use input::{Assessment, ModelSettings};
pub use outcome::{
    DecisionBucket, DischargeInterval, MinimumDelta, MinimumDeltaNote, Prognosis, Scenario,
    ScenarioId, SensitivityReport,
};
pub use recovery::{estimate_rate, project_score, trajectory, MeasurementPair, TrajectoryPoint};
