//! Model configuration: item thresholds, deficit weights, discharge
//! coefficients and decision thresholds.
//!
//! All coefficients are illustrative defaults for education and discussion.
//! They are not statistically validated or calibrated.
//!
//! A [`ModelConfig`] is an immutable value passed into every engine call; the
//! engine never reads ambient configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Minimum gap between the home-high and nonhome-low thresholds.
pub const MIN_THRESHOLD_GAP: f64 = 0.20;

/// Default logistic slope of the item-attainment model.
pub const DEFAULT_ITEM_SLOPE: f64 = 0.12;

/// Errors raised while building or loading a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Decision thresholds out of order: nonhome-low {low} must be below home-high {high}")]
    ThresholdOrder { low: f64, high: f64 },

    #[error("Decision threshold gap {gap:.2} is below the required 0.20")]
    ThresholdGap { gap: f64 },

    #[error("Decision threshold {0} is outside (0, 1)")]
    ThresholdRange(f64),

    #[error("Item slope must be finite and positive, got {0}")]
    InvalidItemSlope(f64),

    #[error("Expected 13 items, got {0}")]
    ItemCount(usize),

    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration format: {0}")]
    Format(#[from] serde_json::Error),
}

/// A (neglect, aphasia, apraxia) triple.
///
/// Used for per-item influence weights, threshold-shift scales and the
/// exploratory discharge weights.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DeficitWeights {
    pub neglect: f64,
    pub aphasia: f64,
    pub apraxia: f64,
}

impl DeficitWeights {
    #[must_use]
    pub const fn new(neglect: f64, aphasia: f64, apraxia: f64) -> Self {
        Self {
            neglect,
            aphasia,
            apraxia,
        }
    }
}

/// One ADL milestone of the functional scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSpec {
    /// Stable identifier
    pub key: String,

    /// Display label
    pub label: String,

    /// Score at which attainment probability is 50% without deficits
    pub base_threshold: f64,

    /// Influence of each deficit on this item's threshold
    pub weights: DeficitWeights,
}

/// (key, label, base threshold, neglect, aphasia, apraxia), hardest first.
const DEFAULT_ITEMS: [(&str, &str, f64, f64, f64, f64); 13] = [
    ("stairs", "Stairs", 89.2, 0.2, 2.5, 0.6),
    ("tub_transfer", "Tub/shower transfer", 80.0, 0.4, 1.6, 1.2),
    ("walk", "Locomotion (walk/wheelchair)", 74.2, 0.2, 2.8, 0.4),
    ("dress_upper", "Dressing - upper body", 73.6, 1.1, 0.4, 1.2),
    ("bathing", "Bathing", 70.3, 0.5, 1.0, 0.9),
    ("toilet_transfer", "Toilet transfer", 65.9, 0.3, 1.1, 0.7),
    ("bed_chair_transfer", "Bed/chair transfer", 65.5, 0.2, 1.1, 0.6),
    ("dress_lower", "Dressing - lower body", 64.5, 0.7, 0.5, 1.4),
    ("toileting", "Toileting", 62.0, 0.5, 0.6, 0.3),
    ("grooming", "Grooming", 51.0, 1.3, 0.2, 0.6),
    ("bladder", "Bladder management", 43.4, 0.2, 0.1, 0.1),
    ("bowel", "Bowel management", 42.2, 0.2, 0.1, 0.1),
    ("eating", "Eating", 34.1, 0.9, 0.1, 0.2),
];

/// Item table plus the deficit-to-threshold shift scales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemModel {
    pub items: Vec<ItemSpec>,

    /// Score points added per unit of weighted deficit magnitude
    pub shift_scales: DeficitWeights,
}

impl Default for ItemModel {
    fn default() -> Self {
        let items = DEFAULT_ITEMS
            .iter()
            .map(|&(key, label, base, neg, aph, apx)| ItemSpec {
                key: key.to_string(),
                label: label.to_string(),
                base_threshold: base,
                weights: DeficitWeights::new(neg, aph, apx),
            })
            .collect();

        Self {
            items,
            shift_scales: DeficitWeights::new(12.0, 8.0, 10.0),
        }
    }
}

/// NIHSS band offsets on the linear predictor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NihssOffsets {
    pub low: f64,
    pub mid: f64,
    pub high: f64,
}

/// Pre-morbid mRS band offsets on the linear predictor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MrsOffsets {
    pub up_to_two: f64,
    pub three: f64,
    pub four: f64,
    pub five_or_more: f64,
}

/// Coefficients of the home-discharge logistic model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DischargeCoefficients {
    pub intercept: f64,
    /// Per point of projected functional score
    pub score: f64,
    /// Per decade of age, centred at 75
    pub age: f64,
    /// Applied when household size <= 1
    pub alone: f64,
    /// Per household member beyond the patient
    pub household: f64,
    pub stairs: f64,
    pub nihss: NihssOffsets,
    pub mrs: MrsOffsets,
}

impl Default for DischargeCoefficients {
    fn default() -> Self {
        Self {
            intercept: -3.0,
            score: 0.068,
            age: -0.724,
            alone: -0.82,
            household: 0.64,
            stairs: -0.3,
            nihss: NihssOffsets {
                low: 0.0,
                mid: -0.6,
                high: -1.2,
            },
            mrs: MrsOffsets {
                up_to_two: 0.0,
                three: -0.4,
                four: -0.8,
                five_or_more: -1.2,
            },
        }
    }
}

/// Presets for the exploratory deficit weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplorationPreset {
    /// No deficit influence on discharge
    Strict,
    /// Fixed reference values
    Reference,
    /// Half of the reference values
    Weak,
}

impl ExplorationPreset {
    #[must_use]
    pub fn weights(&self) -> DeficitWeights {
        match self {
            Self::Strict => DeficitWeights::new(0.0, 0.0, 0.0),
            Self::Reference => DeficitWeights::new(-0.4, -0.2, -0.2),
            Self::Weak => DeficitWeights::new(-0.2, -0.1, -0.1),
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(Self::Strict),
            "reference" | "fixed" => Some(Self::Reference),
            "weak" => Some(Self::Weak),
            _ => None,
        }
    }
}

/// Discharge model: fixed coefficients plus exploratory deficit weights.
///
/// The exploratory weights are added to the linear predictor when the
/// matching deficit is present. They are not empirically validated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DischargeModel {
    pub coefficients: DischargeCoefficients,
    pub exploration: DeficitWeights,
}

impl Default for DischargeModel {
    fn default() -> Self {
        Self {
            coefficients: DischargeCoefficients::default(),
            exploration: ExplorationPreset::Strict.weights(),
        }
    }
}

/// Dual decision thresholds on the discharge probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionThresholds {
    /// Probability at or above which the decision is "home"
    pub home_high: f64,
    /// Probability at or below which the decision is "nonhome"
    pub nonhome_low: f64,
}

impl Default for DecisionThresholds {
    fn default() -> Self {
        Self {
            home_high: 0.90,
            nonhome_low: 0.10,
        }
    }
}

impl DecisionThresholds {
    /// Check ordering, range and the minimum gap.
    ///
    /// # Errors
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for t in [self.nonhome_low, self.home_high] {
            if !(t > 0.0 && t < 1.0) {
                return Err(ConfigError::ThresholdRange(t));
            }
        }
        if self.nonhome_low >= self.home_high {
            return Err(ConfigError::ThresholdOrder {
                low: self.nonhome_low,
                high: self.home_high,
            });
        }
        let gap = self.home_high - self.nonhome_low;
        // Small tolerance so that e.g. 0.6 - 0.4 still counts as 0.20.
        if gap < MIN_THRESHOLD_GAP - 1e-12 {
            return Err(ConfigError::ThresholdGap { gap });
        }
        Ok(())
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub items: ItemModel,

    /// Logistic slope `k` of the item-attainment model
    pub item_slope: f64,

    pub discharge: DischargeModel,

    pub thresholds: DecisionThresholds,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            items: ItemModel::default(),
            item_slope: DEFAULT_ITEM_SLOPE,
            discharge: DischargeModel::default(),
            thresholds: DecisionThresholds::default(),
        }
    }
}

fn env_f64(name: &str) -> Option<f64> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|x| x.is_finite())
}

impl ModelConfig {
    /// Load overrides from environment (best-effort).
    ///
    /// Supported:
    /// - ADL_PROGNOSIS_THR_HIGH
    /// - ADL_PROGNOSIS_THR_LOW
    /// - ADL_PROGNOSIS_ITEM_SLOPE
    /// - ADL_PROGNOSIS_EXPLORATION="strict|reference|weak"
    ///
    /// Unparsable or non-finite values are ignored. Threshold validity is
    /// not enforced here; see [`DecisionThresholds::validate`].
    #[must_use]
    pub fn from_env_or_default() -> Self {
        let mut cfg = Self::default();

        if let Some(x) = env_f64("ADL_PROGNOSIS_THR_HIGH") {
            cfg.thresholds.home_high = x;
        }
        if let Some(x) = env_f64("ADL_PROGNOSIS_THR_LOW") {
            cfg.thresholds.nonhome_low = x;
        }
        if let Some(x) = env_f64("ADL_PROGNOSIS_ITEM_SLOPE").filter(|&x| x > 0.0) {
            cfg.item_slope = x;
        }
        if let Ok(v) = std::env::var("ADL_PROGNOSIS_EXPLORATION") {
            match ExplorationPreset::parse(&v) {
                Some(preset) => cfg.discharge.exploration = preset.weights(),
                None => tracing::warn!("Ignoring unknown exploration preset: {v}"),
            }
        }

        cfg
    }

    /// Load a configuration from a JSON file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read, is malformed, or carries an
    /// item table that is not 13 entries long or a non-positive slope.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read(path)?;
        let cfg: Self = serde_json::from_slice(&content)?;
        cfg.check_structure()?;
        Ok(cfg)
    }

    /// Structural checks that would make the engine meaningless.
    ///
    /// Decision thresholds are not checked here: a bad threshold pair is
    /// a caller warning, not a fault.
    ///
    /// # Errors
    /// Returns the first structural violation.
    pub fn check_structure(&self) -> Result<(), ConfigError> {
        if self.items.items.len() != DEFAULT_ITEMS.len() {
            return Err(ConfigError::ItemCount(self.items.items.len()));
        }
        if !(self.item_slope.is_finite() && self.item_slope > 0.0) {
            return Err(ConfigError::InvalidItemSlope(self.item_slope));
        }
        Ok(())
    }

    /// Copy of this configuration with user-tunable settings replaced.
    #[must_use]
    pub fn with_settings(
        &self,
        item_slope: f64,
        thresholds: DecisionThresholds,
        exploration: DeficitWeights,
    ) -> Self {
        Self {
            item_slope,
            thresholds,
            discharge: DischargeModel {
                exploration,
                ..self.discharge
            },
            ..self.clone()
        }
    }
}
