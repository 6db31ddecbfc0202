//! Engine outputs: decision buckets, intervals and sensitivity results.

use serde::{Deserialize, Serialize};

use super::attainment::ItemAttainment;
use super::config::DecisionThresholds;
use super::recovery::TrajectoryPoint;

/// Decision classification of a discharge probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionBucket {
    /// At or above the home-high threshold
    Home,
    /// At or below the nonhome-low threshold
    NonHome,
    /// Between the two thresholds
    Uncertain,
    /// Probability could not be computed
    Unknown,
}

impl DecisionBucket {
    /// Classify a probability against the dual thresholds.
    #[must_use]
    pub fn classify(p: f64, low: f64, high: f64) -> Self {
        if !p.is_finite() {
            Self::Unknown
        } else if p >= high {
            Self::Home
        } else if p <= low {
            Self::NonHome
        } else {
            Self::Uncertain
        }
    }

    #[must_use]
    pub fn from_thresholds(p: f64, thresholds: &DecisionThresholds) -> Self {
        Self::classify(p, thresholds.nonhome_low, thresholds.home_high)
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Home => "High confidence - home discharge",
            Self::NonHome => "High confidence - discharge to another setting",
            Self::Uncertain => "Undetermined - between decision thresholds",
            Self::Unknown => "Cannot compute - check the measurement interval",
        }
    }
}

impl std::fmt::Display for DecisionBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Home => write!(f, "home"),
            Self::NonHome => write!(f, "nonhome"),
            Self::Uncertain => write!(f, "uncertain"),
            Self::Unknown => write!(f, "—"),
        }
    }
}

/// Resampled interval around the discharge probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DischargeInterval {
    /// Noiseless discharge probability
    pub point_estimate: f64,
    /// 5th percentile of the trial probabilities
    pub low: f64,
    /// 95th percentile of the trial probabilities
    pub high: f64,
    pub trial_count: usize,
}

impl DischargeInterval {
    #[must_use]
    pub fn contains_point(&self) -> bool {
        self.low <= self.point_estimate && self.point_estimate <= self.high
    }
}

/// Annotation of a minimum-delta result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinimumDeltaNote {
    None,
    /// Baseline probability unavailable
    NotComputed,
    /// Already at or above the home-high threshold
    AlreadyHome,
    /// Required score lies above the scale maximum
    CeilingExceeded,
}

impl std::fmt::Display for MinimumDeltaNote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::NotComputed => write!(f, "not computed"),
            Self::AlreadyHome => write!(f, "already high-confidence home"),
            Self::CeilingExceeded => write!(f, "beyond the scale ceiling; unlikely to be reached"),
        }
    }
}

/// Score gain needed to reach the home-high threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinimumDelta {
    /// Additional score points needed; `NaN` when not computed
    pub needed: f64,
    /// Additional days at the current recovery rate, when convertible
    pub days: Option<u64>,
    pub note: MinimumDeltaNote,
}

/// Identifier of a counterfactual scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioId {
    ScorePlus5,
    ScoreMinus5,
    ToCohabiting,
    ToAlone,
    StairsRemoved,
    StairsPresent,
    AgePlus5,
    AgeMinus5,
}

impl ScenarioId {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::ScorePlus5 => "Score +5",
            Self::ScoreMinus5 => "Score -5",
            Self::ToCohabiting => "Alone -> cohabiting (added support)",
            Self::ToAlone => "Cohabiting -> alone",
            Self::StairsRemoved => "Stairs -> none (route change / adaptation)",
            Self::StairsPresent => "Stairs -> present",
            Self::AgePlus5 => "Age +5 (explanatory)",
            Self::AgeMinus5 => "Age -5 (explanatory)",
        }
    }

    /// Whether the change can be influenced by an intervention.
    #[must_use]
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Self::AgePlus5 | Self::AgeMinus5)
    }
}

/// One evaluated counterfactual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: ScenarioId,
    pub label: String,
    pub probability: f64,
    /// Scenario probability minus baseline probability
    pub delta: f64,
    pub actionable: bool,
}

/// Sensitivity bundle for one prognosis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityReport {
    pub bucket: DecisionBucket,
    /// Bucket unchanged across the NIHSS range; `None` when NIHSS is known
    pub nih_robust: Option<bool>,
    /// Bucket unchanged under +/-2 points of measurement error
    pub measurement_robust: bool,
    pub minimum_delta: MinimumDelta,
    /// Sorted by descending delta
    pub scenarios: Vec<Scenario>,
}

impl SensitivityReport {
    /// The actionable scenario with the largest probability gain.
    #[must_use]
    pub fn most_effective_lever(&self) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.actionable)
    }
}

/// Complete output of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prognosis {
    /// Log-linear recovery rate; `NaN` for an invalid interval
    pub recovery_rate: f64,

    /// Projection before clamping
    pub raw_projection: f64,

    /// Projection clamped to the functional scale
    pub projected_score: f64,

    pub discharge_probability: f64,

    /// Least likely milestones first
    pub items: Vec<ItemAttainment>,

    pub interval: Option<DischargeInterval>,

    pub sensitivity: SensitivityReport,

    pub trajectory: Vec<TrajectoryPoint>,

    /// Configuration problems surfaced to the caller
    pub warnings: Vec<String>,

    pub computed_at: chrono::DateTime<chrono::Utc>,
}

impl Prognosis {
    /// Whether the measurement interval produced a usable projection.
    #[must_use]
    pub fn is_computable(&self) -> bool {
        self.recovery_rate.is_finite() && self.projected_score.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_classification() {
        assert_eq!(DecisionBucket::classify(0.95, 0.1, 0.9), DecisionBucket::Home);
        assert_eq!(DecisionBucket::classify(0.90, 0.1, 0.9), DecisionBucket::Home);
        assert_eq!(DecisionBucket::classify(0.10, 0.1, 0.9), DecisionBucket::NonHome);
        assert_eq!(DecisionBucket::classify(0.5, 0.1, 0.9), DecisionBucket::Uncertain);
        assert_eq!(DecisionBucket::classify(f64::NAN, 0.1, 0.9), DecisionBucket::Unknown);
    }

    #[test]
    fn test_scenario_actionability() {
        assert!(ScenarioId::ScorePlus5.is_actionable());
        assert!(ScenarioId::StairsRemoved.is_actionable());
        assert!(!ScenarioId::AgePlus5.is_actionable());
        assert!(!ScenarioId::AgeMinus5.is_actionable());
    }

    #[test]
    fn test_most_effective_lever_skips_explanatory() {
        let scenario = |id: ScenarioId, delta: f64| Scenario {
            id,
            label: id.label().to_string(),
            probability: 0.5 + delta,
            delta,
            actionable: id.is_actionable(),
        };
        let report = SensitivityReport {
            bucket: DecisionBucket::Uncertain,
            nih_robust: None,
            measurement_robust: true,
            minimum_delta: MinimumDelta {
                needed: 3.0,
                days: Some(4),
                note: MinimumDeltaNote::None,
            },
            scenarios: vec![
                scenario(ScenarioId::AgeMinus5, 0.08),
                scenario(ScenarioId::ScorePlus5, 0.06),
                scenario(ScenarioId::ScoreMinus5, -0.07),
            ],
        };
        assert_eq!(
            report.most_effective_lever().map(|s| s.id),
            Some(ScenarioId::ScorePlus5)
        );
    }
}
