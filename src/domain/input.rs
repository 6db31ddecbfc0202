//! Raw assessment input, as entered by the user.
//!
//! The input layer is responsible for keeping values inside their ranges
//! before they reach the engine; [`clamp_field`] and
//! [`Assessment::clamp_inputs`] implement that contract. The engine itself only
//! checks finiteness.

use serde::{Deserialize, Serialize};

use super::config::{DecisionThresholds, DeficitWeights, ModelConfig, DEFAULT_ITEM_SLOPE};
use super::covariates::{Covariates, Nihss};
use super::math::{SCORE_MAX, SCORE_MIN};
use super::recovery::MeasurementPair;

/// Recommended minimum spacing between the two measurements.
pub const DEFAULT_MIN_SPACING_DAYS: f64 = 7.0;

/// Result of clamping one input field.
#[derive(Debug, Clone, PartialEq)]
pub struct ClampedField {
    pub value: f64,
    /// "out of range (min–max)" when the input was changed, "not a number"
    /// for `NaN`
    pub message: Option<String>,
}

/// Clamp `value` to `[min, max]`, reporting whether it was out of range.
///
/// `NaN` has no place in the range: it is kept as is (the engine propagates
/// it) and flagged as "not a number". Infinities clamp like any other value.
#[must_use]
pub fn clamp_field(value: f64, min: f64, max: f64) -> ClampedField {
    if value.is_nan() {
        return ClampedField {
            value,
            message: Some("not a number".to_string()),
        };
    }

    let clamped = value.clamp(min, max);
    let message = if clamped == value {
        None
    } else {
        Some(format!("out of range ({min}–{max})"))
    };
    ClampedField {
        value: clamped,
        message,
    }
}

/// User-tunable model settings carried with an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Logistic slope of the item-attainment model
    pub item_slope: f64,
    pub thresholds: DecisionThresholds,
    /// Exploratory deficit weights (-1..=1 each)
    pub exploration: DeficitWeights,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            item_slope: DEFAULT_ITEM_SLOPE,
            thresholds: DecisionThresholds::default(),
            exploration: DeficitWeights::default(),
        }
    }
}

impl ModelSettings {
    /// Settings matching a configuration's tunable fields.
    #[must_use]
    pub fn from_config(config: &ModelConfig) -> Self {
        Self {
            item_slope: config.item_slope,
            thresholds: config.thresholds,
            exploration: config.discharge.exploration,
        }
    }

    /// Apply these settings on top of a base configuration.
    #[must_use]
    pub fn apply_to(&self, base: &ModelConfig) -> ModelConfig {
        base.with_settings(self.item_slope, self.thresholds, self.exploration)
    }
}

/// Complete input snapshot for one evaluation.
///
/// Missing fields deserialize to their defaults, so a snapshot written by an
/// older build still loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assessment {
    pub measurements: MeasurementPair,

    /// Day at which the score is projected
    pub target_day: f64,

    pub covariates: Covariates,

    pub settings: ModelSettings,

    /// Recommended minimum spacing between the measurements, in days
    pub min_spacing_days: f64,
}

impl Default for Assessment {
    fn default() -> Self {
        Self {
            measurements: MeasurementPair::default(),
            target_day: 21.0,
            covariates: Covariates::default(),
            settings: ModelSettings::default(),
            min_spacing_days: DEFAULT_MIN_SPACING_DAYS,
        }
    }
}

impl Assessment {
    /// Default inputs with the tunable settings taken from `config`.
    #[must_use]
    pub fn for_config(config: &ModelConfig) -> Self {
        Self {
            settings: ModelSettings::from_config(config),
            ..Self::default()
        }
    }

    /// Whether the measurements are at least the recommended spacing apart.
    #[must_use]
    pub fn has_min_spacing(&self) -> bool {
        self.measurements.spacing_days() >= self.min_spacing_days
    }

    /// Set the lives-alone flag, keeping the household size consistent.
    pub fn set_lives_alone(&mut self, alone: bool) {
        self.covariates.lives_alone = alone;
        if alone {
            self.covariates.household_size = 1;
        } else if self.covariates.household_size < 2 {
            self.covariates.household_size = 2;
        }
    }

    /// Clamp every bounded field into range.
    ///
    /// Returns one `"field: message"` entry per clamped field.
    pub fn clamp_inputs(&mut self) -> Vec<String> {
        let mut messages = Vec::new();
        let mut apply = |name: &str, slot: &mut f64, min: f64, max: f64| {
            let clamped = clamp_field(*slot, min, max);
            if let Some(msg) = clamped.message {
                messages.push(format!("{name}: {msg}"));
            }
            *slot = clamped.value;
        };

        apply("score_a", &mut self.measurements.score_a, SCORE_MIN, SCORE_MAX);
        apply("score_b", &mut self.measurements.score_b, SCORE_MIN, SCORE_MAX);
        apply("age", &mut self.covariates.age, 18.0, 120.0);

        let w = &mut self.settings.exploration;
        apply("w_neglect", &mut w.neglect, -1.0, 1.0);
        apply("w_aphasia", &mut w.aphasia, -1.0, 1.0);
        apply("w_apraxia", &mut w.apraxia, -1.0, 1.0);

        if let Nihss::Score(s) = self.covariates.nihss {
            if s > Nihss::MAX {
                messages.push(format!("nihss: out of range (0–{})", Nihss::MAX));
                self.covariates.nihss = Nihss::Score(Nihss::MAX);
            }
        }
        if self.covariates.premorbid_mrs > 6 {
            messages.push("premorbid_mrs: out of range (0–6)".to_string());
            self.covariates.premorbid_mrs = 6;
        }
        if self.covariates.household_size < 1 {
            messages.push("household_size: out of range (1–)".to_string());
            self.covariates.household_size = 1;
        }

        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_field() {
        assert_eq!(clamp_field(-5.0, 0.0, 6.0).value, 0.0);
        assert_eq!(clamp_field(9.0, 0.0, 6.0).value, 6.0);

        let inside = clamp_field(3.0, 0.0, 6.0);
        assert_eq!(inside.value, 3.0);
        assert!(inside.message.is_none());

        let outside = clamp_field(95.0, 0.0, 91.0);
        assert_eq!(outside.message.as_deref(), Some("out of range (0–91)"));

        assert_eq!(clamp_field(f64::INFINITY, 0.0, 91.0).value, 91.0);
    }

    #[test]
    fn test_clamp_field_flags_nan() {
        let nan = clamp_field(f64::NAN, 0.0, 91.0);
        assert!(nan.value.is_nan());
        assert_eq!(nan.message.as_deref(), Some("not a number"));

        let mut a = Assessment::default();
        a.covariates.age = f64::NAN;
        assert_eq!(a.clamp_inputs(), vec!["age: not a number".to_string()]);
        assert!(a.covariates.age.is_nan());
    }

    #[test]
    fn test_for_config_takes_tunable_settings() {
        let config = ModelConfig::default().with_settings(
            0.2,
            DecisionThresholds {
                home_high: 0.8,
                nonhome_low: 0.2,
            },
            DeficitWeights::default(),
        );
        let a = Assessment::for_config(&config);
        assert_eq!(a.settings.item_slope, 0.2);
        assert_eq!(a.settings.thresholds.home_high, 0.8);
        assert_eq!(a.measurements, Assessment::default().measurements);
    }

    #[test]
    fn test_partial_snapshot_fills_defaults() {
        let json = r#"{"target_day": 30.0, "covariates": {"age": 82.0}}"#;
        let a: Assessment = serde_json::from_str(json).expect("partial assessment");
        assert_eq!(a.target_day, 30.0);
        assert_eq!(a.covariates.age, 82.0);
        assert_eq!(a.covariates.household_size, Covariates::default().household_size);
        assert_eq!(a.measurements, MeasurementPair::default());
        assert_eq!(a.settings, ModelSettings::default());
    }

    #[test]
    fn test_default_assessment() {
        let a = Assessment::default();
        assert_eq!(a.measurements, MeasurementPair::new(7.0, 30.0, 14.0, 45.0));
        assert_eq!(a.target_day, 21.0);
        assert!(a.has_min_spacing());
        assert!(a.covariates.is_household_consistent());
    }

    #[test]
    fn test_set_lives_alone_syncs_household() {
        let mut a = Assessment::default();
        a.set_lives_alone(true);
        assert_eq!(a.covariates.household_size, 1);
        assert!(a.covariates.is_household_consistent());

        a.set_lives_alone(false);
        assert_eq!(a.covariates.household_size, 2);
        assert!(a.covariates.is_household_consistent());
    }

    #[test]
    fn test_clamp_inputs_reports_fields() {
        let mut a = Assessment::default();
        a.measurements.score_b = 120.0;
        a.covariates.age = 12.0;
        a.covariates.nihss = Nihss::Score(50);
        a.covariates.premorbid_mrs = 9;

        let messages = a.clamp_inputs();
        assert_eq!(messages.len(), 4);
        assert_eq!(a.measurements.score_b, 91.0);
        assert_eq!(a.covariates.age, 18.0);
        assert_eq!(a.covariates.nihss, Nihss::Score(42));
        assert_eq!(a.covariates.premorbid_mrs, 6);
        assert!(messages[0].starts_with("score_b"));
    }

    #[test]
    fn test_settings_roundtrip_through_config() {
        let base = ModelConfig::default();
        let settings = ModelSettings::from_config(&base);
        assert_eq!(settings.apply_to(&base), base);
    }
}
