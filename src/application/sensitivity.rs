//! Sensitivity analysis: decision robustness, minimum score gain and
//! counterfactual scenarios around one discharge probability.

use crate::domain::math::{clamp_score, logit, SCORE_MAX};
use crate::domain::{
    discharge_probability_with_band, linear_predictor, Covariates, DecisionBucket,
    MinimumDelta, MinimumDeltaNote, ModelConfig, NihssBand, Scenario, ScenarioId,
    SensitivityReport,
};

/// Score perturbation used by the measurement-robustness check.
pub const MEASUREMENT_ERROR_POINTS: f64 = 2.0;

/// Score step of the score scenarios.
pub const SCORE_SCENARIO_STEP: f64 = 5.0;

/// Age step of the explanatory age scenarios, in years.
pub const AGE_SCENARIO_STEP: f64 = 5.0;

const AGE_MIN: f64 = 18.0;
const AGE_MAX: f64 = 120.0;

/// Inputs of one sensitivity evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensitivityInput {
    /// Clamped projected score
    pub projected_score: f64,
    /// Discharge probability at `projected_score`
    pub baseline_probability: f64,
    /// Recovery rate, used to convert a score gain into days
    pub rate: f64,
    /// Day the projection refers to
    pub target_day: f64,
    /// Include the non-actionable age scenarios
    pub include_age: bool,
}

fn bucket(p: f64, config: &ModelConfig) -> DecisionBucket {
    DecisionBucket::from_thresholds(p, &config.thresholds)
}

fn probability(score: f64, covariates: &Covariates, config: &ModelConfig) -> f64 {
    discharge_probability_with_band(score, covariates, &config.discharge, None)
}

/// Whether the decision survives the full NIHSS range.
///
/// Only meaningful for an unknown NIHSS; `None` otherwise.
fn nihss_robustness(covariates: &Covariates, config: &ModelConfig, score: f64) -> Option<bool> {
    if !covariates.nihss.is_unknown() {
        return None;
    }
    let at = |band| discharge_probability_with_band(score, covariates, &config.discharge, Some(band));
    Some(bucket(at(NihssBand::High), config) == bucket(at(NihssBand::Low), config))
}

fn measurement_robustness(covariates: &Covariates, config: &ModelConfig, input: &SensitivityInput) -> bool {
    let score = input.projected_score;
    let base = bucket(input.baseline_probability, config);
    [-MEASUREMENT_ERROR_POINTS, MEASUREMENT_ERROR_POINTS]
        .iter()
        .all(|d| bucket(probability(clamp_score(score + d), covariates, config), config) == base)
}

/// Score gain needed to reach the home-high threshold.
#[must_use]
pub fn minimum_delta(covariates: &Covariates, config: &ModelConfig, input: &SensitivityInput) -> MinimumDelta {
    let p = input.baseline_probability;
    if !p.is_finite() {
        return MinimumDelta {
            needed: f64::NAN,
            days: None,
            note: MinimumDeltaNote::NotComputed,
        };
    }
    if p >= config.thresholds.home_high {
        return MinimumDelta {
            needed: 0.0,
            days: Some(0),
            note: MinimumDeltaNote::AlreadyHome,
        };
    }

    let score = input.projected_score;
    let slope = config.discharge.coefficients.score;
    let lp = linear_predictor(score, covariates, &config.discharge, None);
    let required = (logit(config.thresholds.home_high) - lp.remainder) / slope;
    let needed = (required - score).max(0.0);

    let days = if input.rate.is_finite() && input.rate > 0.0 && needed > 0.0 {
        let d = (input.target_day * ((needed / input.rate).exp() - 1.0)).round();
        (d.is_finite() && d >= 0.0).then_some(d as u64)
    } else {
        None
    };

    let note = if needed > 0.0 && required > SCORE_MAX {
        MinimumDeltaNote::CeilingExceeded
    } else {
        MinimumDeltaNote::None
    };

    MinimumDelta { needed, days, note }
}

/// Counterfactual scenarios, sorted by descending probability gain.
///
/// A non-finite baseline yields no scenarios.
#[must_use]
pub fn scenarios(covariates: &Covariates, config: &ModelConfig, input: &SensitivityInput) -> Vec<Scenario> {
    let base_p = input.baseline_probability;
    if !base_p.is_finite() {
        return Vec::new();
    }
    let score = input.projected_score;

    let mut variants: Vec<(ScenarioId, f64, Covariates)> = vec![
        (ScenarioId::ScorePlus5, clamp_score(score + SCORE_SCENARIO_STEP), covariates.clone()),
        (ScenarioId::ScoreMinus5, clamp_score(score - SCORE_SCENARIO_STEP), covariates.clone()),
        (
            ScenarioId::ToCohabiting,
            score,
            Covariates {
                lives_alone: false,
                household_size: covariates.household_size.max(2),
                ..covariates.clone()
            },
        ),
        (
            ScenarioId::ToAlone,
            score,
            Covariates {
                lives_alone: true,
                household_size: 1,
                ..covariates.clone()
            },
        ),
        (
            ScenarioId::StairsRemoved,
            score,
            Covariates {
                stairs_at_home: false,
                ..covariates.clone()
            },
        ),
        (
            ScenarioId::StairsPresent,
            score,
            Covariates {
                stairs_at_home: true,
                ..covariates.clone()
            },
        ),
    ];

    if input.include_age {
        for (id, step) in [
            (ScenarioId::AgePlus5, AGE_SCENARIO_STEP),
            (ScenarioId::AgeMinus5, -AGE_SCENARIO_STEP),
        ] {
            let age = (covariates.age + step).clamp(AGE_MIN, AGE_MAX);
            variants.push((
                id,
                score,
                Covariates {
                    age,
                    ..covariates.clone()
                },
            ));
        }
    }

    let mut list: Vec<Scenario> = variants
        .into_iter()
        .map(|(id, s, cov)| {
            let p = probability(s, &cov, config);
            Scenario {
                id,
                label: id.label().to_string(),
                probability: p,
                delta: p - base_p,
                actionable: id.is_actionable(),
            }
        })
        .collect();

    // Stable: equal deltas keep their construction order.
    list.sort_by(|a, b| b.delta.total_cmp(&a.delta));
    list
}

/// Full sensitivity bundle for one prognosis.
#[must_use]
pub fn compute_sensitivity(
    covariates: &Covariates,
    config: &ModelConfig,
    input: &SensitivityInput,
) -> SensitivityReport {
    SensitivityReport {
        bucket: bucket(input.baseline_probability, config),
        nih_robust: nihss_robustness(covariates, config, input.projected_score),
        measurement_robust: measurement_robustness(covariates, config, input),
        minimum_delta: minimum_delta(covariates, config, input),
        scenarios: scenarios(covariates, config, input),
    }
}
