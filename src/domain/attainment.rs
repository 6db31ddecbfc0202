//! Item-attainment model.
//!
//! Each ADL milestone has a base threshold on the functional scale. Deficits
//! shift that threshold upward; the attainment probability is a logistic
//! function of the distance between the projected score and the shifted threshold.

use serde::{Deserialize, Serialize};

use super::config::{DeficitWeights, ItemModel};
use super::covariates::{Covariates, DeficitMagnitudes};
use super::math::{is_tie, logistic};

/// Attainment estimate for one milestone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAttainment {
    pub key: String,
    pub label: String,
    pub base_threshold: f64,
    /// Base threshold plus the deficit shift
    pub adjusted_threshold: f64,
    /// Probability of attaining the milestone at the projected score
    pub probability: f64,
    /// Probability sits on the 50% line (display emphasis)
    pub is_tie: bool,
}

/// Score points added to an item threshold by the patient's deficits.
#[must_use]
pub fn threshold_shift(
    weights: &DeficitWeights,
    scales: &DeficitWeights,
    magnitudes: &DeficitMagnitudes,
) -> f64 {
    scales.neglect * weights.neglect * magnitudes.neglect
        + scales.aphasia * weights.aphasia * magnitudes.aphasia
        + scales.apraxia * weights.apraxia * magnitudes.apraxia
}

/// `logistic(k * (score - threshold))`, `NaN` for a non-finite score.
#[inline]
#[must_use]
pub fn attainment_probability(score: f64, threshold: f64, k: f64) -> f64 {
    if score.is_finite() {
        logistic(k * (score - threshold))
    } else {
        f64::NAN
    }
}

/// Attainment probabilities for every configured item.
///
/// Sorted ascending by probability, so the least likely milestones come first.
/// A non-finite projected score yields an empty list.
#[must_use]
pub fn compute_item_attainments(
    projected_score: f64,
    covariates: &Covariates,
    model: &ItemModel,
    k: f64,
) -> Vec<ItemAttainment> {
    if !projected_score.is_finite() {
        return Vec::new();
    }

    let magnitudes = covariates.deficit_magnitudes();

    let mut items: Vec<ItemAttainment> = model
        .items
        .iter()
        .map(|item| {
            let adjusted =
                item.base_threshold + threshold_shift(&item.weights, &model.shift_scales, &magnitudes);
            let probability = attainment_probability(projected_score, adjusted, k);
            ItemAttainment {
                key: item.key.clone(),
                label: item.label.clone(),
                base_threshold: item.base_threshold,
                adjusted_threshold: adjusted,
                probability,
                is_tie: is_tie(probability),
            }
        })
        .collect();

    items.sort_by(|a, b| a.probability.total_cmp(&b.probability));
    items
}
