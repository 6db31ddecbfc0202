//! Bootstrap interval around the discharge probability.
//!
//! Each trial perturbs the projected score and the exploratory deficit
//! weights with Gaussian noise and re-evaluates the discharge model. When the
//! NIHSS is unknown, trials cycle through the three severity bands.

use crate::domain::math::{clamp_score, quantile_sorted};
use crate::domain::{
    discharge_probability_with_band, Covariates, DeficitWeights, DischargeInterval,
    DischargeModel, ModelConfig, NihssBand,
};
use crate::ports::NoiseSource;

/// Default number of bootstrap trials.
pub const DEFAULT_TRIALS: usize = 200;

/// Standard deviation of the score perturbation, in scale points.
pub const SCORE_NOISE_SD: f64 = 1.0;

/// Standard deviation of each exploratory weight perturbation.
pub const WEIGHT_NOISE_SD: f64 = 0.10;

const LOW_QUANTILE: f64 = 0.05;
const HIGH_QUANTILE: f64 = 0.95;

/// NIHSS band override for trial `index`; `None` keeps the patient's band.
fn band_for_trial(covariates: &Covariates, index: usize) -> Option<NihssBand> {
    if covariates.nihss.is_unknown() {
        Some(NihssBand::ALL[index % NihssBand::ALL.len()])
    } else {
        None
    }
}

fn perturb_weights<N: NoiseSource>(weights: &DeficitWeights, noise: &mut N) -> DeficitWeights {
    DeficitWeights::new(
        noise.gaussian(weights.neglect, WEIGHT_NOISE_SD),
        noise.gaussian(weights.aphasia, WEIGHT_NOISE_SD),
        noise.gaussian(weights.apraxia, WEIGHT_NOISE_SD),
    )
}

/// 5th-95th percentile interval of the discharge probability.
///
/// `point_estimate` is the noiseless probability at `projected_score`.
/// Returns `None` for a non-finite score or zero trials.
#[must_use]
pub fn compute_interval<N: NoiseSource>(
    covariates: &Covariates,
    config: &ModelConfig,
    projected_score: f64,
    trials: usize,
    noise: &mut N,
) -> Option<DischargeInterval> {
    if !projected_score.is_finite() || trials == 0 {
        return None;
    }

    let base = &config.discharge;
    let mut samples: Vec<f64> = (0..trials)
        .map(|k| {
            let score = clamp_score(noise.gaussian(projected_score, SCORE_NOISE_SD));
            let model = DischargeModel {
                exploration: perturb_weights(&base.exploration, noise),
                ..*base
            };
            discharge_probability_with_band(score, covariates, &model, band_for_trial(covariates, k))
        })
        .collect();
    samples.sort_by(f64::total_cmp);

    let point_estimate = discharge_probability_with_band(projected_score, covariates, base, None);

    Some(DischargeInterval {
        point_estimate,
        low: quantile_sorted(&samples, LOW_QUANTILE),
        high: quantile_sorted(&samples, HIGH_QUANTILE),
        trial_count: trials,
    })
}
