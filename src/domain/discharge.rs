//! Home-discharge logistic model.
//!
//! ```text
//! z = intercept + b_score * score + b_age * (age - 75) / 10
//!   + b_alone * [household <= 1] + b_household * max(0, household - 1)
//!   + exploratory deficit weights + b_stairs * [stairs]
//!   + NIHSS band offset + pre-morbid mRS band offset
//! p = logistic(z)
//! ```

use super::config::DischargeModel;
use super::covariates::{Covariates, MrsBand, NihssBand};
use super::math::logistic;

/// Linear predictor split into the score term and everything else.
///
/// `total() == score_term + remainder`; the remainder does not depend on the
/// projected score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearPredictor {
    pub score_term: f64,
    pub remainder: f64,
}

impl LinearPredictor {
    #[inline]
    #[must_use]
    pub fn total(&self) -> f64 {
        self.score_term + self.remainder
    }

    #[inline]
    #[must_use]
    pub fn probability(&self) -> f64 {
        logistic(self.total())
    }
}

/// NIHSS offset.
///
/// An explicit band override wins. Otherwise a known NIHSS selects its band
/// and an unknown NIHSS contributes nothing.
fn nihss_adjustment(
    covariates: &Covariates,
    model: &DischargeModel,
    band: Option<NihssBand>,
) -> f64 {
    let offsets = &model.coefficients.nihss;
    match band.or_else(|| covariates.nihss.band()) {
        Some(NihssBand::Low) => offsets.low,
        Some(NihssBand::Mid) => offsets.mid,
        Some(NihssBand::High) => offsets.high,
        None => 0.0,
    }
}

fn mrs_adjustment(covariates: &Covariates, model: &DischargeModel) -> f64 {
    let offsets = &model.coefficients.mrs;
    match covariates.mrs_band() {
        MrsBand::UpToTwo => offsets.up_to_two,
        MrsBand::Three => offsets.three,
        MrsBand::Four => offsets.four,
        MrsBand::FiveOrMore => offsets.five_or_more,
    }
}

/// Linear predictor of the discharge model.
///
/// `nihss_band` overrides the patient's NIHSS band; it is used to evaluate the
/// range of an unknown NIHSS.
#[must_use]
pub fn linear_predictor(
    projected_score: f64,
    covariates: &Covariates,
    model: &DischargeModel,
    nihss_band: Option<NihssBand>,
) -> LinearPredictor {
    let c = &model.coefficients;
    let w = &model.exploration;
    let d = &covariates.deficits;

    let household = f64::from(covariates.household_size);
    let indicator = |flag: bool| if flag { 1.0 } else { 0.0 };

    let remainder = c.intercept
        + c.age * ((covariates.age - 75.0) / 10.0)
        + c.alone * indicator(covariates.household_size <= 1)
        + c.household * (household - 1.0).max(0.0)
        + w.neglect * indicator(d.neglect)
        + w.aphasia * indicator(d.aphasia)
        + w.apraxia * indicator(d.apraxia)
        + c.stairs * indicator(covariates.stairs_at_home)
        + nihss_adjustment(covariates, model, nihss_band)
        + mrs_adjustment(covariates, model);

    LinearPredictor {
        score_term: c.score * projected_score,
        remainder,
    }
}

/// Discharge probability with an optional NIHSS band override.
///
/// `NaN` when the projected score is not finite.
#[must_use]
pub fn discharge_probability_with_band(
    projected_score: f64,
    covariates: &Covariates,
    model: &DischargeModel,
    nihss_band: Option<NihssBand>,
) -> f64 {
    if !projected_score.is_finite() {
        return f64::NAN;
    }
    linear_predictor(projected_score, covariates, model, nihss_band).probability()
}

/// Probability of home discharge at the projected score.
///
/// `NaN` when the projected score is not finite.
#[must_use]
pub fn compute_discharge_probability(
    projected_score: f64,
    covariates: &Covariates,
    model: &DischargeModel,
) -> f64 {
    discharge_probability_with_band(projected_score, covariates, model, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::{DeficitWeights, ExplorationPreset};
    use crate::domain::covariates::{DeficitFlags, Nihss};

    fn reference_covariates() -> Covariates {
        Covariates {
            age: 70.0,
            household_size: 2,
            lives_alone: false,
            stairs_at_home: true,
            nihss: Nihss::Score(10),
            premorbid_mrs: 0,
            ..Default::default()
        }
    }

    #[test]
    fn test_reference_case_probability() {
        let model = DischargeModel::default();
        let cov = reference_covariates();
        let p = compute_discharge_probability(53.8, &cov, &model);

        // -3 + 0.068*53.8 - 0.724*(-0.5) + 0.64 - 0.3 - 0.6
        let z = -3.0 + 0.068 * 53.8 + 0.362 + 0.64 - 0.3 - 0.6;
        assert!((p - logistic(z)).abs() < 1e-12);
        assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn test_deterministic() {
        let model = DischargeModel::default();
        let cov = reference_covariates();
        let a = compute_discharge_probability(53.8, &cov, &model);
        let b = compute_discharge_probability(53.8, &cov, &model);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_nan_score_propagates() {
        let p = compute_discharge_probability(
            f64::NAN,
            &reference_covariates(),
            &DischargeModel::default(),
        );
        assert!(p.is_nan());
    }

    #[test]
    fn test_unknown_nihss_and_override() {
        let model = DischargeModel::default();
        let cov = Covariates {
            nihss: Nihss::Unknown,
            ..reference_covariates()
        };

        let none = linear_predictor(50.0, &cov, &model, None);
        let low = linear_predictor(50.0, &cov, &model, Some(NihssBand::Low));
        let high = linear_predictor(50.0, &cov, &model, Some(NihssBand::High));
        assert_eq!(none.remainder, low.remainder);
        assert!((none.remainder - high.remainder - 1.2).abs() < 1e-12);
        assert!(high.probability() <= low.probability());
    }

    #[test]
    fn test_exploration_weights_apply_only_with_deficits() {
        let strict = DischargeModel::default();
        let reference = DischargeModel {
            exploration: ExplorationPreset::Reference.weights(),
            ..strict
        };
        let cov = reference_covariates();
        assert_eq!(
            compute_discharge_probability(50.0, &cov, &strict),
            compute_discharge_probability(50.0, &cov, &reference)
        );

        let with_neglect = Covariates {
            deficits: DeficitFlags {
                neglect: true,
                ..Default::default()
            },
            ..cov
        };
        let a = linear_predictor(50.0, &with_neglect, &strict, None);
        let b = linear_predictor(50.0, &with_neglect, &reference, None);
        assert!((a.remainder - b.remainder - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_household_terms() {
        let model = DischargeModel {
            exploration: DeficitWeights::default(),
            ..Default::default()
        };
        let alone = Covariates {
            household_size: 1,
            lives_alone: true,
            ..reference_covariates()
        };
        let three = Covariates {
            household_size: 3,
            ..reference_covariates()
        };
        let z_alone = linear_predictor(50.0, &alone, &model, None).remainder;
        let z_two = linear_predictor(50.0, &reference_covariates(), &model, None).remainder;
        let z_three = linear_predictor(50.0, &three, &model, None).remainder;
        assert!((z_two - z_alone - (0.64 + 0.82)).abs() < 1e-12);
        assert!((z_three - z_two - 0.64).abs() < 1e-12);
    }

    #[test]
    fn test_score_term_isolated() {
        let model = DischargeModel::default();
        let cov = reference_covariates();
        let a = linear_predictor(40.0, &cov, &model, None);
        let b = linear_predictor(60.0, &cov, &model, None);
        assert_eq!(a.remainder, b.remainder);
        assert!((b.score_term - a.score_term - 0.068 * 20.0).abs() < 1e-12);
    }
}
