//! Built-in consistency checks.
//!
//! A fixed list of named pass/fail checks over the numeric helpers and the
//! current assessment. Used by the CLI `--check` mode and as a smoke test.

use serde::Serialize;

use crate::domain::math::{clamp_score, is_tie, logistic};
use crate::domain::{
    attainment_probability, compute_item_attainments, discharge_probability_with_band,
    estimate_rate, project_score, threshold_shift, Assessment, DeficitMagnitudes, DeficitWeights,
    MeasurementPair, ModelConfig, NihssBand,
};
use crate::ports::NoiseSource;

use super::uncertainty::compute_interval;

/// Trials used by the interval containment check.
const CHECK_TRIALS: usize = 100;

/// Outcome of one named check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub name: &'static str,
    pub pass: bool,
    pub detail: String,
}

impl CheckResult {
    fn new(name: &'static str, pass: bool, detail: String) -> Self {
        Self { name, pass, detail }
    }
}

/// Run every check against `assessment` under `base`.
///
/// The NIHSS range check only runs for an unknown NIHSS; the item-count and
/// interval checks only run when the reference projection is finite.
pub fn run_checks<N: NoiseSource>(
    assessment: &Assessment,
    base: &ModelConfig,
    noise: &mut N,
) -> Vec<CheckResult> {
    let config = assessment.settings.apply_to(base);
    let cov = &assessment.covariates;
    let mut out = Vec::new();

    let reference = MeasurementPair::new(30.0, 40.0, 60.0, 55.0);
    let rate = estimate_rate(&reference);
    out.push(CheckResult::new(
        "rate basic",
        rate.is_finite(),
        format!("rate={rate:.3}"),
    ));

    let projected = project_score(90.0, &reference, rate);
    out.push(CheckResult::new(
        "projection monotonic",
        projected.is_finite() && projected > 40.0,
        format!("score={projected:.1}"),
    ));

    let bad = estimate_rate(&MeasurementPair::new(30.0, 40.0, 20.0, 55.0));
    out.push(CheckResult::new(
        "invalid input yields NaN",
        bad.is_nan(),
        format!("rate={bad}"),
    ));

    let p1 = attainment_probability(40.0, 50.0, config.item_slope);
    let p2 = attainment_probability(60.0, 50.0, config.item_slope);
    out.push(CheckResult::new(
        "logistic monotonic",
        p1.is_finite() && p2.is_finite() && p2 > p1,
        format!("p1={p1:.3}, p2={p2:.3}"),
    ));

    let c = &config.discharge.coefficients;
    let ph = if projected.is_finite() {
        logistic(c.intercept + c.score * projected)
    } else {
        f64::NAN
    };
    out.push(CheckResult::new(
        "probability range",
        ph.is_finite() && (0.0..=1.0).contains(&ph),
        format!("p={ph:.3}"),
    ));

    if projected.is_finite() {
        let items = compute_item_attainments(clamp_score(projected), cov, &config.items, config.item_slope);
        let expected = config.items.items.len();
        out.push(CheckResult::new(
            "item count",
            items.len() == expected,
            format!("{}/{expected}", items.len()),
        ));
    }

    let p_eq = attainment_probability(100.0, 100.0, config.item_slope);
    out.push(CheckResult::new(
        "threshold equals score is 50%",
        (p_eq - 0.5).abs() < 1e-9,
        format!("p={p_eq:.3}"),
    ));
    out.push(CheckResult::new(
        "tie flag",
        is_tie(p_eq),
        format!("is_tie({p_eq:.3})"),
    ));

    let clamp = |v: f64| v.clamp(0.0, 6.0);
    out.push(CheckResult::new(
        "clamp",
        clamp(-5.0) == 0.0 && clamp(9.0) == 6.0 && clamp(3.0) == 3.0,
        format!("[-5->{}, 9->{}, 3->{}]", clamp(-5.0), clamp(9.0), clamp(3.0)),
    ));

    out.push(CheckResult::new(
        "household consistency",
        cov.is_household_consistent(),
        format!("alone={}, household={}", cov.lives_alone, cov.household_size),
    ));

    if cov.nihss.is_unknown() {
        let score = if projected.is_finite() { projected } else { 50.0 };
        let worst = discharge_probability_with_band(score, cov, &config.discharge, Some(NihssBand::High));
        let best = discharge_probability_with_band(score, cov, &config.discharge, Some(NihssBand::Low));
        out.push(CheckResult::new(
            "NIHSS unknown range order",
            worst <= best,
            format!("worst={worst:.3}, best={best:.3}"),
        ));
    }

    let t = &config.thresholds;
    out.push(CheckResult::new(
        "threshold validation",
        t.validate().is_ok(),
        format!("low={}, high={}", t.nonhome_low, t.home_high),
    ));

    let m = &assessment.measurements;
    out.push(CheckResult::new(
        "A-B spacing",
        assessment.has_min_spacing(),
        format!("A={}, B={}", m.day_a, m.day_b),
    ));

    if projected.is_finite() {
        let score = clamp_score(projected);
        if let Some(ci) = compute_interval(cov, &config, score, CHECK_TRIALS, noise) {
            out.push(CheckResult::new(
                "interval containment",
                ci.contains_point(),
                format!(
                    "low={:.3}, point={:.3}, high={:.3}",
                    ci.low, ci.point_estimate, ci.high
                ),
            ));
        }
    }

    let unit = DeficitMagnitudes {
        neglect: 1.0,
        aphasia: 1.0,
        apraxia: 1.0,
    };
    let scales = &config.items.shift_scales;
    let calc = threshold_shift(&DeficitWeights::new(2.0, 3.0, 4.0), scales, &unit);
    let expect = scales.neglect * 2.0 + scales.aphasia * 3.0 + scales.apraxia * 4.0;
    out.push(CheckResult::new(
        "weight index mapping",
        (calc - expect).abs() < 1e-9,
        format!("calc={calc:.2} expect={expect:.2}"),
    ));

    let failed = out.iter().filter(|r| !r.pass).count();
    if failed > 0 {
        tracing::warn!("{failed} of {} consistency checks failed", out.len());
    } else {
        tracing::debug!("All {} consistency checks passed", out.len());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::chacha::ChaChaNoise;
    use crate::domain::{DecisionThresholds, Nihss};

    #[test]
    fn test_default_assessment_passes_all() {
        let results = run_checks(
            &Assessment::default(),
            &ModelConfig::default(),
            &mut ChaChaNoise::with_seed(3),
        );
        assert_eq!(results.len(), 14);
        for r in &results {
            assert!(r.pass, "{} failed: {}", r.name, r.detail);
        }
    }

    #[test]
    fn test_unknown_nihss_adds_range_check() {
        let mut assessment = Assessment::default();
        assessment.covariates.nihss = Nihss::Unknown;
        let results = run_checks(&assessment, &ModelConfig::default(), &mut ChaChaNoise::with_seed(3));
        assert_eq!(results.len(), 15);
        assert!(results
            .iter()
            .any(|r| r.name == "NIHSS unknown range order" && r.pass));
    }

    #[test]
    fn test_state_checks_report_failures() {
        let mut assessment = Assessment::default();
        assessment.covariates.lives_alone = true;
        assessment.measurements.day_b = 10.0;
        assessment.settings.thresholds = DecisionThresholds {
            home_high: 0.5,
            nonhome_low: 0.4,
        };

        let results = run_checks(&assessment, &ModelConfig::default(), &mut ChaChaNoise::with_seed(3));
        let failed: Vec<&str> = results.iter().filter(|r| !r.pass).map(|r| r.name).collect();
        assert_eq!(
            failed,
            vec!["household consistency", "threshold validation", "A-B spacing"]
        );
    }
}
