//! Prognosis service: Runs the full engine pipeline for one assessment.
//!
//! This service coordinates:
//! - Recovery-rate estimation and score projection
//! - Item attainment and discharge probability
//! - Bootstrap interval (via the injected noise source)
//! - Sensitivity analysis and the trajectory series

use crate::domain::math::clamp_score;
use crate::domain::{
    compute_discharge_probability, compute_item_attainments, estimate_rate, project_score,
    trajectory, Assessment, ModelConfig, Prognosis,
};
use crate::ports::NoiseSource;

use super::sensitivity::{compute_sensitivity, SensitivityInput};
use super::uncertainty::{compute_interval, DEFAULT_TRIALS};

/// Days on each side of the target day covered by the trajectory series.
pub const TRAJECTORY_HALF_WINDOW: u32 = 30;

/// Service for evaluating assessments.
///
/// Holds the base configuration; per-assessment settings (item slope,
/// thresholds, exploration weights) are layered on top for each call.
pub struct PrognosisService<N: NoiseSource> {
    config: ModelConfig,
    noise: N,
    trials: usize,
    include_age_scenarios: bool,
}

impl<N: NoiseSource> PrognosisService<N> {
    /// Create a new prognosis service.
    pub fn new(config: ModelConfig, noise: N) -> Self {
        Self {
            config,
            noise,
            trials: DEFAULT_TRIALS,
            include_age_scenarios: false,
        }
    }

    /// Set the number of bootstrap trials (0 disables the interval).
    #[must_use]
    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    /// Include the explanatory age scenarios in the sensitivity report.
    #[must_use]
    pub fn with_age_scenarios(mut self, include: bool) -> Self {
        self.include_age_scenarios = include;
        self
    }

    /// Evaluate one assessment.
    ///
    /// Never fails: an invalid measurement interval yields non-finite
    /// outputs, and configuration problems are reported in
    /// [`Prognosis::warnings`].
    pub fn evaluate(&mut self, assessment: &Assessment) -> Prognosis {
        tracing::info!("Evaluating assessment (target day {})", assessment.target_day);

        let config = assessment.settings.apply_to(&self.config);
        let cov = &assessment.covariates;
        let pair = &assessment.measurements;
        let mut warnings = Vec::new();

        if let Err(e) = config.thresholds.validate() {
            tracing::warn!("Decision threshold misconfiguration: {e}");
            warnings.push(e.to_string());
        }
        if !cov.is_household_consistent() {
            tracing::warn!("Lives-alone flag disagrees with household size");
            warnings.push(format!(
                "Lives-alone flag ({}) disagrees with household size ({})",
                cov.lives_alone, cov.household_size
            ));
        }
        if pair.has_valid_interval() && !assessment.has_min_spacing() {
            warnings.push(format!(
                "Measurements are {} days apart; at least {} recommended",
                pair.spacing_days(),
                assessment.min_spacing_days
            ));
        }

        let rate = estimate_rate(pair);
        if !rate.is_finite() {
            tracing::warn!("Invalid measurement interval; prognosis cannot be computed");
            warnings.push("Invalid measurement interval (requires 0 < day A < day B)".to_string());
        } else {
            if rate <= 0.0 {
                warnings.push(format!("Recovery rate is not positive ({rate:.2}); plateau or decline"));
            }
            if assessment.target_day < pair.day_b {
                warnings.push("Target day precedes measurement B (retrospective estimate)".to_string());
            }
        }

        let raw_projection = project_score(assessment.target_day, pair, rate);
        let projected_score = clamp_score(raw_projection);
        tracing::debug!(
            "Rate {rate:.3}, raw projection {raw_projection:.2}, clamped {projected_score:.2}"
        );

        let discharge_probability = compute_discharge_probability(projected_score, cov, &config.discharge);
        let items = compute_item_attainments(projected_score, cov, &config.items, config.item_slope);
        tracing::debug!("Discharge probability {discharge_probability:.4}, {} items", items.len());

        let interval = compute_interval(cov, &config, projected_score, self.trials, &mut self.noise);
        if let Some(ci) = &interval {
            tracing::debug!(
                "Interval {:.3}-{:.3} over {} trials",
                ci.low,
                ci.high,
                ci.trial_count
            );
        }

        let sensitivity = compute_sensitivity(
            cov,
            &config,
            &SensitivityInput {
                projected_score,
                baseline_probability: discharge_probability,
                rate,
                target_day: assessment.target_day,
                include_age: self.include_age_scenarios,
            },
        );

        let series = trajectory(pair, rate, assessment.target_day, TRAJECTORY_HALF_WINDOW);

        tracing::info!("Evaluation complete: bucket {}", sensitivity.bucket);

        Prognosis {
            recovery_rate: rate,
            raw_projection,
            projected_score,
            discharge_probability,
            items,
            interval,
            sensitivity,
            trajectory: series,
            warnings,
            computed_at: chrono::Utc::now(),
        }
    }
}
