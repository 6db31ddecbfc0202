//! Recovery-curve estimation.
//!
//! Two serial functional-score measurements define a log-linear recovery
//! curve `score(day) = score_a + rate * (ln(day) - ln(day_a))`.

use serde::{Deserialize, Serialize};

use super::math::clamp_score;

/// Log differences smaller than this are treated as a degenerate interval.
const MIN_LOG_SPAN: f64 = 1e-9;

/// Two dated functional-score measurements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementPair {
    /// Day of the first measurement (days since onset, > 0)
    pub day_a: f64,

    /// Functional score at `day_a` (0-91)
    pub score_a: f64,

    /// Day of the second measurement (> `day_a`)
    pub day_b: f64,

    /// Functional score at `day_b` (0-91)
    pub score_b: f64,
}

impl Default for MeasurementPair {
    fn default() -> Self {
        Self::new(7.0, 30.0, 14.0, 45.0)
    }
}

impl MeasurementPair {
    /// Create a measurement pair.
    #[must_use]
    pub fn new(day_a: f64, score_a: f64, day_b: f64, score_b: f64) -> Self {
        Self {
            day_a,
            score_a,
            day_b,
            score_b,
        }
    }

    /// Days between the two measurements.
    #[must_use]
    pub fn spacing_days(&self) -> f64 {
        self.day_b - self.day_a
    }

    /// Whether the pair defines a usable recovery interval.
    #[must_use]
    pub fn has_valid_interval(&self) -> bool {
        estimate_rate(self).is_finite()
    }
}

/// One point of a projected recovery trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub day: u32,
    /// Projected score, clamped to the scale
    pub score: f64,
}

/// Estimate the log-linear recovery rate from a measurement pair.
///
/// Returns `NaN` unless `day_a > 0`, `day_b > day_a` and the log span exceeds
/// `1e-9`.
#[must_use]
pub fn estimate_rate(pair: &MeasurementPair) -> f64 {
    if !(pair.day_a > 0.0 && pair.day_b > pair.day_a) {
        return f64::NAN;
    }

    let span = pair.day_b.ln() - pair.day_a.ln();
    if span.abs() <= MIN_LOG_SPAN {
        return f64::NAN;
    }

    (pair.score_b - pair.score_a) / span
}

/// Project the functional score at `day` along the recovery curve.
///
/// Returns `NaN` when `day <= 0`, `day_a <= 0` or `rate` is not finite.
/// The caller is responsible for clamping the result to the scale.
#[must_use]
pub fn project_score(day: f64, pair: &MeasurementPair, rate: f64) -> f64 {
    if day > 0.0 && pair.day_a > 0.0 && rate.is_finite() {
        pair.score_a + rate * (day.ln() - pair.day_a.ln())
    } else {
        f64::NAN
    }
}

/// Clamped projections for every whole day within `half_window` of `target_day`.
///
/// The window starts no earlier than day 1. An invalid rate or target day
/// yields an empty series.
#[must_use]
pub fn trajectory(
    pair: &MeasurementPair,
    rate: f64,
    target_day: f64,
    half_window: u32,
) -> Vec<TrajectoryPoint> {
    if !rate.is_finite() || !target_day.is_finite() {
        return Vec::new();
    }

    let center = target_day.max(1.0).round() as u32;
    let start = center.saturating_sub(half_window).max(1);
    let end = center.saturating_add(half_window);

    (start..=end)
        .map(|day| TrajectoryPoint {
            day,
            score: clamp_score(project_score(f64::from(day), pair, rate)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_basic() {
        let rate = estimate_rate(&MeasurementPair::new(30.0, 40.0, 60.0, 55.0));
        assert!((rate - 15.0 / 2f64.ln()).abs() < 1e-3);
        assert!((rate - 21.64).abs() < 1e-2);
    }

    #[test]
    fn test_rate_invalid_interval() {
        let cases = [
            MeasurementPair::new(0.0, 40.0, 60.0, 55.0),
            MeasurementPair::new(-3.0, 40.0, 60.0, 55.0),
            MeasurementPair::new(30.0, 40.0, 20.0, 55.0),
            MeasurementPair::new(30.0, 40.0, 30.0, 55.0),
            MeasurementPair::new(30.0, 40.0, 30.0 + 1e-12, 55.0),
        ];
        for pair in cases {
            assert!(estimate_rate(&pair).is_nan(), "{pair:?}");
            assert!(!pair.has_valid_interval());
        }
    }

    #[test]
    fn test_rate_tiny_days_use_exact_logs() {
        let pair = MeasurementPair::new(1e-12, 30.0, 1e-10, 45.0);
        let rate = estimate_rate(&pair);
        let expected = 15.0 / (1e-10f64.ln() - 1e-12f64.ln());
        assert!(rate.is_finite());
        assert!((rate - expected).abs() < 1e-9, "rate = {rate}");

        let at_b = project_score(1e-10, &pair, rate);
        assert!((at_b - 45.0).abs() < 1e-9, "projected = {at_b}");
    }

    #[test]
    fn test_projection_monotonic_for_positive_rate() {
        let pair = MeasurementPair::new(30.0, 40.0, 60.0, 55.0);
        let rate = estimate_rate(&pair);
        let f = project_score(90.0, &pair, rate);
        assert!(f > 40.0);
        assert!(project_score(120.0, &pair, rate) > f);
    }

    #[test]
    fn test_projection_end_to_end() {
        let pair = MeasurementPair::new(7.0, 30.0, 14.0, 45.0);
        let rate = estimate_rate(&pair);
        assert!((rate - 21.64).abs() < 1e-2);

        let projected = clamp_score(project_score(21.0, &pair, rate));
        assert!((projected - 53.77).abs() < 0.05, "projected = {projected}");
        assert!((0.0..=91.0).contains(&projected));
    }

    #[test]
    fn test_projection_propagates_nan() {
        let pair = MeasurementPair::new(7.0, 30.0, 14.0, 45.0);
        assert!(project_score(21.0, &pair, f64::NAN).is_nan());
        assert!(project_score(0.0, &pair, 10.0).is_nan());
        assert!(project_score(-1.0, &pair, 10.0).is_nan());
    }

    #[test]
    fn test_trajectory_window() {
        let pair = MeasurementPair::new(7.0, 30.0, 14.0, 45.0);
        let rate = estimate_rate(&pair);

        let series = trajectory(&pair, rate, 21.0, 30);
        assert_eq!(series.first().map(|p| p.day), Some(1));
        assert_eq!(series.last().map(|p| p.day), Some(51));
        assert!(series.iter().all(|p| (0.0..=91.0).contains(&p.score)));

        assert!(trajectory(&pair, f64::NAN, 21.0, 30).is_empty());
    }
}
