//! Numeric helpers shared by every model in the engine.
//!
//! All helpers are total: out-of-domain input yields `NaN` (or a clamped
//! value where documented) and never panics.

/// Lower bound of the functional score scale.
pub const SCORE_MIN: f64 = 0.0;

/// Upper bound of the functional score scale (full independence).
pub const SCORE_MAX: f64 = 91.0;

/// Probabilities closer than this to 0.5 are reported as ties.
pub const TIE_TOLERANCE: f64 = 1e-9;

/// Floor applied to both odds terms in [`logit`].
const LOG_FLOOR: f64 = 1e-9;

/// Standard logistic function. `NaN` in, `NaN` out.
#[inline]
#[must_use]
pub fn logistic(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Inverse of [`logistic`], with the probability kept away from 0 and 1.
#[inline]
#[must_use]
pub fn logit(p: f64) -> f64 {
    (p.max(LOG_FLOOR) / (1.0 - p).max(LOG_FLOOR)).ln()
}

/// Clamp a score to `[0, 91]`. `NaN` stays `NaN`.
#[inline]
#[must_use]
pub fn clamp_score(score: f64) -> f64 {
    score.clamp(SCORE_MIN, SCORE_MAX)
}

/// Whether a probability sits on the 50% line.
#[inline]
#[must_use]
pub fn is_tie(p: f64) -> bool {
    p.is_finite() && (p - 0.5).abs() < TIE_TOLERANCE
}

/// Quantile of an ascending-sorted slice by linear interpolation.
///
/// The position is `q * (len - 1)` with `q` clamped to `[0, 1]`; the result
/// interpolates between the floor and ceiling indices. Empty input yields `NaN`.
#[must_use]
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }

    let x = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let i = x.floor() as usize;
    let j = x.ceil() as usize;
    if i == j {
        return sorted[i];
    }

    let t = x - i as f64;
    sorted[i] * (1.0 - t) + sorted[j] * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logistic_range() {
        for z in [-800.0, -40.0, -1.0, 0.0, 1.0, 40.0, 800.0] {
            let p = logistic(z);
            assert!((0.0..=1.0).contains(&p), "logistic({z}) = {p}");
        }
        assert!((logistic(0.0) - 0.5).abs() < f64::EPSILON);
        assert!(logistic(f64::NAN).is_nan());
    }

    #[test]
    fn test_logit_inverts_logistic() {
        for p in [0.1, 0.5, 0.9] {
            assert!((logistic(logit(p)) - p).abs() < 1e-12);
        }
        assert!(logit(1.0).is_finite());
        assert!(logit(0.0).is_finite());
    }

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(-5.0), 0.0);
        assert_eq!(clamp_score(120.0), 91.0);
        assert_eq!(clamp_score(53.8), 53.8);
        assert!(clamp_score(f64::NAN).is_nan());
    }

    #[test]
    fn test_quantile_interpolates() {
        let sorted = [0.0, 1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&sorted, 0.0), 0.0);
        assert_eq!(quantile_sorted(&sorted, 1.0), 4.0);
        assert!((quantile_sorted(&sorted, 0.5) - 2.0).abs() < 1e-12);
        assert!((quantile_sorted(&sorted, 0.05) - 0.2).abs() < 1e-12);
        assert!(quantile_sorted(&[], 0.5).is_nan());
    }

    #[test]
    fn test_tie_detection() {
        assert!(is_tie(logistic(0.12 * (100.0 - 100.0))));
        assert!(!is_tie(0.51));
        assert!(!is_tie(f64::NAN));
    }
}
