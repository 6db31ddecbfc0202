//! Display formatters for engine values.
//!
//! Non-finite values never reach the output as numbers: they render as a
//! dash, or as zero in the zero-filling variant.

/// Placeholder for values that could not be computed.
pub const DASH: &str = "—";

const MAX_DIGITS: i32 = 6;

fn clamp_digits(digits: i32) -> usize {
    digits.clamp(0, MAX_DIGITS) as usize
}

/// Fixed-decimal rendering; digits are clamped to `0..=6`.
#[must_use]
pub fn fixed(value: f64, digits: i32) -> String {
    if value.is_finite() {
        format!("{:.*}", clamp_digits(digits), value)
    } else {
        DASH.to_string()
    }
}

/// Like [`fixed`], but non-finite values render as zero.
#[must_use]
pub fn fixed_or_zero(value: f64, digits: i32) -> String {
    let v = if value.is_finite() { value } else { 0.0 };
    format!("{:.*}", clamp_digits(digits), v)
}

/// Whole-percent rendering of a probability.
#[must_use]
pub fn percent(p: f64) -> String {
    if p.is_finite() {
        format!("{}%", (p * 100.0).round() as i64)
    } else {
        DASH.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed() {
        assert_eq!(fixed(1.2345, 2), "1.23");
        assert_eq!(fixed(12.0, 0), "12");
        assert_eq!(fixed(f64::NAN, 2), DASH);
        assert_eq!(fixed(f64::INFINITY, 2), DASH);
    }

    #[test]
    fn test_fixed_clamps_digits() {
        assert_eq!(fixed(1.2, -5), "1");
        assert_eq!(fixed(1.2, 50), "1.200000");
    }

    #[test]
    fn test_fixed_or_zero() {
        assert_eq!(fixed_or_zero(f64::NAN, 2), "0.00");
        assert_eq!(fixed_or_zero(f64::NEG_INFINITY, 1), "0.0");
        assert_eq!(fixed_or_zero(3.14159, 3), "3.142");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0.681), "68%");
        assert_eq!(percent(0.005), "1%");
        assert_eq!(percent(1.0), "100%");
        assert_eq!(percent(f64::NAN), DASH);
    }
}
