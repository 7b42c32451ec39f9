//! Rounding helpers shared by every reported metric.

/// Number of decimal digits probabilities and losses are rounded to.
const METRIC_DIGITS: i32 = 7;

/// Round `value` to `digits` decimal places. NaN and infinities pass through.
pub fn round_to(value: f64, digits: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(digits);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

/// Round to seven decimal places, the precision of reported metrics.
pub fn round7(value: f64) -> f64 {
    round_to(value, METRIC_DIGITS)
}
