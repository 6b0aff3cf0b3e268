//! Small numeric helpers shared by the finalizer and the national aggregator.

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
///
/// NaN members are not filtered out; a single NaN makes the mean NaN.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Divides `sum` by `count`, or returns 0.0 when nothing contributed.
pub fn ratio(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Rounds to one decimal place.
///
/// The nearest tenth of the exact binary value wins. Exact half-way cases
/// (only possible when `4 * x` is an odd integer) round away from zero, so
/// `2.25` becomes `2.3`, `-2.25` becomes `-2.3`, and `0.15` (stored slightly
/// below 0.15) becomes `0.1`.
pub fn round1(x: f64) -> f64 {
    if !x.is_finite() {
        return x;
    }

    let quarters = x * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        return x.signum() * ((x.abs() * 10.0).ceil() / 10.0);
    }

    format!("{x:.1}").parse().unwrap_or(x)
}

/// Mean of `values` rounded to one decimal; 0.0 for empty input.
pub fn rounded_mean(values: &[f64]) -> f64 {
    round1(mean(values))
}

/// `sum / count` rounded to one decimal; 0.0 when `count` is zero.
pub fn rounded_ratio(sum: f64, count: usize) -> f64 {
    round1(ratio(sum, count))
}
