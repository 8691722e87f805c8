//! Numeric edge-case policies shared by the aggregator and the scorer

/// Value every wallet gets for a feature that does not vary across the batch.
pub const NEUTRAL: f64 = 0.5;

/// `num / den`, or 0 when the quotient is infinite or NaN.
pub fn safe_ratio(num: f64, den: f64) -> f64 {
    let ratio = num / den;
    if ratio.is_finite() {
        ratio
    } else {
        0.0
    }
}

/// `acc + value`, saturating at `f64::MAX` instead of overflowing to infinity.
pub fn saturating_add(acc: f64, value: f64) -> f64 {
    (acc + value).min(f64::MAX)
}

/// Min-max scale `values` into `[0, 1]` using the batch's own range.
///
/// When the column has no variation every entry becomes [`NEUTRAL`]. Entries
/// that cannot be scaled to a finite value become 0.
pub fn robust_minmax(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if range == 0.0 {
        return vec![NEUTRAL; values.len()];
    }

    values
        .iter()
        .map(|v| {
            let scaled = (v - min) / range;
            if scaled.is_finite() {
                scaled
            } else {
                0.0
            }
        })
        .collect()
}

/// Round to two decimals, ties to even.
pub fn round_dp2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
