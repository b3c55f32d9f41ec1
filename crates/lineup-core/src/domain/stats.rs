//! Small descriptive statistics used to score how balanced a lineup is.
//!
//! All functions treat an empty slice as having a mean, variance, and standard
//! deviation of zero rather than producing NaN.

/// Sums a slice of line totals.
pub fn sum(values: &[u32]) -> u64 {
    values.iter().map(|&v| v as u64).sum()
}

/// Arithmetic mean.
pub fn mean(values: &[u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    sum(values) as f64 / values.len() as f64
}

/// Population variance (divides by `n`, not `n - 1`).
pub fn variance(values: &[u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    values
        .iter()
        .map(|&v| (v as f64 - avg).powi(2))
        .sum::<f64>()
        / values.len() as f64
}

/// Population standard deviation.
pub fn standard_deviation(values: &[u32]) -> f64 {
    variance(values).sqrt()
}
