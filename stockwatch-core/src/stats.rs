//! Shared statistical helpers for risk scoring and seasonal detection.

/// Arithmetic mean. Empty input yields 0.0.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation. Fewer than two values yields 0.0.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Coefficient of variation: std dev divided by mean.
///
/// A scale-free measure of variability. A zero or negative mean yields 0.0
/// rather than a division blowup; callers treat that as "no usable signal".
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    let m = mean(values);
    if m <= 0.0 {
        return 0.0;
    }
    std_dev(values) / m
}

/// Root-mean-square deviation of values around a fixed baseline.
///
/// Used for seasonal confidence: how far the period factors sit from the
/// "no seasonality" baseline of 1.0.
pub fn rms_deviation(values: &[f64], baseline: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sq = values.iter().map(|v| (v - baseline).powi(2)).sum::<f64>() / values.len() as f64;
    sq.sqrt()
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
