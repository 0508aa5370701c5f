//! Pure validation helpers shared by the per-stage configuration types.

/// Tolerance on weight sets that must sum to 1.0
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

// Pure function: Check if a weight is in valid range
pub fn is_valid_weight(weight: f64) -> bool {
    weight.is_finite() && (0.0..=1.0).contains(&weight)
}

/// Every weight in [0, 1] and the set summing to 1.0 within tolerance.
pub fn validate_weight_sum(name: &str, weights: &[f64]) -> Result<(), String> {
    if let Some(bad) = weights.iter().find(|w| !is_valid_weight(**w)) {
        return Err(format!(
            "{} weights must be between 0.0 and 1.0, got {}",
            name, bad
        ));
    }
    let sum: f64 = weights.iter().sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(format!(
            "{} weights must sum to 1.0, but sum to {:.3}",
            name, sum
        ));
    }
    Ok(())
}

/// Thresholds listed from lowest to highest must not decrease.
pub fn validate_ascending(name: &str, thresholds: &[f64]) -> Result<(), String> {
    if thresholds.windows(2).all(|pair| pair[0] <= pair[1]) {
        Ok(())
    } else {
        Err(format!(
            "{} thresholds must be ascending, got {:?}",
            name, thresholds
        ))
    }
}
