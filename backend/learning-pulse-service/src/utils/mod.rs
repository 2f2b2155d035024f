// Utility functions for learning-pulse-service

/// Divide two numbers, returning `default` when the denominator is zero.
///
/// The default encodes policy, not failure: ratio-type features use 0.5
/// (neutral) and count-type features use 0.0 (no activity).
pub fn safe_divide(numerator: f64, denominator: f64, default: f64) -> f64 {
    if denominator == 0.0 {
        default
    } else {
        numerator / denominator
    }
}

/// Normalize a value to [0, 1] using min-max scaling against `max_value`.
pub fn normalize(value: f64, max_value: f64) -> f64 {
    if max_value <= 0.0 {
        0.0
    } else {
        (value / max_value).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_divide() {
        assert!((safe_divide(3.0, 4.0, 0.0) - 0.75).abs() < 1e-9);
        assert!((safe_divide(1.0, 0.0, 0.5) - 0.5).abs() < 1e-9);
        assert!((safe_divide(0.0, 0.0, 0.0) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_clamps() {
        assert!((normalize(5.0, 10.0) - 0.5).abs() < 1e-9);
        assert!((normalize(15.0, 10.0) - 1.0).abs() < 1e-9);
        assert!((normalize(-2.0, 10.0) - 0.0).abs() < 1e-9);
        assert!((normalize(1.0, 0.0) - 0.0).abs() < 1e-9);
    }
}
