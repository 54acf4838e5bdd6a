//! Confidence adjustment of base risk
//!
//! Detector confidence scales the label prior before normalization: a
//! hesitant detection should not carry the label's full risk.

/// Scale factor for a detection confidence.
///
/// `0.5 + 0.5 * confidence`: half weight at zero confidence, full
/// weight at certainty. Confidence outside [0, 1] extrapolates on the
/// same line rather than being rejected; the final clamp on normalized
/// scores keeps the output bounded either way.
pub fn confidence_factor(confidence: f64) -> f64 {
    0.5 + 0.5 * confidence
}

/// Raw (pre-normalization) risk score for a detection.
pub fn raw_score(base_risk: f64, confidence: f64) -> f64 {
    base_risk * confidence_factor(confidence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_endpoints() {
        assert!((confidence_factor(0.0) - 0.5).abs() < 1e-12);
        assert!((confidence_factor(1.0) - 1.0).abs() < 1e-12);
        assert!((confidence_factor(0.8) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_factor_extrapolates_out_of_range() {
        assert!((confidence_factor(1.2) - 1.1).abs() < 1e-12);
        assert!((confidence_factor(-0.2) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_raw_score() {
        // Fish_net prior at conf 0.8: 4.5 * 0.9.
        assert!((raw_score(4.5, 0.8) - 4.05).abs() < 1e-12);
        // Zero-confidence detection keeps half the prior.
        assert!((raw_score(3.0, 0.0) - 1.5).abs() < 1e-12);
    }
}
