//! Sanity adjustments applied to finished forecasts.

use microplastics_trend_models::{Prediction, RiskLevel};

/// Confidence ceiling for forecasts of a falling concentration.
pub const DECLINE_CONFIDENCE_CAP: u8 = 70;

/// Confidence ceiling for forecasts rising more than
/// [`STEEP_INCREASE_PERCENT`].
pub const STEEP_CONFIDENCE_CAP: u8 = 60;

/// Increase beyond which a forecast is considered implausibly steep.
pub const STEEP_INCREASE_PERCENT: f64 = 50.0;

/// Tempers a prediction: a negative increase forces low risk and caps
/// confidence at 70, while an increase above 50% caps confidence at 60.
#[must_use]
pub fn validate_prediction(mut prediction: Prediction) -> Prediction {
    if prediction.percentage_increase < 0.0 {
        prediction.risk_level = RiskLevel::Low;
        prediction.confidence = prediction.confidence.min(DECLINE_CONFIDENCE_CAP);
    } else if prediction.percentage_increase > STEEP_INCREASE_PERCENT {
        prediction.confidence = prediction.confidence.min(STEEP_CONFIDENCE_CAP);
    }
    prediction
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::predictor::fallback_prediction;

    fn with(percentage: f64, confidence: u8, risk: RiskLevel) -> Prediction {
        Prediction {
            percentage_increase: percentage,
            confidence,
            risk_level: risk,
            ..fallback_prediction("Atlantic", Utc::now())
        }
    }

    #[test]
    fn decline_is_low_risk() {
        let p = validate_prediction(with(-4.0, 85, RiskLevel::High));
        assert_eq!(p.risk_level, RiskLevel::Low);
        assert_eq!(p.confidence, 70);
    }

    #[test]
    fn steep_increase_caps_confidence() {
        let p = validate_prediction(with(62.0, 85, RiskLevel::High));
        assert_eq!(p.risk_level, RiskLevel::High);
        assert_eq!(p.confidence, 60);
    }

    #[test]
    fn ordinary_increase_is_untouched() {
        let original = with(10.3, 75, RiskLevel::High);
        assert_eq!(validate_prediction(original.clone()), original);
    }

    #[test]
    fn caps_never_raise_confidence() {
        assert_eq!(validate_prediction(with(-1.0, 40, RiskLevel::Low)).confidence, 40);
        assert_eq!(validate_prediction(with(80.0, 30, RiskLevel::High)).confidence, 30);
    }
}
