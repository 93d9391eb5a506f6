//! Single-session quick load estimate
//!
//! A lightweight score for one run from heart rate, pace and distance, for
//! athletes without enough history for a full assessment.
//!
//! ```text
//! pace_factor     = max(1.0, 10.0 / pace_min_per_mile)
//! distance_factor = distance_miles / 3.1        (normalized to a 5K)
//! score           = heart_rate × pace_factor × distance_factor / 100
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Miles in a 5K, used to normalize distance
const FIVE_K_MILES: f64 = 3.1;
const SCALING_FACTOR: f64 = 100.0;

#[derive(Error, Debug, PartialEq)]
pub enum QuickScoreError {
    #[error("Invalid pace '{0}': expected mm:ss")]
    InvalidPace(String),
    #[error("Invalid {field}: {value}")]
    InvalidValue { field: &'static str, value: f64 },
}

/// Coarse training recommendation for a quick score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuickRecommendation {
    TrainHarder,
    Maintain,
    Rest,
}

impl QuickRecommendation {
    pub fn from_score(score: f64) -> Self {
        if score < 3.0 {
            QuickRecommendation::TrainHarder
        } else if score < 5.0 {
            QuickRecommendation::Maintain
        } else {
            QuickRecommendation::Rest
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            QuickRecommendation::TrainHarder => "Train harder!",
            QuickRecommendation::Maintain => "Maintain current training.",
            QuickRecommendation::Rest => "Take a rest day!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuickScore {
    pub score: f64,
    pub pace_min_per_mile: f64,
    pub recommendation: QuickRecommendation,
}

/// Parse "mm:ss" into decimal minutes
///
/// Exactly two numeric components are required. Empty components are not
/// skipped, so `"8::30"` and `"8:30:"` are rejected.
pub fn parse_pace(pace: &str) -> Option<f64> {
    let components: Vec<f64> = pace
        .split(':')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .ok()?;

    match components.as_slice() {
        [minutes, seconds] => Some(minutes + seconds / 60.0),
        _ => None,
    }
}

/// Compute the quick load score for one run
pub fn quick_score(
    heart_rate: f64,
    pace: &str,
    distance_miles: f64,
) -> Result<QuickScore, QuickScoreError> {
    let pace_min_per_mile =
        parse_pace(pace).ok_or_else(|| QuickScoreError::InvalidPace(pace.to_string()))?;

    for (field, value) in [
        ("heart rate", heart_rate),
        ("distance", distance_miles),
        ("pace", pace_min_per_mile),
    ] {
        if !(value.is_finite() && value > 0.0) {
            return Err(QuickScoreError::InvalidValue { field, value });
        }
    }

    // Faster pace increases load; slower than 10:00/mile counts as 10:00
    let pace_factor = (10.0 / pace_min_per_mile).max(1.0);
    let distance_factor = distance_miles / FIVE_K_MILES;
    let score = (heart_rate * pace_factor * distance_factor) / SCALING_FACTOR;

    Ok(QuickScore {
        score,
        pace_min_per_mile,
        recommendation: QuickRecommendation::from_score(score),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pace() {
        assert_eq!(parse_pace("8:30"), Some(8.5));
        assert_eq!(parse_pace("10:00"), Some(10.0));
        assert_eq!(parse_pace("8"), None);
        assert_eq!(parse_pace("1:02:03"), None);
        assert_eq!(parse_pace("eight:30"), None);
        assert_eq!(parse_pace("8::30"), None);
        assert_eq!(parse_pace("8:30:"), None);
    }

    #[test]
    fn test_slow_pace_factor_floors_at_one() {
        // 12:00/mile, 3.1 miles, 150 bpm => 150 * 1.0 * 1.0 / 100
        let result = quick_score(150.0, "12:00", 3.1).unwrap();
        assert!((result.score - 1.5).abs() < 1e-9);
        assert_eq!(result.recommendation, QuickRecommendation::TrainHarder);
    }

    #[test]
    fn test_fast_long_run_recommends_rest() {
        // 5:00/mile doubles the load; 6.2 miles doubles it again
        let result = quick_score(160.0, "5:00", 6.2).unwrap();
        assert!((result.score - 6.4).abs() < 1e-9);
        assert_eq!(result.recommendation, QuickRecommendation::Rest);
        assert_eq!(result.recommendation.message(), "Take a rest day!");
    }

    #[test]
    fn test_recommendation_bands() {
        assert_eq!(QuickRecommendation::from_score(2.99), QuickRecommendation::TrainHarder);
        assert_eq!(QuickRecommendation::from_score(3.0), QuickRecommendation::Maintain);
        assert_eq!(QuickRecommendation::from_score(4.99), QuickRecommendation::Maintain);
        assert_eq!(QuickRecommendation::from_score(5.0), QuickRecommendation::Rest);
    }

    #[test]
    fn test_invalid_input() {
        assert_eq!(
            quick_score(150.0, "fast", 3.1),
            Err(QuickScoreError::InvalidPace("fast".to_string()))
        );
        assert!(matches!(
            quick_score(0.0, "8:00", 3.1),
            Err(QuickScoreError::InvalidValue { field: "heart rate", .. })
        ));
        assert!(quick_score(150.0, "0:00", 3.1).is_err());
        assert!(quick_score(150.0, "8:00", -1.0).is_err());
    }
}
