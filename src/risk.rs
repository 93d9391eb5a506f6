//! Injury risk scoring and overtraining alerts
//!
//! The injury risk score is the sum of five independent sub-risks, each worth
//! exactly 0 or 20 points, so the score is always one of 0, 20, 40, 60, 80, 100.
//! The overtraining warning index is a separate continuous composite; both are
//! reported and neither overrides the other.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::variability::{BiomarkerTrends, WindowStats};

/// Points contributed by each triggered sub-risk
pub const SUB_RISK_POINTS: u8 = 20;

/// Sub-risks in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubRisk {
    /// Acute:chronic ratio above the personal threshold
    AcuteChronicRatio,
    /// Resting heart rate trend
    RestingHeartRate,
    /// Heart rate variability trend
    HeartRateVariability,
    /// Low heart rate recovery
    HeartRateRecovery,
    /// Repetitive load with little variation
    Monotony,
}

impl SubRisk {
    pub fn points(&self) -> u8 {
        SUB_RISK_POINTS
    }

    /// Alert text appended when this sub-risk fires
    ///
    /// The ratio sub-risk has no alert of its own; it is surfaced through the
    /// ratio zone instead.
    pub fn alert(&self) -> Option<&'static str> {
        match self {
            SubRisk::AcuteChronicRatio => None,
            SubRisk::RestingHeartRate => Some(
                "Resting heart rate has shifted away from your recent baseline. Watch for accumulated fatigue.",
            ),
            SubRisk::HeartRateVariability => Some(
                "Heart rate variability is swinging sharply from your recent average. Consider an easy day.",
            ),
            SubRisk::HeartRateRecovery => Some(
                "Heart rate recovery is low. Prioritize sleep and recovery sessions.",
            ),
            SubRisk::Monotony => Some(
                "Training monotony is high. Vary session intensity and duration to reduce burnout risk.",
            ),
        }
    }
}

impl fmt::Display for SubRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubRisk::AcuteChronicRatio => write!(f, "Acute:chronic ratio"),
            SubRisk::RestingHeartRate => write!(f, "Resting heart rate"),
            SubRisk::HeartRateVariability => write!(f, "Heart rate variability"),
            SubRisk::HeartRateRecovery => write!(f, "Heart rate recovery"),
            SubRisk::Monotony => write!(f, "Monotony"),
        }
    }
}

/// Output of the risk scorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// 0-100, a multiple of 20
    pub injury_risk_score: u8,

    /// Continuous composite, present only when the ratio is present
    pub overtraining_warning_index: Option<f64>,

    /// Alerts in evaluation order
    pub alerts: Vec<String>,

    /// Sub-risks that fired, in evaluation order
    pub triggered: Vec<SubRisk>,

    /// Acute load divided by the floored TSS standard deviation
    pub monotony: Option<f64>,
}

/// Combines load, biomarker trends and monotony into a bounded risk score
pub struct RiskScorer {
    monotony_limit: f64,
}

impl RiskScorer {
    pub fn new() -> Self {
        RiskScorer {
            monotony_limit: 2.0,
        }
    }

    pub fn with_monotony_limit(monotony_limit: f64) -> Self {
        RiskScorer { monotony_limit }
    }

    /// Score one assessment window
    pub fn score(
        &self,
        ratio: Option<f64>,
        threshold: f64,
        stats: &WindowStats,
        trends: &BiomarkerTrends,
        acute_load: Option<f64>,
    ) -> RiskAssessment {
        let monotony = acute_load.map(|acute| acute / stats.std_dev_tss);

        let checks = [
            (SubRisk::AcuteChronicRatio, ratio.is_some_and(|r| r > threshold)),
            (SubRisk::RestingHeartRate, trends.resting_hr_drift),
            (SubRisk::HeartRateVariability, trends.hrv_surge),
            (SubRisk::HeartRateRecovery, trends.low_hr_recovery),
            (
                SubRisk::Monotony,
                monotony.is_some_and(|m| m > self.monotony_limit),
            ),
        ];

        let triggered: Vec<SubRisk> = checks
            .iter()
            .filter(|(_, fired)| *fired)
            .map(|(risk, _)| *risk)
            .collect();

        let injury_risk_score = triggered.iter().map(|risk| risk.points()).sum();

        let alerts = triggered
            .iter()
            .filter_map(|risk| risk.alert())
            .map(str::to_string)
            .collect();

        for risk in &triggered {
            tracing::trace!(risk = %risk, "Sub-risk triggered");
        }

        RiskAssessment {
            injury_risk_score,
            overtraining_warning_index: ratio.map(|r| {
                Self::overtraining_warning_index(
                    r,
                    stats.mean_resting_heart_rate,
                    stats.mean_heart_rate_variability_ms,
                )
            }),
            alerts,
            triggered,
            monotony,
        }
    }

    /// (ratio / 2) + ((mean RHR - 50) / 10) - (mean HRV / 100)
    pub fn overtraining_warning_index(ratio: f64, mean_resting_hr: f64, mean_hrv_ms: f64) -> f64 {
        (ratio / 2.0) + ((mean_resting_hr - 50.0) / 10.0) - (mean_hrv_ms / 100.0)
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::new()
    }
}
