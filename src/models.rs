use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::load::RatioZone;
use crate::risk::SubRisk;

/// One completed training session, already summarized by the acquisition layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Calendar day of the session (one record per day)
    pub date: NaiveDate,

    /// Session duration in minutes
    pub duration_minutes: f64,

    /// Distance covered in kilometers
    pub distance_km: f64,

    /// Average heart rate during the session (bpm)
    pub avg_heart_rate: f64,

    /// Resting heart rate measured on the session day (bpm)
    pub resting_heart_rate: f64,

    /// Heart rate variability (RMSSD, milliseconds)
    pub heart_rate_variability_ms: f64,

    /// Heart rate drop one minute after the session (bpm)
    pub heart_rate_recovery_bpm: f64,

    /// Estimated VO2max (ml/kg/min)
    pub vo2_max: f64,

    /// Training Stress Score - derived from heart rate when absent
    #[serde(default)]
    pub training_stress_score: Option<f64>,

    /// Average running power in watts (display only)
    #[serde(default)]
    pub avg_power_watts: Option<f64>,

    /// Step count (display only)
    #[serde(default)]
    pub steps: Option<f64>,

    /// Ground contact time in milliseconds (display only)
    #[serde(default)]
    pub ground_contact_time_ms: Option<f64>,

    /// Vertical oscillation in centimeters (display only)
    #[serde(default)]
    pub vertical_oscillation_cm: Option<f64>,

    /// Active energy in kilocalories (display only)
    #[serde(default)]
    pub active_energy_kcal: Option<f64>,
}

impl RunRecord {
    /// Create a record from the fields the analytics engine consumes
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        date: NaiveDate,
        duration_minutes: f64,
        distance_km: f64,
        avg_heart_rate: f64,
        resting_heart_rate: f64,
        heart_rate_variability_ms: f64,
        heart_rate_recovery_bpm: f64,
        vo2_max: f64,
    ) -> Self {
        RunRecord {
            date,
            duration_minutes,
            distance_km,
            avg_heart_rate,
            resting_heart_rate,
            heart_rate_variability_ms,
            heart_rate_recovery_bpm,
            vo2_max,
            training_stress_score: None,
            avg_power_watts: None,
            steps: None,
            ground_contact_time_ms: None,
            vertical_oscillation_cm: None,
            active_energy_kcal: None,
        }
    }

    /// Attach a precomputed Training Stress Score
    pub fn with_tss(mut self, tss: f64) -> Self {
        self.training_stress_score = Some(tss);
        self
    }
}

/// Running experience tier selected during onboarding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperienceTier {
    Beginner,
    Intermediate,
    Expert,
    /// Any value the profile store hands us that is not one of the above
    #[serde(other)]
    Unrecognized,
}

impl ExperienceTier {
    /// Lenient parse; unknown strings map to `Unrecognized` rather than failing
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "beginner" => ExperienceTier::Beginner,
            "intermediate" => ExperienceTier::Intermediate,
            "expert" => ExperienceTier::Expert,
            _ => ExperienceTier::Unrecognized,
        }
    }
}

impl fmt::Display for ExperienceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperienceTier::Beginner => write!(f, "Beginner"),
            ExperienceTier::Intermediate => write!(f, "Intermediate"),
            ExperienceTier::Expert => write!(f, "Expert"),
            ExperienceTier::Unrecognized => write!(f, "Unrecognized"),
        }
    }
}

/// Age bracket selected during onboarding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "18-29")]
    From18To29,
    #[serde(rename = "30-39")]
    From30To39,
    #[serde(rename = "40-49")]
    From40To49,
    #[serde(rename = "50-59")]
    From50To59,
    #[serde(rename = "60+")]
    SixtyPlus,
    #[serde(other)]
    Unrecognized,
}

impl AgeGroup {
    /// Lenient parse from the profile store's string form
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "18-29" => AgeGroup::From18To29,
            "30-39" => AgeGroup::From30To39,
            "40-49" => AgeGroup::From40To49,
            "50-59" => AgeGroup::From50To59,
            "60+" => AgeGroup::SixtyPlus,
            _ => AgeGroup::Unrecognized,
        }
    }

    /// Age groups that receive the lower overtraining threshold
    pub fn is_masters(&self) -> bool {
        matches!(self, AgeGroup::From50To59 | AgeGroup::SixtyPlus)
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AgeGroup::From18To29 => "18-29",
            AgeGroup::From30To39 => "30-39",
            AgeGroup::From40To49 => "40-49",
            AgeGroup::From50To59 => "50-59",
            AgeGroup::SixtyPlus => "60+",
            AgeGroup::Unrecognized => "unrecognized",
        };
        write!(f, "{}", label)
    }
}

/// Athlete profile supplied by the caller for each assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AthleteProfile {
    pub experience_tier: ExperienceTier,
    pub age_group: AgeGroup,
}

impl AthleteProfile {
    pub fn new(experience_tier: ExperienceTier, age_group: AgeGroup) -> Self {
        AthleteProfile {
            experience_tier,
            age_group,
        }
    }

    /// Build a profile from the plain strings the profile store keeps
    pub fn from_strings(experience: &str, age_group: &str) -> Self {
        AthleteProfile {
            experience_tier: ExperienceTier::parse(experience),
            age_group: AgeGroup::parse(age_group),
        }
    }
}

impl Default for AthleteProfile {
    fn default() -> Self {
        AthleteProfile {
            experience_tier: ExperienceTier::Beginner,
            age_group: AgeGroup::From18To29,
        }
    }
}

/// Averages of the recovery biomarkers over the evaluation window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecoverySnapshot {
    pub resting_heart_rate: f64,
    pub heart_rate_variability_ms: f64,
    pub heart_rate_recovery_bpm: f64,
    pub vo2_max: f64,
}

/// Result of one assessment call
///
/// Recomputed from scratch on every call; optional fields are absent when the
/// history is too short for the corresponding metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadAssessment {
    /// Mean TSS over the acute window (7 sessions)
    pub acute_load: Option<f64>,

    /// Mean TSS over the chronic window (42 sessions)
    pub chronic_load: Option<f64>,

    /// Acute load divided by chronic load
    pub acute_chronic_ratio: Option<f64>,

    /// Continuous overtraining composite
    pub overtraining_warning_index: Option<f64>,

    /// Discrete injury risk score, 0-100 in steps of 20
    pub injury_risk_score: u8,

    /// Human-readable warnings in evaluation order
    pub alerts: Vec<String>,

    /// Recovery biomarker averages over the variability window
    pub recovery_snapshot: Option<RecoverySnapshot>,

    /// Personalized ratio threshold the assessment was scored against
    pub overtraining_threshold: Option<f64>,

    /// Classification of the ratio relative to the threshold
    pub ratio_zone: Option<RatioZone>,

    /// Acute load over the floored TSS standard deviation
    pub monotony: Option<f64>,

    /// Sub-risks that contributed to the injury risk score
    pub triggered_risks: Vec<SubRisk>,

    /// Number of sessions in the variability window
    pub records_evaluated: usize,
}

impl LoadAssessment {
    /// Assessment returned for an empty history
    pub fn insufficient_data() -> Self {
        LoadAssessment {
            acute_load: None,
            chronic_load: None,
            acute_chronic_ratio: None,
            overtraining_warning_index: None,
            injury_risk_score: 0,
            alerts: Vec::new(),
            recovery_snapshot: None,
            overtraining_threshold: None,
            ratio_zone: None,
            monotony: None,
            triggered_risks: Vec::new(),
            records_evaluated: 0,
        }
    }

    /// False when the assessment was produced from an empty history
    pub fn has_data(&self) -> bool {
        self.records_evaluated > 0
    }

    /// Whether the ratio is above the personalized threshold
    pub fn exceeds_threshold(&self) -> bool {
        match (self.acute_chronic_ratio, self.overtraining_threshold) {
            (Some(ratio), Some(threshold)) => ratio > threshold,
            _ => false,
        }
    }
}
