//! Recovery biomarker and training variability analysis
//!
//! Windowed means of resting heart rate (RHR), heart rate variability (HRV),
//! heart rate recovery (HRR) and VO2max, plus the population standard
//! deviation of TSS used for monotony.
//!
//! # Trend detection
//!
//! Trends compare the window mean against the most recent session's raw value,
//! so they act as an early-warning signal on the latest reading rather than an
//! average-versus-average trend:
//!
//! - RHR: `mean - latest >= rhr_drift_bpm`
//! - HRV: `latest - mean >= hrv_rise_ms`
//! - HRR: `mean < hrr_floor_bpm` (absolute, not a trend)

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::models::{RecoverySnapshot, RunRecord};

/// Standard deviation used when the window cannot produce a usable dispersion
pub const STD_DEV_FLOOR: f64 = 1.0;

/// Population standard deviations at or below this are treated as zero
const STD_DEV_EPSILON: f64 = 1e-9;

/// Trigger levels for biomarker trend detection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendThresholds {
    /// Window mean RHR above the latest reading by at least this many bpm
    pub rhr_drift_bpm: f64,

    /// Latest HRV above the window mean by at least this many ms
    pub hrv_rise_ms: f64,

    /// Mean HRR below this many bpm
    pub hrr_floor_bpm: f64,
}

impl Default for TrendThresholds {
    fn default() -> Self {
        TrendThresholds {
            rhr_drift_bpm: 5.0,
            hrv_rise_ms: 15.0,
            hrr_floor_bpm: 12.0,
        }
    }
}

/// Statistics over the variability window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowStats {
    pub mean_resting_heart_rate: f64,
    pub mean_heart_rate_variability_ms: f64,
    pub mean_heart_rate_recovery_bpm: f64,
    pub mean_vo2_max: f64,

    /// Population standard deviation of TSS, floored to 1.0 when degenerate
    pub std_dev_tss: f64,

    /// Number of sessions the statistics cover
    pub window_len: usize,
}

impl WindowStats {
    pub fn recovery_snapshot(&self) -> RecoverySnapshot {
        RecoverySnapshot {
            resting_heart_rate: self.mean_resting_heart_rate,
            heart_rate_variability_ms: self.mean_heart_rate_variability_ms,
            heart_rate_recovery_bpm: self.mean_heart_rate_recovery_bpm,
            vo2_max: self.mean_vo2_max,
        }
    }
}

/// Which biomarker warnings fired for the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BiomarkerTrends {
    pub resting_hr_drift: bool,
    pub hrv_surge: bool,
    pub low_hr_recovery: bool,
}

/// Windowed recovery and load variability analyzer
pub struct VariabilityAnalyzer {
    window: usize,
    thresholds: TrendThresholds,
}

impl VariabilityAnalyzer {
    /// Create analyzer over the 7 most recent sessions
    pub fn new() -> Self {
        VariabilityAnalyzer {
            window: 7,
            thresholds: TrendThresholds::default(),
        }
    }

    pub fn with_config(window: usize, thresholds: TrendThresholds) -> Self {
        VariabilityAnalyzer { window, thresholds }
    }

    /// Statistics over the first `window` records
    ///
    /// `records` and `tss` are both ordered most recent first and `tss[i]` is the
    /// stress score of `records[i]`. Returns None when the window is empty.
    pub fn windowed(&self, records: &[RunRecord], tss: &[f64]) -> Option<WindowStats> {
        let take = self.window.min(records.len()).min(tss.len());
        if take == 0 {
            return None;
        }
        let window = &records[..take];

        Some(WindowStats {
            mean_resting_heart_rate: window.iter().map(|r| r.resting_heart_rate).mean(),
            mean_heart_rate_variability_ms: window
                .iter()
                .map(|r| r.heart_rate_variability_ms)
                .mean(),
            mean_heart_rate_recovery_bpm: window.iter().map(|r| r.heart_rate_recovery_bpm).mean(),
            mean_vo2_max: window.iter().map(|r| r.vo2_max).mean(),
            std_dev_tss: floored_std_dev(&tss[..take]),
            window_len: take,
        })
    }

    /// Compare the most recent session against the window means
    pub fn trends(&self, records: &[RunRecord], stats: &WindowStats) -> BiomarkerTrends {
        let Some(latest) = records.first() else {
            return BiomarkerTrends::default();
        };

        BiomarkerTrends {
            resting_hr_drift: stats.mean_resting_heart_rate - latest.resting_heart_rate
                >= self.thresholds.rhr_drift_bpm,
            hrv_surge: latest.heart_rate_variability_ms - stats.mean_heart_rate_variability_ms
                >= self.thresholds.hrv_rise_ms,
            low_hr_recovery: stats.mean_heart_rate_recovery_bpm < self.thresholds.hrr_floor_bpm,
        }
    }
}

impl Default for VariabilityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Population standard deviation (divide by N), with the 1.0 floor applied
/// to windows of fewer than two values or with no measurable dispersion
pub fn floored_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return STD_DEV_FLOOR;
    }

    let std_dev = values.iter().population_std_dev();
    if !std_dev.is_finite() || std_dev <= STD_DEV_EPSILON {
        STD_DEV_FLOOR
    } else {
        std_dev
    }
}
