use crate::models::RunRecord;
use serde::{Deserialize, Serialize};

/// Default lactate threshold heart rate (bpm)
pub const DEFAULT_LTHR: f64 = 165.0;

/// TSS calculation result with method used
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TssResult {
    pub tss: f64,
    pub method: TssMethod,
    pub intensity_factor: Option<f64>,
}

/// Where a session's TSS came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TssMethod {
    Recorded,       // Supplied by the acquisition layer
    HeartRateBased, // hrTSS from average heart rate vs LTHR
}

/// Heart-rate based Training Stress Score calculator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TssCalculator {
    lactate_threshold_hr: f64,
}

impl TssCalculator {
    /// Create calculator using the default 165 bpm LTHR
    pub fn new() -> Self {
        TssCalculator {
            lactate_threshold_hr: DEFAULT_LTHR,
        }
    }

    /// Create calculator with an athlete-specific LTHR
    ///
    /// The caller is responsible for passing a positive value; `EngineConfig::validate`
    /// rejects anything else before an engine is built.
    pub fn with_lthr(lactate_threshold_hr: f64) -> Self {
        TssCalculator {
            lactate_threshold_hr,
        }
    }

    pub fn lactate_threshold_hr(&self) -> f64 {
        self.lactate_threshold_hr
    }

    /// IF = avg_heart_rate / LTHR
    pub fn intensity_factor(&self, avg_heart_rate: f64) -> f64 {
        avg_heart_rate / self.lactate_threshold_hr
    }

    /// hrTSS = duration_hours × IF² × 100
    pub fn heart_rate_tss(&self, duration_minutes: f64, avg_heart_rate: f64) -> TssResult {
        let intensity_factor = self.intensity_factor(avg_heart_rate);
        let duration_hours = duration_minutes / 60.0;
        let tss = duration_hours * intensity_factor.powi(2) * 100.0;

        TssResult {
            tss,
            method: TssMethod::HeartRateBased,
            intensity_factor: Some(intensity_factor),
        }
    }

    /// TSS for a session: the recorded value when present, otherwise hrTSS
    pub fn session_tss(&self, record: &RunRecord) -> TssResult {
        match record.training_stress_score {
            Some(tss) => TssResult {
                tss,
                method: TssMethod::Recorded,
                intensity_factor: None,
            },
            None => self.heart_rate_tss(record.duration_minutes, record.avg_heart_rate),
        }
    }

    /// TSS for each record, preserving order
    pub fn series(&self, records: &[RunRecord]) -> Vec<f64> {
        records.iter().map(|r| self.session_tss(r).tss).collect()
    }
}

impl Default for TssCalculator {
    fn default() -> Self {
        Self::new()
    }
}
