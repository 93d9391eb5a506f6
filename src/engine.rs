use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LoadWiseError, Result};
use crate::history::RunHistory;
use crate::load::{RatioZone, RollingLoadCalculator};
use crate::models::{AthleteProfile, LoadAssessment, RunRecord};
use crate::risk::RiskScorer;
use crate::threshold::{ThresholdResolver, ThresholdTable};
use crate::tss::{TssCalculator, DEFAULT_LTHR};
use crate::variability::{TrendThresholds, VariabilityAnalyzer};

/// Analytics engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Lactate threshold heart rate used to derive TSS (bpm)
    pub lactate_threshold_hr: f64,

    /// Sessions in the acute load window
    pub acute_window: usize,

    /// Sessions in the chronic load window
    pub chronic_window: usize,

    /// Sessions in the biomarker / monotony window
    pub variability_window: usize,

    /// Monotony above this value triggers the monotony sub-risk
    pub monotony_limit: f64,

    /// Biomarker trend trigger levels
    pub trends: TrendThresholds,

    /// Personalized ratio thresholds
    pub thresholds: ThresholdTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            lactate_threshold_hr: DEFAULT_LTHR,
            acute_window: 7,
            chronic_window: 42,
            variability_window: 7,
            monotony_limit: 2.0,
            trends: TrendThresholds::default(),
            thresholds: ThresholdTable::default(),
        }
    }
}

impl EngineConfig {
    /// Reject configurations the engine cannot evaluate meaningfully
    pub fn validate(&self) -> Result<()> {
        if !(self.lactate_threshold_hr.is_finite() && self.lactate_threshold_hr > 0.0) {
            return Err(LoadWiseError::Configuration(format!(
                "lactate_threshold_hr must be positive, got {}",
                self.lactate_threshold_hr
            )));
        }
        if self.acute_window == 0 || self.chronic_window == 0 || self.variability_window == 0 {
            return Err(LoadWiseError::Configuration(
                "window sizes must be at least one session".to_string(),
            ));
        }
        if self.acute_window > self.chronic_window {
            return Err(LoadWiseError::Configuration(format!(
                "acute_window ({}) cannot exceed chronic_window ({})",
                self.acute_window, self.chronic_window
            )));
        }
        if !(self.monotony_limit.is_finite() && self.monotony_limit > 0.0) {
            return Err(LoadWiseError::Configuration(format!(
                "monotony_limit must be positive, got {}",
                self.monotony_limit
            )));
        }
        Ok(())
    }
}

/// Load & risk analytics engine
///
/// Stateless between calls: every assessment is recomputed from the supplied
/// history and profile, so one engine can be shared across threads.
pub struct AnalyticsEngine {
    config: EngineConfig,
    tss: TssCalculator,
    loads: RollingLoadCalculator,
    variability: VariabilityAnalyzer,
    thresholds: ThresholdResolver,
    risk: RiskScorer,
}

impl AnalyticsEngine {
    /// Create engine with the default configuration
    pub fn new() -> Self {
        Self::build(EngineConfig::default())
    }

    /// Create engine with a custom configuration
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        AnalyticsEngine {
            tss: TssCalculator::with_lthr(config.lactate_threshold_hr),
            loads: RollingLoadCalculator::with_windows(config.acute_window, config.chronic_window),
            variability: VariabilityAnalyzer::with_config(config.variability_window, config.trends),
            thresholds: ThresholdResolver::with_table(config.thresholds),
            risk: RiskScorer::with_monotony_limit(config.monotony_limit),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Assess a history ordered most recent first
    pub fn assess(&self, history: &[RunRecord], profile: &AthleteProfile) -> LoadAssessment {
        let tss = self.tss.series(history);
        let loads = self.loads.compute(&tss);

        let Some(stats) = self.variability.windowed(history, &tss) else {
            debug!("Empty history, returning insufficient-data assessment");
            return LoadAssessment::insufficient_data();
        };
        let trends = self.variability.trends(history, &stats);
        let threshold = self.thresholds.resolve(profile);
        let risk = self
            .risk
            .score(loads.ratio, threshold, &stats, &trends, loads.acute_load);

        debug!(
            records = history.len(),
            window = stats.window_len,
            ratio = ?loads.ratio,
            threshold,
            score = risk.injury_risk_score,
            "Assessment complete"
        );

        LoadAssessment {
            acute_load: loads.acute_load,
            chronic_load: loads.chronic_load,
            acute_chronic_ratio: loads.ratio,
            overtraining_warning_index: risk.overtraining_warning_index,
            injury_risk_score: risk.injury_risk_score,
            alerts: risk.alerts,
            recovery_snapshot: Some(stats.recovery_snapshot()),
            overtraining_threshold: Some(threshold),
            ratio_zone: loads.ratio.map(|r| RatioZone::from_ratio(r, threshold)),
            monotony: risk.monotony,
            triggered_risks: risk.triggered,
            records_evaluated: stats.window_len,
        }
    }

    /// Assess a day-keyed history
    pub fn assess_history(&self, history: &RunHistory, profile: &AthleteProfile) -> LoadAssessment {
        self.assess(&history.newest_first(), profile)
    }

    /// Assess independent histories in parallel, preserving input order
    pub fn assess_batch(&self, inputs: &[(RunHistory, AthleteProfile)]) -> Vec<LoadAssessment> {
        inputs
            .par_iter()
            .map(|(history, profile)| self.assess_history(history, profile))
            .collect()
    }
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new()
    }
}
