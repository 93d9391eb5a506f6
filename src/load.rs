use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Acute and chronic load over the most recent sessions
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RollingLoad {
    /// Mean TSS over the acute window
    pub acute_load: Option<f64>,

    /// Mean TSS over the chronic window
    pub chronic_load: Option<f64>,

    /// Acute:chronic ratio, present only when chronic load is positive
    pub ratio: Option<f64>,
}

/// Acute:chronic ratio classification against a personal threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatioZone {
    /// Below 0.8: load is dropping off
    Undertrained,
    /// Between 0.8 and the personal threshold
    Optimal,
    /// Above the personal threshold
    Overreaching,
}

impl RatioZone {
    const UNDERTRAINED_BELOW: f64 = 0.8;

    pub fn from_ratio(ratio: f64, threshold: f64) -> Self {
        if ratio > threshold {
            RatioZone::Overreaching
        } else if ratio < Self::UNDERTRAINED_BELOW {
            RatioZone::Undertrained
        } else {
            RatioZone::Optimal
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RatioZone::Undertrained => "Undertrained (recent load well below your base)",
            RatioZone::Optimal => "Optimal (load progressing safely)",
            RatioZone::Overreaching => "Overreaching (recent load spike)",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            RatioZone::Undertrained => "Train harder!",
            RatioZone::Optimal => "Maintain current training.",
            RatioZone::Overreaching => "Take a rest day!",
        }
    }
}

/// Rolling window load calculator
///
/// Windows count sessions, not calendar days: the acute load is the mean of
/// the most recent `acute_window` records regardless of gaps between them.
pub struct RollingLoadCalculator {
    acute_window: usize,
    chronic_window: usize,
}

impl RollingLoadCalculator {
    /// Create calculator with the standard 7/42 session windows
    pub fn new() -> Self {
        RollingLoadCalculator {
            acute_window: 7,
            chronic_window: 42,
        }
    }

    /// Create calculator with custom window sizes
    pub fn with_windows(acute_window: usize, chronic_window: usize) -> Self {
        RollingLoadCalculator {
            acute_window,
            chronic_window,
        }
    }

    /// Compute rolling loads from TSS values ordered most recent first
    pub fn compute(&self, tss_newest_first: &[f64]) -> RollingLoad {
        let acute_load = window_mean(tss_newest_first, self.acute_window);
        let chronic_load = window_mean(tss_newest_first, self.chronic_window);

        let ratio = match (acute_load, chronic_load) {
            (Some(acute), Some(chronic)) if chronic > 0.0 => {
                let ratio = acute / chronic;
                ratio.is_finite().then_some(ratio)
            }
            _ => None,
        };

        RollingLoad {
            acute_load,
            chronic_load,
            ratio,
        }
    }
}

impl Default for RollingLoadCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Mean of the first `min(window, len)` values; None for an empty window
pub(crate) fn window_mean(values: &[f64], window: usize) -> Option<f64> {
    let take = window.min(values.len());
    if take == 0 {
        return None;
    }
    Some(values[..take].iter().mean())
}
