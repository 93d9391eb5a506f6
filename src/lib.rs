// Library interface for LoadWise modules
// The CLI binary and integration tests both build on these

pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod history;
pub mod import;
pub mod load;
pub mod logging;
pub mod models;
pub mod quick_score;
pub mod risk;
pub mod synthetic;
pub mod threshold;
pub mod tss;
pub mod variability;

// Re-export commonly used types for convenience
pub use models::*;
pub use config::AppConfig;
pub use engine::{AnalyticsEngine, EngineConfig};
pub use history::RunHistory;
pub use load::{RatioZone, RollingLoadCalculator};
pub use risk::{RiskScorer, SubRisk};
pub use threshold::{ThresholdResolver, ThresholdTable};
pub use tss::TssCalculator;
pub use variability::{TrendThresholds, VariabilityAnalyzer};
pub use quick_score::{quick_score, QuickScore};
pub use synthetic::{SyntheticConfig, SyntheticHistoryGenerator};
pub use error::{LoadWiseError, Result};
pub use logging::{LogConfig, LogLevel, LogFormat};
