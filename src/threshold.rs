use serde::{Deserialize, Serialize};

use crate::models::{AthleteProfile, ExperienceTier};

/// Base acute:chronic thresholds by experience tier, plus the masters adjustment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdTable {
    pub beginner: f64,
    pub intermediate: f64,
    pub expert: f64,

    /// Subtracted for the 50-59 and 60+ age groups
    pub senior_adjustment: f64,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        ThresholdTable {
            beginner: 1.2,
            intermediate: 1.3,
            expert: 1.5,
            senior_adjustment: 0.2,
        }
    }
}

/// Maps an athlete profile to a personalized overtraining ratio threshold
pub struct ThresholdResolver {
    table: ThresholdTable,
}

impl ThresholdResolver {
    pub fn new() -> Self {
        ThresholdResolver {
            table: ThresholdTable::default(),
        }
    }

    pub fn with_table(table: ThresholdTable) -> Self {
        ThresholdResolver { table }
    }

    /// Resolve the threshold; unrecognized tiers fall back to the expert value
    pub fn resolve(&self, profile: &AthleteProfile) -> f64 {
        let base = match profile.experience_tier {
            ExperienceTier::Beginner => self.table.beginner,
            ExperienceTier::Intermediate => self.table.intermediate,
            ExperienceTier::Expert | ExperienceTier::Unrecognized => self.table.expert,
        };

        if profile.age_group.is_masters() {
            base - self.table.senior_adjustment
        } else {
            base
        }
    }
}

impl Default for ThresholdResolver {
    fn default() -> Self {
        Self::new()
    }
}
