//! Synthetic run history generation for tests and demos.

use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::history::RunHistory;
use crate::models::RunRecord;

/// A block of heavier training at the end of the generated history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverloadBlock {
    /// Number of most recent days affected
    pub days: usize,
    /// Duration multiplier for sessions in the block
    pub duration_factor: f64,
    /// Resting heart rate offset in bpm
    pub resting_hr_shift: f64,
    /// HRV offset in ms (negative suppresses HRV)
    pub hrv_shift: f64,
}

impl Default for OverloadBlock {
    fn default() -> Self {
        Self {
            days: 7,
            duration_factor: 1.8,
            resting_hr_shift: 6.0,
            hrv_shift: -15.0,
        }
    }
}

/// Configuration for synthetic history generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticConfig {
    /// Mean and standard deviation of session duration (minutes).
    pub duration_minutes: (f64, f64),
    /// Mean and standard deviation of average heart rate (bpm).
    pub avg_heart_rate: (f64, f64),
    /// Mean and standard deviation of resting heart rate (bpm).
    pub resting_heart_rate: (f64, f64),
    /// Mean and standard deviation of HRV (ms).
    pub heart_rate_variability_ms: (f64, f64),
    /// Mean and standard deviation of heart rate recovery (bpm).
    pub heart_rate_recovery_bpm: (f64, f64),
    /// Mean and standard deviation of VO2max.
    pub vo2_max: (f64, f64),
    /// Average running pace used to derive distance (min/km).
    pub pace_min_per_km: f64,
    /// Probability that a day has no session.
    pub rest_day_probability: f64,
    /// Optional overload block over the most recent days.
    pub overload: Option<OverloadBlock>,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            duration_minutes: (50.0, 15.0),
            avg_heart_rate: (148.0, 8.0),
            resting_heart_rate: (52.0, 2.0),
            heart_rate_variability_ms: (62.0, 8.0),
            heart_rate_recovery_bpm: (24.0, 4.0),
            vo2_max: (50.0, 1.0),
            pace_min_per_km: 5.5,
            rest_day_probability: 0.2,
            overload: None,
        }
    }
}

/// Generates reproducible synthetic run histories.
pub struct SyntheticHistoryGenerator {
    config: SyntheticConfig,
}

impl SyntheticHistoryGenerator {
    /// Creates a generator with default configuration.
    pub fn new() -> Self {
        Self {
            config: SyntheticConfig::default(),
        }
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: SyntheticConfig) -> Self {
        Self { config }
    }

    /// Generates `days` calendar days ending at `end_date` from a fixed seed.
    pub fn generate_seeded(&self, days: usize, end_date: NaiveDate, seed: u64) -> RunHistory {
        let mut rng = StdRng::seed_from_u64(seed);
        self.generate(days, end_date, &mut rng)
    }

    /// Generates `days` calendar days ending at `end_date`.
    ///
    /// Rest days produce no record. TSS is left unset so the engine derives it
    /// from heart rate.
    pub fn generate(&self, days: usize, end_date: NaiveDate, rng: &mut impl Rng) -> RunHistory {
        let cfg = &self.config;

        (0..days)
            .filter_map(|offset| {
                let date = end_date.checked_sub_days(Days::new(offset as u64))?;
                if rng.gen_bool(cfg.rest_day_probability.clamp(0.0, 1.0)) {
                    return None;
                }

                let overload = cfg.overload.filter(|block| offset < block.days);

                let duration_factor = overload.map_or(1.0, |b| b.duration_factor);
                let rhr_shift = overload.map_or(0.0, |b| b.resting_hr_shift);
                let hrv_shift = overload.map_or(0.0, |b| b.hrv_shift);

                let duration = sample(rng, cfg.duration_minutes, 10.0) * duration_factor;
                let avg_hr = sample(rng, cfg.avg_heart_rate, 90.0).min(200.0);
                let rhr = sample(rng, cfg.resting_heart_rate, 35.0) + rhr_shift;
                let hrv = (sample(rng, cfg.heart_rate_variability_ms, 10.0) + hrv_shift).max(5.0);
                let hrr = sample(rng, cfg.heart_rate_recovery_bpm, 5.0);
                let vo2 = sample(rng, cfg.vo2_max, 20.0);
                let distance = duration / cfg.pace_min_per_km.max(1.0);

                Some(RunRecord::new(
                    date,
                    round1(duration),
                    round2(distance),
                    avg_hr.round(),
                    rhr.round(),
                    round1(hrv),
                    hrr.round(),
                    round1(vo2),
                ))
            })
            .collect()
    }
}

impl Default for SyntheticHistoryGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Normal sample clamped to a biologically positive minimum.
fn sample(rng: &mut impl Rng, (mean, std_dev): (f64, f64), min: f64) -> f64 {
    let value = match Normal::new(mean, std_dev.max(0.0)) {
        Ok(normal) => normal.sample(rng),
        Err(_) => mean,
    };
    value.max(min)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
