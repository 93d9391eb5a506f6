use chrono::{Days, NaiveDate};
use loadwise::config::AppConfig;
use loadwise::export::{self, AssessmentReport, ExportFormat};
use loadwise::import::ImportManager;
use loadwise::models::{AthleteProfile, RunRecord};
use loadwise::synthetic::{OverloadBlock, SyntheticConfig, SyntheticHistoryGenerator};
use loadwise::{AnalyticsEngine, RatioZone, RunHistory, SubRisk};
use std::fmt::Write as _;
use std::fs;
use tempfile::tempdir;

/// Integration tests that exercise complete assessment workflows

fn latest_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 30).unwrap()
}

fn day(offset: u64) -> NaiveDate {
    latest_day().checked_sub_days(Days::new(offset)).unwrap()
}

/// Newest-first history with a recorded TSS per session
fn history_from_tss(tss_newest_first: &[f64]) -> Vec<RunRecord> {
    tss_newest_first
        .iter()
        .enumerate()
        .map(|(i, &tss)| {
            RunRecord::new(day(i as u64), 50.0, 9.0, 150.0, 52.0, 62.0, 25.0, 51.0).with_tss(tss)
        })
        .collect()
}

/// CSV text with one row per day, oldest first, TSS given newest first
fn csv_history(tss_newest_first: &[f64]) -> String {
    let mut csv = String::from("Date,Duration,Distance,Avg HR,RHR,HRV,HRR,VO2max,TSS\n");
    for (i, tss) in tss_newest_first.iter().enumerate().rev() {
        writeln!(
            csv,
            "{},50,9.0,150,52,62,25,51,{}",
            day(i as u64).format("%m/%d/%Y"),
            tss
        )
        .unwrap();
    }
    csv
}

#[test]
fn test_constant_week_scenario() {
    let engine = AnalyticsEngine::new();
    let profile = AthleteProfile::from_strings("Beginner", "18-29");

    let assessment = engine.assess(&history_from_tss(&[80.0; 7]), &profile);

    assert_eq!(assessment.acute_load, Some(80.0));
    assert_eq!(assessment.chronic_load, Some(80.0));
    assert_eq!(assessment.acute_chronic_ratio, Some(1.0));
    // Zero dispersion floors the std-dev at 1.0, so monotony is 80
    assert_eq!(assessment.monotony, Some(80.0));
    assert_eq!(assessment.injury_risk_score, 20);
    assert_eq!(assessment.alerts.len(), 1);
    assert!(assessment.alerts[0].starts_with("Training monotony is high"));
}

#[test]
fn test_csv_import_to_overreaching_assessment() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("athlete.csv");

    // Seven hard sessions on top of five weeks of easy running
    let mut tss = vec![120.0; 7];
    tss.extend(std::iter::repeat(50.0).take(35));
    fs::write(&path, csv_history(&tss)).unwrap();

    let history = ImportManager::new().import_history(&path).unwrap();
    assert_eq!(history.len(), 42);

    let engine = AnalyticsEngine::new();
    let assessment = engine.assess_history(&history, &AthleteProfile::default());

    let chronic = (7.0 * 120.0 + 35.0 * 50.0) / 42.0;
    assert_eq!(assessment.acute_load, Some(120.0));
    assert!((assessment.chronic_load.unwrap() - chronic).abs() < 1e-9);
    assert!((assessment.acute_chronic_ratio.unwrap() - 120.0 / chronic).abs() < 1e-9);
    assert_eq!(assessment.ratio_zone, Some(RatioZone::Overreaching));
    assert_eq!(
        assessment.triggered_risks,
        vec![SubRisk::AcuteChronicRatio, SubRisk::Monotony]
    );
    assert_eq!(assessment.injury_risk_score, 40);
    // The ratio sub-risk scores points without adding an alert
    assert_eq!(assessment.alerts.len(), 1);
}

#[test]
fn test_masters_threshold_changes_outcome() {
    // Ratio of 1.1: fine for a young beginner, above the 60+ beginner threshold
    // Chronic mean is (7 * 110 + 35 * 98) / 42 = 100
    let mut tss = vec![110.0; 7];
    tss.extend(std::iter::repeat(98.0).take(35));
    let history = history_from_tss(&tss);

    let engine = AnalyticsEngine::new();
    let young = engine.assess(&history, &AthleteProfile::from_strings("Beginner", "18-29"));
    let masters = engine.assess(&history, &AthleteProfile::from_strings("Beginner", "60+"));

    assert!((young.acute_chronic_ratio.unwrap() - 1.1).abs() < 1e-9);
    assert!(!young.exceeds_threshold());
    assert!(masters.exceeds_threshold());
    assert!((masters.overtraining_threshold.unwrap() - 1.0).abs() < 1e-9);
    assert_eq!(masters.injury_risk_score, young.injury_risk_score + 20);
}

#[test]
fn test_biomarker_alerts() {
    let mut history = history_from_tss(&[80.0; 42]);
    for record in history.iter_mut() {
        record.resting_heart_rate = 52.0;
        record.heart_rate_variability_ms = 60.0;
        record.heart_rate_recovery_bpm = 10.0;
    }
    // Most recent day: resting HR well below and HRV well above the week's mean
    history[0].resting_heart_rate = 45.0;
    history[0].heart_rate_variability_ms = 90.0;

    let assessment = AnalyticsEngine::new().assess(&history, &AthleteProfile::default());

    assert_eq!(
        assessment.triggered_risks,
        vec![
            SubRisk::RestingHeartRate,
            SubRisk::HeartRateVariability,
            SubRisk::HeartRateRecovery,
            SubRisk::Monotony,
        ]
    );
    assert_eq!(assessment.injury_risk_score, 80);
    assert_eq!(assessment.alerts.len(), 4);

    let snapshot = assessment.recovery_snapshot.unwrap();
    assert!((snapshot.resting_heart_rate - 51.0).abs() < 1e-9);
    assert_eq!(snapshot.heart_rate_recovery_bpm, 10.0);
}

#[test]
fn test_windows_count_sessions_not_days() {
    // Sessions every third day still fill a seven-session acute window
    let history: RunHistory = (0..21u64)
        .map(|i| {
            RunRecord::new(day(i * 3), 50.0, 9.0, 150.0, 52.0, 62.0, 25.0, 51.0)
                .with_tss(if i < 7 { 90.0 } else { 60.0 })
        })
        .collect();

    let assessment = AnalyticsEngine::new().assess_history(&history, &AthleteProfile::default());

    assert_eq!(assessment.acute_load, Some(90.0));
    assert!((assessment.chronic_load.unwrap() - 70.0).abs() < 1e-9);
    assert_eq!(assessment.records_evaluated, 7);
}

#[test]
fn test_config_drives_engine() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let mut config = AppConfig::default();
    config.engine.lactate_threshold_hr = 150.0;
    config.athlete = AthleteProfile::from_strings("Expert", "30-39");
    config.save_to_file(&path).unwrap();

    let (loaded, error) = AppConfig::load_or_default(Some(&path));
    assert!(error.is_none());
    let engine = AnalyticsEngine::with_config(loaded.engine).unwrap();

    // 60 minutes at the configured threshold heart rate is 100 TSS
    let record = RunRecord::new(latest_day(), 60.0, 12.0, 150.0, 50.0, 70.0, 25.0, 52.0);
    let assessment = engine.assess(&[record], &loaded.athlete);

    assert_eq!(assessment.acute_load, Some(100.0));
    assert!((assessment.overtraining_threshold.unwrap() - 1.5).abs() < 1e-9);
}

#[test]
fn test_partial_config_profile_drives_threshold() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "[athlete]\nexperience_tier = \"Intermediate\"\nage_group = \"60+\"\n",
    )
    .unwrap();

    let (config, error) = AppConfig::load_or_default(Some(&path));
    assert!(error.is_none());

    let engine = AnalyticsEngine::with_config(config.engine).unwrap();
    let assessment = engine.assess(&history_from_tss(&[80.0; 7]), &config.athlete);

    // Intermediate 1.3 minus the masters adjustment
    assert!((assessment.overtraining_threshold.unwrap() - 1.1).abs() < 1e-9);
}

#[test]
fn test_synthetic_history_survives_export_and_import() {
    let dir = tempdir().unwrap();
    let generator = SyntheticHistoryGenerator::with_config(SyntheticConfig {
        overload: Some(OverloadBlock::default()),
        ..SyntheticConfig::default()
    });
    let history = generator.generate_seeded(60, latest_day(), 2024);

    let engine = AnalyticsEngine::new();
    let profile = AthleteProfile::from_strings("Intermediate", "40-49");
    let direct = engine.assess_history(&history, &profile);

    for name in ["synthetic.json", "synthetic.csv"] {
        let path = dir.path().join(name);
        export::export_history(&history, ExportFormat::from_path(&path).unwrap(), &path).unwrap();

        let reloaded = ImportManager::new().import_history(&path).unwrap();
        assert_eq!(engine.assess_history(&reloaded, &profile), direct);
    }
}

#[test]
fn test_directory_batch_assessment_and_report() {
    let dir = tempdir().unwrap();
    let data_dir = dir.path().join("athletes");
    fs::create_dir_all(&data_dir).unwrap();

    fs::write(data_dir.join("a_steady.csv"), csv_history(&[80.0; 14])).unwrap();
    let mut spike = vec![150.0; 7];
    spike.extend(std::iter::repeat(60.0).take(21));
    fs::write(data_dir.join("b_spike.csv"), csv_history(&spike)).unwrap();

    let histories = ImportManager::new().import_directory(&data_dir).unwrap();
    assert_eq!(histories.len(), 2);

    let profile = AthleteProfile::default();
    let inputs: Vec<(RunHistory, AthleteProfile)> = histories
        .iter()
        .map(|(_, history)| (history.clone(), profile))
        .collect();
    let results = AnalyticsEngine::new().assess_batch(&inputs);

    assert_eq!(results[0].ratio_zone, Some(RatioZone::Optimal));
    assert_eq!(results[1].ratio_zone, Some(RatioZone::Overreaching));

    let reports: Vec<AssessmentReport> = histories
        .iter()
        .zip(results)
        .map(|((path, history), assessment)| {
            AssessmentReport::for_history(path.display().to_string(), profile, history, assessment)
        })
        .collect();

    let out = dir.path().join("report.txt");
    export::export_reports(&reports, ExportFormat::Text, &out).unwrap();
    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("a_steady.csv"));
    assert!(text.contains("Overreaching"));
    assert!(text.contains(&format!("Period: {} to {}", day(13), latest_day())));
}
