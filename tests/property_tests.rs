use chrono::{Days, NaiveDate};
use loadwise::models::{AthleteProfile, RunRecord};
use loadwise::variability::{floored_std_dev, STD_DEV_FLOOR};
use loadwise::AnalyticsEngine;
use proptest::prelude::*;

/// Property-based tests for the assessment invariants

#[derive(Debug, Clone)]
struct Session {
    duration: f64,
    avg_hr: f64,
    rhr: f64,
    hrv: f64,
    hrr: f64,
    tss: Option<f64>,
}

fn session_strategy() -> impl Strategy<Value = Session> {
    (
        0.0f64..240.0,
        0.0f64..210.0,
        30.0f64..90.0,
        0.0f64..150.0,
        0.0f64..60.0,
        proptest::option::of(0.0f64..400.0),
    )
        .prop_map(|(duration, avg_hr, rhr, hrv, hrr, tss)| Session {
            duration,
            avg_hr,
            rhr,
            hrv,
            hrr,
            tss,
        })
}

fn profile_strategy() -> impl Strategy<Value = AthleteProfile> {
    (
        prop::sample::select(vec!["Beginner", "Intermediate", "Expert", "Elite", ""]),
        prop::sample::select(vec!["18-29", "30-39", "40-49", "50-59", "60+", "unknown"]),
    )
        .prop_map(|(tier, age)| AthleteProfile::from_strings(tier, age))
}

fn to_history(sessions: &[Session]) -> Vec<RunRecord> {
    let latest = NaiveDate::from_ymd_opt(2024, 9, 30).unwrap();
    sessions
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let mut record = RunRecord::new(
                latest.checked_sub_days(Days::new(i as u64)).unwrap(),
                s.duration,
                s.duration / 5.5,
                s.avg_hr,
                s.rhr,
                s.hrv,
                s.hrr,
                50.0,
            );
            record.training_stress_score = s.tss;
            record
        })
        .collect()
}

proptest! {
    #[test]
    fn test_score_is_bounded_multiple_of_twenty(
        sessions in prop::collection::vec(session_strategy(), 0..60),
        profile in profile_strategy()
    ) {
        let assessment = AnalyticsEngine::new().assess(&to_history(&sessions), &profile);

        prop_assert!(assessment.injury_risk_score <= 100);
        prop_assert_eq!(assessment.injury_risk_score % 20, 0);
        prop_assert_eq!(
            assessment.injury_risk_score as usize,
            assessment.triggered_risks.len() * 20
        );
    }

    #[test]
    fn test_ratio_never_nan_or_infinite(
        sessions in prop::collection::vec(session_strategy(), 0..60),
        profile in profile_strategy()
    ) {
        let assessment = AnalyticsEngine::new().assess(&to_history(&sessions), &profile);

        if let Some(ratio) = assessment.acute_chronic_ratio {
            prop_assert!(ratio.is_finite());
            prop_assert!(ratio >= 0.0);
            prop_assert!(assessment.chronic_load.unwrap() > 0.0);
        }
        if let Some(index) = assessment.overtraining_warning_index {
            prop_assert!(index.is_finite());
        }
        if let Some(monotony) = assessment.monotony {
            prop_assert!(monotony.is_finite());
        }
    }

    #[test]
    fn test_empty_history_only_when_no_sessions(
        sessions in prop::collection::vec(session_strategy(), 0..10)
    ) {
        let assessment = AnalyticsEngine::new()
            .assess(&to_history(&sessions), &AthleteProfile::default());

        prop_assert_eq!(assessment.has_data(), !sessions.is_empty());
        prop_assert_eq!(assessment.records_evaluated, sessions.len().min(7));
        if sessions.is_empty() {
            prop_assert_eq!(assessment.injury_risk_score, 0);
            prop_assert!(assessment.alerts.is_empty());
        }
    }

    #[test]
    fn test_assessment_is_idempotent(
        sessions in prop::collection::vec(session_strategy(), 0..60),
        profile in profile_strategy()
    ) {
        let engine = AnalyticsEngine::new();
        let history = to_history(&sessions);

        prop_assert_eq!(engine.assess(&history, &profile), engine.assess(&history, &profile));
    }

    #[test]
    fn test_std_dev_floor(values in prop::collection::vec(0.0f64..500.0, 0..20)) {
        let std_dev = floored_std_dev(&values);

        prop_assert!(std_dev > 0.0);
        if values.len() < 2 || values.iter().all(|v| *v == values[0]) {
            prop_assert_eq!(std_dev, STD_DEV_FLOOR);
        }
    }

    #[test]
    fn test_constant_load_ratio_is_one(
        tss in 1.0f64..300.0,
        sessions in 1usize..60
    ) {
        let history: Vec<RunRecord> = to_history(&vec![
            Session { duration: 50.0, avg_hr: 150.0, rhr: 50.0, hrv: 60.0, hrr: 25.0, tss: Some(tss) };
            sessions
        ]);
        let assessment = AnalyticsEngine::new().assess(&history, &AthleteProfile::default());

        let ratio = assessment.acute_chronic_ratio.unwrap();
        prop_assert!((ratio - 1.0).abs() < 1e-9);
    }
}
