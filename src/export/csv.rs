use chrono::NaiveDate;
use csv::Writer;
use serde::Serialize;
use std::path::Path;

use super::{AssessmentReport, ExportError};
use crate::history::RunHistory;

/// Flat per-athlete row for spreadsheet use
#[derive(Debug, Serialize)]
struct AssessmentRow<'a> {
    source: &'a str,
    sessions: usize,
    experience_tier: String,
    age_group: String,
    first_session: Option<NaiveDate>,
    last_session: Option<NaiveDate>,
    acute_load: Option<f64>,
    chronic_load: Option<f64>,
    acute_chronic_ratio: Option<f64>,
    overtraining_threshold: Option<f64>,
    ratio_zone: Option<String>,
    overtraining_warning_index: Option<f64>,
    injury_risk_score: u8,
    monotony: Option<f64>,
    alerts: String,
}

impl<'a> From<&'a AssessmentReport> for AssessmentRow<'a> {
    fn from(report: &'a AssessmentReport) -> Self {
        let assessment = &report.assessment;
        AssessmentRow {
            source: &report.source,
            sessions: report.sessions,
            experience_tier: report.profile.experience_tier.to_string(),
            age_group: report.profile.age_group.to_string(),
            first_session: report.first_session,
            last_session: report.last_session,
            acute_load: assessment.acute_load,
            chronic_load: assessment.chronic_load,
            acute_chronic_ratio: assessment.acute_chronic_ratio,
            overtraining_threshold: assessment.overtraining_threshold,
            ratio_zone: assessment.ratio_zone.map(|zone| format!("{:?}", zone)),
            overtraining_warning_index: assessment.overtraining_warning_index,
            injury_risk_score: assessment.injury_risk_score,
            monotony: assessment.monotony,
            alerts: assessment.alerts.join("; "),
        }
    }
}

/// Export one row per assessment
pub fn export_reports<P: AsRef<Path>>(
    reports: &[AssessmentReport],
    output_path: P,
) -> Result<(), ExportError> {
    let mut writer = Writer::from_path(output_path).map_err(csv_error)?;

    for report in reports {
        writer
            .serialize(AssessmentRow::from(report))
            .map_err(csv_error)?;
    }

    writer.flush()?;
    Ok(())
}

/// Export a run history with the column names the CSV importer expects
pub fn export_history<P: AsRef<Path>>(
    history: &RunHistory,
    output_path: P,
) -> Result<(), ExportError> {
    let mut writer = Writer::from_path(output_path).map_err(csv_error)?;

    for record in history.iter_oldest_first() {
        writer.serialize(record).map_err(csv_error)?;
    }

    writer.flush()?;
    Ok(())
}

fn csv_error(err: csv::Error) -> ExportError {
    if err.is_io_error() {
        if let csv::ErrorKind::Io(io) = err.into_kind() {
            return ExportError::Io(io);
        }
        return ExportError::Serialization("CSV I/O failure".to_string());
    }
    ExportError::Serialization(err.to_string())
}
