use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use crate::error::ExportError;
use crate::history::RunHistory;
use crate::models::{AthleteProfile, LoadAssessment};

pub mod csv;
pub mod json;
pub mod text;

/// Export format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Csv,
    Json,
    Text,
}

impl ExportFormat {
    pub fn from_str(s: &str) -> Result<Self, ExportError> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "text" | "txt" => Ok(ExportFormat::Text),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }

    /// Guess the format from an output file extension
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        Self::from_str(extension)
    }
}

/// One assessment together with what it was computed from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentReport {
    /// Where the history came from (file name or label)
    pub source: String,
    pub generated_at: DateTime<Utc>,
    pub profile: AthleteProfile,
    /// Sessions in the assessed history
    pub sessions: usize,
    /// Day of the oldest session in the history
    pub first_session: Option<NaiveDate>,
    /// Day of the newest session in the history
    pub last_session: Option<NaiveDate>,
    pub assessment: LoadAssessment,
}

impl AssessmentReport {
    pub fn new(
        source: impl Into<String>,
        profile: AthleteProfile,
        sessions: usize,
        assessment: LoadAssessment,
    ) -> Self {
        AssessmentReport {
            source: source.into(),
            generated_at: Utc::now(),
            profile,
            sessions,
            first_session: None,
            last_session: None,
            assessment,
        }
    }

    /// Report on a history, recording its session count and covered days
    pub fn for_history(
        source: impl Into<String>,
        profile: AthleteProfile,
        history: &RunHistory,
        assessment: LoadAssessment,
    ) -> Self {
        let mut report = Self::new(source, profile, history.len(), assessment);
        if let Some((first, last)) = history.date_range() {
            report.first_session = Some(first);
            report.last_session = Some(last);
        }
        report
    }
}

/// Write assessment reports in the requested format
pub fn export_reports<P: AsRef<Path>>(
    reports: &[AssessmentReport],
    format: ExportFormat,
    output_path: P,
) -> Result<(), ExportError> {
    tracing::info!(
        reports = reports.len(),
        format = ?format,
        path = %output_path.as_ref().display(),
        "Exporting assessments"
    );

    match format {
        ExportFormat::Json => json::export_json(reports, output_path),
        ExportFormat::Text => text::export_reports(reports, output_path),
        ExportFormat::Csv => csv::export_reports(reports, output_path),
    }
}

/// Write a run history, oldest session first
pub fn export_history<P: AsRef<Path>>(
    history: &RunHistory,
    format: ExportFormat,
    output_path: P,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Json => json::export_json(&history.oldest_first(), output_path),
        ExportFormat::Csv => csv::export_history(history, output_path),
        ExportFormat::Text => Err(ExportError::UnsupportedFormat(
            "text is only available for assessment reports".to_string(),
        )),
    }
}
