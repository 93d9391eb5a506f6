use super::{AssessmentReport, ExportError};
use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

const RULE: &str = "========================================";

/// Render one assessment as a human-readable report
pub fn render_report(report: &AssessmentReport) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_report(&mut out, report);
    out
}

fn write_report(out: &mut String, report: &AssessmentReport) -> std::fmt::Result {
    let assessment = &report.assessment;

    writeln!(out, "{}", RULE)?;
    writeln!(out, "TRAINING LOAD ASSESSMENT")?;
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Source: {}", report.source)?;
    writeln!(
        out,
        "Athlete: {} / {}",
        report.profile.experience_tier, report.profile.age_group
    )?;
    writeln!(out, "Sessions: {}", report.sessions)?;
    if let (Some(first), Some(last)) = (report.first_session, report.last_session) {
        writeln!(out, "Period: {} to {}", first, last)?;
    }
    writeln!(
        out,
        "Generated: {}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(out)?;

    if !assessment.has_data() {
        writeln!(out, "Insufficient data: log a few runs to get an assessment.")?;
        writeln!(out)?;
        writeln!(out, "No alerts")?;
        return Ok(());
    }

    writeln!(out, "TRAINING LOAD")?;
    writeln!(out, "-------------")?;
    writeln!(out, "Acute Load: {}", fmt_opt(assessment.acute_load, 1))?;
    writeln!(out, "Chronic Load: {}", fmt_opt(assessment.chronic_load, 1))?;
    match (assessment.acute_chronic_ratio, assessment.overtraining_threshold) {
        (Some(ratio), Some(threshold)) => {
            writeln!(out, "Acute:Chronic Ratio: {:.2} (threshold {:.2})", ratio, threshold)?
        }
        (ratio, _) => writeln!(out, "Acute:Chronic Ratio: {}", fmt_opt(ratio, 2))?,
    }
    if let Some(zone) = assessment.ratio_zone {
        writeln!(out, "Zone: {}", zone.description())?;
        writeln!(out, "Recommendation: {}", zone.recommendation())?;
    }
    writeln!(out)?;

    writeln!(out, "RISK")?;
    writeln!(out, "----")?;
    writeln!(out, "Injury Risk Score: {}/100", assessment.injury_risk_score)?;
    writeln!(
        out,
        "Overtraining Warning Index: {}",
        fmt_opt(assessment.overtraining_warning_index, 2)
    )?;
    writeln!(out, "Monotony: {}", fmt_opt(assessment.monotony, 2))?;
    if !assessment.triggered_risks.is_empty() {
        let names: Vec<String> = assessment
            .triggered_risks
            .iter()
            .map(|risk| risk.to_string())
            .collect();
        writeln!(out, "Triggered: {}", names.join(", "))?;
    }
    writeln!(out)?;

    if let Some(snapshot) = &assessment.recovery_snapshot {
        writeln!(out, "RECOVERY (last {} sessions)", assessment.records_evaluated)?;
        writeln!(out, "--------")?;
        writeln!(out, "Resting HR: {:.1} bpm", snapshot.resting_heart_rate)?;
        writeln!(out, "HRV: {:.1} ms", snapshot.heart_rate_variability_ms)?;
        writeln!(out, "HR Recovery: {:.1} bpm", snapshot.heart_rate_recovery_bpm)?;
        writeln!(out, "VO2max: {:.1}", snapshot.vo2_max)?;
        writeln!(out)?;
    }

    if assessment.alerts.is_empty() {
        writeln!(out, "No alerts")?;
    } else {
        writeln!(out, "ALERTS")?;
        writeln!(out, "------")?;
        for (i, alert) in assessment.alerts.iter().enumerate() {
            writeln!(out, "{}. {}", i + 1, alert)?;
        }
    }

    Ok(())
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "n/a".to_string(),
    }
}

/// Export assessment reports to human-readable text format
pub fn export_reports<P: AsRef<Path>>(
    reports: &[AssessmentReport],
    output_path: P,
) -> Result<(), ExportError> {
    let mut file = std::fs::File::create(output_path)?;

    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            writeln!(file)?;
        }
        file.write_all(render_report(report).as_bytes())?;
    }

    Ok(())
}
