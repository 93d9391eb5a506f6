use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{ImportError, Result};
use crate::import::{extension_of, ImportFormat};
use crate::models::RunRecord;

/// Date formats accepted in the date column, tried in order
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Columns every row must provide
const REQUIRED_FIELDS: [&str; 8] = [
    "date",
    "duration_minutes",
    "distance_km",
    "avg_heart_rate",
    "resting_heart_rate",
    "heart_rate_variability_ms",
    "heart_rate_recovery_bpm",
    "vo2_max",
];

/// CSV importer with flexible column mapping
pub struct CsvImporter {
    column_mapping: HashMap<String, String>,
}

impl CsvImporter {
    pub fn new() -> Self {
        let mut column_mapping = HashMap::new();

        // Common column name variations
        Self::add_mapping(
            &mut column_mapping,
            "date",
            &["date", "day", "session_date", "start_date"],
        );
        Self::add_mapping(
            &mut column_mapping,
            "duration_minutes",
            &["duration_minutes", "duration", "duration_min", "minutes", "time_min"],
        );
        Self::add_mapping(
            &mut column_mapping,
            "distance_km",
            &["distance_km", "distance", "dist", "km"],
        );
        Self::add_mapping(
            &mut column_mapping,
            "avg_heart_rate",
            &["avg_heart_rate", "avg_hr", "hr", "heart_rate", "average_heart_rate"],
        );
        Self::add_mapping(
            &mut column_mapping,
            "resting_heart_rate",
            &["resting_heart_rate", "rhr", "resting_hr"],
        );
        Self::add_mapping(
            &mut column_mapping,
            "heart_rate_variability_ms",
            &["heart_rate_variability_ms", "hrv", "hrv_ms", "rmssd"],
        );
        Self::add_mapping(
            &mut column_mapping,
            "heart_rate_recovery_bpm",
            &["heart_rate_recovery_bpm", "hrr", "heart_rate_recovery", "hr_recovery"],
        );
        Self::add_mapping(
            &mut column_mapping,
            "vo2_max",
            &["vo2_max", "vo2max", "vo2"],
        );
        Self::add_mapping(
            &mut column_mapping,
            "training_stress_score",
            &["training_stress_score", "tss"],
        );
        Self::add_mapping(
            &mut column_mapping,
            "avg_power_watts",
            &["avg_power_watts", "avg_power", "power", "watts"],
        );
        Self::add_mapping(&mut column_mapping, "steps", &["steps", "step_count"]);
        Self::add_mapping(
            &mut column_mapping,
            "ground_contact_time_ms",
            &["ground_contact_time_ms", "ground_contact_time", "gct"],
        );
        Self::add_mapping(
            &mut column_mapping,
            "vertical_oscillation_cm",
            &["vertical_oscillation_cm", "vertical_oscillation", "vo"],
        );
        Self::add_mapping(
            &mut column_mapping,
            "active_energy_kcal",
            &["active_energy_kcal", "active_energy", "calories", "kcal"],
        );

        Self { column_mapping }
    }

    fn add_mapping(mapping: &mut HashMap<String, String>, standard: &str, variations: &[&str]) {
        for variation in variations {
            mapping.insert(variation.to_lowercase(), standard.to_string());
        }
    }

    /// Normalize column name using mapping
    fn normalize_column_name(&self, column: &str) -> Option<&str> {
        let key = column.trim().to_lowercase().replace([' ', '-'], "_");
        self.column_mapping.get(&key).map(String::as_str)
    }

    /// Map standard field names to column positions; the first matching column wins
    fn header_index(&self, headers: &StringRecord) -> Result<HashMap<String, usize>> {
        let mut index = HashMap::new();
        for (i, header) in headers.iter().enumerate() {
            match self.normalize_column_name(header) {
                Some(standard) => {
                    index.entry(standard.to_string()).or_insert(i);
                }
                None => tracing::trace!(column = header, "Ignoring unmapped CSV column"),
            }
        }

        if let Some(missing) = REQUIRED_FIELDS.iter().find(|f| !index.contains_key(**f)) {
            return Err(ImportError::MissingField {
                field: missing.to_string(),
            }
            .into());
        }
        Ok(index)
    }

    fn parse_row(
        &self,
        row: &StringRecord,
        index: &HashMap<String, usize>,
        line: u64,
    ) -> Result<RunRecord> {
        let row = MappedRow { row, index, line };

        let mut record = RunRecord::new(
            parse_date(row.text("date")?)?,
            row.required("duration_minutes")?,
            row.required("distance_km")?,
            row.required("avg_heart_rate")?,
            row.required("resting_heart_rate")?,
            row.required("heart_rate_variability_ms")?,
            row.required("heart_rate_recovery_bpm")?,
            row.required("vo2_max")?,
        );
        record.training_stress_score = row.optional("training_stress_score")?;
        record.avg_power_watts = row.optional("avg_power_watts")?;
        record.steps = row.optional("steps")?;
        record.ground_contact_time_ms = row.optional("ground_contact_time_ms")?;
        record.vertical_oscillation_cm = row.optional("vertical_oscillation_cm")?;
        record.active_energy_kcal = row.optional("active_energy_kcal")?;

        Ok(record)
    }
}

/// One data row viewed through the header mapping
struct MappedRow<'a> {
    row: &'a StringRecord,
    index: &'a HashMap<String, usize>,
    line: u64,
}

impl<'a> MappedRow<'a> {
    /// Trimmed, non-empty cell for a standard field
    fn cell(&self, field: &str) -> Option<&'a str> {
        self.index
            .get(field)
            .and_then(|&i| self.row.get(i))
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    fn text(&self, field: &str) -> Result<&'a str> {
        self.cell(field).ok_or_else(|| {
            ImportError::MissingField {
                field: field.to_string(),
            }
            .into()
        })
    }

    fn required(&self, field: &str) -> Result<f64> {
        parse_number(self.text(field)?, field, self.line)
    }

    fn optional(&self, field: &str) -> Result<Option<f64>> {
        self.cell(field)
            .map(|raw| parse_number(raw, field, self.line))
            .transpose()
    }
}

impl Default for CsvImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportFormat for CsvImporter {
    fn can_import(&self, file_path: &Path) -> bool {
        extension_of(file_path).as_deref() == Some("csv")
    }

    fn import_file(&self, file_path: &Path) -> Result<Vec<RunRecord>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(file_path)
            .map_err(|e| csv_error(e, 1))?;

        let headers = reader.headers().map_err(|e| csv_error(e, 1))?.clone();
        let index = self.header_index(&headers)?;

        let mut records = Vec::new();
        for result in reader.records() {
            let row = result.map_err(|e| {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                csv_error(e, line)
            })?;
            let line = row.position().map(|p| p.line()).unwrap_or(0);

            // Skip blank lines
            if row.iter().all(|value| value.trim().is_empty()) {
                continue;
            }

            records.push(self.parse_row(&row, &index, line)?);
        }

        Ok(records)
    }

    fn format_name(&self) -> &'static str {
        "CSV"
    }
}

/// Parse a date in any of the accepted formats
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .ok_or_else(|| {
            ImportError::InvalidDate {
                value: value.to_string(),
            }
            .into()
        })
}

fn parse_number(raw: &str, field: &str, line: u64) -> Result<f64> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ImportError::Parse {
            format: "CSV".to_string(),
            line,
            reason: format!("invalid {} '{}'", field, raw),
        }
        .into()),
    }
}

fn csv_error(err: csv::Error, line: u64) -> crate::error::LoadWiseError {
    if err.is_io_error() {
        if let csv::ErrorKind::Io(io) = err.into_kind() {
            return io.into();
        }
        return ImportError::Parse {
            format: "CSV".to_string(),
            line,
            reason: "I/O failure".to_string(),
        }
        .into();
    }
    ImportError::Parse {
        format: "CSV".to_string(),
        line,
        reason: err.to_string(),
    }
    .into()
}
