use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

use crate::error::{ErrorSeverity, ImportError, LoadWiseError, Result};
use crate::history::RunHistory;
use crate::models::RunRecord;

pub mod csv;
pub mod json;

/// Trait for importing run history from different file formats
pub trait ImportFormat: Send + Sync {
    /// Check if this importer can handle the given file
    fn can_import(&self, file_path: &Path) -> bool;

    /// Import run records from the file, in file order
    fn import_file(&self, file_path: &Path) -> Result<Vec<RunRecord>>;

    /// Get the format name for this importer
    fn format_name(&self) -> &'static str;
}

/// Lowercase file extension, if any
pub(crate) fn extension_of(file_path: &Path) -> Option<String> {
    file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Manager for coordinating different import formats
pub struct ImportManager {
    importers: Vec<Box<dyn ImportFormat>>,
}

impl ImportManager {
    /// Create a new import manager with all available importers
    pub fn new() -> Self {
        let importers: Vec<Box<dyn ImportFormat>> = vec![
            Box::new(csv::CsvImporter::new()),
            Box::new(json::JsonImporter::new()),
        ];

        Self { importers }
    }

    /// Import a single file, auto-detecting the format
    pub fn import_file(&self, file_path: &Path) -> Result<Vec<RunRecord>> {
        let importer = self
            .importers
            .iter()
            .find(|importer| importer.can_import(file_path))
            .ok_or_else(|| ImportError::UnsupportedFormat {
                path: file_path.to_path_buf(),
            })?;

        tracing::info!(
            file = %file_path.display(),
            format = importer.format_name(),
            "Importing run history"
        );

        let records = importer.import_file(file_path)?;
        if records.is_empty() {
            return Err(ImportError::Empty {
                path: file_path.to_path_buf(),
            }
            .into());
        }

        tracing::debug!(records = records.len(), "Import finished");
        Ok(records)
    }

    /// Import a file into a day-keyed history; later same-day rows win
    pub fn import_history(&self, file_path: &Path) -> Result<RunHistory> {
        let records = self.import_file(file_path)?;
        let total = records.len();
        let history: RunHistory = records.into_iter().collect();

        if history.len() < total {
            tracing::info!(
                duplicates = total - history.len(),
                "Collapsed same-day records"
            );
        }
        Ok(history)
    }

    /// Import every supported file in a directory, one history per file
    ///
    /// Files that fail to import are reported and skipped.
    pub fn import_directory(&self, dir_path: &Path) -> Result<Vec<(PathBuf, RunHistory)>> {
        let files = self.collect_importable_files(dir_path)?;
        let mut histories = Vec::with_capacity(files.len());

        if files.is_empty() {
            tracing::warn!(dir = %dir_path.display(), "No importable files found");
            return Ok(histories);
        }

        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({msg})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );

        for file_path in files {
            let name = file_path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            pb.set_message(format!("Processing {}", name));

            match self.import_history(&file_path) {
                Ok(history) => {
                    pb.println(format!("✓ Imported {} sessions from {}", history.len(), name));
                    histories.push((file_path, history));
                }
                Err(e) => match e.severity() {
                    ErrorSeverity::Warning => {
                        tracing::warn!(file = %name, "Skipping history: {}", e.user_message())
                    }
                    _ => tracing::error!(file = %name, "Import failed: {}", e.user_message()),
                },
            }

            pb.inc(1);
        }

        pb.finish_with_message("Import complete");
        Ok(histories)
    }

    /// Collect all files that can be imported from a directory, sorted by name
    fn collect_importable_files(&self, dir_path: &Path) -> Result<Vec<PathBuf>> {
        if !dir_path.is_dir() {
            return Err(LoadWiseError::Validation(format!(
                "Path is not a directory: {}",
                dir_path.display()
            )));
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir_path)? {
            let path = entry?.path();
            if path.is_file() && self.can_import_file(&path) {
                files.push(path);
            }
        }
        files.sort();

        Ok(files)
    }

    /// Check if this manager can import a given file
    pub fn can_import_file(&self, file_path: &Path) -> bool {
        self.importers.iter().any(|importer| importer.can_import(file_path))
    }
}

impl Default for ImportManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const CSV_HISTORY: &str = "\
date,duration,distance,hr,rhr,hrv,hrr,vo2max
2024-09-01,45,8.2,150,52,60,24,50
2024-09-02,50,9.0,152,53,58,23,50
2024-09-02,30,5.0,140,53,58,23,50
";

    #[test]
    fn test_format_detection() {
        let manager = ImportManager::new();
        assert!(manager.can_import_file(Path::new("history.csv")));
        assert!(manager.can_import_file(Path::new("HISTORY.JSON")));
        assert!(!manager.can_import_file(Path::new("ride.fit")));
    }

    #[test]
    fn test_unsupported_format() {
        let manager = ImportManager::new();
        let err = manager.import_file(Path::new("ride.fit")).unwrap_err();
        assert!(matches!(
            err,
            LoadWiseError::Import(ImportError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_import_history_collapses_same_day() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.csv");
        fs::write(&path, CSV_HISTORY).unwrap();

        let history = ImportManager::new().import_history(&path).unwrap();
        assert_eq!(history.len(), 2);
        // The later row for 2024-09-02 wins
        assert_eq!(history.latest().unwrap().duration_minutes, 30.0);
    }

    #[test]
    fn test_empty_file_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.json");
        fs::write(&path, "[]").unwrap();

        let err = ImportManager::new().import_file(&path).unwrap_err();
        assert!(matches!(err, LoadWiseError::Import(ImportError::Empty { .. })));
        // Empty files are skippable rather than fatal
        assert_eq!(err.severity(), ErrorSeverity::Warning);
    }

    #[test]
    fn test_import_directory_skips_bad_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), CSV_HISTORY).unwrap();
        fs::write(dir.path().join("b.json"), "not json").unwrap();
        fs::write(dir.path().join("c.json"), "[]").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let histories = ImportManager::new().import_directory(dir.path()).unwrap();
        assert_eq!(histories.len(), 1);
        assert!(histories[0].0.ends_with("a.csv"));
    }

    #[test]
    fn test_import_directory_rejects_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.csv");
        fs::write(&path, CSV_HISTORY).unwrap();

        assert!(ImportManager::new().import_directory(&path).is_err());
    }
}
