use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{ImportError, Result};
use crate::import::{extension_of, ImportFormat};
use crate::models::RunRecord;

/// Importer for JSON arrays of run records
pub struct JsonImporter;

impl JsonImporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportFormat for JsonImporter {
    fn can_import(&self, file_path: &Path) -> bool {
        extension_of(file_path).as_deref() == Some("json")
    }

    fn import_file(&self, file_path: &Path) -> Result<Vec<RunRecord>> {
        let reader = BufReader::new(File::open(file_path)?);

        serde_json::from_reader(reader).map_err(|e| {
            ImportError::Parse {
                format: "JSON".to_string(),
                line: e.line() as u64,
                reason: e.to_string(),
            }
            .into()
        })
    }

    fn format_name(&self) -> &'static str {
        "JSON"
    }
}
