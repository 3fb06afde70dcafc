// ============================================================
// DATASET LOADING
// ============================================================
// Spreadsheet / CSV readers feeding the in-memory Dataset

mod csv_reader;
mod raw_table;
mod xlsx_reader;

pub use csv_reader::CsvReader;
pub use raw_table::RawTable;
pub use xlsx_reader::XlsxReader;

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::domain::dataset::{Dataset, DatasetSchema};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::DatasetSourceConfig;

/// Reads the configured file once and validates it against the schema
pub struct DatasetLoader {
    source: DatasetSourceConfig,
    schema: DatasetSchema,
}

impl DatasetLoader {
    pub fn new(source: DatasetSourceConfig, schema: DatasetSchema) -> Self {
        Self { source, schema }
    }

    pub fn load(&self) -> Result<Arc<Dataset>> {
        let path = self.source.path.as_path();
        let grid = match extension(path).as_deref() {
            Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => {
                XlsxReader::new(self.source.sheet.clone()).read_grid(path)?
            }
            Some("csv" | "tsv" | "txt") => {
                CsvReader::new(self.source.delimiter_byte()?).read_grid(path)?
            }
            _ => {
                return Err(AppError::ValidationError(format!(
                    "Unsupported dataset format: {}",
                    path.display()
                )))
            }
        };

        let dataset = RawTable::from_grid(grid, self.source.header_row)?.into_dataset(&self.schema)?;

        info!(
            path = %path.display(),
            rows = dataset.len(),
            columns = dataset.columns().len(),
            antibiotics = dataset.antibiotic_columns().len(),
            "Dataset loaded"
        );

        Ok(Arc::new(dataset))
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dataset::fixtures::scenario_schema;

    #[test]
    fn test_unknown_extension_is_rejected() {
        let loader = DatasetLoader::new(
            DatasetSourceConfig {
                path: "results.parquet".into(),
                ..DatasetSourceConfig::default()
            },
            DatasetSchema::default(),
        );
        assert!(matches!(loader.load(), Err(AppError::ValidationError(_))));
    }

    const RESULTS_CSV: &str = "\
Rapport épidémiologique 2024;;;;
Service d'hématologie;;;;
service;specimen_type;organism;AMX;CIP
Hémato;Hémoculture;E.coli;S;R
;;;;
Onco;Urine;S.aureus;R;
";

    fn csv_source(path: std::path::PathBuf, delimiter: Option<char>) -> DatasetSourceConfig {
        DatasetSourceConfig {
            path,
            header_row: 2,
            sheet: None,
            delimiter,
        }
    }

    #[test]
    fn test_csv_file_is_loaded_below_preamble() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        std::fs::write(&path, RESULTS_CSV).unwrap();

        let dataset = DatasetLoader::new(csv_source(path, Some(';')), scenario_schema())
            .load()
            .unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.bindings().organism.index, 2);
        let antibiotics: Vec<_> = dataset
            .antibiotic_columns()
            .iter()
            .map(|column| column.name.as_str())
            .collect();
        assert_eq!(antibiotics, vec!["AMX", "CIP"]);
        assert_eq!(
            dataset.distinct_values(&dataset.bindings().organism),
            vec!["E.coli", "S.aureus"]
        );
    }

    #[test]
    fn test_csv_missing_bound_column_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        std::fs::write(&path, RESULTS_CSV).unwrap();

        let schema = DatasetSchema {
            organism_column: "Germe".to_string(),
            ..scenario_schema()
        };
        let err = DatasetLoader::new(csv_source(path, None), schema).load().unwrap_err();
        assert!(matches!(err, AppError::SchemaError(msg) if msg.contains("Germe")));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let loader = DatasetLoader::new(
            DatasetSourceConfig {
                path: "does-not-exist.csv".into(),
                ..DatasetSourceConfig::default()
            },
            DatasetSchema::default(),
        );
        assert!(matches!(loader.load(), Err(AppError::IoError(_))));
    }
}
