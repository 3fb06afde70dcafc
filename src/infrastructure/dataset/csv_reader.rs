// ============================================================
// CSV READER
// ============================================================
// Delimited text export of the results sheet

use std::path::Path;

use csv::{ReaderBuilder, Trim};
use encoding_rs::WINDOWS_1252;
use tracing::debug;

use crate::domain::dataset::CellValue;
use crate::domain::error::{AppError, Result};

/// CSV reader with delimiter detection and legacy encoding fallback
#[derive(Debug, Default)]
pub struct CsvReader {
    /// Fixed delimiter; detected from the first lines when `None`
    delimiter: Option<u8>,
}

impl CsvReader {
    pub fn new(delimiter: Option<u8>) -> Self {
        Self { delimiter }
    }

    /// Read the whole file as a cell grid, header line included
    pub fn read_grid(&self, path: &Path) -> Result<Vec<Vec<CellValue>>> {
        let bytes = std::fs::read(path).map_err(|e| {
            AppError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let content = decode(&bytes);
        self.parse_content(&content)
    }

    /// Parse CSV content from string
    pub fn parse_content(&self, content: &str) -> Result<Vec<Vec<CellValue>>> {
        let delimiter = self
            .delimiter
            .unwrap_or_else(|| Self::detect_delimiter(content));

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut grid = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV line {}: {}", index + 1, e))
            })?;
            grid.push(record.iter().map(CellValue::text).collect());
        }

        debug!(delimiter = %(delimiter as char), lines = grid.len(), "CSV parsed");
        Ok(grid)
    }

    /// Detect delimiter from content (comma, semicolon, tab, pipe)
    pub fn detect_delimiter(content: &str) -> u8 {
        let candidates = [b',', b';', b'\t', b'|'];
        let sample_lines: Vec<_> = content.lines().take(10).collect();

        let mut best_delimiter = b',';
        let mut best_score = 0.0f32;

        if sample_lines.is_empty() {
            return best_delimiter;
        }

        for &delimiter in &candidates {
            let field_counts: Vec<usize> = sample_lines
                .iter()
                .map(|line| line.bytes().filter(|&b| b == delimiter).count())
                .collect();

            // Frequent and consistent across lines wins
            let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
            let variance = field_counts
                .iter()
                .map(|&x| (x as f32 - avg).powi(2))
                .sum::<f32>()
                / field_counts.len() as f32;
            let score = avg / (1.0 + variance.sqrt());

            if score > best_score {
                best_score = score;
                best_delimiter = delimiter;
            }
        }

        best_delimiter
    }
}

// UTF-8 (BOM stripped) first, Windows-1252 for legacy spreadsheet exports
fn decode(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(content) => content.trim_start_matches('\u{feff}').to_string(),
        Err(_) => {
            let (content, _, _) = WINDOWS_1252.decode(bytes);
            content.into_owned()
        }
    }
}
