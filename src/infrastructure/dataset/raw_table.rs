// ============================================================
// RAW TABLE
// ============================================================
// Cell grid -> header + rows, before schema validation

use std::collections::HashMap;

use crate::domain::dataset::{CellValue, Dataset, DatasetSchema, Row};
use crate::domain::error::{AppError, Result};

/// Header line plus data rows cut from a sheet grid
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    /// Split `grid` at `header_row` (0-based, absolute). Rows above the header are discarded.
    pub fn from_grid(mut grid: Vec<Vec<CellValue>>, header_row: usize) -> Result<Self> {
        if grid.len() <= header_row {
            return Err(AppError::SchemaError(format!(
                "Header row {} is beyond the end of the sheet ({} rows)",
                header_row,
                grid.len()
            )));
        }

        let rows = grid.split_off(header_row + 1);
        let header_cells = grid.pop().unwrap_or_default();
        let headers = normalize_headers(&header_cells);

        Ok(Self { headers, rows })
    }

    /// Drop blank rows and validate against `schema`
    pub fn into_dataset(self, schema: &DatasetSchema) -> Result<Dataset> {
        let rows = self
            .rows
            .into_iter()
            .map(Row::new)
            .filter(|row| !row.is_blank())
            .collect();
        Dataset::new(self.headers, rows, schema)
    }
}

// Blank headers become "Unnamed: <i>", repeats get ".1", ".2", ...
fn normalize_headers(cells: &[CellValue]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    cells
        .iter()
        .enumerate()
        .map(|(index, cell)| {
            let base = cell
                .label()
                .map(|label| label.into_owned())
                .unwrap_or_else(|| format!("Unnamed: {}", index));
            let occurrences = seen.entry(base.clone()).or_insert(0);
            let header = if *occurrences == 0 {
                base
            } else {
                format!("{}.{}", base, occurrences)
            };
            *occurrences += 1;
            header
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(lines: &[&[&str]]) -> Vec<Vec<CellValue>> {
        lines
            .iter()
            .map(|line| line.iter().map(|v| CellValue::text(*v)).collect())
            .collect()
    }

    #[test]
    fn test_header_offset_skips_preamble() {
        let table = RawTable::from_grid(
            grid(&[&["Rapport"], &[""], &["germe", "AMX"], &["E.coli", "S"]]),
            2,
        )
        .unwrap();
        assert_eq!(table.headers, vec!["germe", "AMX"]);
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_header_row_past_end_is_error() {
        let err = RawTable::from_grid(grid(&[&["a"]]), 5).unwrap_err();
        assert!(matches!(err, AppError::SchemaError(_)));
    }

    #[test]
    fn test_blank_and_duplicate_headers() {
        let table = RawTable::from_grid(grid(&[&["AMX", "", "AMX", "AMX"]]), 0).unwrap();
        assert_eq!(table.headers, vec!["AMX", "Unnamed: 1", "AMX.1", "AMX.2"]);
    }

    #[test]
    fn test_blank_rows_are_dropped() {
        let schema = DatasetSchema {
            organism_column: "o".to_string(),
            service_column: "s".to_string(),
            specimen_type_column: "t".to_string(),
            antibiotic_offset: 3,
            antibiotic_columns: None,
        };
        let table = RawTable::from_grid(
            grid(&[&["s", "t", "o", "AMX"], &["", "", "", ""], &["H", "U", "E.coli", "R"]]),
            0,
        )
        .unwrap();
        let dataset = table.into_dataset(&schema).unwrap();
        assert_eq!(dataset.len(), 1);
    }
}
