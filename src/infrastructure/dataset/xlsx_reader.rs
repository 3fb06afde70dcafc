// ============================================================
// XLSX READER
// ============================================================
// Workbook sheet -> cell grid aligned on absolute row/column positions

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use tracing::debug;

use crate::domain::dataset::CellValue;
use crate::domain::error::{AppError, Result};

pub struct XlsxReader {
    /// Worksheet name; first sheet when `None`
    sheet: Option<String>,
}

impl XlsxReader {
    pub fn new(sheet: Option<String>) -> Self {
        Self { sheet }
    }

    pub fn read_grid(&self, path: &Path) -> Result<Vec<Vec<CellValue>>> {
        if !path.exists() {
            return Err(AppError::IoError(format!(
                "Workbook not found: {}",
                path.display()
            )));
        }

        let mut workbook = open_workbook_auto(path).map_err(|e| {
            AppError::ParseError(format!("Failed to open workbook {}: {}", path.display(), e))
        })?;

        let index = match &self.sheet {
            Some(name) => workbook
                .sheet_names()
                .iter()
                .position(|sheet| sheet == name)
                .ok_or_else(|| AppError::NotFound(format!("Worksheet '{}' not found", name)))?,
            None => 0,
        };

        let range = workbook
            .worksheet_range_at(index)
            .ok_or_else(|| AppError::NotFound("No worksheet found".to_string()))?
            .map_err(|e| AppError::ParseError(format!("Failed to read worksheet range: {}", e)))?;

        let grid = grid_from_range(&range);
        debug!(path = %path.display(), sheet = index, rows = grid.len(), "Worksheet read");
        Ok(grid)
    }
}

/// Cells of `range` placed at their sheet position.
///
/// Calamine trims leading empty rows and columns from the used range; they are
/// restored as missing cells so header offsets and column positions refer to
/// the workbook as a user sees it.
pub fn grid_from_range(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };

    let mut grid: Vec<Vec<CellValue>> = (0..start_row).map(|_| Vec::new()).collect();
    for row in range.rows() {
        let mut cells = vec![CellValue::Missing; start_col as usize];
        cells.extend(row.iter().map(cell_value));
        grid.push(cells);
    }
    grid
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Missing,
        Data::String(value) => CellValue::text(value.as_str()),
        Data::Float(value) => CellValue::Number(*value),
        Data::Int(value) => CellValue::Number(*value as f64),
        Data::Bool(value) => CellValue::Text(value.to_string()),
        other => CellValue::text(other.to_string()),
    }
}
