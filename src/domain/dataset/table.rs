// ============================================================
// DATASET TABLE
// ============================================================
// Read-only rows sharing a fixed header, with resolved column bindings

use std::collections::HashSet;

use super::{CellValue, ColumnBindings, ColumnRef, DatasetSchema};
use crate::domain::error::{AppError, Result};

static MISSING: CellValue = CellValue::Missing;

/// One record of the sheet, cells indexed by column position
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    cells: Vec<CellValue>,
}

impl Row {
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    /// Cell at `index`; out-of-range positions read as missing
    pub fn cell(&self, index: usize) -> &CellValue {
        self.cells.get(index).unwrap_or(&MISSING)
    }

    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(CellValue::is_missing)
    }
}

/// Loaded dataset. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Row>,
    bindings: ColumnBindings,
}

impl Dataset {
    /// Build a dataset and resolve `schema` against `columns`.
    ///
    /// Fails with `SchemaError` when a bound column is absent or when the
    /// antibiotic block resolves to no column at all.
    pub fn new(columns: Vec<String>, rows: Vec<Row>, schema: &DatasetSchema) -> Result<Self> {
        let bindings = resolve_bindings(&columns, schema)?;
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|row| {
                let mut cells = row.cells;
                cells.resize(width, CellValue::Missing);
                Row { cells }
            })
            .collect();

        Ok(Self {
            columns,
            rows,
            bindings,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn bindings(&self) -> &ColumnBindings {
        &self.bindings
    }

    pub fn antibiotic_columns(&self) -> &[ColumnRef] {
        &self.bindings.antibiotics
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Read-only access to a whole column by header name
    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = &CellValue> + '_> {
        let index = self
            .column_index(name)
            .ok_or_else(|| AppError::SchemaError(format!("Column '{}' is absent", name)))?;
        Ok(self.rows.iter().map(move |row| row.cell(index)))
    }

    /// Distinct non-missing labels of a column, in first-seen order
    pub fn distinct_values(&self, column: &ColumnRef) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut values = Vec::new();
        for row in &self.rows {
            if let Some(label) = row.cell(column.index).label() {
                if seen.insert(label.to_string()) {
                    values.push(label.into_owned());
                }
            }
        }
        values
    }
}

fn resolve_column(columns: &[String], name: &str, role: &str) -> Result<ColumnRef> {
    columns
        .iter()
        .position(|column| column == name)
        .map(|index| ColumnRef {
            index,
            name: name.to_string(),
        })
        .ok_or_else(|| {
            AppError::SchemaError(format!(
                "Column '{}' bound to {} is absent from the dataset",
                name, role
            ))
        })
}

fn resolve_bindings(columns: &[String], schema: &DatasetSchema) -> Result<ColumnBindings> {
    let organism = resolve_column(columns, &schema.organism_column, "organism")?;
    let service = resolve_column(columns, &schema.service_column, "requesting service")?;
    let specimen_type = resolve_column(columns, &schema.specimen_type_column, "specimen type")?;

    let antibiotics = match &schema.antibiotic_columns {
        Some(names) => names
            .iter()
            .map(|name| resolve_column(columns, name, "antibiotic results"))
            .collect::<Result<Vec<_>>>()?,
        None => columns
            .iter()
            .enumerate()
            .skip(schema.antibiotic_offset)
            .map(|(index, name)| ColumnRef {
                index,
                name: name.clone(),
            })
            .collect(),
    };

    if antibiotics.is_empty() {
        return Err(AppError::SchemaError(format!(
            "No antibiotic columns found (offset {}, dataset has {} columns)",
            schema.antibiotic_offset,
            columns.len()
        )));
    }

    let mut names = HashSet::new();
    if let Some(duplicate) = antibiotics.iter().find(|column| !names.insert(column.name.as_str())) {
        return Err(AppError::SchemaError(format!(
            "Antibiotic column '{}' is bound more than once",
            duplicate.name
        )));
    }

    Ok(ColumnBindings {
        organism,
        service,
        specimen_type,
        antibiotics,
    })
}
