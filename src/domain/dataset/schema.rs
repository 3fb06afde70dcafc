// ============================================================
// DATASET SCHEMA
// ============================================================
// Column bindings between the dashboard controls and the sheet layout

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Named column contract of the loaded sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DatasetSchema {
    /// Column holding the identified organism
    #[validate(length(min = 1))]
    pub organism_column: String,

    /// Column holding the requesting service
    #[validate(length(min = 1))]
    pub service_column: String,

    /// Column holding the specimen type
    #[validate(length(min = 1))]
    pub specimen_type_column: String,

    /// Position of the first antibiotic column; every later column is an antibiotic
    pub antibiotic_offset: usize,

    /// Explicit antibiotic column names, overriding `antibiotic_offset` when set
    pub antibiotic_columns: Option<Vec<String>>,
}

impl Default for DatasetSchema {
    fn default() -> Self {
        Self {
            organism_column: "Germe (libellé)".to_string(),
            service_column: "Service demandeur (libellé)".to_string(),
            specimen_type_column: "Type de prélèvement (libellé)".to_string(),
            antibiotic_offset: 10,
            antibiotic_columns: None,
        }
    }
}

/// A resolved column: position in the row plus header name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnRef {
    pub index: usize,
    pub name: String,
}

/// Columns resolved against an actual header row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnBindings {
    pub organism: ColumnRef,
    pub service: ColumnRef,
    pub specimen_type: ColumnRef,
    pub antibiotics: Vec<ColumnRef>,
}
