// Shared test dataset: 5 rows, 2 antibiotics, organisms E.coli / S.aureus

use super::{CellValue, Dataset, DatasetSchema, Row};

pub(crate) fn headers() -> Vec<String> {
    ["service", "specimen_type", "organism", "AMX", "CIP"]
        .iter()
        .map(|h| h.to_string())
        .collect()
}

pub(crate) fn scenario_schema() -> DatasetSchema {
    DatasetSchema {
        organism_column: "organism".to_string(),
        service_column: "service".to_string(),
        specimen_type_column: "specimen_type".to_string(),
        antibiotic_offset: 3,
        antibiotic_columns: None,
    }
}

pub(crate) fn row(values: [&str; 5]) -> Row {
    Row::new(values.iter().map(|v| CellValue::text(*v)).collect())
}

pub(crate) fn scenario_rows() -> Vec<Row> {
    vec![
        row(["Hémato", "Hémoculture", "E.coli", "S", "R"]),
        row(["Hémato", "Urine", "S.aureus", "R", "S"]),
        row(["Onco", "Hémoculture", "E.coli", "S", ""]),
        row(["Onco", "Urine", "S.aureus", "NL", "I"]),
        row(["Hémato", "Urine", "E.coli", "R", "S"]),
    ]
}

pub(crate) fn scenario_dataset() -> Dataset {
    Dataset::new(headers(), scenario_rows(), &scenario_schema()).expect("valid fixture")
}
