use serde::{Deserialize, Serialize};

/// Dashboard tab currently on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveView {
    #[default]
    Occurrence,
    AntibioticResults,
}

impl ActiveView {
    pub fn label(&self) -> &'static str {
        match self {
            ActiveView::Occurrence => "Occurrences des germes",
            ActiveView::AntibioticResults => "Résultats des antibiotiques",
        }
    }
}
