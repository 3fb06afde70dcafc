// ============================================================
// FILTER STATE
// ============================================================
// Current value of each dashboard control, with clear-normalization

use serde::{Deserialize, Serialize};

use crate::domain::dataset::{ColumnBindings, ColumnRef};

/// Label of the no-constraint sentinel as shown in the dropdowns
pub const ALL_LABEL: &str = "Tous";

/// Dropdown controls bound to a dataset column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterControl {
    Service,
    SpecimenType,
    Organism,
}

impl FilterControl {
    pub const ALL: [FilterControl; 3] = [
        FilterControl::Service,
        FilterControl::SpecimenType,
        FilterControl::Organism,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            FilterControl::Service => "service",
            FilterControl::SpecimenType => "specimen_type",
            FilterControl::Organism => "organism",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|control| control.id() == id)
    }

    pub fn label(&self) -> &'static str {
        match self {
            FilterControl::Service => "Filtrer par Service demandeur :",
            FilterControl::SpecimenType => "Filtrer par Type de prélèvement :",
            FilterControl::Organism => "Filtrer par Germe :",
        }
    }

    /// Column this control filters on
    pub fn column<'a>(&self, bindings: &'a ColumnBindings) -> &'a ColumnRef {
        match self {
            FilterControl::Service => &bindings.service,
            FilterControl::SpecimenType => &bindings.specimen_type,
            FilterControl::Organism => &bindings.organism,
        }
    }
}

/// Stable value of a control: the `ALL` sentinel or one concrete data value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ControlValue {
    All,
    Value(String),
}

impl ControlValue {
    /// Concrete selection, `None` for `ALL`
    pub fn selected(&self) -> Option<&str> {
        match self {
            ControlValue::All => None,
            ControlValue::Value(value) => Some(value),
        }
    }

    pub fn label(&self) -> &str {
        self.selected().unwrap_or(ALL_LABEL)
    }
}

/// Write signal from a selector widget. `Cleared` is transient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ControlInput {
    All,
    Value(String),
    Cleared,
}

impl ControlInput {
    /// Rewrites `Cleared` to `ALL`; the only path from input to stored value
    pub fn normalize(self) -> ControlValue {
        match self {
            ControlInput::All | ControlInput::Cleared => ControlValue::All,
            ControlInput::Value(value) => ControlValue::Value(value),
        }
    }
}

impl From<Option<ControlInput>> for ControlInput {
    fn from(input: Option<ControlInput>) -> Self {
        input.unwrap_or(ControlInput::Cleared)
    }
}

/// Bar layout of the antibiotic results chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Group,
    Stack,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 2] = [DisplayMode::Group, DisplayMode::Stack];

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Group => "group",
            DisplayMode::Stack => "stack",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DisplayMode::Group => "Groupé",
            DisplayMode::Stack => "Empilé",
        }
    }
}

/// Values of the four dashboard controls for one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub service: ControlValue,
    pub specimen_type: ControlValue,
    pub organism: ControlValue,
    pub mode: DisplayMode,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            service: ControlValue::All,
            specimen_type: ControlValue::All,
            organism: ControlValue::All,
            mode: DisplayMode::Group,
        }
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, control: FilterControl) -> &ControlValue {
        match control {
            FilterControl::Service => &self.service,
            FilterControl::SpecimenType => &self.specimen_type,
            FilterControl::Organism => &self.organism,
        }
    }

    /// Store `input` for `control` after normalization. Other controls are untouched.
    pub fn set(&mut self, control: FilterControl, input: ControlInput) -> &ControlValue {
        let slot = match control {
            FilterControl::Service => &mut self.service,
            FilterControl::SpecimenType => &mut self.specimen_type,
            FilterControl::Organism => &mut self.organism,
        };
        *slot = input.normalize();
        slot
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: DisplayMode) {
        self.mode = mode;
    }

    /// Controls holding a concrete value, in control order
    pub fn active_filters(&self) -> impl Iterator<Item = (FilterControl, &str)> + '_ {
        FilterControl::ALL
            .into_iter()
            .filter_map(|control| self.get(control).selected().map(|value| (control, value)))
    }
}
