//! View Coordinator
//!
//! Per-session controller owning the filter state and the active tab. Every
//! interaction runs exactly one synchronous recomputation and returns the
//! freshly built view:
//!
//! - occurrence view: dataset -> occurrence chart (filter state ignored)
//! - antibiotic results view: dataset + filter state -> filter -> aggregate -> chart

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::application::use_cases::aggregation_engine::aggregate;
use crate::application::use_cases::chart_builder::{build_antibiotic_chart, build_occurrence_chart};
use crate::application::use_cases::filter_engine::filter_rows;
use crate::domain::chart_spec::ChartSpec;
use crate::domain::dataset::Dataset;
use crate::domain::error::{AppError, Result};
use crate::domain::filter_state::{
    ControlInput, ControlValue, DisplayMode, FilterControl, FilterState, ALL_LABEL,
};
use crate::domain::view::ActiveView;

/// One dropdown entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub label: String,
    pub value: ControlValue,
}

/// Dropdown as rendered: `ALL` first, then dataset values in first-seen order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropdownControl {
    pub control: FilterControl,
    pub label: String,
    pub options: Vec<SelectOption>,
    pub selected: ControlValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeOption {
    pub label: String,
    pub value: DisplayMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeControl {
    pub label: String,
    pub options: Vec<ModeOption>,
    pub selected: DisplayMode,
}

/// Output of one recomputation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum RenderedView {
    Occurrence {
        chart: ChartSpec,
    },
    AntibioticResults {
        dropdowns: Vec<DropdownControl>,
        mode: ModeControl,
        chart: ChartSpec,
    },
}

impl RenderedView {
    pub fn chart(&self) -> &ChartSpec {
        match self {
            RenderedView::Occurrence { chart } => chart,
            RenderedView::AntibioticResults { chart, .. } => chart,
        }
    }

    pub fn active_view(&self) -> ActiveView {
        match self {
            RenderedView::Occurrence { .. } => ActiveView::Occurrence,
            RenderedView::AntibioticResults { .. } => ActiveView::AntibioticResults,
        }
    }
}

/// Distinct values offered by each dropdown, captured at load time
#[derive(Debug, Clone)]
struct ControlOptions {
    service: Vec<String>,
    specimen_type: Vec<String>,
    organism: Vec<String>,
}

impl ControlOptions {
    fn from_dataset(dataset: &Dataset) -> Self {
        let bindings = dataset.bindings();
        Self {
            service: dataset.distinct_values(&bindings.service),
            specimen_type: dataset.distinct_values(&bindings.specimen_type),
            organism: dataset.distinct_values(&bindings.organism),
        }
    }

    fn values(&self, control: FilterControl) -> &[String] {
        match control {
            FilterControl::Service => &self.service,
            FilterControl::SpecimenType => &self.specimen_type,
            FilterControl::Organism => &self.organism,
        }
    }
}

/// Reactive controller of one dashboard session
pub struct ViewCoordinator {
    dataset: Arc<Dataset>,
    options: ControlOptions,
    state: FilterState,
    active_view: ActiveView,
}

impl ViewCoordinator {
    /// Start on the occurrence view with every control at `ALL`
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let options = ControlOptions::from_dataset(&dataset);
        Self {
            dataset,
            options,
            state: FilterState::new(),
            active_view: ActiveView::default(),
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn active_view(&self) -> ActiveView {
        self.active_view
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    /// Values offered by `control`, excluding the `ALL` sentinel
    pub fn options(&self, control: FilterControl) -> &[String] {
        self.options.values(control)
    }

    /// Write one dropdown. Cleared inputs become `ALL` before anything reads them.
    ///
    /// Concrete values must be offered by the dropdown; on rejection the state
    /// is left as it was.
    pub fn set_control(&mut self, control: FilterControl, input: ControlInput) -> Result<RenderedView> {
        if let ControlInput::Value(selected) = &input {
            if !self.options.values(control).iter().any(|option| option == selected) {
                return Err(AppError::ValidationError(format!(
                    "'{}' is not an option of {}",
                    selected,
                    control.id()
                )));
            }
        }

        let stored = self.state.set(control, input);
        debug!(control = control.id(), value = stored.label(), "Control updated");

        self.render()
    }

    pub fn set_mode(&mut self, mode: DisplayMode) -> Result<RenderedView> {
        self.state.set_mode(mode);
        debug!(mode = mode.as_str(), "Display mode updated");
        self.render()
    }

    /// Activate `view` and rebuild it from the current filter state
    pub fn switch_view(&mut self, view: ActiveView) -> Result<RenderedView> {
        self.active_view = view;
        info!(view = ?view, "View switched");
        self.render()
    }

    /// Recompute the active view from scratch
    pub fn render(&self) -> Result<RenderedView> {
        match self.active_view {
            ActiveView::Occurrence => Ok(RenderedView::Occurrence {
                chart: build_occurrence_chart(&self.dataset),
            }),
            ActiveView::AntibioticResults => Ok(RenderedView::AntibioticResults {
                dropdowns: self.dropdowns(),
                mode: self.mode_control(),
                chart: self.antibiotic_chart(),
            }),
        }
    }

    /// Filter -> aggregate -> build for the current state
    pub fn antibiotic_chart(&self) -> ChartSpec {
        let rows = filter_rows(&self.dataset, &self.state);
        let aggregated = aggregate(&rows, self.dataset.antibiotic_columns());
        build_antibiotic_chart(&aggregated, &self.state)
    }

    fn dropdowns(&self) -> Vec<DropdownControl> {
        FilterControl::ALL
            .into_iter()
            .map(|control| {
                let mut options = vec![SelectOption {
                    label: ALL_LABEL.to_string(),
                    value: ControlValue::All,
                }];
                options.extend(self.options.values(control).iter().map(|value| SelectOption {
                    label: value.clone(),
                    value: ControlValue::Value(value.clone()),
                }));
                DropdownControl {
                    control,
                    label: control.label().to_string(),
                    options,
                    selected: self.state.get(control).clone(),
                }
            })
            .collect()
    }

    fn mode_control(&self) -> ModeControl {
        ModeControl {
            label: "Mode d'affichage :".to_string(),
            options: DisplayMode::ALL
                .into_iter()
                .map(|mode| ModeOption {
                    label: mode.label().to_string(),
                    value: mode,
                })
                .collect(),
            selected: self.state.mode(),
        }
    }
}
