// ============================================================
// CHART SPECIFICATION
// ============================================================
// Declarative bar chart description handed to the rendering sink.
// Rebuilt on every pipeline run, never mutated after construction.

use serde::{Deserialize, Serialize};

use crate::domain::filter_state::DisplayMode;

/// Dashboard colors
pub mod palette {
    pub const BACKGROUND: &str = "#F5F5F5";
    pub const TEXT: &str = "#333333";
    pub const PRIMARY: &str = "#0055BD";
    pub const PRIMARY2: &str = "#4BACC6";
    pub const PRIMARY3: &str = "#31849B";
    pub const SECONDARY: &str = "#D14D58";
    pub const BAR_TEXT: &str = "white";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisSpec {
    /// Data field bound to the axis
    pub field: String,

    pub title: String,

    /// Category display order; empty for value axes
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarPoint {
    pub x: String,
    pub y: u64,

    /// Label drawn on the bar
    pub text: Option<String>,
}

/// One color group of bars
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesSpec {
    pub name: String,
    pub color: String,
    pub points: Vec<BarPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryColor {
    pub category: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarTextStyle {
    pub position: String,
    pub size: u32,
    pub color: String,
}

impl Default for BarTextStyle {
    fn default() -> Self {
        Self {
            position: "inside".to_string(),
            size: 12,
            color: palette::BAR_TEXT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutStyle {
    pub plot_background: String,
    pub paper_background: String,
    pub font_color: String,

    /// Labels smaller than this are hidden instead of shrunk
    pub uniform_text_min_size: Option<u32>,
    pub uniform_text_mode: Option<String>,
}

impl Default for LayoutStyle {
    fn default() -> Self {
        Self {
            plot_background: palette::BACKGROUND.to_string(),
            paper_background: palette::BACKGROUND.to_string(),
            font_color: palette::TEXT.to_string(),
            uniform_text_min_size: None,
            uniform_text_mode: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,

    /// Field split into colored series, if any
    pub color_field: Option<String>,

    pub bar_mode: DisplayMode,

    /// Series display order
    pub category_order: Vec<String>,

    pub color_map: Vec<CategoryColor>,
    pub series: Vec<SeriesSpec>,
    pub bar_text: Option<BarTextStyle>,
    pub layout: LayoutStyle,
}

impl ChartSpec {
    /// True when no series carries a bar
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|series| series.points.is_empty())
    }

    pub fn total(&self) -> u64 {
        self.series
            .iter()
            .flat_map(|series| series.points.iter())
            .map(|point| point.y)
            .sum()
    }

    pub fn color_of(&self, category: &str) -> Option<&str> {
        self.color_map
            .iter()
            .find(|entry| entry.category == category)
            .map(|entry| entry.color.as_str())
    }
}
