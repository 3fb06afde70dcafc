//! Chart Spec Builder
//!
//! Turns the dataset (occurrence view) or aggregated counts (antibiotic
//! results view) into a declarative `ChartSpec`.

use std::collections::{HashMap, HashSet};

use crate::domain::aggregated_count::AggregatedCount;
use crate::domain::chart_spec::{
    palette, AxisSpec, BarPoint, BarTextStyle, CategoryColor, ChartSpec, LayoutStyle, SeriesSpec,
};
use crate::domain::dataset::Dataset;
use crate::domain::filter_state::{DisplayMode, FilterState};
use crate::domain::result_category::{ResultCategory, ResultValue};

pub const OCCURRENCE_TITLE: &str = "Nombre d'occurrences des germes identifiés";
pub const OCCURRENCE_X: &str = "Germe";
pub const OCCURRENCE_Y: &str = "Nombre d'occurrences";
pub const ANTIBIOTIC_X: &str = "Antibiotique";
pub const ANTIBIOTIC_Y: &str = "Count";
pub const RESULT_FIELD: &str = "Résultat";

/// Color for values outside the closed category set
pub const DEFAULT_CATEGORY_COLOR: &str = palette::TEXT;

/// Fixed color of a known result category
pub fn category_color(category: ResultCategory) -> &'static str {
    match category {
        ResultCategory::NotTested => palette::SECONDARY,
        ResultCategory::Susceptible => palette::PRIMARY3,
        ResultCategory::Intermediate => palette::PRIMARY2,
        ResultCategory::Resistant => palette::PRIMARY,
    }
}

fn value_color(value: &ResultValue) -> &'static str {
    match value {
        ResultValue::Known(category) => category_color(*category),
        ResultValue::Unexpected(_) => DEFAULT_CATEGORY_COLOR,
    }
}

/// Antibiotic results chart title; `ALL` controls render as "Tous"
pub fn antibiotic_title(state: &FilterState) -> String {
    format!(
        "Résultats des tests pour {} (Type : {}, Service : {})",
        state.organism.label(),
        state.specimen_type.label(),
        state.service.label()
    )
}

/// One bar per organism over the whole dataset, in first-seen order.
/// Ignores any filter state.
pub fn build_occurrence_chart(dataset: &Dataset) -> ChartSpec {
    let organisms = dataset.distinct_values(&dataset.bindings().organism);
    let mut counts: HashMap<String, u64> = HashMap::new();
    for row in dataset.rows() {
        if let Some(label) = row.cell(dataset.bindings().organism.index).label() {
            *counts.entry(label.into_owned()).or_insert(0) += 1;
        }
    }

    let points = organisms
        .iter()
        .map(|organism| BarPoint {
            x: organism.clone(),
            y: counts.get(organism).copied().unwrap_or(0),
            text: None,
        })
        .collect();

    ChartSpec {
        title: OCCURRENCE_TITLE.to_string(),
        x_axis: AxisSpec {
            field: OCCURRENCE_X.to_string(),
            title: OCCURRENCE_X.to_string(),
            categories: organisms,
        },
        y_axis: AxisSpec {
            field: OCCURRENCE_Y.to_string(),
            title: OCCURRENCE_Y.to_string(),
            categories: Vec::new(),
        },
        color_field: None,
        bar_mode: DisplayMode::Group,
        category_order: vec![OCCURRENCE_Y.to_string()],
        color_map: vec![CategoryColor {
            category: OCCURRENCE_Y.to_string(),
            color: palette::PRIMARY.to_string(),
        }],
        series: vec![SeriesSpec {
            name: OCCURRENCE_Y.to_string(),
            color: palette::PRIMARY.to_string(),
            points,
        }],
        bar_text: None,
        layout: LayoutStyle::default(),
    }
}

/// Antibiotics on x, one series per result value. Bar mode and title come
/// from `state`.
///
/// The four known series are always present in `NL, S, I, R` order, possibly
/// without bars; unexpected values follow with the default color. An empty
/// aggregation yields a valid chart with no bars.
pub fn build_antibiotic_chart(
    aggregated: &[AggregatedCount],
    state: &FilterState,
) -> ChartSpec {
    let mut antibiotics: Vec<String> = Vec::new();
    let mut seen_antibiotics: HashSet<&str> = HashSet::new();
    let mut values: Vec<ResultValue> = ResultCategory::DISPLAY_ORDER
        .iter()
        .map(|category| ResultValue::Known(*category))
        .collect();

    for entry in aggregated {
        if seen_antibiotics.insert(entry.antibiotic.as_str()) {
            antibiotics.push(entry.antibiotic.clone());
        }
        if !values.contains(&entry.result) {
            values.push(entry.result.clone());
        }
    }
    values.sort();

    let series = values
        .iter()
        .map(|value| SeriesSpec {
            name: value.label().to_string(),
            color: value_color(value).to_string(),
            points: aggregated
                .iter()
                .filter(|entry| &entry.result == value)
                .map(|entry| BarPoint {
                    x: entry.antibiotic.clone(),
                    y: entry.count,
                    text: Some(entry.count.to_string()),
                })
                .collect(),
        })
        .collect();

    ChartSpec {
        title: antibiotic_title(state),
        x_axis: AxisSpec {
            field: ANTIBIOTIC_X.to_string(),
            title: ANTIBIOTIC_X.to_string(),
            categories: antibiotics,
        },
        y_axis: AxisSpec {
            field: ANTIBIOTIC_Y.to_string(),
            title: ANTIBIOTIC_Y.to_string(),
            categories: Vec::new(),
        },
        color_field: Some(RESULT_FIELD.to_string()),
        bar_mode: state.mode(),
        category_order: values.iter().map(|value| value.label().to_string()).collect(),
        color_map: values
            .iter()
            .map(|value| CategoryColor {
                category: value.label().to_string(),
                color: value_color(value).to_string(),
            })
            .collect(),
        series,
        bar_text: Some(BarTextStyle::default()),
        layout: LayoutStyle {
            uniform_text_min_size: Some(8),
            uniform_text_mode: Some("hide".to_string()),
            ..LayoutStyle::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::aggregation_engine::aggregate;
    use crate::domain::dataset::fixtures::scenario_dataset;
    use crate::domain::dataset::Row;
    use crate::domain::filter_state::{ControlInput, FilterControl};

    fn full_aggregation() -> Vec<AggregatedCount> {
        let dataset = scenario_dataset();
        let rows: Vec<&Row> = dataset.rows().iter().collect();
        aggregate(&rows, dataset.antibiotic_columns())
    }

    #[test]
    fn test_occurrence_chart_counts_in_first_seen_order() {
        let chart = build_occurrence_chart(&scenario_dataset());
        assert_eq!(chart.x_axis.categories, vec!["E.coli", "S.aureus"]);
        assert_eq!(chart.series.len(), 1);
        let bars: Vec<_> = chart.series[0].points.iter().map(|p| (p.x.as_str(), p.y)).collect();
        assert_eq!(bars, vec![("E.coli", 3), ("S.aureus", 2)]);
        assert_eq!(chart.series[0].color, palette::PRIMARY);
        assert_eq!(chart.title, OCCURRENCE_TITLE);
    }

    fn with_mode(mode: DisplayMode) -> FilterState {
        let mut state = FilterState::new();
        state.set_mode(mode);
        state
    }

    #[test]
    fn test_series_order_and_colors_are_fixed() {
        let chart = build_antibiotic_chart(&full_aggregation(), &FilterState::new());
        assert_eq!(chart.category_order, vec!["NL", "S", "I", "R"]);
        assert_eq!(chart.color_of("NL"), Some(palette::SECONDARY));
        assert_eq!(chart.color_of("S"), Some(palette::PRIMARY3));
        assert_eq!(chart.color_of("I"), Some(palette::PRIMARY2));
        assert_eq!(chart.color_of("R"), Some(palette::PRIMARY));
        assert_eq!(chart.x_axis.categories, vec!["AMX", "CIP"]);
        assert_eq!(chart.total(), 9);
    }

    #[test]
    fn test_absent_categories_keep_their_series() {
        let aggregated = vec![AggregatedCount::new(
            "AMX",
            ResultValue::Known(ResultCategory::Resistant),
            4,
        )];
        let chart = build_antibiotic_chart(&aggregated, &with_mode(DisplayMode::Stack));
        let names: Vec<_> = chart.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["NL", "S", "I", "R"]);
        assert!(chart.series[0].points.is_empty());
        assert_eq!(chart.series[3].points[0].text.as_deref(), Some("4"));
    }

    #[test]
    fn test_mode_switch_changes_only_bar_mode() {
        let aggregated = full_aggregation();
        let grouped = build_antibiotic_chart(&aggregated, &with_mode(DisplayMode::Group));
        let stacked = build_antibiotic_chart(&aggregated, &with_mode(DisplayMode::Stack));

        assert_eq!(grouped.bar_mode, DisplayMode::Group);
        assert_eq!(stacked.bar_mode, DisplayMode::Stack);
        assert_eq!(
            ChartSpec {
                bar_mode: DisplayMode::Group,
                ..stacked
            },
            grouped
        );
    }

    #[test]
    fn test_empty_aggregation_builds_empty_chart() {
        let chart = build_antibiotic_chart(&[], &FilterState::new());
        assert!(chart.is_empty());
        assert!(chart.x_axis.categories.is_empty());
        assert_eq!(chart.series.len(), 4);
    }

    #[test]
    fn test_unexpected_category_gets_default_color() {
        let aggregated = vec![
            AggregatedCount::new("AMX", ResultValue::Known(ResultCategory::Susceptible), 1),
            AggregatedCount::new("AMX", ResultValue::Unexpected("SDD".to_string()), 2),
        ];
        let chart = build_antibiotic_chart(&aggregated, &FilterState::new());
        assert_eq!(chart.category_order, vec!["NL", "S", "I", "R", "SDD"]);
        assert_eq!(chart.color_of("SDD"), Some(DEFAULT_CATEGORY_COLOR));
        assert_eq!(chart.total(), 3);
    }

    #[test]
    fn test_title_embeds_filter_values() {
        let mut state = FilterState::new();
        state.set(FilterControl::Organism, ControlInput::Value("E.coli".to_string()));
        state.set(FilterControl::Service, ControlInput::Value("Onco".to_string()));
        assert_eq!(
            antibiotic_title(&state),
            "Résultats des tests pour E.coli (Type : Tous, Service : Onco)"
        );
    }
}
