//! Country comparison panels
//!
//! One subplot row per selected variable, one line per selected country.

use chrono::NaiveDate;
use serde::Serialize;

use super::Render;
use crate::data::{DerivedViews, Variable};

/// At most this many countries are compared; extra selections are dropped
pub const MAX_COUNTRIES: usize = 3;

/// Line colors, indexed by country position
pub const PANEL_COLORS: [&str; MAX_COUNTRIES] = ["#730099", "#009933", "#0099e6"];

pub const COUNTRY_STATUS: &str = "Please choose less than 4 countries";
pub const VARIABLE_STATUS: &str = "Please choose at least one variable";

/// Shown when the panels cannot be drawn
pub const SELECTION_HINT: &str = "Please choose at least one country and at least one variable";

/// One country's line in a panel row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub color: &'static str,
    pub show_legend: bool,
    pub points: Vec<(NaiveDate, f64)>,
}

/// One subplot row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelRow {
    pub variable: Variable,
    pub title: String,
    pub series: Vec<Series>,
}

/// Stacked subplots sharing the same set of countries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelSpec {
    pub countries: Vec<String>,
    pub rows: Vec<PanelRow>,
}

/// Subplot title for a column name: `daily_cases` becomes `Daily cases`
pub fn subplot_title(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Render the comparison panels
///
/// No countries or no variables leaves the panels unchanged with a hint for
/// the user. Only the first [`MAX_COUNTRIES`] countries are drawn. Missing
/// values are skipped, so a line may have gaps.
pub fn render_country_panels(
    views: &DerivedViews,
    countries: &[String],
    variables: &[Variable],
) -> Render<PanelSpec> {
    if countries.is_empty() || variables.is_empty() {
        return Render::unchanged_with(SELECTION_HINT);
    }

    let countries = &countries[..countries.len().min(MAX_COUNTRIES)];

    let rows = variables
        .iter()
        .enumerate()
        .map(|(row_idx, &variable)| PanelRow {
            variable,
            title: subplot_title(variable.as_str()),
            series: countries
                .iter()
                .zip(PANEL_COLORS)
                .map(|(country, color)| Series {
                    name: country.clone(),
                    color,
                    show_legend: row_idx == 0,
                    points: views
                        .country_records(country)
                        .filter_map(|r| {
                            r.value(variable)
                                .filter(|v| v.is_finite())
                                .map(|v| (r.date, v))
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect();

    Render::Rendered(PanelSpec {
        countries: countries.to_vec(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{record, sample_records, sample_views};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_subplot_title() {
        assert_eq!(subplot_title("total_cases"), "Total cases");
        assert_eq!(subplot_title("stringency_index"), "Stringency index");
        assert_eq!(
            subplot_title("daily_deaths_per_1million"),
            "Daily deaths per 1million"
        );
        assert_eq!(subplot_title(""), "");
    }

    #[test]
    fn test_one_row_per_variable_one_series_per_country() {
        let views = sample_views();

        let panels = render_country_panels(
            &views,
            &names(&["France", "Italy"]),
            &[Variable::TotalCases, Variable::DailyDeaths],
        )
        .rendered()
        .unwrap();

        assert_eq!(panels.rows.len(), 2);
        assert_eq!(panels.rows[0].title, "Total cases");
        assert_eq!(panels.rows[1].title, "Daily deaths");

        for row in &panels.rows {
            assert_eq!(row.series.len(), 2);
            assert_eq!(row.series[0].name, "France");
            assert_eq!(row.series[0].color, "#730099");
            assert_eq!(row.series[1].color, "#009933");
        }

        let italy = &panels.rows[0].series[1];
        assert_eq!(italy.points.len(), 4);
        assert_eq!(italy.points.last().unwrap().1, 532.0);
    }

    #[test]
    fn test_legend_only_on_first_row() {
        let views = sample_views();

        let panels = render_country_panels(
            &views,
            &names(&["France", "Italy"]),
            &[Variable::TotalCases, Variable::TotalDeaths, Variable::StringencyIndex],
        )
        .rendered()
        .unwrap();

        assert!(panels.rows[0].series.iter().all(|s| s.show_legend));
        assert!(panels.rows[1..]
            .iter()
            .flat_map(|r| &r.series)
            .all(|s| !s.show_legend));
    }

    #[test]
    fn test_more_than_three_countries_truncated() {
        let mut records = sample_records();
        records.push(record("DEU", "Germany", 83_000_000.0, "2020-02-01", 3.0, 3.0, 0.0, 0.0));
        records.push(record("ESP", "Spain", 47_000_000.0, "2020-02-01", 4.0, 4.0, 0.0, 0.0));
        let views = DerivedViews::build(records);
        let variables = [Variable::DailyCases];

        let four = render_country_panels(
            &views,
            &names(&["Spain", "France", "Germany", "Italy"]),
            &variables,
        );
        let three = render_country_panels(&views, &names(&["Spain", "France", "Germany"]), &variables);

        assert_eq!(four, three);
        assert_eq!(four.rendered().unwrap().countries, names(&["Spain", "France", "Germany"]));
    }

    #[test]
    fn test_zero_variables_is_unchanged_with_hint() {
        let views = sample_views();

        let result = render_country_panels(&views, &names(&["France"]), &[]);

        assert!(result.is_unchanged());
        assert!(!result.status().unwrap().is_empty());
    }

    #[test]
    fn test_zero_countries_is_unchanged_with_hint() {
        let views = sample_views();

        let result = render_country_panels(&views, &[], &[Variable::TotalCases]);

        assert!(result.is_unchanged());
        assert_eq!(result.status(), Some(SELECTION_HINT));
    }

    #[test]
    fn test_missing_values_are_skipped() {
        let mut records = sample_records();
        records[0].stringency_index = None;
        let views = DerivedViews::build(records);

        let panels = render_country_panels(&views, &names(&["France"]), &[Variable::StringencyIndex])
            .rendered()
            .unwrap();

        assert_eq!(panels.rows[0].series[0].points.len(), 4);
    }

    #[test]
    fn test_unknown_country_yields_empty_series() {
        let views = sample_views();

        let panels = render_country_panels(&views, &names(&["Atlantis", "Italy"]), &[Variable::TotalCases])
            .rendered()
            .unwrap();

        assert!(panels.rows[0].series[0].points.is_empty());
        assert_eq!(panels.rows[0].series[1].points.len(), 4);
    }
}
