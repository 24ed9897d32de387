//! Selector state and selector options
//!
//! `Selection` is what the page sends on every change of any of its five
//! controls. `SelectorOptions` is what it needs to populate them.

use serde::{Deserialize, Serialize};

use crate::data::{DerivedViews, Metric, MonthKey, Variable};

/// Countries preselected on first load, when present in the data
const DEFAULT_COUNTRIES: [&str; 2] = ["France", "Italy"];

/// The five selector values, replaced wholesale on each interaction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default)]
    pub metric: Option<Metric>,
    #[serde(default)]
    pub start_month: Option<MonthKey>,
    #[serde(default)]
    pub end_month: Option<MonthKey>,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub variables: Vec<Variable>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the map metric
    pub fn metric(mut self, metric: Metric) -> Self {
        self.metric = Some(metric);
        self
    }

    /// Builder method: set the month range `[start, end)`
    pub fn months(mut self, start: MonthKey, end: MonthKey) -> Self {
        self.start_month = Some(start);
        self.end_month = Some(end);
        self
    }

    /// Builder method: set the compared countries
    pub fn countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.countries = countries.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method: set the plotted variables
    pub fn variables(mut self, variables: impl IntoIterator<Item = Variable>) -> Self {
        self.variables = variables.into_iter().collect();
        self
    }
}

/// A value/label pair for a dropdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Initial selector values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionDefaults {
    pub metric: Metric,
    pub start_month: Option<MonthKey>,
    pub end_month: Option<MonthKey>,
    pub countries: Vec<String>,
    pub variables: Vec<Variable>,
}

/// Everything the page needs to populate its five controls
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectorOptions {
    pub metrics: Vec<SelectOption>,
    pub months: Vec<SelectOption>,
    pub countries: Vec<SelectOption>,
    pub variables: Vec<SelectOption>,
    pub defaults: SelectionDefaults,
}

impl SelectorOptions {
    pub fn from_views(views: &DerivedViews) -> Self {
        let months = views.months();
        let countries = views.countries();

        let mut default_countries: Vec<String> = DEFAULT_COUNTRIES
            .iter()
            .filter(|name| countries.contains(name))
            .map(|name| name.to_string())
            .collect();
        if default_countries.is_empty() {
            default_countries = countries.iter().take(2).map(|c| c.to_string()).collect();
        }

        Self {
            metrics: Metric::all()
                .iter()
                .map(|m| SelectOption::new(m.as_str(), m.label()))
                .collect(),
            months: months
                .iter()
                .map(|m| SelectOption::new(m.to_string(), m.to_string()))
                .collect(),
            countries: countries
                .iter()
                .map(|c| SelectOption::new(*c, *c))
                .collect(),
            variables: Variable::all()
                .iter()
                .map(|v| SelectOption::new(v.as_str(), v.label()))
                .collect(),
            defaults: SelectionDefaults {
                metric: Metric::Cases,
                start_month: months.first().copied(),
                end_month: months.last().copied(),
                countries: default_countries,
                variables: vec![Variable::TotalCases, Variable::TotalDeaths],
            },
        }
    }
}
