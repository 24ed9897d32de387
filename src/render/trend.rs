//! Global trend chart
//!
//! Worldwide cumulative and daily totals, each on its own y-axis. The chart
//! ignores the selectors and is drawn from the full dataset.

use chrono::NaiveDate;
use serde::Serialize;

use crate::data::{build_global_daily, GlobalDay, Record};

/// Horizontal extent of the x-axis, leaving room for the offset y-axes
pub const TREND_X_DOMAIN: [f64; 2] = [0.05, 0.9];

/// Where a series' y-axis sits
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "side", rename_all = "snake_case")]
pub enum AxisPlacement {
    /// Primary axis, anchored to the plot's left edge
    Left,
    /// Free axis on the left at `position` (paper coordinates)
    LeftOffset { position: f64 },
    /// Anchored to the plot's right edge
    Right,
    /// Free axis on the right at `position`
    RightOffset { position: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub name: &'static str,
    pub color: &'static str,
    pub axis: AxisPlacement,
    pub points: Vec<(NaiveDate, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSpec {
    pub x_domain: [f64; 2],
    pub series: Vec<TrendSeries>,
}

struct TrendLine {
    name: &'static str,
    color: &'static str,
    axis: AxisPlacement,
    value: fn(&GlobalDay) -> f64,
}

const TREND_LINES: [TrendLine; 4] = [
    TrendLine {
        name: "Total cases",
        color: "#1f77b4",
        axis: AxisPlacement::Left,
        value: |d| d.total_cases,
    },
    TrendLine {
        name: "Total deaths",
        color: "#4633FF",
        axis: AxisPlacement::LeftOffset { position: 0.025 },
        value: |d| d.total_deaths,
    },
    TrendLine {
        name: "Daily cases",
        color: "#FFA533",
        axis: AxisPlacement::Right,
        value: |d| d.daily_cases,
    },
    TrendLine {
        name: "Daily deaths",
        color: "#820A2F",
        axis: AxisPlacement::RightOffset { position: 0.925 },
        value: |d| d.daily_deaths,
    },
];

/// Render worldwide totals per date over the full dataset
pub fn render_global_trend(records: &[Record]) -> TrendSpec {
    let days = build_global_daily(records);

    let series = TREND_LINES
        .iter()
        .map(|line| TrendSeries {
            name: line.name,
            color: line.color,
            axis: line.axis,
            points: days.iter().map(|d| (d.date, (line.value)(d))).collect(),
        })
        .collect();

    TrendSpec {
        x_domain: TREND_X_DOMAIN,
        series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::sample_records;

    #[test]
    fn test_four_series_on_distinct_axes() {
        let trend = render_global_trend(&sample_records());

        assert_eq!(trend.series.len(), 4);
        let names: Vec<&str> = trend.series.iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec!["Total cases", "Total deaths", "Daily cases", "Daily deaths"]
        );
        assert_eq!(trend.series[0].axis, AxisPlacement::Left);
        assert_eq!(
            trend.series[1].axis,
            AxisPlacement::LeftOffset { position: 0.025 }
        );
        assert_eq!(trend.series[2].axis, AxisPlacement::Right);
        assert_eq!(
            trend.series[3].axis,
            AxisPlacement::RightOffset { position: 0.925 }
        );
    }

    #[test]
    fn test_series_sum_across_countries_per_date() {
        let trend = render_global_trend(&sample_records());
        let daily_cases = &trend.series[2];

        // Distinct dates in the sample
        assert_eq!(daily_cases.points.len(), 8);

        let jan_31 = NaiveDate::from_ymd_opt(2020, 1, 31).unwrap();
        let (_, value) = daily_cases
            .points
            .iter()
            .find(|(date, _)| *date == jan_31)
            .unwrap();
        assert_eq!(*value, 4.0);
    }

    #[test]
    fn test_empty_records() {
        let trend = render_global_trend(&[]);
        assert!(trend.series.iter().all(|s| s.points.is_empty()));
    }
}
