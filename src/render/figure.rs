//! Plotly figure export
//!
//! Converts chart specs into the `{"data": [...], "layout": {...}}` JSON that
//! Plotly.js draws on the page. Only the attributes the dashboard uses are
//! modelled.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use super::map::MapSpec;
use super::panels::PanelSpec;
use super::trend::{AxisPlacement, TrendSpec};

const PANEL_TITLE_FONT: Font = Font {
    size: Some(24),
    family: Some("verdana"),
    color: Some("#0052cc"),
};

/// A complete Plotly figure
#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Choropleth(ChoroplethTrace),
    Scatter(ScatterTrace),
}

#[derive(Debug, Clone, Serialize)]
pub struct ChoroplethTrace {
    pub locations: Vec<String>,
    pub locationmode: &'static str,
    pub z: Vec<f64>,
    pub hovertext: Vec<String>,
    pub colorscale: &'static str,
    pub reversescale: bool,
    pub colorbar: ColorBar,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColorBar {
    pub title: Title,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScatterTrace {
    pub x: Vec<NaiveDate>,
    pub y: Vec<f64>,
    pub name: String,
    pub mode: &'static str,
    pub showlegend: bool,
    pub line: Line,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legendgroup: Option<String>,
}

impl ScatterTrace {
    fn line(name: impl Into<String>, color: &'static str, points: &[(NaiveDate, f64)]) -> Self {
        Self {
            x: points.iter().map(|(date, _)| *date).collect(),
            y: points.iter().map(|(_, value)| *value).collect(),
            name: name.into(),
            mode: "lines",
            showlegend: true,
            line: Line { color },
            xaxis: None,
            yaxis: None,
            legendgroup: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Line {
    pub color: &'static str,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Font {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
}

impl Font {
    fn color(color: &'static str) -> Self {
        Self {
            color: Some(color),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Title {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

impl Title {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Legend {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Geo {
    pub scope: &'static str,
    pub showframe: bool,
}

/// Subplot title, positioned in paper coordinates
#[derive(Debug, Clone, Serialize)]
pub struct Annotation {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub xref: &'static str,
    pub yref: &'static str,
    pub xanchor: &'static str,
    pub yanchor: &'static str,
    pub showarrow: bool,
    pub font: Font,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickfont: Option<Font>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlaying: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub margin: Margin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<Geo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    /// `xaxis`, `yaxis2`, ... keyed the way Plotly expects
    #[serde(flatten)]
    pub axes: BTreeMap<String, Axis>,
}

impl Layout {
    fn new(margin: Margin) -> Self {
        Self {
            margin,
            legend: None,
            geo: None,
            annotations: Vec::new(),
            axes: BTreeMap::new(),
        }
    }
}

/// Plotly axis key: `xaxis` for the first axis, `xaxis2` for the second, ...
fn axis_key(letter: char, index: usize) -> String {
    if index == 1 {
        format!("{letter}axis")
    } else {
        format!("{letter}axis{index}")
    }
}

/// Plotly axis reference: `x`, `x2`, ...
fn axis_ref(letter: char, index: usize) -> String {
    if index == 1 {
        letter.to_string()
    } else {
        format!("{letter}{index}")
    }
}

impl MapSpec {
    pub fn to_figure(&self) -> Figure {
        let trace = ChoroplethTrace {
            locations: self.locations.iter().map(|l| l.iso_code.clone()).collect(),
            locationmode: "ISO-3",
            z: self.locations.iter().map(|l| l.value).collect(),
            hovertext: self.locations.iter().map(|l| l.location.clone()).collect(),
            colorscale: self.color_scale,
            // plotly.js orders YlOrRd dark to light; low values must stay light
            reversescale: true,
            colorbar: ColorBar {
                title: Title::text(self.metric.label()),
            },
        };

        let mut layout = Layout::new(Margin { l: 10, r: 10, t: 10, b: 0 });
        layout.geo = Some(Geo {
            scope: "world",
            showframe: false,
        });

        Figure {
            data: vec![Trace::Choropleth(trace)],
            layout,
        }
    }
}

impl PanelSpec {
    /// Stacked subplots, one per row, with titles as annotations
    pub fn to_figure(&self) -> Figure {
        let rows = self.rows.len();
        let spacing = if rows > 1 { 0.3 / rows as f64 } else { 0.0 };
        let height = (1.0 - spacing * (rows.saturating_sub(1)) as f64) / rows.max(1) as f64;

        let mut data = Vec::new();
        let mut layout = Layout::new(Margin { l: 10, r: 10, t: 40, b: 10 });
        layout.legend = Some(Legend { x: 0.0, y: 1.0 });

        for (i, row) in self.rows.iter().enumerate() {
            let index = i + 1;
            let top = 1.0 - i as f64 * (height + spacing);
            let bottom = (top - height).max(0.0);

            layout.axes.insert(
                axis_key('x', index),
                Axis {
                    domain: Some([0.0, 1.0]),
                    anchor: Some(axis_ref('y', index)),
                    ..Default::default()
                },
            );
            layout.axes.insert(
                axis_key('y', index),
                Axis {
                    domain: Some([bottom, top]),
                    anchor: Some(axis_ref('x', index)),
                    ..Default::default()
                },
            );
            layout.annotations.push(Annotation {
                text: row.title.clone(),
                x: 0.5,
                y: top,
                xref: "paper",
                yref: "paper",
                xanchor: "center",
                yanchor: "bottom",
                showarrow: false,
                font: PANEL_TITLE_FONT,
            });

            for series in &row.series {
                let mut trace = ScatterTrace::line(&series.name, series.color, &series.points);
                trace.showlegend = series.show_legend;
                trace.legendgroup = Some(series.name.clone());
                trace.xaxis = Some(axis_ref('x', index));
                trace.yaxis = Some(axis_ref('y', index));
                data.push(Trace::Scatter(trace));
            }
        }

        Figure { data, layout }
    }
}

impl TrendSpec {
    /// Single plot with one overlaid y-axis per series
    pub fn to_figure(&self) -> Figure {
        let mut data = Vec::new();
        let mut layout = Layout::new(Margin { l: 1, r: 1, t: 5, b: 5 });
        layout.legend = Some(Legend { x: 0.1, y: 1.0 });
        layout.axes.insert(
            axis_key('x', 1),
            Axis {
                domain: Some(self.x_domain),
                ..Default::default()
            },
        );

        for (i, series) in self.series.iter().enumerate() {
            let index = i + 1;

            let mut axis = Axis {
                title: Some(Title {
                    font: Some(Font::color(series.color)),
                    ..Title::text(series.name)
                }),
                tickfont: Some(Font::color(series.color)),
                ..Default::default()
            };
            if index > 1 {
                axis.overlaying = Some("y");
            }
            match series.axis {
                AxisPlacement::Left => {}
                AxisPlacement::LeftOffset { position } => {
                    axis.anchor = Some("free".to_string());
                    axis.side = Some("left");
                    axis.position = Some(position);
                }
                AxisPlacement::Right => {
                    axis.anchor = Some("x".to_string());
                    axis.side = Some("right");
                }
                AxisPlacement::RightOffset { position } => {
                    axis.anchor = Some("free".to_string());
                    axis.side = Some("right");
                    axis.position = Some(position);
                }
            }
            layout.axes.insert(axis_key('y', index), axis);

            let mut trace = ScatterTrace::line(series.name, series.color, &series.points);
            trace.yaxis = Some(axis_ref('y', index));
            data.push(Trace::Scatter(trace));
        }

        Figure { data, layout }
    }
}

#[cfg(test)]
mod tests {
    use crate::data::fixtures::{sample_records, sample_views};
    use crate::data::{build_monthly, Metric, Variable};
    use crate::render::{render_country_panels, render_global_trend, render_map};
    use serde_json::Value;

    #[test]
    fn test_map_figure_json() {
        let monthly = build_monthly(&sample_records());
        let map = render_map(
            &monthly,
            Some(Metric::Cases),
            "2020-01".parse().ok(),
            "2020-03".parse().ok(),
        )
        .rendered()
        .unwrap();

        let json = serde_json::to_value(map.to_figure()).unwrap();
        let trace = &json["data"][0];

        assert_eq!(trace["type"], "choropleth");
        assert_eq!(trace["locations"], serde_json::json!(["FRA", "ITA"]));
        assert_eq!(trace["z"], serde_json::json!([15.0, 32.0]));
        assert_eq!(trace["hovertext"][1], "Italy");
        assert_eq!(trace["colorscale"], "YlOrRd");
        assert_eq!(json["layout"]["geo"]["scope"], "world");
    }

    #[test]
    fn test_panel_figure_axes_and_annotations() {
        let views = sample_views();
        let panels = render_country_panels(
            &views,
            &["France".to_string(), "Italy".to_string()],
            &[Variable::TotalCases, Variable::DailyCases],
        )
        .rendered()
        .unwrap();

        let json = serde_json::to_value(panels.to_figure()).unwrap();
        let layout = &json["layout"];

        assert_eq!(json["data"].as_array().unwrap().len(), 4);
        assert_eq!(json["data"][2]["yaxis"], "y2");
        assert_eq!(json["data"][2]["showlegend"], false);
        assert_eq!(json["data"][0]["x"][0], "2020-01-30");

        assert!(layout.get("yaxis").is_some());
        assert!(layout.get("yaxis2").is_some());
        assert!(layout.get("yaxis3").is_none());
        assert_eq!(layout["annotations"][0]["text"], "Total cases");
        assert_eq!(layout["annotations"][1]["text"], "Daily cases");

        // Rows are stacked top to bottom without overlap
        let first = layout["yaxis"]["domain"].as_array().unwrap();
        let second = layout["yaxis2"]["domain"].as_array().unwrap();
        assert_eq!(first[1].as_f64().unwrap(), 1.0);
        assert!(second[1].as_f64().unwrap() < first[0].as_f64().unwrap());
    }

    #[test]
    fn test_trend_figure_overlaid_axes() {
        let trend = render_global_trend(&sample_records());
        let json = serde_json::to_value(trend.to_figure()).unwrap();
        let layout = &json["layout"];

        assert_eq!(layout["xaxis"]["domain"], serde_json::json!([0.05, 0.9]));
        assert!(layout["yaxis"].get("overlaying").is_none());
        assert_eq!(layout["yaxis2"]["anchor"], "free");
        assert_eq!(layout["yaxis2"]["position"], 0.025);
        assert_eq!(layout["yaxis3"]["side"], "right");
        assert_eq!(layout["yaxis4"]["position"], 0.925);
        assert_eq!(layout["yaxis4"]["overlaying"], "y");

        let yaxes: Vec<&Value> = json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| &t["yaxis"])
            .collect();
        assert_eq!(yaxes, vec!["y", "y2", "y3", "y4"]);
    }
}
