//! Choropleth map
//!
//! Sums the monthly buckets of each country over `[start, end)` and colors
//! countries by the selected metric.

use serde::Serialize;
use std::collections::BTreeMap;

use super::Render;
use crate::data::{Metric, MonthKey, MonthlyBucket};

/// Status line shown above the map
pub const MAP_STATUS: &str = "Impact in the world during a certain timeline.";

/// Sequential color scale used for the map
pub const MAP_COLOR_SCALE: &str = "YlOrRd";

/// One colored country
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLocation {
    pub iso_code: String,
    pub location: String,
    pub value: f64,
}

/// Choropleth keyed by ISO code
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSpec {
    pub metric: Metric,
    pub start: MonthKey,
    pub end: MonthKey,
    pub color_scale: &'static str,
    /// Sorted by ISO code
    pub locations: Vec<MapLocation>,
}

impl MapSpec {
    /// Value plotted for a country, if it is on the map
    pub fn value_of(&self, iso_code: &str) -> Option<f64> {
        self.locations
            .iter()
            .find(|l| l.iso_code == iso_code)
            .map(|l| l.value)
    }
}

/// Render the choropleth for a metric over `[start, end)`
///
/// Any unset input leaves the map unchanged. Countries whose summed value is
/// not finite (unknown or zero population) are left off the map.
pub fn render_map(
    monthly: &[MonthlyBucket],
    metric: Option<Metric>,
    start: Option<MonthKey>,
    end: Option<MonthKey>,
) -> Render<MapSpec> {
    let (Some(metric), Some(start), Some(end)) = (metric, start, end) else {
        return Render::unchanged();
    };

    let mut sums: BTreeMap<(&str, &str), f64> = BTreeMap::new();
    for bucket in monthly.iter().filter(|b| b.month.within(start, end)) {
        let key = (bucket.iso_code.as_str(), bucket.location.as_str());
        *sums.entry(key).or_insert(0.0) += bucket.value(metric);
    }

    let locations = sums
        .into_iter()
        .filter(|(_, value)| value.is_finite())
        .map(|((iso_code, location), value)| MapLocation {
            iso_code: iso_code.to_string(),
            location: location.to_string(),
            value,
        })
        .collect();

    Render::Rendered(MapSpec {
        metric,
        start,
        end,
        color_scale: MAP_COLOR_SCALE,
        locations,
    })
}
