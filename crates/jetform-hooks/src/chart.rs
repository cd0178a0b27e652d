//! ApexCharts option objects for the dashboard charts.
//!
//! Each chart element carries its data in `data-buckets` (JSON) and an
//! optional `data-height`. The options built here are handed unchanged to a
//! [`ChartRenderer`]; rendering itself belongs to ApexCharts.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::HookError;

/// One point of a two-series chart.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Bucket {
    /// Category (date string or timestamp).
    pub x: Value,
    /// First series value.
    pub y1: Value,
    /// Second series value.
    pub y2: Value,
}

/// `data-*` attributes read from a hook's element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    /// Raw `data-buckets` JSON.
    pub buckets: Option<String>,
    /// Raw `data-height`.
    pub height: Option<String>,
}

/// Options for one render call.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    /// ApexCharts options object.
    pub options: Value,
    /// Whether the renderer should install a tooltip formatter that rounds
    /// `y` values to integers. Functions can't travel in JSON.
    pub round_tooltip: bool,
}

/// Renders a chart into the element matching `selector`.
pub trait ChartRenderer {
    /// Draw the chart.
    fn render(&mut self, selector: &str, spec: &ChartSpec)
        -> Result<(), HookError>;
}

/// The dashboard's charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Free downloads vs. sales.
    Sales,
    /// Pageviews vs. sales.
    VisitorsSales,
    /// Downloads sparkline.
    Downloads,
}

impl ChartKind {
    /// Look up a chart by its hook name.
    #[must_use]
    pub fn from_hook_name(name: &str) -> Option<Self> {
        match name {
            "SalesChart" => Some(Self::Sales),
            "VisitorsSalesChart" => Some(Self::VisitorsSales),
            "DownloadsChart" => Some(Self::Downloads),
            _ => None,
        }
    }

    /// Selector of the element the chart is drawn into.
    #[must_use]
    pub fn selector(self) -> &'static str {
        match self {
            Self::Sales => "#SalesChart",
            Self::VisitorsSales => "#VisitorsSalesChart",
            Self::Downloads => "#DownloadsChart",
        }
    }

    /// Height used when `data-height` is missing or not a positive number.
    #[must_use]
    pub fn default_height(self) -> u32 {
        match self {
            Self::Sales | Self::VisitorsSales => 250,
            Self::Downloads => 80,
        }
    }

    /// Whether the chart is redrawn when LiveView patches its element.
    #[must_use]
    pub fn renders_on_update(self) -> bool {
        !matches!(self, Self::Sales)
    }

    /// Build the render call for this chart from its element's dataset.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::MissingData`] without `data-buckets` and
    /// [`HookError::BadData`] when it is not valid JSON.
    pub fn spec(self, dataset: &Dataset) -> Result<ChartSpec, HookError> {
        let raw = dataset.buckets.as_deref().ok_or(HookError::MissingData {
            chart: self.selector(),
            attribute: "data-buckets",
        })?;
        let height = parse_height(dataset.height.as_deref())
            .unwrap_or_else(|| self.default_height());

        let options = match self {
            Self::Sales => {
                let buckets: Vec<Bucket> = serde_json::from_str(raw)?;
                let mut options =
                    two_series(&buckets, "Download gratis", height);
                options["yaxis"]["min"] = json!(0);
                options
            }
            Self::VisitorsSales => {
                let buckets: Vec<Bucket> = serde_json::from_str(raw)?;
                let mut options = two_series(&buckets, "Pageviews", height);
                options["plotOptions"] = json!({
                    "bar": {
                        "horizontal": false,
                        "columnWidth": "55%",
                        "endingShape": "rounded",
                        "borderRadius": 2
                    }
                });
                options
            }
            Self::Downloads => {
                let data: Value = serde_json::from_str(raw)?;
                sparkline(data, height)
            }
        };
        Ok(ChartSpec {
            options,
            round_tooltip: !matches!(self, Self::Downloads),
        })
    }
}

/// Leading integer of `data-height`, like `parseInt`. Zero and negative
/// values count as missing.
fn parse_height(raw: Option<&str>) -> Option<u32> {
    let raw = raw?.trim_start();
    let digits = raw
        .strip_prefix('+')
        .unwrap_or(raw)
        .split(|c: char| !c.is_ascii_digit())
        .next()?;
    digits.parse::<u32>().ok().filter(|h| *h > 0)
}

fn two_series(buckets: &[Bucket], first: &str, height: u32) -> Value {
    let x: Vec<&Value> = buckets.iter().map(|b| &b.x).collect();
    let y1: Vec<&Value> = buckets.iter().map(|b| &b.y1).collect();
    let y2: Vec<&Value> = buckets.iter().map(|b| &b.y2).collect();
    json!({
        "series": [
            { "name": first, "data": y1 },
            { "name": "Penjualan", "data": y2 }
        ],
        "chart": {
            "type": "area",
            "height": height,
            "fontFamily": "Inter, sans-serif",
            "toolbar": { "show": false }
        },
        "grid": { "show": true },
        "dataLabels": { "enabled": false },
        "stroke": { "curve": "smooth", "show": true, "width": 1 },
        "xaxis": { "type": "datetime", "categories": x },
        "yaxis": { "decimalsInFloat": 0, "forceNiceScale": true },
        "fill": { "opacity": 1 },
        "legend": { "position": "top", "horizontalAlign": "right" }
    })
}

fn sparkline(data: Value, height: u32) -> Value {
    json!({
        "chart": {
            "type": "area",
            "height": height,
            "sparkline": { "enabled": true }
        },
        "stroke": { "curve": "smooth", "width": 1 },
        "fill": { "opacity": 1 },
        "series": [{ "name": "Downloads", "data": data }],
        "xaxis": { "type": "datetime" },
        "yaxis": { "min": 0 }
    })
}
