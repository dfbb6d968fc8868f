//! Declarative chart bundle handed to a rendering surface.
//!
//! Everything a surface needs is in here; surfaces never look at records.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Calculating,
    Central,
    Granularity,
}

impl ChartKind {
    /// Output file name without extension.
    pub fn file_stem(self) -> &'static str {
        match self {
            ChartKind::Calculating => "calculating_execution_time",
            ChartKind::Central => "central_worker_timings",
            ChartKind::Granularity => "granularity_efficiency_plot",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scale {
    Linear,
    Log,
}

/// How tick values are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TickFormat {
    Number,
    /// Values are milliseconds since the Unix epoch.
    Time,
    /// Values are fractions of 1.
    Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub label: String,
    pub scale: Scale,
    pub format: TickFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    None,
    Circle,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesRole {
    Data,
    /// Fixed curve drawn behind the data for comparison.
    Reference,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    /// Legend entry.
    pub name: String,
    pub role: SeriesRole,
    pub points: Vec<Point>,
    pub line_style: LineStyle,
    pub marker: Marker,
    pub color: Option<String>,
    pub opacity: f64,
}

/// Text attached to a single data point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub series: String,
    pub at: Point,
    pub text: String,
}

/// Requested raster export for surfaces that can produce one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportHint {
    pub file_name: String,
    pub dpi: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBundle {
    pub kind: ChartKind,
    pub title: String,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub series: Vec<Series>,
    pub annotations: Vec<Annotation>,
    /// Boxed text in the top-left corner of the plot area.
    pub overlay_text: Option<String>,
    pub export: Option<ExportHint>,
}
