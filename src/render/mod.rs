//! Rendering surfaces: consume a finished `ChartBundle` and draw it somewhere.

pub mod html;
pub mod json;

pub use html::HtmlSurface;
pub use json::JsonSurface;

use crate::chart::ChartBundle;
use crate::error::Result;
use std::path::PathBuf;

pub trait RenderingSurface {
    /// Draw `chart` and return where the output went.
    fn render(&mut self, chart: &ChartBundle) -> Result<PathBuf>;
}
