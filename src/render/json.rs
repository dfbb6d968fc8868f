use crate::chart::ChartBundle;
use crate::error::{Error, Result};
use crate::render::RenderingSurface;
use std::fs;
use std::path::PathBuf;

/// Writes the bundle verbatim as `<stem>.json`.
#[derive(Debug, Clone)]
pub struct JsonSurface {
    out_dir: PathBuf,
}

impl JsonSurface {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }
}

impl RenderingSurface for JsonSurface {
    fn render(&mut self, chart: &ChartBundle) -> Result<PathBuf> {
        let path = self
            .out_dir
            .join(format!("{}.json", chart.kind.file_stem()));
        let json = serde_json::to_string_pretty(chart)?;
        fs::write(&path, json).map_err(|source| Error::Render {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}
