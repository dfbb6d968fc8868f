use crate::chart::ChartBundle;
use crate::error::{Error, Result};
use crate::render::RenderingSurface;
use std::fs;
use std::path::PathBuf;

/// Writes one self-contained HTML page per chart, named `<stem>.html`.
#[derive(Debug, Clone)]
pub struct HtmlSurface {
    out_dir: PathBuf,
}

impl HtmlSurface {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }
}

impl RenderingSurface for HtmlSurface {
    fn render(&mut self, chart: &ChartBundle) -> Result<PathBuf> {
        let path = self
            .out_dir
            .join(format!("{}.html", chart.kind.file_stem()));
        let html = render_chart_html(chart)?;
        fs::write(&path, html).map_err(|source| Error::Render {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// Render a self-contained HTML page (bundle embedded as JSON, drawn on a canvas).
///
/// Important: we avoid `format!()` because the page contains many `{}` from JS
/// template literals (e.g., `${x}`), which would conflict with Rust formatting.
pub fn render_chart_html(chart: &ChartBundle) -> Result<String> {
    // "</" inside a string literal would close the script element.
    let json = serde_json::to_string(chart)?.replace("</", "<\\/");

    const TEMPLATE: &str = r##"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<title>__TITLE__</title>
<style>
  body { font-family: system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif; margin: 0; background: #fafafa; }
  header { padding: 12px 16px; border-bottom: 1px solid #ddd; display: flex; gap: 12px; align-items: center; background: white; }
  main { padding: 16px; }
  canvas { background: white; border: 1px solid #ddd; }
  .muted { color: #777; font-size: 12px; }
</style>
</head>
<body>
<header>
  <b id="title"></b>
  <span class="muted" id="meta"></span>
  <button id="savePng" style="margin-left:auto; padding: 6px 10px;">Save PNG</button>
</header>
<main>
  <canvas id="chart" width="1200" height="800"></canvas>
</main>

<script>
// Embedded chart bundle (JSON object literal)
const CHART = __DATA__;

const PALETTE = ["#4c72b0", "#dd8452", "#55a868", "#c44e52", "#8172b3", "#937860", "#da8bc3", "#8c8c8c"];
const MARGIN = { left: 90, right: 30, top: 60, bottom: 90 };
const CSS_DPI = 96;

function fwd(axis, v) {
  return axis.scale === "log" ? Math.log10(v) : v;
}

function inv(axis, v) {
  return axis.scale === "log" ? Math.pow(10, v) : v;
}

function fmtTick(axis, v) {
  switch (axis.format) {
    case "percent": return (v * 100).toFixed(0) + "%";
    case "time": return new Date(v).toISOString().substring(11, 23);
    default:
      return Math.abs(v) >= 1000 ? Math.round(v).toLocaleString("en-US") : (Math.round(v * 100) / 100).toString();
  }
}

function bounds() {
  let b = { x0: Infinity, x1: -Infinity, y0: Infinity, y1: -Infinity };
  for (const s of CHART.series) {
    for (const p of s.points) {
      if (CHART.x_axis.scale === "log" && p.x <= 0) continue;
      const x = fwd(CHART.x_axis, p.x), y = fwd(CHART.y_axis, p.y);
      b.x0 = Math.min(b.x0, x); b.x1 = Math.max(b.x1, x);
      b.y0 = Math.min(b.y0, y); b.y1 = Math.max(b.y1, y);
    }
  }
  if (!isFinite(b.x0)) b = { x0: 0, x1: 1, y0: 0, y1: 1 };
  if (b.x1 === b.x0) { b.x0 -= 0.5; b.x1 += 0.5; }
  if (b.y1 === b.y0) { b.y0 -= 0.5; b.y1 += 0.5; }
  const pad = (b.y1 - b.y0) * 0.08;
  b.y0 -= pad; b.y1 += pad;
  return b;
}

function ticks(axis, lo, hi) {
  const out = [];
  if (axis.scale === "log") {
    for (let e = Math.floor(lo); e <= Math.ceil(hi); e++) if (e >= lo && e <= hi) out.push(e);
    return out;
  }
  const raw = (hi - lo) / 6;
  const mag = Math.pow(10, Math.floor(Math.log10(raw)));
  const step = [1, 2, 5, 10].map(m => m * mag).find(s => s >= raw);
  for (let v = Math.ceil(lo / step) * step; v <= hi; v += step) out.push(v);
  return out;
}

function draw(canvas, scale) {
  const ctx = canvas.getContext("2d");
  const W = canvas.width / scale, H = canvas.height / scale;
  ctx.setTransform(scale, 0, 0, scale, 0, 0);
  ctx.fillStyle = "white";
  ctx.fillRect(0, 0, W, H);

  const b = bounds();
  const pw = W - MARGIN.left - MARGIN.right, ph = H - MARGIN.top - MARGIN.bottom;
  const px = v => MARGIN.left + (fwd(CHART.x_axis, v) - b.x0) / (b.x1 - b.x0) * pw;
  const py = v => MARGIN.top + ph - (fwd(CHART.y_axis, v) - b.y0) / (b.y1 - b.y0) * ph;

  // Grid + ticks.
  ctx.font = "13px sans-serif";
  ctx.strokeStyle = "#e5e5e5";
  ctx.fillStyle = "#333";
  ctx.lineWidth = 1;
  ctx.textAlign = "center";
  for (const t of ticks(CHART.x_axis, b.x0, b.x1)) {
    const x = MARGIN.left + (t - b.x0) / (b.x1 - b.x0) * pw;
    ctx.beginPath(); ctx.moveTo(x, MARGIN.top); ctx.lineTo(x, MARGIN.top + ph); ctx.stroke();
    ctx.save();
    ctx.translate(x, MARGIN.top + ph + 14);
    if (CHART.x_axis.format === "time") ctx.rotate(-Math.PI / 4);
    ctx.fillText(fmtTick(CHART.x_axis, inv(CHART.x_axis, t)), 0, 0);
    ctx.restore();
  }
  ctx.textAlign = "right";
  for (const t of ticks(CHART.y_axis, b.y0, b.y1)) {
    const y = MARGIN.top + ph - (t - b.y0) / (b.y1 - b.y0) * ph;
    ctx.beginPath(); ctx.moveTo(MARGIN.left, y); ctx.lineTo(MARGIN.left + pw, y); ctx.stroke();
    ctx.fillText(fmtTick(CHART.y_axis, inv(CHART.y_axis, t)), MARGIN.left - 6, y + 4);
  }
  ctx.strokeStyle = "#333";
  ctx.strokeRect(MARGIN.left, MARGIN.top, pw, ph);

  // Labels + title.
  ctx.textAlign = "center";
  ctx.font = "15px sans-serif";
  ctx.fillText(CHART.x_axis.label, MARGIN.left + pw / 2, H - 16);
  ctx.save();
  ctx.translate(22, MARGIN.top + ph / 2);
  ctx.rotate(-Math.PI / 2);
  ctx.fillText(CHART.y_axis.label, 0, 0);
  ctx.restore();
  ctx.font = "bold 17px sans-serif";
  ctx.fillText(CHART.title, W / 2, 32);

  // Series.
  ctx.save();
  ctx.beginPath();
  ctx.rect(MARGIN.left, MARGIN.top, pw, ph);
  ctx.clip();
  CHART.series.forEach((s, i) => {
    s.colorResolved = s.color || PALETTE[i % PALETTE.length];
    const pts = s.points.filter(p => CHART.x_axis.scale !== "log" || p.x > 0);
    ctx.globalAlpha = s.opacity;
    ctx.strokeStyle = s.colorResolved;
    ctx.fillStyle = s.colorResolved;
    ctx.lineWidth = 2;
    ctx.setLineDash(s.line_style === "dashed" ? [8, 5] : []);
    ctx.beginPath();
    pts.forEach((p, k) => k === 0 ? ctx.moveTo(px(p.x), py(p.y)) : ctx.lineTo(px(p.x), py(p.y)));
    ctx.stroke();
    ctx.setLineDash([]);
    for (const p of pts) {
      if (s.marker === "circle") {
        ctx.beginPath(); ctx.arc(px(p.x), py(p.y), 5, 0, 2 * Math.PI); ctx.fill();
      } else if (s.marker === "square") {
        ctx.fillRect(px(p.x) - 5, py(p.y) - 5, 10, 10);
      }
    }
  });
  ctx.globalAlpha = 1;
  ctx.restore();

  // Point annotations, 10px above the point.
  ctx.font = "12px sans-serif";
  ctx.fillStyle = "#222";
  ctx.textAlign = "center";
  for (const a of CHART.annotations) {
    ctx.fillText(a.text, px(a.at.x), py(a.at.y) - 10);
  }

  // Overlay text box (top-left).
  if (CHART.overlay_text) {
    const lines = CHART.overlay_text.split("\n");
    ctx.font = "13px sans-serif";
    const w = Math.max(...lines.map(l => ctx.measureText(l).width)) + 16;
    ctx.fillStyle = "rgba(255,255,255,0.8)";
    ctx.strokeStyle = "#999";
    ctx.fillRect(MARGIN.left + 8, MARGIN.top + 8, w, lines.length * 18 + 10);
    ctx.strokeRect(MARGIN.left + 8, MARGIN.top + 8, w, lines.length * 18 + 10);
    ctx.fillStyle = "#222";
    ctx.textAlign = "left";
    lines.forEach((l, k) => ctx.fillText(l, MARGIN.left + 16, MARGIN.top + 26 + k * 18));
  }

  // Legend (top-right).
  ctx.font = "13px sans-serif";
  ctx.textAlign = "left";
  const lw = Math.max(...CHART.series.map(s => ctx.measureText(s.name).width)) + 50;
  const lx = MARGIN.left + pw - lw - 8, ly = MARGIN.top + 8;
  ctx.fillStyle = "rgba(255,255,255,0.85)";
  ctx.fillRect(lx, ly, lw, CHART.series.length * 20 + 8);
  CHART.series.forEach((s, i) => {
    const y = ly + 14 + i * 20;
    ctx.globalAlpha = Math.max(s.opacity, 0.3);
    ctx.strokeStyle = s.colorResolved;
    ctx.setLineDash(s.line_style === "dashed" ? [6, 4] : []);
    ctx.beginPath(); ctx.moveTo(lx + 6, y); ctx.lineTo(lx + 34, y); ctx.stroke();
    ctx.setLineDash([]);
    ctx.globalAlpha = 1;
    ctx.fillStyle = "#222";
    ctx.fillText(s.name, lx + 40, y + 4);
  });
}

function savePng() {
  const hint = CHART.export || { file_name: "chart.png", dpi: CSS_DPI };
  const scale = hint.dpi / CSS_DPI;
  const src = document.getElementById("chart");
  const off = document.createElement("canvas");
  off.width = Math.round(src.width * scale);
  off.height = Math.round(src.height * scale);
  draw(off, scale);
  const a = document.createElement("a");
  a.download = hint.file_name;
  a.href = off.toDataURL("image/png");
  a.click();
}

document.getElementById("title").textContent = CHART.title;
document.getElementById("meta").textContent =
  `${CHART.series.length} series | ${CHART.annotations.length} annotations`;
document.getElementById("savePng").onclick = savePng;
draw(document.getElementById("chart"), 1);
</script>
</body>
</html>
"##;

    Ok(TEMPLATE
        .replace("__TITLE__", &escape_html(&chart.title))
        .replace("__DATA__", &json))
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::compose_granularity;
    use crate::metrics::{AggregateRow, MethodType};

    fn chart() -> ChartBundle {
        compose_granularity(&[AggregateRow {
            granularity: 100.0,
            method_type: MethodType::Dictionary,
            mean_efficiency: Some(0.8),
            mean_processing_time_ms: Some(80.0),
            mean_total_time_ms: Some(100.0),
            mean_communication_overhead_ms: Some(20.0),
            mean_chunk_size: Some(100.0),
        }])
        .unwrap()
    }

    #[test]
    fn page_embeds_bundle() {
        let html = render_chart_html(&chart()).unwrap();
        assert!(html.contains("<title>Efficiency vs. Granularity</title>"));
        assert!(html.contains("\"granularity_efficiency_plot.png\""));
        assert!(html.contains("\"Theoretical Curve\""));
        assert!(!html.contains("__DATA__"));
    }

    #[test]
    fn template_keeps_hex_colours_and_closes_page() {
        let html = render_chart_html(&chart()).unwrap();
        assert!(html.contains(r##"const PALETTE = ["#4c72b0", "#dd8452""##));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn script_terminator_in_labels_is_escaped() {
        let mut c = chart();
        c.series[0].name = "</script><b>".to_string();
        let html = render_chart_html(&c).unwrap();
        assert_eq!(html.matches("</script>").count(), 1);
    }

    #[test]
    fn surface_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut surface = HtmlSurface::new(dir.path());

        let path = surface.render(&chart()).unwrap();
        assert_eq!(path, dir.path().join("granularity_efficiency_plot.html"));
        assert!(fs::read_to_string(path).unwrap().contains("const CHART = {"));
    }

    #[test]
    fn surface_reports_unwritable_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut surface = HtmlSurface::new(dir.path().join("missing"));

        assert!(matches!(surface.render(&chart()), Err(Error::Render { .. })));
    }
}
