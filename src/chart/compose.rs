use crate::chart::model::{
    Annotation, Axis, ChartBundle, ChartKind, ExportHint, LineStyle, Marker, Point, Scale, Series,
    SeriesRole, TickFormat,
};
use crate::logs::CentralSample;
use crate::metrics::{AggregateRow, MethodType};
use crate::series::CalculatingInterval;
use chrono::NaiveDateTime;
use log::warn;

const REFERENCE_POINTS: usize = 1000;
const REFERENCE_X_MIN: f64 = 1.0;
const REFERENCE_X_MAX: f64 = 100_000.0;
const BRUTE_FORCE_COLOR: &str = "#d95f02";
const EXPORT_DPI: u32 = 300;

/// Milliseconds since the Unix epoch, keeping sub-millisecond precision.
fn time_x(ts: &NaiveDateTime) -> f64 {
    ts.and_utc().timestamp_micros() as f64 / 1000.0
}

fn time_axis(label: &str) -> Axis {
    Axis {
        label: label.to_string(),
        scale: Scale::Linear,
        format: TickFormat::Time,
    }
}

fn data_series(name: String, points: Vec<Point>, line_style: LineStyle, marker: Marker) -> Series {
    Series {
        name,
        role: SeriesRole::Data,
        points,
        line_style,
        marker,
        color: None,
        opacity: 1.0,
    }
}

/// Execution time per interval, with run totals in the overlay.
pub fn compose_calculating(intervals: &[CalculatingInterval]) -> Option<ChartBundle> {
    if intervals.is_empty() {
        warn!("calculating log has no samples, chart skipped");
        return None;
    }

    let total_ms: i64 = intervals.iter().map(|i| i.execution_time_ms).sum();
    let total_packets: i64 = intervals.iter().map(|i| i.packets).sum();
    // First interval is the cumulative baseline; the title names the second.
    let packet_size = intervals.get(1).unwrap_or(&intervals[0]).packets;

    let points = intervals
        .iter()
        .map(|i| Point {
            x: time_x(&i.timestamp),
            y: i.execution_time_ms as f64,
        })
        .collect();

    Some(ChartBundle {
        kind: ChartKind::Calculating,
        title: format!("Execution time for packets of size {}", packet_size),
        x_axis: time_axis("Timestamp"),
        y_axis: Axis {
            label: "Execution time (ms)".to_string(),
            scale: Scale::Linear,
            format: TickFormat::Number,
        },
        series: vec![data_series(
            "Execution time (ms)".to_string(),
            points,
            LineStyle::Solid,
            Marker::None,
        )],
        annotations: Vec::new(),
        overlay_text: Some(format!(
            "Total execution time: {} ms\nTotal packet size: {}",
            total_ms, total_packets
        )),
        export: None,
    })
}

/// Calculating and communication time per worker. Expects average rows
/// to be removed already.
pub fn compose_central(samples: &[CentralSample]) -> Option<ChartBundle> {
    if samples.is_empty() {
        warn!("central log has no worker samples, chart skipped");
        return None;
    }

    let mut workers: Vec<&str> = Vec::new();
    for s in samples {
        if !workers.contains(&s.ip.as_str()) {
            workers.push(&s.ip);
        }
    }

    let mut series = Vec::with_capacity(workers.len() * 2);
    for ip in workers {
        let rows: Vec<&CentralSample> = samples.iter().filter(|s| s.ip == ip).collect();
        let line = |value: fn(&CentralSample) -> u64| -> Vec<Point> {
            rows.iter()
                .map(|s| Point {
                    x: time_x(&s.timestamp),
                    y: value(s) as f64,
                })
                .collect()
        };

        series.push(data_series(
            format!("{} - calculating", ip),
            line(|s| s.calculating_ms),
            LineStyle::Solid,
            Marker::Circle,
        ));
        series.push(data_series(
            format!("{} - communication", ip),
            line(|s| s.communication_ms),
            LineStyle::Dashed,
            Marker::Square,
        ));
    }

    Some(ChartBundle {
        kind: ChartKind::Central,
        title: "Calculating and communication time per worker".to_string(),
        x_axis: time_axis("Time"),
        y_axis: Axis {
            label: "Time (ms)".to_string(),
            scale: Scale::Linear,
            format: TickFormat::Number,
        },
        series,
        annotations: Vec::new(),
        overlay_text: None,
        export: None,
    })
}

/// y = 0.95 * (1 - e^(-x/1000)) * (e^(-x/50000) + 0.2)
pub fn reference_efficiency(x: f64) -> f64 {
    0.95 * (1.0 - (-x / 1000.0).exp()) * ((-x / 50_000.0).exp() + 0.2)
}

fn reference_curve() -> Series {
    let step = (REFERENCE_X_MAX - REFERENCE_X_MIN) / (REFERENCE_POINTS - 1) as f64;
    let points = (0..REFERENCE_POINTS)
        .map(|i| {
            let x = REFERENCE_X_MIN + step * i as f64;
            Point {
                x,
                y: reference_efficiency(x),
            }
        })
        .collect();

    Series {
        name: "Theoretical Curve".to_string(),
        role: SeriesRole::Reference,
        points,
        line_style: LineStyle::Dashed,
        marker: Marker::None,
        color: Some("#000000".to_string()),
        opacity: 0.3,
    }
}

/// Mean efficiency against granularity, one series per method, over the
/// reference curve.
pub fn compose_granularity(aggregates: &[AggregateRow]) -> Option<ChartBundle> {
    if aggregates.is_empty() {
        warn!("No data available for plotting");
        return None;
    }

    let mut series = Vec::new();
    let mut annotations = Vec::new();

    for method in [MethodType::Dictionary, MethodType::Bruteforce] {
        let mut rows: Vec<(f64, f64)> = aggregates
            .iter()
            .filter(|a| a.method_type == method)
            .filter_map(|a| Some((a.granularity, a.mean_efficiency?)))
            .collect();
        if rows.is_empty() {
            continue;
        }
        rows.sort_by(|a, b| a.0.total_cmp(&b.0));

        let (name, line_style, marker, color, prefix) = match method {
            MethodType::Dictionary => ("Dictionary Cracking", LineStyle::Solid, Marker::Circle, None, ""),
            MethodType::Bruteforce => (
                "Brute Force Cracking",
                LineStyle::Dashed,
                Marker::Square,
                Some(BRUTE_FORCE_COLOR.to_string()),
                "BF: ",
            ),
        };

        let points: Vec<Point> = rows.iter().map(|&(x, y)| Point { x, y }).collect();
        annotations.extend(points.iter().map(|p| Annotation {
            series: name.to_string(),
            at: *p,
            text: format!("{}{}", prefix, p.x as i64),
        }));
        series.push(Series {
            color,
            ..data_series(name.to_string(), points, line_style, marker)
        });
    }

    if series.is_empty() {
        warn!("no aggregate has a defined efficiency, chart skipped");
        return None;
    }
    series.push(reference_curve());

    Some(ChartBundle {
        kind: ChartKind::Granularity,
        title: "Efficiency vs. Granularity".to_string(),
        x_axis: Axis {
            label: "Granularity (Chunk/Package Size)".to_string(),
            scale: Scale::Log,
            format: TickFormat::Number,
        },
        y_axis: Axis {
            label: "Efficiency (Processing Time / Total Time)".to_string(),
            scale: Scale::Linear,
            format: TickFormat::Percent,
        },
        series,
        annotations,
        overlay_text: None,
        export: Some(ExportHint {
            file_name: format!("{}.png", ChartKind::Granularity.file_stem()),
            dpi: EXPORT_DPI,
        }),
    })
}
