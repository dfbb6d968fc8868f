//! Per-(method, granularity) efficiency summaries.

use crate::metrics::row::MetricRow;
use crate::metrics::schema::MethodType;
use log::{info, warn};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    pub granularity: f64,
    pub method_type: MethodType,
    /// None when no row in the group had a defined efficiency.
    pub mean_efficiency: Option<f64>,
    pub mean_processing_time_ms: Option<f64>,
    pub mean_total_time_ms: Option<f64>,
    pub mean_communication_overhead_ms: Option<f64>,
    pub mean_chunk_size: Option<f64>,
}

/// Arithmetic mean over the defined values only.
fn mean(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, n) = values
        .flatten()
        .fold((0.0f64, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Group rows by method (first-seen order), then by granularity (ascending),
/// and average each group. Rows without a granularity are left out.
///
/// An empty input yields an empty result.
pub fn aggregate(rows: &[MetricRow]) -> Vec<AggregateRow> {
    if rows.is_empty() {
        warn!("No data to calculate metrics");
        return Vec::new();
    }

    let mut methods: Vec<MethodType> = Vec::new();
    for row in rows {
        if !methods.contains(&row.method_type) {
            methods.push(row.method_type);
        }
    }

    let mut out = Vec::new();
    for method in methods {
        let mut groups: Vec<(f64, Vec<&MetricRow>)> = Vec::new();
        for row in rows.iter().filter(|r| r.method_type == method) {
            let Some(g) = row.granularity else {
                continue;
            };
            match groups.iter().position(|(key, _)| *key == g) {
                Some(i) => groups[i].1.push(row),
                None => groups.push((g, vec![row])),
            }
        }
        groups.sort_by(|a, b| a.0.total_cmp(&b.0));

        info!("{} efficiency metrics grouped by granularity:", method);
        for (granularity, members) in groups {
            let agg = AggregateRow {
                granularity,
                method_type: method,
                mean_efficiency: mean(members.iter().map(|r| r.efficiency())),
                mean_processing_time_ms: mean(members.iter().map(|r| r.processing_time_ms)),
                mean_total_time_ms: mean(members.iter().map(|r| r.total_time_ms)),
                mean_communication_overhead_ms: mean(
                    members.iter().map(|r| r.communication_overhead_ms()),
                ),
                mean_chunk_size: mean(members.iter().map(|r| r.chunk_size)),
            };
            info!(
                "  granularity={} chunk_size={:?} efficiency={:?} processing_ms={:?} total_ms={:?}",
                agg.granularity,
                agg.mean_chunk_size,
                agg.mean_efficiency,
                agg.mean_processing_time_ms,
                agg.mean_total_time_ms
            );
            out.push(agg);
        }
    }

    out
}
