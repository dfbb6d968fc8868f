//! Per-chart data preparation applied to parsed log records.

use crate::logs::{CalculatingSample, CentralSample};
use chrono::NaiveDateTime;
use serde::Serialize;

/// Work done between two consecutive calculating-log lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalculatingInterval {
    pub packets: i64,
    pub execution_time_ms: i64,
    pub timestamp: NaiveDateTime,
}

/// `cur - prev`, saturated to the `i64` range.
fn delta(cur: u64, prev: u64) -> i64 {
    let d = i128::from(cur) - i128::from(prev);
    i64::try_from(d).unwrap_or(if d < 0 { i64::MIN } else { i64::MAX })
}

/// Turn cumulative counters into per-interval deltas.
///
/// The first interval is its own baseline, so the output has one entry per
/// input sample and its first value equals the first cumulative value.
pub fn difference_calculating(samples: &[CalculatingSample]) -> Vec<CalculatingInterval> {
    let mut prev: Option<&CalculatingSample> = None;
    samples
        .iter()
        .map(|s| {
            let (packets, ms) = match prev {
                Some(p) => (
                    delta(s.packet_index, p.packet_index),
                    delta(s.execution_time_ms, p.execution_time_ms),
                ),
                None => (delta(s.packet_index, 0), delta(s.execution_time_ms, 0)),
            };
            prev = Some(s);
            CalculatingInterval {
                packets,
                execution_time_ms: ms,
                timestamp: s.timestamp,
            }
        })
        .collect()
}

/// Drop the coordinator's "average" rows, keeping worker rows in order.
pub fn drop_average_rows(samples: &[CentralSample]) -> Vec<CentralSample> {
    samples.iter().filter(|s| !s.is_average()).cloned().collect()
}
