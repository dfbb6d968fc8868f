use crate::metrics::schema::MethodType;
use serde::Serialize;

/// One measurement from a metrics table, normalized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    pub timestamp: String,
    pub method_type: MethodType,
    /// None when the cell was absent or not numeric.
    pub granularity: Option<f64>,
    pub chunk_size: Option<f64>,
    /// None for tables that do not record timings (brute-force summaries).
    pub processing_time_ms: Option<f64>,
    pub total_time_ms: Option<f64>,
    pub password_found: bool,
}

impl MetricRow {
    /// Time not spent processing. Negative when the two clocks disagree.
    pub fn communication_overhead_ms(&self) -> Option<f64> {
        Some(self.total_time_ms? - self.processing_time_ms?)
    }

    /// Processing share of total time; undefined when total time is zero.
    pub fn efficiency(&self) -> Option<f64> {
        let total = self.total_time_ms?;
        if total == 0.0 {
            return None;
        }
        Some(self.processing_time_ms? / total)
    }
}

/// Distinct granularities in first-seen order, for diagnostics.
pub fn distinct_granularities(rows: &[MetricRow]) -> Vec<f64> {
    let mut out: Vec<f64> = Vec::new();
    for g in rows.iter().filter_map(|r| r.granularity) {
        if !out.contains(&g) {
            out.push(g);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(processing: Option<f64>, total: Option<f64>) -> MetricRow {
        MetricRow {
            timestamp: "2025-04-19 10:00:00".into(),
            method_type: MethodType::Dictionary,
            granularity: Some(100.0),
            chunk_size: Some(100.0),
            processing_time_ms: processing,
            total_time_ms: total,
            password_found: false,
        }
    }

    #[test]
    fn overhead_is_total_minus_processing() {
        assert_eq!(row(Some(40.0), Some(100.0)).communication_overhead_ms(), Some(60.0));
        // Clocks disagree: not clamped.
        assert_eq!(row(Some(120.0), Some(100.0)).communication_overhead_ms(), Some(-20.0));
        assert_eq!(row(None, Some(100.0)).communication_overhead_ms(), None);
    }

    #[test]
    fn efficiency_undefined_for_zero_total() {
        assert_eq!(row(Some(0.0), Some(0.0)).efficiency(), None);
        assert_eq!(row(Some(5.0), Some(0.0)).efficiency(), None);
        assert_eq!(row(Some(25.0), Some(100.0)).efficiency(), Some(0.25));
        assert_eq!(row(None, None).efficiency(), None);
    }
}
