use chrono::NaiveDateTime;
use serde::Serialize;

/// Timestamp layout used by every log line: `2025-04-19 10:00:00.123456`.
/// The six-digit fraction is mandatory.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S.%6f";

/// Worker identifier the coordinator uses for its cross-worker mean.
pub const AVERAGE_WORKER: &str = "average";

/// One `Checked N ... in Mms` line from a calculating server log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalculatingSample {
    pub packet_index: u64,
    pub execution_time_ms: u64,
    pub timestamp: NaiveDateTime,
}

/// One `[BruteForce]` timing line from the central server log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CentralSample {
    pub total_ms: u64,
    pub ip: String,
    pub calculating_ms: u64,
    pub communication_ms: u64,
    pub timestamp: NaiveDateTime,
}

impl CentralSample {
    /// True when the row is the coordinator's average over all workers.
    pub fn is_average(&self) -> bool {
        self.ip.eq_ignore_ascii_case(AVERAGE_WORKER)
    }
}
