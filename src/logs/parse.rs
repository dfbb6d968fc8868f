use crate::error::{Error, Result};
use crate::logs::row::{CalculatingSample, CentralSample, TIMESTAMP_FORMAT};
use chrono::NaiveDateTime;
use log::debug;
use regex::{Captures, Regex};
use std::fs;
use std::path::Path;

/// Turns one raw log line into at most one typed record.
///
/// A line that does not match is not an error; it simply yields `None`.
pub trait RecordParser {
    type Record;

    fn parse_line(&self, line: &str) -> Option<Self::Record>;
}

/// Parser for calculating-server lines.
///
/// Example:
/// [INFO] Checked 120 packets in 340ms at [2025-04-19 10:00:00.123456]
#[derive(Debug, Clone)]
pub struct CalculatingParser {
    re: Regex,
}

impl CalculatingParser {
    pub fn new() -> Result<Self> {
        // Capture:
        // 1) packets checked so far
        // 2) execution time so far (ms)
        // 3) bracketed timestamp at the end of the line
        let re = Regex::new(r#"\[INFO\]\sChecked\s(\d+)\s.*in\s(\d+)ms\sat\s\[(.*)\]"#)?;
        Ok(Self { re })
    }
}

impl RecordParser for CalculatingParser {
    type Record = CalculatingSample;

    fn parse_line(&self, line: &str) -> Option<CalculatingSample> {
        let caps = self.re.captures(line)?;
        Some(CalculatingSample {
            packet_index: number(&caps, 1)?,
            execution_time_ms: number(&caps, 2)?,
            timestamp: timestamp(&caps, 3)?,
        })
    }
}

/// Parser for central-server brute-force timing lines.
///
/// Example:
/// [INFO] [BruteForce] Central: Total = 520 ms | Calculating: (10.0.0.1) Total = 400 ms | Communication time = 120 ms at [2025-04-19 10:00:00.123456]
#[derive(Debug, Clone)]
pub struct CentralParser {
    re: Regex,
}

impl CentralParser {
    pub fn new() -> Result<Self> {
        // Capture:
        // 1) central total (ms)
        // 2) worker identifier (an address, or "average")
        // 3) calculating total (ms)
        // 4) communication time (ms), the last "= N" on the line
        // 5) bracketed timestamp
        let re = Regex::new(
            r#"\[INFO\]\s\[BruteForce\]\s.*?(\d+)\sms\s.*?Calculating:\s\((.*?)\)\s.*?=\s(\d+)\sms.*=\s(\d+).*\[(.*)\]"#,
        )?;
        Ok(Self { re })
    }
}

impl RecordParser for CentralParser {
    type Record = CentralSample;

    fn parse_line(&self, line: &str) -> Option<CentralSample> {
        let caps = self.re.captures(line)?;
        Some(CentralSample {
            total_ms: number(&caps, 1)?,
            ip: caps.get(2)?.as_str().to_string(),
            calculating_ms: number(&caps, 3)?,
            communication_ms: number(&caps, 4)?,
            timestamp: timestamp(&caps, 5)?,
        })
    }
}

fn number(caps: &Captures<'_>, idx: usize) -> Option<u64> {
    caps.get(idx)?.as_str().parse().ok()
}

fn timestamp(caps: &Captures<'_>, idx: usize) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(caps.get(idx)?.as_str(), TIMESTAMP_FORMAT).ok()
}

/// Read a log file and collect every line `parser` accepts, in file order.
///
/// Unmatched lines are skipped. A missing or unreadable file is an error,
/// because an empty result would otherwise look like a log with no samples.
pub fn read_log_file<P: RecordParser>(path: impl AsRef<Path>, parser: &P) -> Result<Vec<P::Record>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| Error::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;

    let mut out = Vec::new();
    let mut skipped = 0usize;
    for line in text.lines() {
        match parser.parse_line(line) {
            Some(record) => out.push(record),
            None => skipped += 1,
        }
    }

    debug!(
        "{}: {} records parsed, {} lines skipped",
        path.display(),
        out.len(),
        skipped
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn ts(h: u32, m: u32, s: u32, micro: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 4, 19)
            .unwrap()
            .and_hms_micro_opt(h, m, s, micro)
            .unwrap()
    }

    #[test]
    fn parses_calculating_line() {
        let parser = CalculatingParser::new().unwrap();
        let line = "[INFO] Checked 120 packets in 340ms at [2025-04-19 10:00:00.123456]";

        assert_eq!(
            parser.parse_line(line),
            Some(CalculatingSample {
                packet_index: 120,
                execution_time_ms: 340,
                timestamp: ts(10, 0, 0, 123456),
            })
        );
    }

    #[test]
    fn calculating_line_survives_reserialization() {
        let parser = CalculatingParser::new().unwrap();
        for (packets, ms, t) in [
            (0u64, 0u64, ts(0, 0, 0, 0)),
            (1, 17, ts(9, 30, 5, 1)),
            (9_999_999, 123_456, ts(23, 59, 59, 999_999)),
        ] {
            let line = format!(
                "[INFO] Checked {} combinations in {}ms at [{}]",
                packets,
                ms,
                t.format(TIMESTAMP_FORMAT)
            );
            let parsed = parser.parse_line(&line).unwrap();
            assert_eq!(
                (parsed.packet_index, parsed.execution_time_ms, parsed.timestamp),
                (packets, ms, t)
            );
        }
    }

    #[test]
    fn rejects_near_misses() {
        let parser = CalculatingParser::new().unwrap();
        for line in [
            "",
            "[ERROR] Checked 120 packets in 340ms at [2025-04-19 10:00:00.123456]",
            "[INFO] Checked 120 packets in 340 ms at [2025-04-19 10:00:00.123456]",
            "[INFO] Checked many packets in 340ms at [2025-04-19 10:00:00.123456]",
            "[INFO] Checked 120 packets in 340ms at [yesterday]",
            "[INFO] Checked 120 packets in 340ms",
            "[INFO] Checked 120 packets in 340ms at [2025-04-19 10:00:00]",
            "[INFO] Checked 120 packets in 340ms at [2025-04-19 10:00:00.123]",
            "[INFO] Checked 120 packets in 340ms at [2025-04-19 10:00:00.123456789]",
        ] {
            assert!(parser.parse_line(line).is_none(), "accepted {:?}", line);
        }
    }

    #[test]
    fn parses_central_line() {
        let parser = CentralParser::new().unwrap();
        let line = "[INFO] [BruteForce] Central: Total = 520 ms | Calculating: (10.0.0.1) Total = 400 ms | Communication time = 120 ms at [2025-04-19 10:00:01.000001]";

        assert_eq!(
            parser.parse_line(line),
            Some(CentralSample {
                total_ms: 520,
                ip: "10.0.0.1".to_string(),
                calculating_ms: 400,
                communication_ms: 120,
                timestamp: ts(10, 0, 1, 1),
            })
        );
    }

    #[test]
    fn central_accepts_average_identifier() {
        let parser = CentralParser::new().unwrap();
        let line = "[INFO] [BruteForce] Central: Total = 90 ms | Calculating: (Average) Total = 60 ms | Communication time = 30 ms at [2025-04-19 10:00:02.500000]";

        let sample = parser.parse_line(line).unwrap();
        assert_eq!(sample.ip, "Average");
        assert!(sample.is_average());
    }

    #[test]
    fn central_skips_lines_without_worker_breakdown() {
        let parser = CentralParser::new().unwrap();
        let line = "[INFO] [BruteForce] Central: Total = 90 ms | Communication time = 90 ms at [2025-04-19 10:00:02.500000]";
        assert!(parser.parse_line(line).is_none());
    }

    #[test]
    fn central_requires_microsecond_timestamp() {
        let parser = CentralParser::new().unwrap();
        for stamp in ["2025-04-19 10:00:01", "2025-04-19 10:00:01.000001000"] {
            let line = format!(
                "[INFO] [BruteForce] Central: Total = 520 ms | Calculating: (10.0.0.1) Total = 400 ms | Communication time = 120 ms at [{}]",
                stamp
            );
            assert!(parser.parse_line(&line).is_none(), "accepted {:?}", stamp);
        }
    }

    #[test]
    fn reads_file_in_order_and_keeps_duplicates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[INFO] Checked 10 packets in 5ms at [2025-04-19 10:00:00.000000]").unwrap();
        writeln!(file, "noise").unwrap();
        writeln!(file, "[INFO] Checked 10 packets in 5ms at [2025-04-19 10:00:00.000000]").unwrap();
        writeln!(file, "[INFO] Checked 30 packets in 9ms at [2025-04-19 10:00:01.000000]").unwrap();

        let parser = CalculatingParser::new().unwrap();
        let records = read_log_file(file.path(), &parser).unwrap();

        let packets: Vec<u64> = records.iter().map(|r| r.packet_index).collect();
        assert_eq!(packets, vec![10, 10, 30]);
    }

    #[test]
    fn missing_file_is_surfaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.txt");

        let parser = CentralParser::new().unwrap();
        match read_log_file(&path, &parser) {
            Err(Error::FileAccess { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected FileAccess, got {:?}", other),
        }
    }
}
