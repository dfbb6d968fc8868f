//! Column layout shared by every metrics table.
//!
//! Headers the writers emit (extra columns are ignored):
//! - granularity_metrics.csv:          Timestamp, MethodType, Granularity, ChunkSize, ProcessingTime, TotalTime, PasswordFound
//! - dictionary_chunk_metrics.csv:     Timestamp, ChunkStart, ChunkEnd, ChunkSize, ServerIp, ProcessingTime, TotalTime, PasswordFound, Granularity
//! - bruteforce_package_metrics.csv:   Timestamp, UserLogin, PasswordLength, CharPackage, ServerIp, ProcessingTime, TotalTime, PasswordFound, Granularity
//! - bruteforce_metrics.csv:           Timestamp, PasswordFound, Granularity

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Every column the loader knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Timestamp,
    MethodType,
    PasswordFound,
    Granularity,
    ChunkSize,
    ChunkStart,
    ChunkEnd,
    CharPackage,
    ProcessingTime,
    TotalTime,
}

impl Column {
    pub const ALL: [Column; 10] = [
        Column::Timestamp,
        Column::MethodType,
        Column::PasswordFound,
        Column::Granularity,
        Column::ChunkSize,
        Column::ChunkStart,
        Column::ChunkEnd,
        Column::CharPackage,
        Column::ProcessingTime,
        Column::TotalTime,
    ];

    /// Header text as written in the CSV files.
    pub fn header(self) -> &'static str {
        match self {
            Column::Timestamp => "Timestamp",
            Column::MethodType => "MethodType",
            Column::PasswordFound => "PasswordFound",
            Column::Granularity => "Granularity",
            Column::ChunkSize => "ChunkSize",
            Column::ChunkStart => "ChunkStart",
            Column::ChunkEnd => "ChunkEnd",
            Column::CharPackage => "CharPackage",
            Column::ProcessingTime => "ProcessingTime",
            Column::TotalTime => "TotalTime",
        }
    }
}

/// Cracking method a metrics row was measured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodType {
    Dictionary,
    Bruteforce,
}

impl MethodType {
    pub fn parse(s: &str) -> Option<MethodType> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dictionary" => Some(MethodType::Dictionary),
            "bruteforce" | "brute force" | "brute-force" => Some(MethodType::Bruteforce),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MethodType::Dictionary => "dictionary",
            MethodType::Bruteforce => "bruteforce",
        }
    }
}

impl fmt::Display for MethodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A CSV record exactly as read: every known column, every cell optional.
///
/// Field names must stay in sync with `Column::header`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    #[serde(rename = "Timestamp")]
    pub timestamp: Option<String>,
    #[serde(rename = "MethodType")]
    pub method_type: Option<String>,
    #[serde(rename = "PasswordFound")]
    pub password_found: Option<String>,
    #[serde(rename = "Granularity")]
    pub granularity: Option<String>,
    #[serde(rename = "ChunkSize")]
    pub chunk_size: Option<String>,
    #[serde(rename = "ChunkStart")]
    pub chunk_start: Option<String>,
    #[serde(rename = "ChunkEnd")]
    pub chunk_end: Option<String>,
    #[serde(rename = "CharPackage")]
    pub char_package: Option<String>,
    #[serde(rename = "ProcessingTime")]
    pub processing_time: Option<String>,
    #[serde(rename = "TotalTime")]
    pub total_time: Option<String>,
}

impl RawRecord {
    pub fn cell(&self, column: Column) -> Option<&str> {
        let v = match column {
            Column::Timestamp => &self.timestamp,
            Column::MethodType => &self.method_type,
            Column::PasswordFound => &self.password_found,
            Column::Granularity => &self.granularity,
            Column::ChunkSize => &self.chunk_size,
            Column::ChunkStart => &self.chunk_start,
            Column::ChunkEnd => &self.chunk_end,
            Column::CharPackage => &self.char_package,
            Column::ProcessingTime => &self.processing_time,
            Column::TotalTime => &self.total_time,
        };
        v.as_deref()
    }

    /// Numeric view of a cell. Empty, non-numeric and non-finite cells are null.
    pub fn number(&self, column: Column) -> Option<f64> {
        let raw = self.cell(column)?.trim();
        if raw.is_empty() {
            return None;
        }
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Some(v),
            _ => {
                debug!("non-numeric {} {:?} coerced to null", column.header(), raw);
                None
            }
        }
    }

    /// Boolean view of a cell. Anything unrecognised is `false`.
    pub fn flag(&self, column: Column) -> bool {
        let Some(raw) = self.cell(column) else {
            return false;
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" | "" => false,
            other => {
                debug!("unparseable {} {:?} coerced to false", column.header(), other);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_coercion_never_fails() {
        let raw = RawRecord {
            granularity: Some(" 1000 ".into()),
            chunk_size: Some("lots".into()),
            chunk_start: Some("NaN".into()),
            chunk_end: Some("".into()),
            ..RawRecord::default()
        };

        assert_eq!(raw.number(Column::Granularity), Some(1000.0));
        assert_eq!(raw.number(Column::ChunkSize), None);
        assert_eq!(raw.number(Column::ChunkStart), None);
        assert_eq!(raw.number(Column::ChunkEnd), None);
        assert_eq!(raw.number(Column::TotalTime), None);
    }

    #[test]
    fn boolean_coercion() {
        let cases = [
            ("True", true),
            ("false", false),
            ("1", true),
            ("0", false),
            ("YES", true),
            ("maybe", false),
        ];
        for (input, expected) in cases {
            let raw = RawRecord {
                password_found: Some(input.into()),
                ..RawRecord::default()
            };
            assert_eq!(raw.flag(Column::PasswordFound), expected, "{}", input);
        }
        assert!(!RawRecord::default().flag(Column::PasswordFound));
    }

    #[test]
    fn method_names() {
        assert_eq!(MethodType::parse("Dictionary"), Some(MethodType::Dictionary));
        assert_eq!(MethodType::parse("bruteforce"), Some(MethodType::Bruteforce));
        assert_eq!(MethodType::parse("rainbow"), None);
    }
}
