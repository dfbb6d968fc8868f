//! Multi-source metrics loading.
//!
//! Sources are tried in a fixed order:
//! 1. granularity_metrics.csv, returned as-is when present with a MethodType column and usable rows
//! 2. dictionary_chunk_metrics.csv, plus
//!    bruteforce_package_metrics.csv (or bruteforce_metrics.csv if the former is absent or empty)
//!
//! Any file may be missing. Missing files and bad cells are reported, never raised.

use crate::metrics::row::{MetricRow, distinct_granularities};
use crate::metrics::schema::{Column, MethodType, RawRecord};
use log::{debug, info, warn};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricsSource {
    /// Pre-merged table covering both methods.
    Granularity,
    DictionaryChunks,
    BruteForcePackages,
    BruteForceSummary,
}

impl MetricsSource {
    pub fn file_name(self) -> &'static str {
        match self {
            MetricsSource::Granularity => "granularity_metrics.csv",
            MetricsSource::DictionaryChunks => "dictionary_chunk_metrics.csv",
            MetricsSource::BruteForcePackages => "bruteforce_package_metrics.csv",
            MetricsSource::BruteForceSummary => "bruteforce_metrics.csv",
        }
    }

    fn describe(self) -> &'static str {
        match self {
            MetricsSource::Granularity => "granularity metrics",
            MetricsSource::DictionaryChunks => "dictionary chunk",
            MetricsSource::BruteForcePackages => "brute force package",
            MetricsSource::BruteForceSummary => "brute force summary",
        }
    }

    /// Build a typed row from a raw record. `columns` is the table's header set.
    fn normalize(self, raw: &RawRecord, columns: &BTreeSet<&'static str>) -> Option<MetricRow> {
        let timestamp = raw
            .cell(Column::Timestamp)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        let method_type = match self {
            MetricsSource::Granularity => {
                let cell = raw.cell(Column::MethodType).unwrap_or_default();
                match MethodType::parse(cell) {
                    Some(m) => m,
                    None => {
                        warn!("granularity metrics row {:?} has unknown method {:?}, skipped", timestamp, cell);
                        return None;
                    }
                }
            }
            MetricsSource::DictionaryChunks => MethodType::Dictionary,
            MetricsSource::BruteForcePackages | MetricsSource::BruteForceSummary => {
                MethodType::Bruteforce
            }
        };

        let explicit = raw.number(Column::ChunkSize);
        let chunk_size = match self {
            MetricsSource::Granularity => explicit,
            MetricsSource::DictionaryChunks => {
                let has_bounds = columns.contains(Column::ChunkStart.header())
                    && columns.contains(Column::ChunkEnd.header());
                match explicit {
                    Some(size) if size != 0.0 => Some(size),
                    _ if has_bounds => span(raw).or(explicit),
                    _ => explicit,
                }
            }
            MetricsSource::BruteForcePackages | MetricsSource::BruteForceSummary => explicit
                .or_else(|| {
                    raw.cell(Column::CharPackage)
                        .map(|p| p.chars().count() as f64)
                })
                .or_else(|| span(raw)),
        };

        Some(MetricRow {
            timestamp,
            method_type,
            granularity: raw.number(Column::Granularity),
            chunk_size,
            processing_time_ms: raw.number(Column::ProcessingTime),
            total_time_ms: raw.number(Column::TotalTime),
            password_found: raw.flag(Column::PasswordFound),
        })
    }
}

/// Inclusive chunk length from its bounds.
fn span(raw: &RawRecord) -> Option<f64> {
    Some(raw.number(Column::ChunkEnd)? - raw.number(Column::ChunkStart)? + 1.0)
}

/// The unified table plus the sources it was built from.
#[derive(Debug, Clone, Default)]
pub struct LoadedMetrics {
    pub sources: Vec<MetricsSource>,
    pub rows: Vec<MetricRow>,
}

impl LoadedMetrics {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Load one table from `dir`. `None` when the file is absent or unreadable.
pub fn load_source(dir: &Path, source: MetricsSource) -> Option<Vec<MetricRow>> {
    let path = dir.join(source.file_name());
    let file = match File::open(&path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("{} file not found at {}", source.describe(), path.display());
            return None;
        }
        Err(e) => {
            warn!("cannot open {}: {}", path.display(), e);
            return None;
        }
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(file);

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(e) => {
            warn!("cannot read header of {}: {}", path.display(), e);
            return None;
        }
    };
    let columns: BTreeSet<&'static str> = Column::ALL
        .iter()
        .map(|c| c.header())
        .filter(|h| headers.iter().any(|x| x == *h))
        .collect();
    debug!("{} known columns: {:?}", path.display(), columns);

    if source == MetricsSource::Granularity && !columns.contains(Column::MethodType.header()) {
        warn!(
            "{} has no {} column, ignored",
            path.display(),
            Column::MethodType.header()
        );
        return None;
    }

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = match record {
            Ok(r) if r.len() == headers.len() => r,
            Ok(r) => {
                warn!(
                    "{} record {} skipped: {} fields, header has {}",
                    path.display(),
                    idx + 1,
                    r.len(),
                    headers.len()
                );
                continue;
            }
            Err(e) => {
                warn!("{} record {} skipped: {}", path.display(), idx + 1, e);
                continue;
            }
        };
        match record.deserialize::<RawRecord>(Some(&headers)) {
            Ok(raw) => rows.extend(source.normalize(&raw, &columns)),
            Err(e) => warn!("{} record {} skipped: {}", path.display(), idx + 1, e),
        }
    }

    info!(
        "Loaded {} {} records with granularities: {:?}",
        rows.len(),
        source.describe(),
        distinct_granularities(&rows)
    );
    Some(rows)
}

/// Load the unified metrics table from `dir`.
///
/// Row order is all dictionary rows, then all brute-force rows.
pub fn load_metrics(dir: &Path) -> LoadedMetrics {
    match load_source(dir, MetricsSource::Granularity) {
        Some(rows) if !rows.is_empty() => {
            return LoadedMetrics {
                sources: vec![MetricsSource::Granularity],
                rows,
            };
        }
        Some(_) => warn!("granularity metrics file has no usable rows"),
        None => {}
    }
    info!("falling back to per-method metrics files");

    let attempts: [&[MetricsSource]; 2] = [
        &[MetricsSource::DictionaryChunks],
        &[MetricsSource::BruteForcePackages, MetricsSource::BruteForceSummary],
    ];

    let mut out = LoadedMetrics::default();
    for candidates in attempts {
        // First candidate yielding rows wins.
        let found = candidates.iter().find_map(|&source| {
            load_source(dir, source)
                .filter(|rows| !rows.is_empty())
                .map(|rows| (source, rows))
        });
        if let Some((source, rows)) = found {
            out.sources.push(source);
            out.rows.extend(rows);
        }
    }

    if out.is_empty() {
        warn!("no metrics data found in {}", dir.display());
    }
    out
}
