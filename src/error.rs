//! Error taxonomy for the pipeline.
//!
//! Only conditions that halt a chart are errors. Missing optional metrics
//! tables, empty datasets and malformed cells are reported through `log`
//! and recovered where they occur.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required log file is missing or unreadable.
    #[error("cannot read {}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid line pattern")]
    Pattern(#[from] regex::Error),

    /// A rendering surface could not write its output.
    #[error("cannot write {}", path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot encode chart bundle")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
