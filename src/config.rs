//! Input and output locations. Every path defaults to its conventional
//! location relative to the working directory.

use clap::Args;
use std::path::PathBuf;

pub const DEFAULT_CALCULATING_LOG: &str = "backend - calculating/logs-backend-calculating.txt";
pub const DEFAULT_CENTRAL_LOG: &str = "backend - central/logs-backend-central.txt";

#[derive(Debug, Clone, Args)]
pub struct Paths {
    /// Calculating server log.
    #[arg(long, global = true, default_value = DEFAULT_CALCULATING_LOG)]
    pub calculating_log: PathBuf,

    /// Central server log.
    #[arg(long, global = true, default_value = DEFAULT_CENTRAL_LOG)]
    pub central_log: PathBuf,

    /// Directory holding the *_metrics.csv tables.
    #[arg(long, global = true, default_value = ".")]
    pub metrics_dir: PathBuf,

    /// Where chart pages are written.
    #[arg(short = 'o', long, global = true, default_value = ".")]
    pub out_dir: PathBuf,

    /// Also write each chart bundle as JSON.
    #[arg(long, global = true)]
    pub json: bool,
}
