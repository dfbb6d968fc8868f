use anyhow::Context;
use clap::{Parser, Subcommand};
use env_logger::Builder;
use log::{LevelFilter, error, info, warn};

mod chart;
mod config;
mod error;
mod logs;
mod metrics;
mod render;
mod series;

use chart::{ChartBundle, ChartKind};
use render::{HtmlSurface, JsonSurface, RenderingSurface};

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "crackviz")]
#[command(about = "Performance charts for distributed password cracking runs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Option<Commands>,

    #[command(flatten)]
    paths: config::Paths,
}

#[derive(Subcommand)]
enum Commands {
    /// Execution time per packet interval from the calculating log.
    Calculating,
    /// Per-worker calculating and communication time from the central log.
    Central,
    /// Efficiency against granularity from the metrics tables.
    Granularity,
    /// Every chart whose inputs are available (default).
    All,
}

impl Commands {
    fn charts(&self) -> Vec<ChartKind> {
        match self {
            Commands::Calculating => vec![ChartKind::Calculating],
            Commands::Central => vec![ChartKind::Central],
            Commands::Granularity => vec![ChartKind::Granularity],
            Commands::All => vec![ChartKind::Central, ChartKind::Calculating, ChartKind::Granularity],
        }
    }
}

/// Run one chart through its pipeline. `Ok(None)` means there was nothing to plot.
fn build_chart(kind: ChartKind, paths: &config::Paths) -> Result<Option<ChartBundle>> {
    let bundle = match kind {
        ChartKind::Calculating => {
            let parser = logs::CalculatingParser::new()?;
            let samples = logs::read_log_file(&paths.calculating_log, &parser)
                .with_context(|| format!("read calculating log {}", paths.calculating_log.display()))?;
            info!("{} calculating samples", samples.len());
            chart::compose_calculating(&series::difference_calculating(&samples))
        }
        ChartKind::Central => {
            let parser = logs::CentralParser::new()?;
            let samples = logs::read_log_file(&paths.central_log, &parser)
                .with_context(|| format!("read central log {}", paths.central_log.display()))?;
            info!("{} central samples", samples.len());
            chart::compose_central(&series::drop_average_rows(&samples))
        }
        ChartKind::Granularity => {
            let loaded = metrics::load_metrics(&paths.metrics_dir);
            if loaded.is_empty() {
                warn!("no metrics rows loaded, granularity chart skipped");
                return Ok(None);
            }
            info!("metrics loaded from {:?}", loaded.sources);
            let aggregates = metrics::aggregate(&loaded.rows);
            chart::compose_granularity(&aggregates)
        }
    };
    Ok(bundle)
}

fn main() -> Result<()> {
    Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter(Some("crackviz"), LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let charts = cli.cmd.unwrap_or(Commands::All).charts();

    let mut surfaces: Vec<Box<dyn RenderingSurface>> =
        vec![Box::new(HtmlSurface::new(&cli.paths.out_dir))];
    if cli.paths.json {
        surfaces.push(Box::new(JsonSurface::new(&cli.paths.out_dir)));
    }

    let mut failed = Vec::new();
    for kind in charts {
        let bundle = match build_chart(kind, &cli.paths) {
            Ok(Some(bundle)) => bundle,
            Ok(None) => continue,
            Err(e) => {
                error!("{:?} chart failed: {:#}", kind, e);
                failed.push(kind);
                continue;
            }
        };

        for surface in surfaces.iter_mut() {
            match surface.render(&bundle) {
                Ok(path) => println!("Wrote {}", path.display()),
                Err(e) => {
                    error!("{:?} chart not rendered: {:#}", kind, anyhow::Error::from(e));
                    failed.push(kind);
                }
            }
        }
    }

    if !failed.is_empty() {
        anyhow::bail!("{} chart(s) failed: {:?}", failed.len(), failed);
    }
    Ok(())
}
