//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// eurofact: Eurostat extract normalization and reconciliation
#[derive(Parser)]
#[command(name = "eurofact")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline: load, harmonize, persist, check, extract
    Run {
        /// Directory holding the Eurostat extracts
        #[arg(long, value_name = "DIR", default_value = ".")]
        data_dir: PathBuf,

        /// SQLite database to (re)build
        #[arg(long, value_name = "FILE", default_value = "out_data.db")]
        db: PathBuf,

        /// Also export every relation as CSV into this directory
        #[arg(long, value_name = "DIR")]
        export_dir: Option<PathBuf>,

        /// JSON pipeline configuration (replaces the --data-dir registry)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Reference period for the analysis extract
        #[arg(long, value_name = "YEAR")]
        reference_period: Option<u16>,

        /// Reconciliation tolerance (flag below this ratio)
        #[arg(long, value_name = "RATIO")]
        tolerance: Option<f64>,

        /// Write the run report as JSON to this path
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },
}
