//! `run` command: execute the full pipeline and print a summary.

use std::path::PathBuf;

use colored::Colorize;
use eurofact::{EurofactError, Exporter, FactStore, Pipeline, PipelineConfig, Result};

#[allow(clippy::too_many_arguments)]
pub fn run(
    data_dir: PathBuf,
    db: PathBuf,
    export_dir: Option<PathBuf>,
    config_path: Option<PathBuf>,
    reference_period: Option<u16>,
    tolerance: Option<f64>,
    report_path: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::with_standard_sources(&data_dir),
    };
    if let Some(period) = reference_period {
        config.reference_period = period;
    }
    if let Some(ratio) = tolerance {
        config.tolerance = ratio;
    }

    let mut store = FactStore::open(&db)?;
    let pipeline = Pipeline::new(config);
    let report = pipeline.run(&mut store)?;

    if verbose {
        for source in &report.sources {
            println!(
                "{} {} ({} rows x {} columns, {})",
                "loaded".green(),
                source.file,
                source.row_count,
                source.column_count,
                source.hash
            );
        }
    }

    println!(
        "{} {} fact rows persisted to {}",
        "ok".green().bold(),
        report.persisted_rows,
        db.display()
    );
    println!(
        "   analysis extract: {} rows (period {})",
        report.analysis_rows,
        pipeline.config().reference_period
    );

    if report.warnings.is_empty() {
        println!(
            "   {}",
            "all reconciliation checks within tolerance".green()
        );
    } else {
        println!(
            "   {} reconciliation warnings (calculated vs published):",
            report.warnings.len().to_string().yellow().bold()
        );
        for warning in &report.warnings {
            println!(
                "   {} {} {} {}: ratio {:.3} ({:.1} vs {:.1})",
                "warn".yellow(),
                warning.indicator.as_str(),
                warning.geo_code,
                warning.period,
                warning.ratio,
                warning.calculated_total,
                warning.published_total
            );
        }
    }

    if !report.unresolved_codes.is_empty() {
        println!(
            "   {} unresolved category codes: {}",
            report.unresolved_codes.len().to_string().yellow(),
            report.unresolved_codes.join(", ")
        );
    }

    if let Some(dir) = export_dir {
        let paths = Exporter::new(&dir).export_all(&store, &report.warnings)?;
        println!("   exported {} files to {}", paths.len(), dir.display());
    }

    if let Some(path) = report_path {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(&path, json).map_err(|e| EurofactError::Io {
            path: path.clone(),
            source: e,
        })?;
        if verbose {
            println!("   run report written to {}", path.display());
        }
    }

    Ok(())
}
