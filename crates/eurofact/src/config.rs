//! Pipeline configuration: source registry and tunable constants.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{EurofactError, Result};
use crate::fact::Indicator;

/// Column layout variant of a source, selected by configuration.
///
/// Deliberately explicit: layout is never inferred from header text, so
/// header drift in a future data vintage cannot silently misclassify a
/// source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceLayout {
    /// Five metadata columns followed by one column per year.
    Standard,
    /// Five metadata columns followed by partner-subdivided year columns.
    Trade,
}

/// One registered input source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSpec {
    pub indicator: Indicator,
    pub file: PathBuf,
    pub layout: SourceLayout,
}

/// Configuration for a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Registered sources, processed in order.
    pub sources: Vec<SourceSpec>,
    /// Metadata rows preceding the header row in every extract.
    pub skip_rows: usize,
    /// Trading partners per nominal year in trade extracts.
    pub trade_block_width: usize,
    /// First year covered by trade extracts.
    pub trade_base_year: u16,
    /// Reference period for the analysis extract.
    pub reference_period: u16,
    /// Reconciliation flags below this calculated/published ratio.
    pub tolerance: f64,
    /// Geographies dropped before persistence. Incomplete in the current
    /// data vintage; revisit when the extracts are refreshed.
    pub excluded_geos: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            skip_rows: 8,
            trade_block_width: 15,
            trade_base_year: 2008,
            reference_period: 2019,
            tolerance: 0.95,
            excluded_geos: vec!["IE".into(), "LU".into(), "MT".into()],
        }
    }
}

impl PipelineConfig {
    /// Configuration covering the five Eurostat extracts under `data_dir`,
    /// using their download naming conventions.
    pub fn with_standard_sources(data_dir: impl AsRef<Path>) -> Self {
        let dir = data_dir.as_ref();
        let source = |indicator, file: &str, layout| SourceSpec {
            indicator,
            file: dir.join(file),
            layout,
        };

        Self {
            sources: vec![
                source(Indicator::Gva, "nama_10_a64.csv", SourceLayout::Standard),
                source(
                    Indicator::TradeExport,
                    "ds-059268_export.csv",
                    SourceLayout::Trade,
                ),
                source(
                    Indicator::TradeImport,
                    "ds-059268_import.csv",
                    SourceLayout::Trade,
                ),
                source(
                    Indicator::EnvEmissions,
                    "env_ac_ainah_r2.csv",
                    SourceLayout::Standard,
                ),
                source(
                    Indicator::EnvFootprint,
                    "env_ac_io10.csv",
                    SourceLayout::Standard,
                ),
            ],
            ..Self::default()
        }
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| EurofactError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the invariants the rest of the pipeline assumes.
    pub fn validate(&self) -> Result<()> {
        if self.trade_block_width == 0 {
            return Err(EurofactError::Config(
                "trade_block_width must be at least 1".to_string(),
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(EurofactError::Config(format!(
                "tolerance must be a positive ratio, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}
