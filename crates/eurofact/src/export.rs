//! Flat-file export of persisted relations and reconciliation warnings.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::types::Value;

use crate::error::{EurofactError, Result};
use crate::recon::ReconWarning;
use crate::store::{self, FactStore};

/// Relations exported by default, one CSV file per relation.
const EXPORT_TABLES: &[&str] = &[
    store::FACT_TABLE,
    store::CATEGORY_MAPPING_TABLE,
    store::GEO_MAPPING_TABLE,
    store::CROSS_SCHEME_TABLE,
    store::ANALYSIS_TABLE,
];

/// Writes persisted relations as CSV files into one directory.
pub struct Exporter {
    dir: PathBuf,
}

impl Exporter {
    /// Create an exporter targeting `dir` (created on demand).
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Export every relation plus the reconciliation warnings; returns
    /// the written paths.
    pub fn export_all(
        &self,
        store: &FactStore,
        warnings: &[ReconWarning],
    ) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.dir).map_err(|e| EurofactError::Io {
            path: self.dir.clone(),
            source: e,
        })?;

        let mut paths = Vec::with_capacity(EXPORT_TABLES.len() + 1);
        for table in EXPORT_TABLES {
            paths.push(self.export_table(store, table)?);
        }
        paths.push(self.export_warnings(warnings)?);
        Ok(paths)
    }

    fn export_table(&self, store: &FactStore, table: &str) -> Result<PathBuf> {
        // Table names come from the fixed EXPORT_TABLES list, never from
        // input.
        let result = store.query(&format!("SELECT * FROM \"{table}\""), &[])?;

        let path = self.dir.join(format!("{table}.csv"));
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(&result.columns)?;
        for row in &result.rows {
            writer.write_record(row.iter().map(render_value))?;
        }
        writer.flush().map_err(|e| EurofactError::Io {
            path: path.clone(),
            source: e,
        })?;

        Ok(path)
    }

    fn export_warnings(&self, warnings: &[ReconWarning]) -> Result<PathBuf> {
        let path = self.dir.join("Checks.csv");
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record([
            "indicator",
            "geo_code",
            "period",
            "calculated_total",
            "published_total",
            "ratio",
        ])?;
        for warning in warnings {
            writer.write_record([
                warning.indicator.as_str().to_string(),
                warning.geo_code.clone(),
                warning.period.to_string(),
                warning.calculated_total.to_string(),
                warning.published_total.to_string(),
                warning.ratio.to_string(),
            ])?;
        }
        writer.flush().map_err(|e| EurofactError::Io {
            path: path.clone(),
            source: e,
        })?;

        Ok(path)
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Integer(i) => i.to_string(),
        Value::Real(r) => r.to_string(),
        Value::Text(t) => t.clone(),
        Value::Blob(_) => String::new(),
    }
}
