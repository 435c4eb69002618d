//! Schema Unifier: one source's wide table into long-format fact
//! candidates.
//!
//! Sources disagree on column conventions. Standard extracts carry one
//! column per year after the metadata block; trade extracts subdivide each
//! nominal year into up to 15 trading-partner columns, so the true
//! (year, partner) pairing has to be reconstructed from column position.

use regex::Regex;

use crate::config::SourceLayout;
use crate::error::{EurofactError, Result};
use crate::fact::{FactRow, Indicator};
use crate::input::RawTable;

/// Metadata columns shared by every layout, in order:
/// geo code, geo name, category code, category name, extra.
const META_COLUMNS: usize = 5;

/// Constants for trade column reconstruction, lifted from the pipeline
/// configuration.
#[derive(Debug, Clone, Copy)]
pub struct UnifyConfig {
    /// Trading partners per nominal year.
    pub trade_block_width: usize,
    /// Year carried by the first block of partner columns.
    pub trade_base_year: u16,
}

/// Turns raw wide tables into long-format fact candidates.
pub struct Unifier {
    config: UnifyConfig,
    year_pattern: Regex,
}

impl Unifier {
    /// Create a unifier for the given trade-layout constants.
    pub fn new(config: UnifyConfig) -> Self {
        Self {
            config,
            year_pattern: Regex::new(r"^\d{4}$").unwrap(),
        }
    }

    /// Produce one fact candidate per (data row, year column).
    pub fn unify(
        &self,
        indicator: Indicator,
        layout: SourceLayout,
        table: &RawTable,
    ) -> Result<Vec<FactRow>> {
        self.check_meta_columns(indicator, table)?;
        match layout {
            SourceLayout::Standard => self.unify_standard(indicator, table),
            SourceLayout::Trade => self.unify_trade(indicator, table),
        }
    }

    fn check_meta_columns(&self, indicator: Indicator, table: &RawTable) -> Result<()> {
        if table.column_count() <= META_COLUMNS {
            return Err(EurofactError::SchemaMismatch {
                source_name: indicator.as_str().to_string(),
                message: format!(
                    "expected {} metadata columns plus at least one year column, found {} columns",
                    META_COLUMNS,
                    table.column_count()
                ),
            });
        }
        Ok(())
    }

    fn unify_standard(&self, indicator: Indicator, table: &RawTable) -> Result<Vec<FactRow>> {
        let scheme_header = table.headers[3].trim().to_string();

        let mut years = Vec::with_capacity(table.column_count() - META_COLUMNS);
        for header in &table.headers[META_COLUMNS..] {
            let header = header.trim();
            if !self.year_pattern.is_match(header) {
                return Err(EurofactError::SchemaMismatch {
                    source_name: indicator.as_str().to_string(),
                    message: format!("year column header '{header}' is not a 4-digit year"),
                });
            }
            // The pattern guarantees four digits, so this cannot fail.
            years.push(header.parse::<u16>().unwrap_or_default());
        }

        let mut out = Vec::with_capacity(table.row_count() * years.len());
        for row in &table.rows {
            let extra = row[4].trim();
            // The footprint extract stacks three geographic scopes under
            // one classification; the per-row scope replaces the fixed
            // scheme header as the row's label context.
            let (label_kind, category_other) = if indicator == Indicator::EnvFootprint {
                (extra.to_string(), extra.to_string())
            } else {
                (scheme_header.clone(), String::new())
            };

            for (offset, &year) in years.iter().enumerate() {
                out.push(FactRow {
                    indicator,
                    geo_code: row[0].trim().to_string(),
                    geo_name: row[1].trim().to_string(),
                    category_code: row[2].trim().to_string(),
                    category_name: row[3].trim().to_string(),
                    label_kind: label_kind.clone(),
                    category_other: category_other.clone(),
                    period: year,
                    value: parse_value(&row[META_COLUMNS + offset], indicator),
                });
            }
        }

        Ok(out)
    }

    fn unify_trade(&self, indicator: Indicator, table: &RawTable) -> Result<Vec<FactRow>> {
        let scheme_header = table.headers[3].trim().to_string();
        let partner_headers = &table.headers[META_COLUMNS..];
        let width = self.config.trade_block_width;

        // A partial final block cannot be distinguished from a shifted
        // one, so anything but whole blocks is rejected outright.
        if partner_headers.len() % width != 0 {
            return Err(EurofactError::SchemaMismatch {
                source_name: indicator.as_str().to_string(),
                message: format!(
                    "{} year columns do not form whole blocks of {} trading partners",
                    partner_headers.len(),
                    width
                ),
            });
        }

        let mut out = Vec::with_capacity(table.row_count() * partner_headers.len());
        for row in &table.rows {
            for (offset, header) in partner_headers.iter().enumerate() {
                let year = self.config.trade_base_year + (offset / width) as u16;
                let partner = partner_base_name(header.trim());

                out.push(FactRow {
                    indicator,
                    geo_code: row[0].trim().to_string(),
                    geo_name: row[1].trim().to_string(),
                    category_code: row[2].trim().to_string(),
                    category_name: row[3].trim().to_string(),
                    label_kind: scheme_header.clone(),
                    category_other: partner.to_string(),
                    period: year,
                    value: parse_value(&row[META_COLUMNS + offset], indicator),
                });
            }
        }

        Ok(out)
    }
}

/// Strip the `.N` suffix appended to repeated column names, leaving the
/// partner code itself.
fn partner_base_name(header: &str) -> &str {
    match header.find('.') {
        Some(idx) => &header[..idx],
        None => header,
    }
}

/// Parse one value cell. Missing markers and non-numeric text become the
/// missing sentinel; trade values arrive in units and are carried in
/// millions.
fn parse_value(cell: &str, indicator: Indicator) -> Option<f64> {
    if RawTable::is_missing_value(cell) {
        return None;
    }
    let parsed = cell.trim().parse::<f64>().ok()?;
    Some(if indicator.is_trade() {
        parsed / 1_000_000.0
    } else {
        parsed
    })
}
