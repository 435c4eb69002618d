//! Analysis Extractor: the filtered, classification-joined extract for
//! downstream analytical consumption.
//!
//! Restricted to one reference period. Three sub-extracts are unioned so
//! that every row carries a NACE code regardless of the scheme its source
//! was published in: economic and emissions rows are NACE-coded already,
//! footprint rows are taken at the EU aggregate, and trade rows are
//! translated through the cross-scheme map.

use rusqlite::ToSql;

use crate::error::Result;
use crate::harmonize::vocab;
use crate::store::{FactStore, placeholders};

/// Builds the analysis relation from the persisted facts.
pub struct AnalysisExtractor {
    reference_period: u16,
}

impl AnalysisExtractor {
    /// Create an extractor for the given reference period.
    pub fn new(reference_period: u16) -> Self {
        Self { reference_period }
    }

    /// Build and atomically replace the analysis relation; returns its
    /// row count.
    pub fn run(&self, store: &mut FactStore) -> Result<usize> {
        let sql = build_extract_sql();
        let period = self.reference_period as i64;

        // Bind order follows the placeholder order in
        // `build_extract_sql`: one period + indicator pair/code + member
        // and scope lists per sub-extract.
        let mut params: Vec<&dyn ToSql> = Vec::new();

        // Economic output and emissions, already NACE-coded.
        params.push(&period);
        params.push(&"GVA");
        params.push(&"ENV_EMISSIONS");
        for geo in vocab::EU27 {
            params.push(geo);
        }
        for code in vocab::NON_CPA_TARGETS {
            params.push(code);
        }

        // Footprint at the EU aggregate, non-world scopes only.
        params.push(&period);
        params.push(&"ENV_FOOTPRINT");
        params.push(&vocab::EU_AGGREGATE);
        params.push(&vocab::WORLD_SCOPE);
        for code in vocab::NON_CPA_TARGETS {
            params.push(code);
        }

        // Trade, translated through the cross-scheme map.
        params.push(&period);
        params.push(&"TRADE_EXPORT");
        params.push(&"TRADE_IMPORT");
        for geo in vocab::EU27 {
            params.push(geo);
        }
        for code in vocab::PLACEHOLDER_CODES {
            params.push(code);
        }
        for scope in vocab::DOUBLE_COUNT_SCOPES {
            params.push(scope);
        }

        let tx = store.conn_mut().transaction()?;
        tx.execute_batch(
            "DROP TABLE IF EXISTS \"Analysis\";
             CREATE TABLE \"Analysis\" (
                 indicator      TEXT NOT NULL,
                 geo_code       TEXT NOT NULL,
                 category_code  TEXT NOT NULL,
                 label_kind     TEXT NOT NULL,
                 category_other TEXT NOT NULL,
                 period         INTEGER NOT NULL,
                 value          REAL NOT NULL
             );",
        )?;
        let count = tx.execute(&sql, params.as_slice())?;
        tx.commit()?;

        Ok(count)
    }
}

/// The analysis category universe: every distinct cross-scheme target
/// plus the NACE codes with no CPA counterpart.
fn universe_clause(column: &str) -> String {
    format!(
        "({column} IN (SELECT nace_code FROM \"Mapping_CrossScheme\")
          OR {column} IN ({}))",
        placeholders(vocab::NON_CPA_TARGETS.len())
    )
}

fn build_extract_sql() -> String {
    let eu = placeholders(vocab::EU27.len());

    format!(
        "INSERT INTO \"Analysis\"
         SELECT indicator, geo_code, category_code, label_kind,
                category_other, period, value
         FROM \"Database\"
         WHERE period = ?
           AND indicator IN (?, ?)
           AND geo_code IN ({eu})
           AND {universe_a}

         UNION

         SELECT indicator, geo_code, category_code, label_kind,
                category_other, period, value
         FROM \"Database\"
         WHERE period = ?
           AND indicator = ?
           AND geo_code = ?
           AND category_other <> ?
           AND {universe_b}

         UNION

         SELECT d.indicator, d.geo_code, m.nace_code AS category_code,
                d.label_kind, d.category_other, d.period, d.value
         FROM \"Database\" AS d
         JOIN \"Mapping_CrossScheme\" AS m ON d.category_code = m.cpa_code
         WHERE d.period = ?
           AND d.indicator IN (?, ?)
           AND d.geo_code IN ({eu})
           AND d.category_code NOT IN (?, ?)
           AND d.category_other NOT IN (?, ?)",
        universe_a = universe_clause("category_code"),
        universe_b = universe_clause("category_code"),
    )
}
