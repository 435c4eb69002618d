//! Fact Store: the relational persistence boundary.
//!
//! Backed by embedded SQLite. Every relation is fully replaced per run
//! inside a single transaction, so a failed run never leaves a partially
//! written relation behind. Reads go through [`FactStore::query`], which
//! only ever binds parameters, never interpolates values.

use std::path::Path;

use rusqlite::types::Value;
use rusqlite::{Connection, ToSql, params};

use crate::error::Result;
use crate::fact::FactRow;
use crate::mapping::{CategoryMapping, CrossSchemeEntry, GeoMapping};

/// The harmonized fact relation.
pub const FACT_TABLE: &str = "Database";

/// Category code -> label mapping relation.
pub const CATEGORY_MAPPING_TABLE: &str = "Mapping_CAT";

/// Geography code -> name mapping relation.
pub const GEO_MAPPING_TABLE: &str = "Mapping_GEO";

/// Static CPA -> NACE cross-scheme relation.
pub const CROSS_SCHEME_TABLE: &str = "Mapping_CrossScheme";

/// Filtered analysis extract relation.
pub const ANALYSIS_TABLE: &str = "Analysis";

/// Generate a `?, ?, ...` list of `n` bound placeholders for
/// set-membership filters.
pub(crate) fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// A materialized query result: column names plus rows of SQL values.
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Relational store holding the harmonized facts and derived relations.
pub struct FactStore {
    conn: Connection,
}

impl FactStore {
    /// Open a file-backed store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            conn: Connection::open(path.as_ref())?,
        })
    }

    /// Open an in-memory store.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Atomically replace the fact relation. Rows carrying the missing
    /// sentinel are excluded here; returns the number of rows persisted.
    pub fn replace_facts(&mut self, rows: &[FactRow]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(
            "DROP TABLE IF EXISTS \"Database\";
             CREATE TABLE \"Database\" (
                 indicator      TEXT NOT NULL,
                 geo_code       TEXT NOT NULL,
                 category_code  TEXT NOT NULL,
                 label_kind     TEXT NOT NULL,
                 category_other TEXT NOT NULL,
                 period         INTEGER NOT NULL,
                 value          REAL NOT NULL
             );",
        )?;

        let mut count = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO \"Database\" VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for row in rows {
                let Some(value) = row.value else { continue };
                stmt.execute(params![
                    row.indicator.as_str(),
                    row.geo_code,
                    row.category_code,
                    row.label_kind,
                    row.category_other,
                    row.period as i64,
                    value,
                ])?;
                count += 1;
            }
        }

        tx.commit()?;
        Ok(count)
    }

    /// Atomically replace the category mapping relation.
    pub fn replace_category_mappings(&mut self, mappings: &[CategoryMapping]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(
            "DROP TABLE IF EXISTS \"Mapping_CAT\";
             CREATE TABLE \"Mapping_CAT\" (
                 category_code TEXT NOT NULL,
                 category_name TEXT NOT NULL,
                 label_kind    TEXT NOT NULL
             );",
        )?;
        {
            let mut stmt =
                tx.prepare("INSERT INTO \"Mapping_CAT\" VALUES (?1, ?2, ?3)")?;
            for mapping in mappings {
                stmt.execute(params![mapping.code, mapping.label, mapping.kind])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Atomically replace the geography mapping relation.
    pub fn replace_geo_mappings(&mut self, mappings: &[GeoMapping]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(
            "DROP TABLE IF EXISTS \"Mapping_GEO\";
             CREATE TABLE \"Mapping_GEO\" (
                 geo_code TEXT NOT NULL,
                 geo_name TEXT NOT NULL
             );",
        )?;
        {
            let mut stmt = tx.prepare("INSERT INTO \"Mapping_GEO\" VALUES (?1, ?2)")?;
            for mapping in mappings {
                stmt.execute(params![mapping.code, mapping.name])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Atomically replace the cross-scheme mapping relation.
    pub fn replace_cross_scheme(&mut self, entries: &[CrossSchemeEntry]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(
            "DROP TABLE IF EXISTS \"Mapping_CrossScheme\";
             CREATE TABLE \"Mapping_CrossScheme\" (
                 cpa_code  TEXT NOT NULL,
                 nace_code TEXT NOT NULL
             );",
        )?;
        {
            let mut stmt =
                tx.prepare("INSERT INTO \"Mapping_CrossScheme\" VALUES (?1, ?2)")?;
            for entry in entries {
                stmt.execute(params![entry.cpa_code, entry.nace_code])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Run a read-only query against the persisted relations.
    pub fn query(&self, sql: &str, params: &[&dyn ToSql]) -> Result<QueryResult> {
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();
        let column_count = columns.len();

        let mut rows = stmt.query(params)?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Vec::with_capacity(column_count);
            for i in 0..column_count {
                record.push(row.get::<_, Value>(i)?);
            }
            out.push(record);
        }

        Ok(QueryResult { columns, rows: out })
    }

    /// Read-only access for the in-crate checker and extractor.
    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Write access for the in-crate extractor's replace transaction.
    pub(crate) fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fact::Indicator;

    fn fact(geo: &str, code: &str, value: Option<f64>) -> FactRow {
        FactRow {
            indicator: Indicator::Gva,
            geo_code: geo.to_string(),
            geo_name: String::new(),
            category_code: code.to_string(),
            category_name: String::new(),
            label_kind: "NACE_R2 (Labels)".to_string(),
            category_other: String::new(),
            period: 2019,
            value,
        }
    }

    #[test]
    fn test_replace_facts_excludes_missing_sentinel() {
        let mut store = FactStore::open_in_memory().unwrap();
        let rows = vec![
            fact("DE", "A01", Some(10.0)),
            fact("DE", "B", None),
            fact("FR", "A01", Some(5.0)),
        ];

        let persisted = store.replace_facts(&rows).unwrap();
        assert_eq!(persisted, 2);

        let result = store
            .query("SELECT COUNT(*) FROM \"Database\"", &[])
            .unwrap();
        assert_eq!(result.rows[0][0], Value::Integer(2));
    }

    #[test]
    fn test_replace_is_full_replacement() {
        let mut store = FactStore::open_in_memory().unwrap();
        store
            .replace_facts(&[fact("DE", "A01", Some(1.0)), fact("FR", "B", Some(2.0))])
            .unwrap();
        store.replace_facts(&[fact("IT", "C16", Some(3.0))]).unwrap();

        let result = store
            .query("SELECT geo_code FROM \"Database\"", &[])
            .unwrap();
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0][0], Value::Text("IT".to_string()));
    }

    #[test]
    fn test_query_binds_parameters() {
        let mut store = FactStore::open_in_memory().unwrap();
        store
            .replace_facts(&[fact("DE", "A01", Some(1.0)), fact("FR", "B", Some(2.0))])
            .unwrap();

        let result = store
            .query(
                "SELECT value FROM \"Database\" WHERE geo_code = ?1",
                &[&"FR"],
            )
            .unwrap();
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0][0], Value::Real(2.0));
    }

    #[test]
    fn test_mapping_relations() {
        use crate::mapping;

        let mut store = FactStore::open_in_memory().unwrap();
        store
            .replace_cross_scheme(&mapping::cross_scheme_entries())
            .unwrap();

        let result = store
            .query(
                "SELECT nace_code FROM \"Mapping_CrossScheme\" WHERE cpa_code = ?1",
                &[&"35"],
            )
            .unwrap();
        assert_eq!(result.rows[0][0], Value::Text("D".to_string()));
    }
}
