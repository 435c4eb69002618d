//! Mapping Builder: lookup tables derived from the harmonized facts.
//!
//! Category and geography mappings are projections of the fact sequence,
//! de-duplicated in first-seen order. The cross-scheme map is static
//! vocabulary and is only materialized here for persistence, never
//! derived.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::fact::FactRow;
use crate::harmonize::vocab;

/// Category code and its descriptive label, per labeling scheme.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryMapping {
    pub code: String,
    pub label: String,
    pub kind: String,
}

/// Geography code and its published name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeoMapping {
    pub code: String,
    pub name: String,
}

/// One entry of the static CPA08 -> NACE_R2 cross-scheme map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CrossSchemeEntry {
    pub cpa_code: String,
    pub nace_code: String,
}

/// Project and de-duplicate `(code, label, kind)`, keeping only rows whose
/// label kind is one of the two descriptive schemes. Footprint rows carry
/// a scope instead of a scheme and drop out here.
pub fn category_mappings(rows: &[FactRow]) -> Vec<CategoryMapping> {
    let mut seen: IndexSet<CategoryMapping> = IndexSet::new();
    for row in rows {
        if row.label_kind == vocab::NACE_LABEL_KIND || row.label_kind == vocab::CPA_LABEL_KIND {
            seen.insert(CategoryMapping {
                code: row.category_code.clone(),
                label: row.category_name.clone(),
                kind: row.label_kind.clone(),
            });
        }
    }
    seen.into_iter().collect()
}

/// Project and de-duplicate `(geo_code, geo_name)`.
pub fn geo_mappings(rows: &[FactRow]) -> Vec<GeoMapping> {
    let mut seen: IndexSet<GeoMapping> = IndexSet::new();
    for row in rows {
        seen.insert(GeoMapping {
            code: row.geo_code.clone(),
            name: row.geo_name.clone(),
        });
    }
    seen.into_iter().collect()
}

/// The fixed cross-scheme table, materialized for persistence.
pub fn cross_scheme_entries() -> Vec<CrossSchemeEntry> {
    vocab::CROSS_SCHEME_MAP
        .iter()
        .map(|(cpa, nace)| CrossSchemeEntry {
            cpa_code: cpa.to_string(),
            nace_code: nace.to_string(),
        })
        .collect()
}
