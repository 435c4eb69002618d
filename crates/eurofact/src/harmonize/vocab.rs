//! Fixed classification vocabulary and harmonization tables.
//!
//! Everything in this module is data, not logic: country lists, code
//! aliases, spelling fixes and the hand-curated CPA08 -> NACE_R2
//! cross-scheme map, held as immutable statics so the harmonization rules
//! stay auditable and independently testable.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

/// EU27 member country codes (EU27_2020 composition), in the canonical
/// spelling facts carry after harmonization (Greece is `EL`).
pub static EU27: &[&str] = &[
    "AT", "BE", "BG", "CY", "CZ", "DE", "DK", "EE", "EL", "ES", "FI", "FR", "HR", "HU", "IE",
    "IT", "LT", "LU", "LV", "MT", "NL", "PL", "PT", "RO", "SE", "SI", "SK",
];

/// Pseudo-geography code for the EU27 aggregate.
pub const EU_AGGREGATE: &str = "EU27_2020";

/// Additive NACE detail categories: mutually exclusive and collectively
/// exhaustive with respect to the published totals.
pub static ADDITIVE_CATEGORIES: &[&str] = &[
    "A01", "A02", "A03", "B", "C10-C12", "C13-C15", "C16", "C17", "C18", "C19", "C20", "C21",
    "C22", "C23", "C24", "C25", "C26", "C27", "C28", "C29", "C30", "C31_C32", "C33", "D", "E36",
    "E37-E39", "F", "G45", "G46", "G47", "H49", "H50", "H51", "H52", "H53", "I", "J58",
    "J59_J60", "J61", "J62_J63", "K64", "K65", "K66", "L", "M69_M70", "M71", "M72", "M73",
    "M74_M75", "N77", "N78", "N79", "N80-N82", "O", "P", "Q86", "Q87_Q88", "R90-R92", "R93",
    "S94", "S95", "S96", "T", "HH_HEAT", "HH_OTH", "HH_TRA",
];

/// Country name overrides for codes whose published names differ between
/// extracts.
pub static GEO_NAME_OVERRIDES: &[(&str, &str)] = &[
    ("BE", "Belgium"),
    ("DE", "Germany"),
    ("ES", "Spain"),
    ("FR", "France"),
    ("GB", "United Kingdom"),
    ("GR", "Greece"),
    ("IE", "Ireland"),
    ("IT", "Italy"),
];

/// Non-standard geography codes and their canonical spellings. Applied to
/// the primary geography and to trading partners.
pub static GEO_CODE_ALIASES: &[(&str, &str)] = &[("GR", "EL"), ("GB", "UK")];

/// Classification-family prefix stripped from category codes; codes are
/// directly comparable across schemes afterwards.
pub const CATEGORY_PREFIX: &str = "CPA_";

/// Inconsistently hyphenated/underscored category spellings and their
/// canonical forms.
pub static CATEGORY_SPELLINGS: &[(&str, &str)] = &[
    ("C10-12", "C10-C12"),
    ("C13-15", "C13-C15"),
    ("C31_32", "C31_C32"),
    ("E37-39", "E37-E39"),
    ("J59_60", "J59_J60"),
    ("J62_63", "J62_J63"),
    ("M69_70", "M69_M70"),
    ("M74_75", "M74_M75"),
    ("N80-82", "N80-N82"),
    ("Q87_88", "Q87_Q88"),
    ("R90-92", "R90-R92"),
];

/// Single-letter-plus-digit aggregates collapsed to their letter-only
/// form.
pub static CATEGORY_AGGREGATES: &[(&str, &str)] = &[
    ("D35", "D"),
    ("L68", "L"),
    ("O84", "O"),
    ("P85", "P"),
];

/// Greenhouse-gas component labels stacked as rows in the footprint
/// extract. Source metadata, not classification categories; rows carrying
/// them are dropped during harmonization.
pub static GREENHOUSE_GAS_LABELS: &[&str] = &[
    "CO2", "N2O_CO2E", "CH4_CO2E", "HFC_CO2E", "PFC_CO2E", "NF3_SF6_CO2E", "GHG",
];

/// Overlapping aggregates excluded from sum-based reconciliation so that
/// the published TOTAL equals the sum of the detail categories.
pub static OVERLAP_CATEGORIES: &[&str] = &[
    "A", "B-E", "C", "C16-C18", "C22_C23", "C24_C25", "C29_C30", "C31-C33", "E", "G", "G-I",
    "H", "J", "J58-J60", "K", "L68A", "M", "M_N", "M69-M71", "M73-M75", "N", "O-Q", "Q", "R",
    "R-U", "S", "HH", "TOTAL_HH",
];

/// Published-total pseudo-codes, matched case-insensitively.
pub static TOTAL_CODES: &[&str] = &["TOTAL", "TOTAL_HH", "TOT_HH"];

/// `category_other` values that double-count detail rows: the world scope
/// and the intra-EU partner aggregate.
pub static DOUBLE_COUNT_SCOPES: &[&str] = &["WORLD", "EU27_2020_INTRA"];

/// World scope value in the footprint extract.
pub const WORLD_SCOPE: &str = "WORLD";

/// Placeholder category codes excluded from the trade analysis extract.
pub static PLACEHOLDER_CODES: &[&str] = &["TOTAL", "XX"];

/// Label kind carrying descriptive NACE labels.
pub const NACE_LABEL_KIND: &str = "NACE_R2 (Labels)";

/// Label kind carrying descriptive CPA labels.
pub const CPA_LABEL_KIND: &str = "CPA08 (Labels)";

/// Hand-curated CPA08 -> NACE_R2 cross-scheme map. Trade extracts are
/// CPA-coded while everything else is NACE-coded; this is the only bridge
/// between the two.
pub static CROSS_SCHEME_MAP: &[(&str, &str)] = &[
    ("01", "A01"),
    ("02", "A02"),
    ("03", "A03"),
    ("05", "B"),
    ("06", "B"),
    ("07", "B"),
    ("08", "B"),
    ("09", "B"),
    ("10", "C10-C12"),
    ("11", "C10-C12"),
    ("12", "C10-C12"),
    ("13", "C13-C15"),
    ("14", "C13-C15"),
    ("15", "C13-C15"),
    ("16", "C16"),
    ("17", "C17"),
    ("18", "C18"),
    ("19", "C19"),
    ("20", "C20"),
    ("21", "C21"),
    ("22", "C22"),
    ("23", "C23"),
    ("24", "C24"),
    ("25", "C25"),
    ("26", "C26"),
    ("27", "C27"),
    ("28", "C28"),
    ("29", "C29"),
    ("30", "C30"),
    ("31", "C31_C32"),
    ("32", "C31_C32"),
    ("33", "C33"),
    ("35", "D"),
    ("36", "E36"),
    ("37", "E37-E39"),
    ("38", "E37-E39"),
    ("39", "E37-E39"),
    ("41", "F"),
    ("42", "F"),
    ("43", "F"),
    ("45", "G45"),
    ("46", "G46"),
    ("47", "G47"),
    ("49", "H49"),
    ("50", "H50"),
    ("51", "H51"),
    ("52", "H52"),
    ("53", "H53"),
    ("55", "I"),
    ("56", "I"),
    ("58", "J58"),
    ("59", "J59_J60"),
    ("60", "J59_J60"),
    ("61", "J61"),
    ("62", "J62_J63"),
    ("63", "J62_J63"),
    ("64", "K64"),
    ("65", "K65"),
    ("66", "K66"),
    ("68", "L"),
    ("69", "M69_M70"),
    ("70", "M69_M70"),
    ("71", "M71"),
    ("72", "M72"),
    ("73", "M73"),
    ("74", "M74_M75"),
    ("75", "M74_M75"),
    ("77", "N77"),
    ("78", "N78"),
    ("79", "N79"),
    ("80", "N80-N82"),
    ("81", "N80-N82"),
    ("82", "N80-N82"),
    ("84", "O"),
    ("85", "P"),
    ("86", "Q86"),
    ("87", "Q87_Q88"),
    ("88", "Q87_Q88"),
    ("90", "R90-R92"),
    ("91", "R90-R92"),
    ("92", "R90-R92"),
    ("93", "R93"),
    ("94", "S94"),
    ("95", "S95"),
    ("96", "S96"),
    ("97", "T"),
    ("98", "T"),
    ("99", "T"),
];

/// NACE targets with no CPA counterpart. Part of the analysis target-code
/// universe even though no trade row can translate into them.
pub static NON_CPA_TARGETS: &[&str] = &["U", "HH_HEAT", "HH_OTH", "HH_TRA"];

static NAME_OVERRIDES: Lazy<HashMap<&str, &str>> =
    Lazy::new(|| GEO_NAME_OVERRIDES.iter().copied().collect());

static CODE_ALIASES: Lazy<HashMap<&str, &str>> =
    Lazy::new(|| GEO_CODE_ALIASES.iter().copied().collect());

static SPELLINGS: Lazy<HashMap<&str, &str>> =
    Lazy::new(|| CATEGORY_SPELLINGS.iter().copied().collect());

static AGGREGATES: Lazy<HashMap<&str, &str>> =
    Lazy::new(|| CATEGORY_AGGREGATES.iter().copied().collect());

static CROSS_SCHEME: Lazy<HashMap<&str, &str>> =
    Lazy::new(|| CROSS_SCHEME_MAP.iter().copied().collect());

/// Every code the harmonization tables can account for. Codes outside
/// this set pass through unchanged and are reported as unresolved.
static CANONICAL_CODES: Lazy<HashSet<&str>> = Lazy::new(|| {
    ADDITIVE_CATEGORIES
        .iter()
        .chain(OVERLAP_CATEGORIES)
        .chain(TOTAL_CODES)
        .chain(PLACEHOLDER_CODES)
        .chain(NON_CPA_TARGETS)
        .chain(CROSS_SCHEME_MAP.iter().map(|(cpa, _)| cpa))
        .chain(CROSS_SCHEME_MAP.iter().map(|(_, nace)| nace))
        .copied()
        .collect()
});

/// Canonical published name for a country code, if one is defined.
pub fn geo_name_override(code: &str) -> Option<&'static str> {
    NAME_OVERRIDES.get(code).copied()
}

/// Canonical spelling for a non-standard geography code, if one is
/// defined.
pub fn geo_code_alias(code: &str) -> Option<&'static str> {
    CODE_ALIASES.get(code).copied()
}

/// Canonical spelling for an inconsistently written category code, if one
/// is defined.
pub fn category_spelling(code: &str) -> Option<&'static str> {
    SPELLINGS.get(code).copied()
}

/// Letter-only form for a letter-plus-digit aggregate, if one is defined.
pub fn category_aggregate(code: &str) -> Option<&'static str> {
    AGGREGATES.get(code).copied()
}

/// NACE target for a CPA code, if the cross-scheme map covers it.
pub fn cross_scheme_target(cpa_code: &str) -> Option<&'static str> {
    CROSS_SCHEME.get(cpa_code).copied()
}

/// True if `label` is one of the greenhouse-gas component labels.
pub fn is_greenhouse_gas_label(label: &str) -> bool {
    GREENHOUSE_GAS_LABELS.contains(&label)
}

/// True if `code` is an overlapping aggregate excluded from
/// reconciliation sums.
pub fn is_overlap_category(code: &str) -> bool {
    OVERLAP_CATEGORIES.contains(&code)
}

/// True if `code` is a published-total pseudo-code (case-insensitive).
pub fn is_total_code(code: &str) -> bool {
    TOTAL_CODES
        .iter()
        .any(|total| total.eq_ignore_ascii_case(code))
}

/// True if `code` appears in any harmonization or vocabulary table.
pub fn is_canonical_code(code: &str) -> bool {
    CANONICAL_CODES.contains(code)
}

/// True if `code` is an EU27 member country code.
pub fn is_eu_member(code: &str) -> bool {
    EU27.contains(&code)
}
