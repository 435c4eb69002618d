//! Code Harmonizer: rewrites geographic and category codes to one
//! consistent vocabulary.

pub mod vocab;

use std::collections::BTreeSet;

use crate::fact::FactRow;

/// Apply the fixed harmonization rules, in place and in order:
///
/// 1. geography name overrides keyed by published code
/// 2. geography code aliases, on the primary code and the trading partner
/// 3. classification-family prefix strip (`CPA_`)
/// 4. category spelling remap
/// 5. letter-plus-digit aggregate remap
/// 6. drop rows labeled with greenhouse-gas components
///
/// Later steps assume earlier normalization, so the order is part of the
/// contract. A code matching no rule passes through unchanged; systematic
/// residue shows up as depressed reconciliation ratios and in
/// [`unresolved_codes`].
pub fn harmonize(rows: &mut Vec<FactRow>) {
    for row in rows.iter_mut() {
        if let Some(name) = vocab::geo_name_override(&row.geo_code) {
            row.geo_name = name.to_string();
        }
        if let Some(alias) = vocab::geo_code_alias(&row.geo_code) {
            row.geo_code = alias.to_string();
        }
        if let Some(alias) = vocab::geo_code_alias(&row.category_other) {
            row.category_other = alias.to_string();
        }
        while let Some(stripped) = row.category_code.strip_prefix(vocab::CATEGORY_PREFIX) {
            row.category_code = stripped.to_string();
        }
        if let Some(canonical) = vocab::category_spelling(&row.category_code) {
            row.category_code = canonical.to_string();
        }
        if let Some(aggregate) = vocab::category_aggregate(&row.category_code) {
            row.category_code = aggregate.to_string();
        }
    }

    rows.retain(|row| !vocab::is_greenhouse_gas_label(&row.label_kind));
}

/// Distinct category codes never matched by any harmonization or
/// vocabulary table, sorted for stable reporting.
pub fn unresolved_codes(rows: &[FactRow]) -> Vec<String> {
    let unresolved: BTreeSet<&str> = rows
        .iter()
        .filter(|row| !vocab::is_canonical_code(&row.category_code))
        .map(|row| row.category_code.as_str())
        .collect();

    unresolved.into_iter().map(String::from).collect()
}
