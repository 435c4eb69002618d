//! Property-based tests for the unifier and harmonizer.
//!
//! These tests use proptest to generate random inputs and verify that the
//! core transforms maintain their invariants under all conditions:
//!
//! 1. **No panics**: arbitrary codes and cell contents never crash
//! 2. **Idempotence**: harmonizing harmonized data is a no-op
//! 3. **Structure**: trade column reconstruction keeps the (year,
//!    partner) pairing aligned for any whole number of blocks

use proptest::prelude::*;

use eurofact::harmonize::{harmonize, unresolved_codes};
use eurofact::unify::{Unifier, UnifyConfig};
use eurofact::{FactRow, Indicator, RawTable, SourceLayout};

// =============================================================================
// Test Strategies
// =============================================================================

/// Strings shaped like classification codes, including the prefixed and
/// misspelled variants the harmonizer rewrites.
fn code_like() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Z][0-9]{2}",
        "[A-Z]",
        "C[0-9]{2}-[0-9]{2}",
        "CPA_[A-Z0-9_\\-]{1,8}",
        "[A-Z0-9_\\-]{0,10}",
        Just("TOTAL".to_string()),
        Just("D35".to_string()),
        Just("C10-12".to_string()),
    ]
}

/// Strings shaped like geography codes.
fn geo_like() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Z]{2}",
        Just("GR".to_string()),
        Just("GB".to_string()),
        Just("EU27_2020".to_string()),
    ]
}

/// Arbitrary label kinds, greenhouse-gas labels included.
fn label_kind_like() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("NACE_R2 (Labels)".to_string()),
        Just("CPA08 (Labels)".to_string()),
        Just("DOM".to_string()),
        Just("WORLD".to_string()),
        Just("CO2".to_string()),
        Just("GHG".to_string()),
        "[A-Z0-9_]{0,12}",
    ]
}

prop_compose! {
    fn fact_row()(
        geo in geo_like(),
        code in code_like(),
        label_kind in label_kind_like(),
        other in geo_like(),
        period in 2008u16..2023,
        value in proptest::option::of(-1e12f64..1e12),
    ) -> FactRow {
        FactRow {
            indicator: Indicator::Gva,
            geo_code: geo,
            geo_name: String::new(),
            category_code: code,
            category_name: String::new(),
            label_kind,
            category_other: other,
            period,
            value,
        }
    }
}

// =============================================================================
// Harmonizer Properties
// =============================================================================

proptest! {
    #[test]
    fn harmonize_never_panics(mut rows in proptest::collection::vec(fact_row(), 0..50)) {
        harmonize(&mut rows);
        let _ = unresolved_codes(&rows);
    }

    #[test]
    fn harmonize_is_idempotent(mut rows in proptest::collection::vec(fact_row(), 0..50)) {
        harmonize(&mut rows);
        let once = rows.clone();
        harmonize(&mut rows);
        prop_assert_eq!(once, rows);
    }

    #[test]
    fn harmonize_never_emits_aliased_geographies(
        mut rows in proptest::collection::vec(fact_row(), 0..50)
    ) {
        harmonize(&mut rows);
        for row in &rows {
            prop_assert_ne!(row.geo_code.as_str(), "GR");
            prop_assert_ne!(row.geo_code.as_str(), "GB");
            prop_assert_ne!(row.category_other.as_str(), "GR");
            prop_assert_ne!(row.category_other.as_str(), "GB");
            prop_assert!(!row.category_code.starts_with("CPA_"));
        }
    }

    #[test]
    fn harmonize_drops_every_gas_labeled_row(
        mut rows in proptest::collection::vec(fact_row(), 0..50)
    ) {
        harmonize(&mut rows);
        for row in &rows {
            prop_assert!(!matches!(
                row.label_kind.as_str(),
                "CO2" | "N2O_CO2E" | "CH4_CO2E" | "HFC_CO2E" | "PFC_CO2E"
                    | "NF3_SF6_CO2E" | "GHG"
            ));
        }
    }
}

// =============================================================================
// Unifier Properties
// =============================================================================

fn trade_table(blocks: usize, width: usize) -> RawTable {
    let mut headers: Vec<String> = vec![
        "GEO (Codes)".into(),
        "GEO (Labels)".into(),
        "CPA (Codes)".into(),
        "CPA08 (Labels)".into(),
        "Partner".into(),
    ];
    for block in 0..blocks {
        for partner in 0..width {
            if block == 0 {
                headers.push(format!("P{partner}"));
            } else {
                headers.push(format!("P{partner}.{block}"));
            }
        }
    }

    let mut row: Vec<String> = vec![
        "DE".into(),
        "Germany".into(),
        "01".into(),
        "Agriculture".into(),
        "".into(),
    ];
    for i in 0..blocks * width {
        row.push(i.to_string());
    }

    RawTable::new(headers, vec![row])
}

proptest! {
    #[test]
    fn trade_pairing_stays_aligned(blocks in 1usize..6, width in 1usize..20) {
        let unifier = Unifier::new(UnifyConfig {
            trade_block_width: width,
            trade_base_year: 2008,
        });
        let table = trade_table(blocks, width);

        let rows = unifier
            .unify(Indicator::TradeExport, SourceLayout::Trade, &table)
            .unwrap();

        prop_assert_eq!(rows.len(), blocks * width);
        for (i, row) in rows.iter().enumerate() {
            // Partners cycle within a block, the year steps per block.
            prop_assert_eq!(row.category_other.clone(), format!("P{}", i % width));
            prop_assert_eq!(row.period, 2008 + (i / width) as u16);
        }
    }

    #[test]
    fn trade_rejects_any_partial_block(
        blocks in 1usize..5,
        width in 2usize..20,
        cut in 1usize..10,
    ) {
        let cut = cut.min(width - 1).max(1);
        let unifier = Unifier::new(UnifyConfig {
            trade_block_width: width,
            trade_base_year: 2008,
        });

        let mut table = trade_table(blocks, width);
        for _ in 0..cut {
            table.headers.pop();
            if let Some(row) = table.rows.get_mut(0) {
                row.pop();
            }
        }

        let result = unifier.unify(Indicator::TradeExport, SourceLayout::Trade, &table);
        prop_assert!(result.is_err());
    }

    #[test]
    fn trade_values_always_scaled(value in -1e15f64..1e15) {
        let unifier = Unifier::new(UnifyConfig {
            trade_block_width: 1,
            trade_base_year: 2008,
        });

        let table = RawTable::new(
            vec![
                "GEO (Codes)".into(),
                "GEO (Labels)".into(),
                "CPA (Codes)".into(),
                "CPA08 (Labels)".into(),
                "Partner".into(),
                "WORLD".into(),
            ],
            vec![vec![
                "DE".into(),
                "Germany".into(),
                "01".into(),
                "Agriculture".into(),
                "".into(),
                format!("{value}"),
            ]],
        );

        let rows = unifier
            .unify(Indicator::TradeExport, SourceLayout::Trade, &table)
            .unwrap();

        prop_assert_eq!(rows.len(), 1);
        if let Some(parsed) = rows[0].value {
            let expected = format!("{value}").parse::<f64>().unwrap() / 1_000_000.0;
            prop_assert_eq!(parsed, expected);
        }
    }
}
