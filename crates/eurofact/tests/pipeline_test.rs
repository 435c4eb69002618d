//! End-to-end pipeline tests over synthetic Eurostat-shaped extracts.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use eurofact::{
    EurofactError, FactStore, Indicator, Pipeline, PipelineConfig, SourceLayout, SourceSpec,
};

/// Write a source file with the standard 8-row metadata block before the
/// body.
fn write_source(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let mut content = String::new();
    for i in 0..8 {
        content.push_str(&format!("\"extract metadata line {i}\"\n"));
    }
    content.push_str(body);

    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write source file");
    path
}

/// A three-source configuration: GVA (standard), trade export (trade
/// layout, 3 partners per year block), footprint (standard, stacked
/// scopes).
fn synthetic_config(dir: &TempDir) -> PipelineConfig {
    let gva = write_source(
        dir,
        "gva.csv",
        "GEO (Codes),GEO (Labels),NACE_R2 (Codes),NACE_R2 (Labels),Extra,2018,2019\n\
         DE,Germany,A01,Crop production,,10,10\n\
         DE,Germany,B,Mining,,20,20\n\
         DE,Germany,TOTAL,Total,,30,33\n\
         GR,Hellas,A01,Crop production,,5,5\n\
         GR,Hellas,TOTAL,Total,,5,5\n\
         IE,Ireland,A01,Crop production,,7,7\n\
         DE,Germany,ZZ9,Mystery,,1,:\n",
    );

    let trade = write_source(
        dir,
        "trade_export.csv",
        "GEO (Codes),GEO (Labels),CPA (Codes),CPA08 (Labels),Partner,\
         AT,WORLD,EU27_2020_INTRA,AT.1,WORLD.1,EU27_2020_INTRA.1\n\
         DE,Germany,CPA_01,Agriculture,,1000000,1000000,500000,2000000,3000000,1000000\n\
         DE,Germany,TOTAL,Total,,1000000,1000000,500000,2000000,3000000,1000000\n",
    );

    let footprint = write_source(
        dir,
        "footprint.csv",
        "GEO (Codes),GEO (Labels),NACE_R2 (Codes),NACE_R2 (Labels),Scope,2019\n\
         EU27_2020,European Union,A01,Crop production,DOM,3\n\
         EU27_2020,European Union,A01,Crop production,ROW,2\n\
         EU27_2020,European Union,A01,Crop production,WORLD,5\n\
         EU27_2020,European Union,TOTAL,Total,WORLD,5\n\
         EU27_2020,European Union,A01,Crop production,CO2,99\n\
         DE,Germany,A01,Crop production,DOM,1\n",
    );

    PipelineConfig {
        sources: vec![
            SourceSpec {
                indicator: Indicator::Gva,
                file: gva,
                layout: SourceLayout::Standard,
            },
            SourceSpec {
                indicator: Indicator::TradeExport,
                file: trade,
                layout: SourceLayout::Trade,
            },
            SourceSpec {
                indicator: Indicator::EnvFootprint,
                file: footprint,
                layout: SourceLayout::Standard,
            },
        ],
        trade_block_width: 3,
        trade_base_year: 2018,
        ..PipelineConfig::default()
    }
}

fn run_synthetic() -> (FactStore, eurofact::RunReport) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = synthetic_config(&dir);
    let mut store = FactStore::open_in_memory().expect("Failed to open store");
    let report = Pipeline::new(config)
        .run(&mut store)
        .expect("Pipeline run failed");
    (store, report)
}

fn count(store: &FactStore, sql: &str) -> i64 {
    let result = store.query(sql, &[]).expect("Query failed");
    match &result.rows[0][0] {
        rusqlite::types::Value::Integer(n) => *n,
        other => panic!("expected integer, got {other:?}"),
    }
}

// =============================================================================
// Fact Table Invariants
// =============================================================================

#[test]
fn test_natural_key_is_unique() {
    let (store, _) = run_synthetic();

    let duplicates = count(
        &store,
        "SELECT COUNT(*) FROM (
             SELECT indicator, geo_code, category_code, category_other, period,
                    COUNT(*) AS n
             FROM \"Database\"
             GROUP BY indicator, geo_code, category_code, category_other, period
             HAVING n > 1
         )",
    );
    assert_eq!(duplicates, 0);
}

#[test]
fn test_per_source_row_counts() {
    let (store, report) = run_synthetic();

    // GVA: 7 rows x 2 years, minus one missing value, minus IE (2 rows).
    assert_eq!(
        count(&store, "SELECT COUNT(*) FROM \"Database\" WHERE indicator = 'GVA'"),
        11
    );
    // Trade: 2 rows x 6 partner-year columns, all numeric.
    assert_eq!(
        count(
            &store,
            "SELECT COUNT(*) FROM \"Database\" WHERE indicator = 'TRADE_EXPORT'"
        ),
        12
    );
    // Footprint: 6 rows minus the CO2-labeled one.
    assert_eq!(
        count(
            &store,
            "SELECT COUNT(*) FROM \"Database\" WHERE indicator = 'ENV_FOOTPRINT'"
        ),
        5
    );
    assert_eq!(report.persisted_rows, 28);
}

#[test]
fn test_geography_codes_are_harmonized() {
    let (store, _) = run_synthetic();

    assert_eq!(
        count(&store, "SELECT COUNT(*) FROM \"Database\" WHERE geo_code = 'GR'"),
        0
    );
    assert_eq!(
        count(&store, "SELECT COUNT(*) FROM \"Database\" WHERE geo_code = 'EL'"),
        4
    );
}

#[test]
fn test_excluded_geographies_never_persisted() {
    let (store, _) = run_synthetic();

    for geo in ["IE", "LU", "MT"] {
        let sql = format!("SELECT COUNT(*) FROM \"Database\" WHERE geo_code = '{geo}'");
        assert_eq!(count(&store, &sql), 0);
    }
}

#[test]
fn test_greenhouse_gas_labels_never_persisted() {
    let (store, _) = run_synthetic();

    let gas_rows = count(
        &store,
        "SELECT COUNT(*) FROM \"Database\" WHERE label_kind IN
         ('CO2', 'N2O_CO2E', 'CH4_CO2E', 'HFC_CO2E', 'PFC_CO2E', 'NF3_SF6_CO2E', 'GHG')",
    );
    assert_eq!(gas_rows, 0);
}

#[test]
fn test_trade_values_are_in_millions() {
    let (store, _) = run_synthetic();

    let result = store
        .query(
            "SELECT value FROM \"Database\"
             WHERE indicator = 'TRADE_EXPORT' AND category_code = '01'
               AND category_other = 'AT' AND period = 2018",
            &[],
        )
        .expect("Query failed");
    assert_eq!(result.rows[0][0], rusqlite::types::Value::Real(1.0));
}

#[test]
fn test_category_prefix_stripped_before_persistence() {
    let (store, _) = run_synthetic();

    assert_eq!(
        count(
            &store,
            "SELECT COUNT(*) FROM \"Database\" WHERE category_code LIKE 'CPA_%'"
        ),
        0
    );
}

// =============================================================================
// Mappings
// =============================================================================

#[test]
fn test_geo_mapping_keeps_overrides_and_excluded_members() {
    let (store, _) = run_synthetic();

    // The name override replaces the inconsistent published name.
    let result = store
        .query(
            "SELECT geo_name FROM \"Mapping_GEO\" WHERE geo_code = 'EL'",
            &[],
        )
        .expect("Query failed");
    assert_eq!(
        result.rows[0][0],
        rusqlite::types::Value::Text("Greece".to_string())
    );

    // Excluded geographies still resolve in lookups.
    assert_eq!(
        count(
            &store,
            "SELECT COUNT(*) FROM \"Mapping_GEO\" WHERE geo_code = 'IE'"
        ),
        1
    );
}

#[test]
fn test_category_mapping_covers_both_schemes_only() {
    let (store, _) = run_synthetic();

    assert_eq!(
        count(
            &store,
            "SELECT COUNT(*) FROM \"Mapping_CAT\"
             WHERE label_kind NOT IN ('NACE_R2 (Labels)', 'CPA08 (Labels)')"
        ),
        0
    );
    // Footprint scopes never produce category mappings.
    assert!(
        count(
            &store,
            "SELECT COUNT(*) FROM \"Mapping_CAT\" WHERE label_kind = 'DOM'"
        ) == 0
    );
}

// =============================================================================
// Reconciliation
// =============================================================================

#[test]
fn test_shortfalls_are_flagged() {
    let (_, report) = run_synthetic();

    assert_eq!(report.warnings.len(), 2);

    // GVA DE/2019: (10 + 20) / 33.
    let gva = &report.warnings[0];
    assert_eq!(gva.indicator, Indicator::Gva);
    assert_eq!(gva.geo_code, "DE");
    assert_eq!(gva.period, 2019);
    assert!((gva.ratio - 30.0 / 33.0).abs() < 1e-9);

    // Trade DE/2019: detail 2.0 at partner AT vs published 3.0 at WORLD.
    let trade = &report.warnings[1];
    assert_eq!(trade.indicator, Indicator::TradeExport);
    assert_eq!(trade.period, 2019);
    assert!((trade.ratio - 2.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_unresolved_codes_reported() {
    let (_, report) = run_synthetic();
    assert_eq!(report.unresolved_codes, vec!["ZZ9".to_string()]);
}

// =============================================================================
// Analysis Extract
// =============================================================================

#[test]
fn test_analysis_extract_scope() {
    let (store, report) = run_synthetic();

    // 3 GVA rows (DE A01, DE B, EL A01), 1 translated trade row,
    // 2 footprint rows at the EU aggregate.
    assert_eq!(report.analysis_rows, 6);

    // Every row is in the reference period.
    assert_eq!(
        count(&store, "SELECT COUNT(*) FROM \"Analysis\" WHERE period <> 2019"),
        0
    );

    // Footprint rows only at the EU aggregate and never at world scope.
    assert_eq!(
        count(
            &store,
            "SELECT COUNT(*) FROM \"Analysis\"
             WHERE indicator = 'ENV_FOOTPRINT'
               AND (geo_code <> 'EU27_2020' OR category_other = 'WORLD')"
        ),
        0
    );

    // Trade rows carry translated NACE codes and detail partners only.
    let result = store
        .query(
            "SELECT category_code, category_other FROM \"Analysis\"
             WHERE indicator = 'TRADE_EXPORT'",
            &[],
        )
        .expect("Query failed");
    assert_eq!(result.rows.len(), 1);
    assert_eq!(
        result.rows[0][0],
        rusqlite::types::Value::Text("A01".to_string())
    );
    assert_eq!(
        result.rows[0][1],
        rusqlite::types::Value::Text("AT".to_string())
    );

    // No totals or placeholders anywhere in the extract.
    assert_eq!(
        count(
            &store,
            "SELECT COUNT(*) FROM \"Analysis\" WHERE category_code IN ('TOTAL', 'XX')"
        ),
        0
    );
}

// =============================================================================
// Failure Modes
// =============================================================================

#[test]
fn test_malformed_trade_block_aborts_before_persistence() {
    let dir = TempDir::new().expect("Failed to create temp dir");

    // 5 partner-year columns cannot form whole blocks of 3.
    let trade = write_source(
        &dir,
        "trade_bad.csv",
        "GEO (Codes),GEO (Labels),CPA (Codes),CPA08 (Labels),Partner,AT,WORLD,X,AT.1,WORLD.1\n\
         DE,Germany,01,Agriculture,,1,2,3,4,5\n",
    );

    let config = PipelineConfig {
        sources: vec![SourceSpec {
            indicator: Indicator::TradeExport,
            file: trade,
            layout: SourceLayout::Trade,
        }],
        trade_block_width: 3,
        trade_base_year: 2018,
        ..PipelineConfig::default()
    };

    let mut store = FactStore::open_in_memory().expect("Failed to open store");
    let result = Pipeline::new(config).run(&mut store);

    assert!(matches!(
        result,
        Err(EurofactError::SchemaMismatch { .. })
    ));
    // Nothing was persisted.
    assert!(store.query("SELECT COUNT(*) FROM \"Database\"", &[]).is_err());
}

#[test]
fn test_missing_source_file_is_fatal() {
    let config = PipelineConfig {
        sources: vec![SourceSpec {
            indicator: Indicator::Gva,
            file: PathBuf::from("does_not_exist.csv"),
            layout: SourceLayout::Standard,
        }],
        ..PipelineConfig::default()
    };

    let mut store = FactStore::open_in_memory().expect("Failed to open store");
    let result = Pipeline::new(config).run(&mut store);
    assert!(matches!(result, Err(EurofactError::Io { .. })));
}
