//! Reconciliation Checker: additive-consistency checks of detail sums
//! against published totals.
//!
//! For every (indicator, geography, period), the sum over the additive
//! detail categories is compared with the total the source itself
//! publishes. A shortfall beyond the tolerance is flagged for human
//! review, never corrected. Unmapped codes depress these ratios, which is
//! how residual data-quality issues surface.

use rusqlite::ToSql;
use serde::{Deserialize, Serialize};

use crate::error::{EurofactError, Result};
use crate::fact::Indicator;
use crate::harmonize::vocab;
use crate::store::{FactStore, placeholders};

/// One flagged (indicator, geography, period) whose detail sum falls
/// short of the published total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconWarning {
    pub indicator: Indicator,
    pub geo_code: String,
    pub period: u16,
    pub calculated_total: f64,
    pub published_total: f64,
    /// calculated / published; expected close to 1.0.
    pub ratio: f64,
}

/// Shape of one check's published-total lookup.
struct CheckSpec {
    indicators: &'static [Indicator],
    /// Category code of the published total row.
    total_code: &'static str,
    /// Restrict the published total to the world scope (trade and
    /// footprint stack per-scope rows).
    world_scope: bool,
    /// Sum the published rows: the footprint extract publishes one TOTAL
    /// per scope and only their world-level sum is comparable.
    sum_published: bool,
}

/// The four indicator-group/total-code pairings.
const CHECKS: &[CheckSpec] = &[
    CheckSpec {
        indicators: &[Indicator::Gva],
        total_code: "TOTAL",
        world_scope: false,
        sum_published: false,
    },
    CheckSpec {
        indicators: &[Indicator::EnvEmissions],
        total_code: "TOTAL_HH",
        world_scope: false,
        sum_published: false,
    },
    CheckSpec {
        indicators: &[Indicator::TradeExport, Indicator::TradeImport],
        total_code: "TOTAL",
        world_scope: true,
        sum_published: false,
    },
    CheckSpec {
        indicators: &[Indicator::EnvFootprint],
        total_code: "TOTAL",
        world_scope: true,
        sum_published: true,
    },
];

/// Runs the additive-consistency checks against the persisted facts.
pub struct ReconChecker {
    tolerance: f64,
}

impl ReconChecker {
    /// Create a checker flagging ratios below `tolerance`.
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// All flagged rows across the four checks, in check order.
    pub fn run(&self, store: &FactStore) -> Result<Vec<ReconWarning>> {
        let mut warnings = Vec::new();
        for check in CHECKS {
            warnings.extend(self.run_check(store, check)?);
        }
        Ok(warnings)
    }

    fn run_check(&self, store: &FactStore, check: &CheckSpec) -> Result<Vec<ReconWarning>> {
        let sql = build_check_sql(check);

        let indicator_names: Vec<&'static str> =
            check.indicators.iter().map(|i| i.as_str()).collect();

        // Bind order follows the placeholder order in `build_check_sql`.
        let mut params: Vec<&dyn ToSql> = Vec::new();
        for code in vocab::TOTAL_CODES {
            params.push(code);
        }
        for code in vocab::OVERLAP_CATEGORIES {
            params.push(code);
        }
        for scope in vocab::DOUBLE_COUNT_SCOPES {
            params.push(scope);
        }
        for geo in vocab::EU27 {
            params.push(geo);
        }
        for name in &indicator_names {
            params.push(name);
        }
        params.push(&check.total_code);
        for name in &indicator_names {
            params.push(name);
        }
        if check.world_scope {
            params.push(&vocab::WORLD_SCOPE);
        }
        params.push(&self.tolerance);

        let mut stmt = store.conn().prepare(&sql)?;
        let mut rows = stmt.query(params.as_slice())?;

        let mut warnings = Vec::new();
        while let Some(row) = rows.next()? {
            let name: String = row.get(0)?;
            let indicator = Indicator::from_name(&name).ok_or_else(|| {
                EurofactError::Config(format!("unknown indicator '{name}' in store"))
            })?;
            warnings.push(ReconWarning {
                indicator,
                geo_code: row.get(1)?,
                period: row.get::<_, i64>(2)? as u16,
                calculated_total: row.get(3)?,
                published_total: row.get(4)?,
                ratio: row.get(5)?,
            });
        }

        Ok(warnings)
    }
}

fn build_check_sql(check: &CheckSpec) -> String {
    let published_value = if check.sum_published {
        "SUM(value)"
    } else {
        "value"
    };
    let published_scope = if check.world_scope {
        "AND category_other = ?"
    } else {
        ""
    };
    let published_group = if check.sum_published {
        "GROUP BY indicator, geo_code, period"
    } else {
        ""
    };

    format!(
        "WITH calc AS (
             SELECT indicator, geo_code, period, SUM(value) AS calculated
             FROM \"Database\"
             WHERE UPPER(category_code) NOT IN ({totals})
               AND category_code NOT IN ({overlap})
               AND category_other NOT IN ({scopes})
               AND geo_code IN ({eu})
               AND indicator IN ({indicators})
             GROUP BY indicator, geo_code, period
         ),
         published AS (
             SELECT indicator, geo_code, period, {published_value} AS total
             FROM \"Database\"
             WHERE category_code = ?
               AND indicator IN ({indicators})
               {published_scope}
             {published_group}
         )
         SELECT calc.indicator, calc.geo_code, calc.period,
                calc.calculated, published.total,
                calc.calculated / published.total AS ratio
         FROM calc
         LEFT JOIN published
           ON calc.indicator = published.indicator
          AND calc.geo_code = published.geo_code
          AND calc.period = published.period
         WHERE calc.calculated / published.total < ?
         ORDER BY calc.indicator, calc.geo_code, calc.period",
        totals = placeholders(vocab::TOTAL_CODES.len()),
        overlap = placeholders(vocab::OVERLAP_CATEGORIES.len()),
        scopes = placeholders(vocab::DOUBLE_COUNT_SCOPES.len()),
        eu = placeholders(vocab::EU27.len()),
        indicators = placeholders(check.indicators.len()),
    )
}
