//! The unified long-format fact record and its indicator dimension.

use serde::{Deserialize, Serialize};

/// Which source series a fact row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Indicator {
    /// Gross value added by economic activity.
    Gva,
    /// Goods exports by product and trading partner.
    TradeExport,
    /// Goods imports by product and trading partner.
    TradeImport,
    /// Air emissions accounts by economic activity.
    EnvEmissions,
    /// Consumption-based emission footprints by activity and scope.
    EnvFootprint,
}

impl Indicator {
    /// Eurostat series name, as persisted in the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Indicator::Gva => "GVA",
            Indicator::TradeExport => "TRADE_EXPORT",
            Indicator::TradeImport => "TRADE_IMPORT",
            Indicator::EnvEmissions => "ENV_EMISSIONS",
            Indicator::EnvFootprint => "ENV_FOOTPRINT",
        }
    }

    /// Parse a persisted series name.
    pub fn from_name(name: &str) -> Option<Indicator> {
        match name {
            "GVA" => Some(Indicator::Gva),
            "TRADE_EXPORT" => Some(Indicator::TradeExport),
            "TRADE_IMPORT" => Some(Indicator::TradeImport),
            "ENV_EMISSIONS" => Some(Indicator::EnvEmissions),
            "ENV_FOOTPRINT" => Some(Indicator::EnvFootprint),
            _ => None,
        }
    }

    /// True for the two trade series, whose values are carried in millions.
    pub fn is_trade(&self) -> bool {
        matches!(self, Indicator::TradeExport | Indicator::TradeImport)
    }
}

/// One row of the unified long-format fact table.
///
/// `(indicator, geo_code, category_code, category_other, period)` is the
/// natural key. `geo_name`, `category_name` and `label_kind` ride along for
/// mapping derivation and are not part of the key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactRow {
    pub indicator: Indicator,
    pub geo_code: String,
    pub geo_name: String,
    pub category_code: String,
    pub category_name: String,
    /// Labeling scheme the raw category text came from: the 4th-column
    /// header for standard and trade sources, the per-row scope value for
    /// the footprint source.
    pub label_kind: String,
    /// Trading partner for trade series, geography scope for footprint,
    /// empty otherwise.
    pub category_other: String,
    /// 4-digit year.
    pub period: u16,
    /// `None` is the missing-data sentinel; such rows never reach the
    /// store.
    pub value: Option<f64>,
}

impl FactRow {
    /// The natural key of this row.
    pub fn key(&self) -> (Indicator, &str, &str, &str, u16) {
        (
            self.indicator,
            self.geo_code.as_str(),
            self.category_code.as_str(),
            self.category_other.as_str(),
            self.period,
        )
    }
}
