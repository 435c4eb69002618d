//! eurofact: normalization and reconciliation pipeline for Eurostat
//! statistical extracts.
//!
//! Five wide-format extracts with inconsistent row/column conventions are
//! unified into one long-format fact table with consistent keys,
//! classification codes are harmonized to a single vocabulary, mapping
//! tables are derived, category aggregates are cross-checked against
//! published totals within a tolerance, and a filtered analysis extract
//! is persisted for downstream consumption.
//!
//! # Core Principles
//!
//! - **One pass**: every relation is derived once per run and fully
//!   replaced, nothing is mutated incrementally
//! - **Flag, never fix**: reconciliation failures are surfaced for human
//!   review, never auto-corrected
//! - **Tables, not branches**: harmonization rules live in immutable
//!   vocabulary tables, auditable on their own
//!
//! # Example
//!
//! ```no_run
//! use eurofact::{FactStore, Pipeline, PipelineConfig};
//!
//! let config = PipelineConfig::with_standard_sources("data/");
//! let mut store = FactStore::open("out_data.db").unwrap();
//! let report = Pipeline::new(config).run(&mut store).unwrap();
//!
//! println!("Persisted: {}", report.persisted_rows);
//! println!("Warnings: {}", report.warnings.len());
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod fact;
pub mod harmonize;
pub mod input;
pub mod mapping;
pub mod recon;
pub mod store;
pub mod unify;

mod pipeline;

pub use config::{PipelineConfig, SourceLayout, SourceSpec};
pub use error::{EurofactError, Result};
pub use export::Exporter;
pub use fact::{FactRow, Indicator};
pub use input::{RawTable, SourceMetadata};
pub use pipeline::{Pipeline, RunReport};
pub use recon::ReconWarning;
pub use store::FactStore;
