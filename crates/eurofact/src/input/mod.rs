//! Source loading boundary: delimited-text extracts into raw tables.

mod reader;
mod table;

pub use reader::{Reader, ReaderConfig, SourceMetadata};
pub use table::RawTable;
