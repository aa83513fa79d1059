// src/extractors/mod.rs
pub mod config;
pub mod fuzzy;
pub mod money;
pub mod table;
pub mod text;
pub mod value;

// Re-export key extraction types for convenience
pub use config::{DedupPolicy, ExtractorConfig};
pub use table::Table;
pub use value::{Lookup, ValueExtractor};
