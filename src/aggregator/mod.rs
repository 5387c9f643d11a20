//! Aggregation of classified trace records into per-source counts.
//!
//! This module turns classified records into:
//! - Per-source, per-key occurrence counts
//! - Per-source record statistics (read, classified, unmatched)

pub mod count_table;
pub mod ingest;

// Re-export main types and functions
pub use count_table::{CountTable, SourceCounts, SourceStats};
pub use ingest::{aggregate_file, source_id};
