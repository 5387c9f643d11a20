//! Report rendering and export.
//!
//! This module handles:
//! - Building report rows from accumulated counts
//! - Console tables
//! - CSV and JSON export files, and reading CSV exports back

pub mod export;
pub mod report;
pub mod table;

// Re-export main functions
pub use export::{read_export, validate_path, write_export, ExportFormat, ExportSummary};
pub use report::{Cell, Report, ReportLayout, ReportRow};
pub use table::render_table;
