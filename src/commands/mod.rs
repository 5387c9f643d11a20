//! CLI command implementations.
//!
//! Commands orchestrate the library components to perform user tasks.

pub mod summarize;
pub mod utils;

// Re-export main command functions
pub use summarize::{build_summary, execute_summarize, validate_args, SummarizeArgs};
pub use utils::{display_kinds, display_version, validate_export_file};
