//! Edge Summary
//!
//! Summarizes the control-flow edge logs written by instrumented binaries.
//!
//! Two log formats are supported:
//! - **unstructured**: one text line per edge, classified into edge kinds
//!   (`conditional-branch`, `return`, ...) by an ordered pattern list
//! - **structured**: CSV rows of `shared_object,base_addr,prev_addr,cur_addr`,
//!   counted per distinct edge
//!
//! Counts are kept per input log and rendered as a console table or
//! exported as CSV/JSON.
//!
//! ## Getting Started
//!
//! ```bash
//! summarize-edges summarize --total edges-1.log edges-2.log
//! summarize-edges summarize -f structured -o edges.csv run.csv
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;
