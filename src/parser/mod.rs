//! Trace log reading and edge classification.
//!
//! This module handles:
//! - Opening edge logs in either trace format
//! - Classifying unstructured lines into edge kinds
//! - Validating structured rows into edge keys
//! - Defining the record model shared with the aggregator

pub mod classifier;
pub mod reader;
pub mod schema;

// Re-export main types
pub use classifier::{parse_address, parse_edge_key, ClassifierConfig, EdgeClassifier, EdgeKindPattern};
pub use reader::{open_log, LogRecords, ReadOptions};
pub use schema::{format_address, Classification, EdgeKey, RawRecord, TraceFormat};
