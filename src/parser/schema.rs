//! Record model shared by the reader, classifier, aggregator and renderer.
//!
//! The two trace formats produce different keys: unstructured logs yield an
//! edge kind label, structured logs yield the static identity of an edge.
//! Both are folded into [`Classification`] so the aggregator and the
//! renderer never need to know which format was read.

use clap::ValueEnum;
use std::collections::HashMap;
use std::fmt;

/// Trace log format, chosen by the caller (never sniffed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TraceFormat {
    /// Plain text, one edge event per line
    #[default]
    Unstructured,
    /// CSV with a header row naming the address fields
    Structured,
}

impl fmt::Display for TraceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceFormat::Unstructured => write!(f, "unstructured"),
            TraceFormat::Structured => write!(f, "structured"),
        }
    }
}

/// Static identity of a control-flow edge
///
/// Two records with the same tuple are the same edge, whatever line or
/// numeric notation they came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    /// Shared object (module) the edge target lives in
    pub module: String,

    /// Load address of the module
    pub base_address: u64,

    /// Address of the previous basic block
    pub prev_address: u64,

    /// Address of the current basic block
    pub cur_address: u64,
}

impl EdgeKey {
    pub fn new(module: impl Into<String>, base_address: u64, prev_address: u64, cur_address: u64) -> Self {
        Self {
            module: module.into(),
            base_address,
            prev_address,
            cur_address,
        }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}+{}: {} -> {}",
            self.module,
            format_address(self.base_address),
            format_address(self.prev_address),
            format_address(self.cur_address)
        )
    }
}

/// Result of classifying one trace record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Edge kind label (unstructured mode)
    Kind(String),
    /// Static edge identity (structured mode)
    Edge(EdgeKey),
}

impl Classification {
    /// Convenience constructor for a kind label
    pub fn kind(label: impl Into<String>) -> Self {
        Classification::Kind(label.into())
    }
}

/// One raw record read from a trace log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawRecord {
    /// A line of an unstructured log, without its line terminator
    Line { line_number: usize, text: String },

    /// A decoded row of a structured log, keyed by header name
    Row {
        line_number: usize,
        fields: HashMap<String, String>,
    },
}

impl RawRecord {
    /// 1-based line number the record started on
    pub fn line_number(&self) -> usize {
        match self {
            RawRecord::Line { line_number, .. } | RawRecord::Row { line_number, .. } => *line_number,
        }
    }
}

/// Render an address as lowercase hex with a `0x` prefix
pub fn format_address(address: u64) -> String {
    format!("{:#x}", address)
}
