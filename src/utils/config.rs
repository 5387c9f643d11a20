//! Configuration and constants for the CLI.

/// Current export schema version (reported by `version`)
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Default edge kinds, in match order.
///
/// Patterns match the phrases the edge-log runtime writes between the
/// function name and the target address, e.g. `main: conditional branch edge to 0x...`.
/// The surrounding spaces keep ` conditional branch ` from matching inside
/// ` unconditional branch `.
pub const DEFAULT_EDGE_KINDS: &[(&str, &str)] = &[
    ("direct-call", r" direct call "),
    ("indirect-call", r" indirect call "),
    ("return", r" return "),
    ("conditional-branch", r" conditional branch "),
    ("unconditional-branch", r" unconditional branch "),
    ("switch", r" switch "),
    ("unknown-edge", r" unknown edge "),
];

// Field names in structured (CSV) edge logs
pub const FIELD_SHARED_OBJECT: &str = "shared_object";
pub const FIELD_BASE_ADDR: &str = "base_addr";
pub const FIELD_PREV_ADDR: &str = "prev_addr";
pub const FIELD_CUR_ADDR: &str = "cur_addr";

/// Fields a structured log header must name
pub const REQUIRED_FIELDS: &[&str] = &[FIELD_PREV_ADDR, FIELD_CUR_ADDR];

/// Module name used when a structured log has no `shared_object` column
pub const UNKNOWN_MODULE: &str = "<unknown>";

// Report column names
pub const COLUMN_SOURCE: &str = "source";
pub const COLUMN_COUNT: &str = "count";
pub const COLUMN_TOTAL: &str = "total";

/// Read buffer size for trace logs
pub const READ_BUFFER_SIZE: usize = 256 * 1024;
