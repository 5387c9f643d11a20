//! Edge classification.
//!
//! Unstructured lines are matched against an ordered list of edge kind
//! patterns; the first pattern that matches anywhere in the line decides the
//! kind, and lines that match nothing are dropped. Structured rows are
//! validated and turned into an [`EdgeKey`].

use super::schema::{Classification, EdgeKey, RawRecord};
use crate::utils::config::{
    COLUMN_COUNT, COLUMN_SOURCE, COLUMN_TOTAL, DEFAULT_EDGE_KINDS, FIELD_BASE_ADDR, FIELD_CUR_ADDR, FIELD_PREV_ADDR, FIELD_SHARED_OBJECT,
    UNKNOWN_MODULE,
};
use crate::utils::error::SummaryError;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One edge kind and the pattern that identifies it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeKindPattern {
    /// Label reported for matching lines (e.g. `conditional-branch`)
    pub label: String,

    /// Regular expression searched for anywhere in the line
    pub pattern: String,
}

impl EdgeKindPattern {
    pub fn new(label: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            pattern: pattern.into(),
        }
    }
}

/// Ordered edge kind configuration
///
/// Order is match order. Loaded from TOML as a `[[kinds]]` array:
///
/// ```toml
/// [[kinds]]
/// label = "return"
/// pattern = " return "
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub kinds: Vec<EdgeKindPattern>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            kinds: DEFAULT_EDGE_KINDS
                .iter()
                .map(|(label, pattern)| EdgeKindPattern::new(*label, *pattern))
                .collect(),
        }
    }
}

impl ClassifierConfig {
    pub fn new(kinds: Vec<EdgeKindPattern>) -> Self {
        Self { kinds }
    }

    /// Load an edge kind configuration from a TOML file
    ///
    /// # Errors
    /// * `SummaryError::ConfigLoadFailed` - file unreadable or not valid TOML
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SummaryError> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path).map_err(|e| SummaryError::ConfigLoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: ClassifierConfig =
            toml::from_str(&contents).map_err(|e| SummaryError::ConfigLoadFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        debug!("Loaded {} edge kinds from {}", config.kinds.len(), path.display());

        Ok(config)
    }

    /// Configured labels in match order
    pub fn labels(&self) -> Vec<String> {
        self.kinds.iter().map(|k| k.label.clone()).collect()
    }
}

/// Compiled edge classifier
///
/// Immutable once built, so several classifiers with different
/// configurations can coexist.
#[derive(Debug, Clone)]
pub struct EdgeClassifier {
    kinds: Vec<(String, Regex)>,
}

impl EdgeClassifier {
    /// Compile a classifier from its configuration
    ///
    /// # Errors
    /// * `SummaryError::InvalidPattern` - empty kind list, empty, duplicate
    ///   or reserved label, or a pattern that is not a valid regular expression
    pub fn new(config: &ClassifierConfig) -> Result<Self, SummaryError> {
        if config.kinds.is_empty() {
            return Err(SummaryError::InvalidPattern {
                label: String::new(),
                reason: "no edge kinds configured".to_string(),
            });
        }

        let mut kinds: Vec<(String, Regex)> = Vec::with_capacity(config.kinds.len());

        for kind in &config.kinds {
            if kind.label.trim().is_empty() {
                return Err(SummaryError::InvalidPattern {
                    label: kind.label.clone(),
                    reason: "label is empty".to_string(),
                });
            }

            // Labels become report columns next to these
            if [COLUMN_SOURCE, COLUMN_TOTAL, COLUMN_COUNT].contains(&kind.label.as_str()) {
                return Err(SummaryError::InvalidPattern {
                    label: kind.label.clone(),
                    reason: "label is a reserved report column name".to_string(),
                });
            }

            if kinds.iter().any(|(label, _)| *label == kind.label) {
                return Err(SummaryError::InvalidPattern {
                    label: kind.label.clone(),
                    reason: "label is listed more than once".to_string(),
                });
            }

            let regex = Regex::new(&kind.pattern).map_err(|e| SummaryError::InvalidPattern {
                label: kind.label.clone(),
                reason: e.to_string(),
            })?;

            kinds.push((kind.label.clone(), regex));
        }

        Ok(Self { kinds })
    }

    /// Classifier with the built-in edge kinds
    pub fn with_defaults() -> Result<Self, SummaryError> {
        Self::new(&ClassifierConfig::default())
    }

    /// Labels in match order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.kinds.iter().map(|(label, _)| label.as_str())
    }

    /// Classify one unstructured line
    ///
    /// Returns `None` when no pattern matches; such lines carry no edge.
    pub fn classify_line(&self, line: &str) -> Option<Classification> {
        self.kinds
            .iter()
            .find(|(_, regex)| regex.is_match(line))
            .map(|(label, _)| Classification::Kind(label.clone()))
    }

    /// Classify any raw record
    ///
    /// Lines go through the pattern list, rows are parsed into edge keys.
    pub fn classify(
        &self,
        path: &Path,
        record: &RawRecord,
    ) -> Result<Option<Classification>, SummaryError> {
        match record {
            RawRecord::Line { text, .. } => Ok(self.classify_line(text)),
            RawRecord::Row { line_number, fields } => {
                parse_edge_key(fields, path, *line_number).map(|key| Some(Classification::Edge(key)))
            }
        }
    }
}

/// Build an edge key from a decoded structured row
///
/// **Public** - usable without a pattern configuration
///
/// # Errors
/// * `SummaryError::MalformedRecord` - a required field is absent or an
///   address does not parse
pub fn parse_edge_key(
    fields: &HashMap<String, String>,
    path: &Path,
    line: usize,
) -> Result<EdgeKey, SummaryError> {
    let address = |name: &str, required: bool| -> Result<u64, SummaryError> {
        match fields.get(name) {
            Some(value) => parse_address(value).map_err(|reason| {
                SummaryError::malformed(path, line, format!("field '{}': {}", name, reason))
            }),
            None if required => Err(SummaryError::malformed(
                path,
                line,
                format!("missing required field '{}'", name),
            )),
            None => Ok(0),
        }
    };

    let prev_address = address(FIELD_PREV_ADDR, true)?;
    let cur_address = address(FIELD_CUR_ADDR, true)?;
    let base_address = address(FIELD_BASE_ADDR, false)?;

    let module = fields
        .get(FIELD_SHARED_OBJECT)
        .cloned()
        .unwrap_or_else(|| UNKNOWN_MODULE.to_string());

    Ok(EdgeKey {
        module,
        base_address,
        prev_address,
        cur_address,
    })
}

/// Parse an address from hex (`0x` prefix) or decimal
pub fn parse_address(value: &str) -> Result<u64, String> {
    let value = value.trim();

    if let Some(hex_str) = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        if hex_str.starts_with('+') {
            return Err(format!("invalid hex address '{}': unexpected sign", value));
        }
        u64::from_str_radix(hex_str, 16)
            .map_err(|e| format!("invalid hex address '{}': {}", value, e))
    } else {
        if value.starts_with('+') {
            return Err(format!("invalid decimal address '{}': unexpected sign", value));
        }
        value
            .parse::<u64>()
            .map_err(|e| format!("invalid decimal address '{}': {}", value, e))
    }
}
