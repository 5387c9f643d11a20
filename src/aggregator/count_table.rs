//! Per-source occurrence counts.
//!
//! Sources keep their insertion order so reports are deterministic. Within a
//! source, keys keep first-seen order.

use crate::parser::schema::Classification;
use std::collections::HashMap;

/// Record counters for one source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceStats {
    /// Records read from the log
    pub records_read: u64,

    /// Records that produced a classification
    pub classified: u64,

    /// Unstructured lines that matched no edge kind
    pub unmatched: u64,
}

/// Counts for a single source, in first-seen key order
#[derive(Debug, Clone, Default)]
pub struct SourceCounts {
    entries: Vec<(Classification, u64)>,
    index: HashMap<Classification, usize>,
    stats: SourceStats,
}

impl SourceCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` occurrences of `key`
    pub fn add(&mut self, key: Classification, amount: u64) {
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1 += amount,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, amount));
            }
        }
    }

    /// Count one classified record
    pub fn increment(&mut self, key: Classification) {
        self.add(key, 1);
        self.stats.records_read += 1;
        self.stats.classified += 1;
    }

    /// Note a record that matched nothing
    pub fn skip_unmatched(&mut self) {
        self.stats.records_read += 1;
        self.stats.unmatched += 1;
    }

    /// Count for `key` (zero if never seen)
    pub fn get(&self, key: &Classification) -> u64 {
        self.index
            .get(key)
            .map_or(0, |&slot| self.entries[slot].1)
    }

    /// Entries in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&Classification, u64)> {
        self.entries.iter().map(|(key, count)| (key, *count))
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn stats(&self) -> SourceStats {
        self.stats
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fold another set of counts into this one, keeping first-seen order
    pub fn merge(&mut self, other: SourceCounts) {
        for (key, count) in other.entries {
            self.add(key, count);
        }
        self.stats.records_read += other.stats.records_read;
        self.stats.classified += other.stats.classified;
        self.stats.unmatched += other.stats.unmatched;
    }
}

/// Occurrence counts for every source of a run
///
/// Grows only: counts are never decremented or removed.
#[derive(Debug, Clone, Default)]
pub struct CountTable {
    sources: Vec<(String, SourceCounts)>,
    index: HashMap<String, usize>,
}

impl CountTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `source` has a row, even if nothing is ever counted for it
    pub fn register_source(&mut self, source: &str) -> &mut SourceCounts {
        let slot = match self.index.get(source) {
            Some(&slot) => slot,
            None => {
                self.index.insert(source.to_string(), self.sources.len());
                self.sources.push((source.to_string(), SourceCounts::new()));
                self.sources.len() - 1
            }
        };
        &mut self.sources[slot].1
    }

    /// Count one occurrence of `key` under `source`
    pub fn record(&mut self, source: &str, key: Classification) {
        self.register_source(source).increment(key);
    }

    /// Commit a fully-read source's counts
    pub fn commit(&mut self, source: &str, counts: SourceCounts) {
        self.register_source(source).merge(counts);
    }

    /// Count for `key` under `source` (zero if either is unknown)
    pub fn count(&self, source: &str, key: &Classification) -> u64 {
        self.get(source).map_or(0, |counts| counts.get(key))
    }

    /// Sum of all counts for `source`
    pub fn source_total(&self, source: &str) -> u64 {
        self.get(source).map_or(0, SourceCounts::total)
    }

    /// Sum of all counts across every source
    pub fn grand_total(&self) -> u64 {
        self.sources.iter().map(|(_, counts)| counts.total()).sum()
    }

    pub fn get(&self, source: &str) -> Option<&SourceCounts> {
        self.index.get(source).map(|&slot| &self.sources[slot].1)
    }

    /// Sources in insertion order
    pub fn sources(&self) -> impl Iterator<Item = (&str, &SourceCounts)> {
        self.sources
            .iter()
            .map(|(source, counts)| (source.as_str(), counts))
    }

    /// Number of sources
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
