//! Drive one trace log through the reader and classifier into a count table.

use super::count_table::{CountTable, SourceCounts};
use crate::parser::classifier::EdgeClassifier;
use crate::parser::reader::{open_log, ReadOptions};
use crate::parser::schema::RawRecord;
use crate::utils::error::SummaryError;
use log::{debug, info};
use std::path::Path;

/// Read one log completely and add its counts to `table`
///
/// **Public** - main entry point for aggregation
///
/// The source is registered even when nothing in it classifies. Counts are
/// staged and only committed once the whole file has been read, so a file
/// that fails part-way contributes nothing.
///
/// # Returns
/// The counts committed for this file
///
/// # Errors
/// * `SummaryError::InputNotFound` - log cannot be opened
/// * `SummaryError::MalformedRecord` - structured row fails validation
/// * `SummaryError::ReadFailed` - I/O error while reading
pub fn aggregate_file(
    table: &mut CountTable,
    classifier: &EdgeClassifier,
    path: impl AsRef<Path>,
    options: ReadOptions,
) -> Result<SourceCounts, SummaryError> {
    let path = path.as_ref();
    let source = source_id(path);

    let records = open_log(path, options)?;
    let staged = classify_records(classifier, path, records)?;

    let stats = staged.stats();
    info!(
        "{}: {} records, {} classified, {} unmatched",
        source, stats.records_read, stats.classified, stats.unmatched
    );

    table.commit(&source, staged.clone());

    Ok(staged)
}

/// Classify every record of one log into a fresh set of counts
///
/// **Private** - internal helper for aggregate_file
fn classify_records(
    classifier: &EdgeClassifier,
    path: &Path,
    records: impl Iterator<Item = Result<RawRecord, SummaryError>>,
) -> Result<SourceCounts, SummaryError> {
    let mut staged = SourceCounts::new();

    for record in records {
        let record = record?;

        match classifier.classify(path, &record)? {
            Some(key) => staged.increment(key),
            None => staged.skip_unmatched(),
        }
    }

    if staged.stats().unmatched > 0 {
        debug!(
            "{}: dropped {} lines matching no edge kind",
            path.display(),
            staged.stats().unmatched
        );
    }

    Ok(staged)
}

/// Identifier a log is reported under
pub fn source_id(path: &Path) -> String {
    path.display().to_string()
}
