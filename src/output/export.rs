//! Structured report export.
//!
//! Writes report rows as CSV (default) or JSON. The file is written to a
//! temporary path next to the destination and renamed into place, so the
//! destination either holds a complete report or is left untouched.

use super::report::{Cell, Report};
use crate::utils::config::{COLUMN_COUNT, COLUMN_SOURCE, COLUMN_TOTAL};
use crate::utils::error::SummaryError;
use clap::ValueEnum;
use log::{debug, info};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Export file encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportFormat {
    /// Comma-separated values with a header row
    #[default]
    Csv,
    /// Array of objects keyed by column name
    Json,
}

/// Write a report to `output_path`
///
/// **Public** - main entry point for file output
///
/// # Errors
/// * `SummaryError::OutputWriteFailed` - destination invalid, not writable,
///   or the rename onto it failed
pub fn write_export(
    report: &Report,
    output_path: impl AsRef<Path>,
    format: ExportFormat,
) -> Result<(), SummaryError> {
    let output_path = output_path.as_ref();

    info!("Writing {:?} export to: {}", format, output_path.display());

    validate_path(output_path)?;

    let dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let created = create_missing_dirs(output_path, dir)?;

    if let Err(e) = write_atomically(report, output_path, dir, format) {
        if let Some(root) = created {
            debug!("Removing directories created for failed export: {}", root.display());
            let _ = fs::remove_dir_all(&root);
        }
        return Err(e);
    }

    info!("Export written successfully ({} rows)", report.rows.len());

    Ok(())
}

/// **Private** - create `dir` if needed, returning the topmost directory created
fn create_missing_dirs(output_path: &Path, dir: &Path) -> Result<Option<PathBuf>, SummaryError> {
    if dir.exists() {
        return Ok(None);
    }

    let root = dir
        .ancestors()
        .take_while(|a| !a.as_os_str().is_empty() && !a.exists())
        .last()
        .map(Path::to_path_buf);

    debug!("Creating parent directories: {}", dir.display());
    if let Err(source) = fs::create_dir_all(dir) {
        if let Some(root) = &root {
            let _ = fs::remove_dir_all(root);
        }
        return Err(SummaryError::OutputWriteFailed {
            path: output_path.to_path_buf(),
            source,
        });
    }

    Ok(root)
}

/// **Private** - temp file in `dir`, synced, then renamed onto `output_path`
fn write_atomically(
    report: &Report,
    output_path: &Path,
    dir: &Path,
    format: ExportFormat,
) -> Result<(), SummaryError> {
    let mut temp = NamedTempFile::new_in(dir).map_err(|source| SummaryError::OutputWriteFailed {
        path: output_path.to_path_buf(),
        source,
    })?;

    match format {
        ExportFormat::Csv => write_csv(report, temp.as_file_mut())
            .map_err(|e| SummaryError::write_failed(output_path, e))?,
        ExportFormat::Json => write_json(report, temp.as_file_mut()).map_err(|source| {
            SummaryError::OutputWriteFailed {
                path: output_path.to_path_buf(),
                source,
            }
        })?,
    }

    temp.as_file()
        .sync_all()
        .map_err(|source| SummaryError::OutputWriteFailed {
            path: output_path.to_path_buf(),
            source,
        })?;

    temp.persist(output_path)
        .map_err(|e| SummaryError::OutputWriteFailed {
            path: output_path.to_path_buf(),
            source: e.error,
        })?;

    Ok(())
}

/// **Private** - header first, always, then one record per row
fn write_csv(report: &Report, out: impl Write) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(BufWriter::new(out));

    writer.write_record(&report.columns)?;
    for row in &report.rows {
        writer.write_record(row.cells.iter().map(Cell::render))?;
    }

    writer.flush()?;
    Ok(())
}

/// **Private** - rows as objects, keys in column order
fn write_json(report: &Report, out: impl Write) -> Result<(), std::io::Error> {
    let rows: Vec<serde_json::Map<String, serde_json::Value>> = report
        .rows
        .iter()
        .map(|row| {
            report
                .columns
                .iter()
                .cloned()
                .zip(row.cells.iter().map(|cell| match cell {
                    Cell::Text(text) => serde_json::Value::from(text.clone()),
                    Cell::Count(count) => serde_json::Value::from(*count),
                }))
                .collect()
        })
        .collect();

    let mut writer = BufWriter::new(out);
    serde_json::to_writer_pretty(&mut writer, &rows)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

/// Validate that an output path can hold a file
///
/// **Public** - used before any output is attempted
pub fn validate_path(path: &Path) -> Result<(), SummaryError> {
    if path.as_os_str().is_empty() {
        return Err(SummaryError::write_failed(path, "path is empty"));
    }

    if path.is_dir() {
        return Err(SummaryError::write_failed(path, "path is a directory"));
    }

    Ok(())
}

/// Summary of a CSV export read back from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// Header columns
    pub columns: Vec<String>,

    /// Number of data rows
    pub rows: usize,

    /// Occurrences per source, in first-seen order
    pub source_totals: Vec<(String, u64)>,
}

/// Read a CSV export back and total its counts per source
///
/// Edge exports are totalled over the `count` column; kind exports over
/// every column except `source` and `total`.
///
/// # Errors
/// * `SummaryError::InputNotFound` - file cannot be opened
/// * `SummaryError::MalformedRecord` - no `source` column, or a count cell
///   that is not an unsigned integer
pub fn read_export(input_path: impl AsRef<Path>) -> Result<ExportSummary, SummaryError> {
    let input_path = input_path.as_ref();

    debug!("Reading export from: {}", input_path.display());

    let file = fs::File::open(input_path).map_err(|source| SummaryError::InputNotFound {
        path: input_path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::Reader::from_reader(file);

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| SummaryError::malformed(input_path, 1, e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    let source_col = columns
        .iter()
        .position(|c| c == COLUMN_SOURCE)
        .ok_or_else(|| SummaryError::malformed(input_path, 1, "missing 'source' column"))?;

    let count_cols: Vec<usize> = match columns.iter().position(|c| c == COLUMN_COUNT) {
        Some(count_col) => vec![count_col],
        None => (0..columns.len())
            .filter(|&i| i != source_col && columns[i] != COLUMN_TOTAL)
            .collect(),
    };

    let mut source_totals: Vec<(String, u64)> = Vec::new();
    let mut rows = 0;

    for (index, record) in reader.records().enumerate() {
        let record =
            record.map_err(|e| SummaryError::malformed(input_path, index + 2, e.to_string()))?;
        let line = record.position().map_or(index + 2, |p| p.line() as usize);
        rows += 1;

        let source = record.get(source_col).unwrap_or_default().to_string();
        let mut occurrences = 0u64;
        for &col in &count_cols {
            let cell = record.get(col).unwrap_or_default();
            occurrences += cell.parse::<u64>().map_err(|e| {
                SummaryError::malformed(
                    input_path,
                    line,
                    format!("column '{}': invalid count '{}': {}", columns[col], cell, e),
                )
            })?;
        }

        match source_totals.iter_mut().find(|(s, _)| *s == source) {
            Some((_, total)) => *total += occurrences,
            None => source_totals.push((source, occurrences)),
        }
    }

    Ok(ExportSummary {
        columns,
        rows,
        source_totals,
    })
}
