//! Trace log reader.
//!
//! Opens one edge log and yields its records lazily, one pass only.
//! Unstructured logs are handed over line by line; structured logs are
//! decoded as CSV against the header row.

use super::schema::{RawRecord, TraceFormat};
use crate::utils::config::{READ_BUFFER_SIZE, REQUIRED_FIELDS};
use crate::utils::error::SummaryError;
use flate2::read::GzDecoder;
use log::debug;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// How to open a trace log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Record format of the log
    pub format: TraceFormat,

    /// Log was written gzip-compressed
    pub compressed: bool,
}

impl ReadOptions {
    pub fn new(format: TraceFormat) -> Self {
        Self {
            format,
            compressed: false,
        }
    }

    pub fn with_compression(mut self, compressed: bool) -> Self {
        self.compressed = compressed;
        self
    }
}

/// Open a trace log and return an iterator over its records
///
/// **Public** - main entry point for reading
///
/// # Errors
/// * `SummaryError::InputNotFound` - path cannot be opened for reading
/// * `SummaryError::MalformedRecord` - structured log has no header or is
///   missing a required field
pub fn open_log(path: impl AsRef<Path>, options: ReadOptions) -> Result<LogRecords, SummaryError> {
    let path = path.as_ref();

    debug!(
        "Opening {} log: {} (gzip: {})",
        options.format,
        path.display(),
        options.compressed
    );

    let reader = open_reader(path, options.compressed)?;

    let inner = match options.format {
        TraceFormat::Unstructured => Records::Lines(LineRecords {
            reader,
            line_number: 0,
            buf: Vec::new(),
        }),
        TraceFormat::Structured => Records::Rows(RowRecords::new(path, reader)?),
    };

    Ok(LogRecords {
        path: path.to_path_buf(),
        inner,
        finished: false,
    })
}

/// Open the file, wrapping it in a gzip decoder if requested
///
/// **Private** - internal helper for open_log
fn open_reader(path: &Path, compressed: bool) -> Result<Box<dyn BufRead>, SummaryError> {
    let file = File::open(path).map_err(|source| SummaryError::InputNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);

    if compressed {
        let decoder = GzDecoder::new(reader);
        Ok(Box::new(BufReader::with_capacity(READ_BUFFER_SIZE, decoder)))
    } else {
        Ok(Box::new(reader))
    }
}

/// Lazy sequence of records from one trace log
///
/// Stops after the first error; the underlying file is closed when this
/// value is dropped.
pub struct LogRecords {
    path: PathBuf,
    inner: Records,
    finished: bool,
}

impl LogRecords {
    /// Header fields of a structured log (empty for unstructured logs)
    pub fn header(&self) -> &[String] {
        match &self.inner {
            Records::Lines(_) => &[],
            Records::Rows(rows) => &rows.header,
        }
    }
}

impl Iterator for LogRecords {
    type Item = Result<RawRecord, SummaryError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let next = match &mut self.inner {
            Records::Lines(lines) => lines.next_record(&self.path),
            Records::Rows(rows) => rows.next_record(&self.path),
        };

        match next {
            Some(Ok(record)) => Some(Ok(record)),
            Some(Err(e)) => {
                self.finished = true;
                Some(Err(e))
            }
            None => {
                self.finished = true;
                None
            }
        }
    }
}

enum Records {
    Lines(LineRecords),
    Rows(RowRecords),
}

struct LineRecords {
    reader: Box<dyn BufRead>,
    line_number: usize,
    buf: Vec<u8>,
}

impl LineRecords {
    fn next_record(&mut self, path: &Path) -> Option<Result<RawRecord, SummaryError>> {
        self.buf.clear();
        self.line_number += 1;

        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                // Function names are not guaranteed to be valid UTF-8
                let text = String::from_utf8_lossy(trim_line_end(&self.buf)).into_owned();
                Some(Ok(RawRecord::Line {
                    line_number: self.line_number,
                    text,
                }))
            }
            Err(source) => Some(Err(SummaryError::ReadFailed {
                path: path.to_path_buf(),
                line: self.line_number,
                source,
            })),
        }
    }
}

fn trim_line_end(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}

struct RowRecords {
    reader: csv::Reader<Box<dyn BufRead>>,
    header: Vec<String>,
    record: csv::StringRecord,
}

impl RowRecords {
    /// Read and validate the header row
    fn new(path: &Path, input: Box<dyn BufRead>) -> Result<Self, SummaryError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(input);

        let mut record = csv::StringRecord::new();
        let has_header = reader
            .read_record(&mut record)
            .map_err(|e| csv_error(path, e, 1))?;

        if !has_header {
            return Err(SummaryError::malformed(path, 1, "missing header row"));
        }

        let header = parse_header(&record).map_err(|reason| SummaryError::malformed(path, 1, reason))?;

        debug!("Structured log header: {}", header.join(","));

        Ok(Self {
            reader,
            header,
            record,
        })
    }

    fn next_record(&mut self, path: &Path) -> Option<Result<RawRecord, SummaryError>> {
        let fallback_line = self.record.position().map_or(0, |p| p.line() as usize) + 1;

        match self.reader.read_record(&mut self.record) {
            Ok(false) => None,
            Ok(true) => {
                let line_number = self
                    .record
                    .position()
                    .map_or(fallback_line, |p| p.line() as usize);

                if self.record.len() != self.header.len() {
                    return Some(Err(SummaryError::malformed(
                        path,
                        line_number,
                        format!(
                            "expected {} fields, found {}",
                            self.header.len(),
                            self.record.len()
                        ),
                    )));
                }

                let fields: HashMap<String, String> = self
                    .header
                    .iter()
                    .cloned()
                    .zip(self.record.iter().map(str::to_string))
                    .collect();

                Some(Ok(RawRecord::Row { line_number, fields }))
            }
            Err(e) => Some(Err(csv_error(path, e, fallback_line))),
        }
    }
}

/// Validate a structured log header and return its field names
///
/// **Private** - internal helper for RowRecords::new
fn parse_header(record: &csv::StringRecord) -> Result<Vec<String>, String> {
    let header: Vec<String> = record.iter().map(|f| f.trim().to_string()).collect();

    for (i, name) in header.iter().enumerate() {
        if header[..i].contains(name) {
            return Err(format!("duplicate header field '{}'", name));
        }
    }

    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|required| !header.iter().any(|name| name == required))
        .collect();

    if !missing.is_empty() {
        return Err(format!("header is missing required field(s): {}", missing.join(", ")));
    }

    Ok(header)
}

/// Map a CSV decoding error onto the engine's error taxonomy
fn csv_error(path: &Path, err: csv::Error, fallback_line: usize) -> SummaryError {
    let line = err
        .position()
        .map_or(fallback_line, |p| p.line() as usize);

    match err.into_kind() {
        csv::ErrorKind::Io(source) => SummaryError::ReadFailed {
            path: path.to_path_buf(),
            line,
            source,
        },
        csv::ErrorKind::Utf8 { err, .. } => {
            SummaryError::malformed(path, line, format!("invalid UTF-8: {}", err))
        }
        other => SummaryError::malformed(path, line, format!("{:?}", other)),
    }
}
