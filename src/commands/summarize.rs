//! Summarize command implementation.
//!
//! The summarize command:
//! 1. Loads the edge kind configuration
//! 2. Reads and classifies every log, in order
//! 3. Builds the report rows
//! 4. Prints a table or writes an export file

use crate::aggregator::{aggregate_file, CountTable};
use crate::output::{render_table, write_export, ExportFormat, Report, ReportLayout};
use crate::parser::{ClassifierConfig, EdgeClassifier, ReadOptions, TraceFormat};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the summarize command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone, Default)]
pub struct SummarizeArgs {
    /// Edge logs, reported in this order
    pub logs: Vec<PathBuf>,

    /// Format of every log
    pub format: TraceFormat,

    /// Export destination (None = console table)
    pub output: Option<PathBuf>,

    /// Export encoding
    pub export_format: ExportFormat,

    /// Append a per-source total column (unstructured only)
    pub include_total: bool,

    /// TOML file replacing the built-in edge kinds
    pub kinds_file: Option<PathBuf>,

    /// Logs are gzip-compressed
    pub compressed: bool,
}

/// Execute the summarize command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Edge kind configuration cannot be loaded or compiled
/// * Any log cannot be opened or parsed (nothing is printed or written)
/// * Export destination cannot be written
pub fn execute_summarize(args: &SummarizeArgs) -> Result<()> {
    let start_time = Instant::now();

    let (table, report) = build_summary(args)?;

    match &args.output {
        Some(path) => {
            write_export(&report, path, args.export_format)
                .context("Failed to write summary export")?;
            info!("✓ Summary written to: {}", path.display());
        }
        None => {
            print!("{}", render_table(&report, std::io::stdout().is_terminal()));
        }
    }

    info!(
        "Summarized {} edges from {} logs in {:.2}s",
        table.grand_total(),
        table.len(),
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Aggregate every log and build the report, without any output
///
/// **Public** - used by execute_summarize and tests
pub fn build_summary(args: &SummarizeArgs) -> Result<(CountTable, Report)> {
    let config = match &args.kinds_file {
        Some(path) => ClassifierConfig::load(path)?,
        None => ClassifierConfig::default(),
    };
    let classifier = EdgeClassifier::new(&config).context("Invalid edge kind configuration")?;

    let options = ReadOptions::new(args.format).with_compression(args.compressed);
    let mut table = CountTable::new();

    for (i, log) in args.logs.iter().enumerate() {
        info!("Reading log {}/{}: {}", i + 1, args.logs.len(), log.display());
        aggregate_file(&mut table, &classifier, log, options)
            .with_context(|| format!("Failed to summarize {}", log.display()))?;
    }

    let layout = match args.format {
        TraceFormat::Unstructured => ReportLayout::Kinds {
            labels: config.labels(),
            include_total: args.include_total,
        },
        TraceFormat::Structured => {
            if args.include_total {
                warn!("Total column is only available for unstructured logs, ignoring --total");
            }
            ReportLayout::Edges
        }
    };

    let report = Report::build(&table, &layout);
    debug!("Report has {} rows", report.rows.len());

    Ok((table, report))
}

/// Validate summarize arguments
///
/// **Public** - can be called before execute_summarize for early validation
pub fn validate_args(args: &SummarizeArgs) -> Result<()> {
    if args.logs.is_empty() {
        anyhow::bail!("At least one edge log is required");
    }

    if let Some(output) = &args.output {
        crate::output::validate_path(output)?;
    }

    Ok(())
}
