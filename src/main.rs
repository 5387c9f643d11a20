//! Edge Summary CLI
//!
//! Summarizes control-flow edge logs from instrumented binaries into
//! per-log edge kind counts or per-edge occurrence counts.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use edge_summary::commands::{
    display_kinds, display_version, execute_summarize, validate_args, validate_export_file,
    SummarizeArgs,
};
use edge_summary::output::ExportFormat;
use edge_summary::parser::TraceFormat;

/// Edge Summary - summarize executed control-flow edges
#[derive(Parser, Debug)]
#[command(name = "summarize-edges")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Summarize one or more edge logs
    Summarize {
        /// Path to the edge log file(s)
        #[arg(required = true)]
        logs: Vec<PathBuf>,

        /// Log format
        #[arg(short, long, value_enum, default_value_t = TraceFormat::Unstructured)]
        format: TraceFormat,

        /// Write the summary to this file instead of printing a table
        #[arg(short, long, visible_alias = "csv")]
        output: Option<PathBuf>,

        /// Export file encoding
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        export_format: ExportFormat,

        /// Append a per-log total column (unstructured logs only)
        #[arg(long)]
        total: bool,

        /// TOML file with the edge kinds to match, in order
        #[arg(long, env = "EDGE_SUMMARY_KINDS")]
        kinds: Option<PathBuf>,

        /// Logs are gzip-compressed
        #[arg(long)]
        gzip: bool,
    },

    /// Validate a CSV summary export
    Validate {
        /// Path to the export file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display the edge kinds used for classification
    Kinds {
        /// TOML file with the edge kinds to match, in order
        #[arg(long, env = "EDGE_SUMMARY_KINDS")]
        kinds: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Summarize {
            logs,
            format,
            output,
            export_format,
            total,
            kinds,
            gzip,
        } => {
            let args = SummarizeArgs {
                logs,
                format,
                output,
                export_format,
                include_total: total,
                kinds_file: kinds,
                compressed: gzip,
            };

            // Validate args first
            validate_args(&args)?;

            execute_summarize(&args)?;
        }

        Commands::Validate { file } => {
            validate_export_file(file)?;
        }

        Commands::Kinds { kinds } => {
            display_kinds(kinds)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
