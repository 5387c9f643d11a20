use crate::output::read_export;
use crate::parser::ClassifierConfig;
use crate::utils::config::EXPORT_SCHEMA_VERSION;
use anyhow::Result;
use colored::*;
use std::path::PathBuf;

/// Validate a CSV summary export and print its per-source totals
pub fn validate_export_file(file_path: PathBuf) -> Result<()> {
    println!("Validating export: {}", file_path.display());

    let summary = read_export(&file_path)?;

    println!("{}", "✓ Valid summary export".green());
    println!("  Columns: {}", summary.columns.join(", "));
    println!("  Rows: {}", summary.rows);
    println!("  Sources: {}", summary.source_totals.len());
    for (source, total) in &summary.source_totals {
        println!("    {}: {} edges", source, total);
    }

    Ok(())
}

/// Display the active edge kinds in match order
pub fn display_kinds(kinds_file: Option<PathBuf>) -> Result<()> {
    let config = match &kinds_file {
        Some(path) => ClassifierConfig::load(path)?,
        None => ClassifierConfig::default(),
    };

    match &kinds_file {
        Some(path) => println!("Edge kinds from {} (first match wins):", path.display()),
        None => println!("Built-in edge kinds (first match wins):"),
    }

    for (i, kind) in config.kinds.iter().enumerate() {
        println!("  {}. {:<22} /{}/", i + 1, kind.label, kind.pattern);
    }

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("Edge Summary v{}", env!("CARGO_PKG_VERSION"));
    println!("Export Schema: v{}", EXPORT_SCHEMA_VERSION);
    println!();
    println!("Summarizes control-flow edge logs from instrumented binaries.");
}
