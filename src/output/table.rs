//! Console table rendering.

use super::report::Report;
use colored::*;

/// Render a report as a column-aligned table
///
/// Text cells are left-aligned and counts right-aligned. When `styled` is
/// set the header is printed in bold.
pub fn render_table(report: &Report, styled: bool) -> String {
    let widths = column_widths(report);
    let mut out = String::new();

    let header: Vec<String> = report
        .columns
        .iter()
        .zip(&widths)
        .map(|(name, width)| format!("{:<width$}", name, width = *width))
        .collect();
    let header = header.join("  ");
    if styled {
        out.push_str(&header.trim_end().bold().to_string());
    } else {
        out.push_str(header.trim_end());
    }
    out.push('\n');

    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&separator.join("  "));
    out.push('\n');

    for row in &report.rows {
        let line: Vec<String> = row
            .cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| {
                if cell.is_numeric() {
                    format!("{:>width$}", cell.render(), width = *width)
                } else {
                    format!("{:<width$}", cell.render(), width = *width)
                }
            })
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }

    out
}

fn column_widths(report: &Report) -> Vec<usize> {
    let mut widths: Vec<usize> = report.columns.iter().map(|c| c.chars().count()).collect();

    for row in &report.rows {
        for (width, cell) in widths.iter_mut().zip(&row.cells) {
            *width = (*width).max(cell.render().chars().count());
        }
    }

    widths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::report::{Cell, ReportRow};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_alignment() {
        let report = Report {
            columns: vec!["source".to_string(), "return".to_string()],
            rows: vec![
                ReportRow {
                    source: "a.log".to_string(),
                    cells: vec![Cell::Text("a.log".to_string()), Cell::Count(3)],
                    occurrences: 3,
                },
                ReportRow {
                    source: "longer.log".to_string(),
                    cells: vec![Cell::Text("longer.log".to_string()), Cell::Count(12)],
                    occurrences: 12,
                },
            ],
        };

        let expected = "\
source      return
----------  ------
a.log            3
longer.log      12
";
        assert_eq!(render_table(&report, false), expected);
    }

    #[test]
    fn test_render_empty() {
        let report = Report {
            columns: vec!["source".to_string(), "count".to_string()],
            rows: Vec::new(),
        };

        assert_eq!(render_table(&report, false), "source  count\n------  -----\n");
    }
}
