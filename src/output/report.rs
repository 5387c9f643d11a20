//! Report rows built from a count table.
//!
//! The same logical rows feed the console table and every export format.

use crate::aggregator::CountTable;
use crate::parser::schema::{format_address, Classification};
use crate::utils::config::{
    COLUMN_COUNT, COLUMN_SOURCE, COLUMN_TOTAL, FIELD_BASE_ADDR, FIELD_CUR_ADDR, FIELD_PREV_ADDR,
    FIELD_SHARED_OBJECT,
};

/// Shape of the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportLayout {
    /// One row per source, one column per edge kind (in configured order)
    Kinds {
        labels: Vec<String>,
        include_total: bool,
    },
    /// One row per (source, edge key)
    Edges,
}

/// A single report cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Count(u64),
}

impl Cell {
    /// Cell as it appears in text outputs
    pub fn render(&self) -> String {
        match self {
            Cell::Text(text) => text.clone(),
            Cell::Count(count) => count.to_string(),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Cell::Count(_))
    }
}

/// One report row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    /// Source the row belongs to
    pub source: String,

    /// Cells in column order (the first is always the source)
    pub cells: Vec<Cell>,

    /// Number of edge occurrences this row accounts for
    pub occurrences: u64,
}

/// Rendered-independent report: header plus rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub columns: Vec<String>,
    pub rows: Vec<ReportRow>,
}

impl Report {
    /// Build report rows from a populated count table
    ///
    /// **Public** - main entry point for rendering
    pub fn build(table: &CountTable, layout: &ReportLayout) -> Self {
        match layout {
            ReportLayout::Kinds {
                labels,
                include_total,
            } => build_kind_report(table, labels, *include_total),
            ReportLayout::Edges => build_edge_report(table),
        }
    }

    /// Occurrences per source, in row order
    pub fn source_totals(&self) -> Vec<(String, u64)> {
        let mut totals: Vec<(String, u64)> = Vec::new();

        for row in &self.rows {
            match totals.iter_mut().find(|(source, _)| *source == row.source) {
                Some((_, total)) => *total += row.occurrences,
                None => totals.push((row.source.clone(), row.occurrences)),
            }
        }

        totals
    }
}

/// **Private** - one row per source, zero-filled for unseen kinds
fn build_kind_report(table: &CountTable, labels: &[String], include_total: bool) -> Report {
    let mut columns = Vec::with_capacity(labels.len() + 2);
    columns.push(COLUMN_SOURCE.to_string());
    columns.extend(labels.iter().cloned());
    if include_total {
        columns.push(COLUMN_TOTAL.to_string());
    }

    let rows = table
        .sources()
        .map(|(source, counts)| {
            let mut cells = Vec::with_capacity(columns.len());
            cells.push(Cell::Text(source.to_string()));

            let mut occurrences = 0;
            for label in labels {
                let count = counts.get(&Classification::Kind(label.clone()));
                occurrences += count;
                cells.push(Cell::Count(count));
            }

            if include_total {
                cells.push(Cell::Count(counts.total()));
            }

            ReportRow {
                source: source.to_string(),
                cells,
                occurrences,
            }
        })
        .collect();

    Report { columns, rows }
}

/// **Private** - one row per distinct edge, in first-seen order
fn build_edge_report(table: &CountTable) -> Report {
    let columns = [
        COLUMN_SOURCE,
        FIELD_SHARED_OBJECT,
        FIELD_BASE_ADDR,
        FIELD_PREV_ADDR,
        FIELD_CUR_ADDR,
        COLUMN_COUNT,
    ]
    .iter()
    .map(|c| c.to_string())
    .collect();

    let mut rows = Vec::new();
    for (source, counts) in table.sources() {
        for (key, count) in counts.iter() {
            let Classification::Edge(edge) = key else {
                continue;
            };

            rows.push(ReportRow {
                source: source.to_string(),
                cells: vec![
                    Cell::Text(source.to_string()),
                    Cell::Text(edge.module.clone()),
                    Cell::Text(format_address(edge.base_address)),
                    Cell::Text(format_address(edge.prev_address)),
                    Cell::Text(format_address(edge.cur_address)),
                    Cell::Count(count),
                ],
                occurrences: count,
            });
        }
    }

    Report { columns, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::EdgeKey;
    use pretty_assertions::assert_eq;

    fn labels() -> Vec<String> {
        vec!["return".to_string(), "switch".to_string()]
    }

    #[test]
    fn test_kind_report_zero_fills() {
        let mut table = CountTable::new();
        table.record("a.log", Classification::kind("switch"));
        table.register_source("empty.log");

        let report = Report::build(
            &table,
            &ReportLayout::Kinds {
                labels: labels(),
                include_total: true,
            },
        );

        assert_eq!(report.columns, vec!["source", "return", "switch", "total"]);
        assert_eq!(report.rows.len(), 2);
        assert_eq!(
            report.rows[0].cells,
            vec![
                Cell::Text("a.log".to_string()),
                Cell::Count(0),
                Cell::Count(1),
                Cell::Count(1)
            ]
        );
        assert_eq!(
            report.rows[1].cells,
            vec![
                Cell::Text("empty.log".to_string()),
                Cell::Count(0),
                Cell::Count(0),
                Cell::Count(0)
            ]
        );
    }

    #[test]
    fn test_kind_report_without_total() {
        let mut table = CountTable::new();
        table.record("a.log", Classification::kind("return"));

        let report = Report::build(
            &table,
            &ReportLayout::Kinds {
                labels: labels(),
                include_total: false,
            },
        );

        assert_eq!(report.columns, vec!["source", "return", "switch"]);
        assert_eq!(report.rows[0].cells.len(), 3);
    }

    #[test]
    fn test_edge_report() {
        let mut table = CountTable::new();
        let key = Classification::Edge(EdgeKey::new("libc.so", 0x1000, 0x10, 0x20));
        table.record("e.csv", key.clone());
        table.record("e.csv", key);

        let report = Report::build(&table, &ReportLayout::Edges);

        assert_eq!(
            report.columns,
            vec!["source", "shared_object", "base_addr", "prev_addr", "cur_addr", "count"]
        );
        assert_eq!(report.rows.len(), 1);
        let rendered: Vec<String> = report.rows[0].cells.iter().map(Cell::render).collect();
        assert_eq!(rendered, vec!["e.csv", "libc.so", "0x1000", "0x10", "0x20", "2"]);
        assert_eq!(report.source_totals(), vec![("e.csv".to_string(), 2)]);
    }
}
