use edge_summary::aggregator::{aggregate_file, source_id, CountTable};
use edge_summary::commands::{build_summary, SummarizeArgs};
use edge_summary::output::{read_export, render_table, write_export, Cell, ExportFormat};
use edge_summary::parser::{
    ClassifierConfig, EdgeClassifier, EdgeKindPattern, ReadOptions, TraceFormat,
};
use edge_summary::utils::SummaryError;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn cell_values(cells: &[Cell]) -> Vec<String> {
    cells.iter().map(Cell::render).collect()
}

#[test]
fn test_scenario_unstructured_counts() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_file(
        &dir,
        "a.log",
        "f: conditional branch edge to 0x1\n\
         g: conditional branch edge to 0x2\n\
         h: return edge to 0x3\n\
         i: garbage edge to 0x4\n",
    );

    let args = SummarizeArgs {
        logs: vec![log.clone()],
        include_total: true,
        ..Default::default()
    };
    let (table, report) = build_summary(&args).unwrap();

    assert_eq!(
        report.columns,
        vec![
            "source",
            "direct-call",
            "indirect-call",
            "return",
            "conditional-branch",
            "unconditional-branch",
            "switch",
            "unknown-edge",
            "total"
        ]
    );
    assert_eq!(
        cell_values(&report.rows[0].cells),
        vec![log.display().to_string(), "0".into(), "0".into(), "1".into(), "2".into(), "0".into(), "0".into(), "0".into(), "3".into()]
    );

    let stats = table.get(&source_id(&log)).unwrap().stats();
    assert_eq!(stats.records_read, 4);
    assert_eq!(stats.unmatched, 1);
}

#[test]
fn test_scenario_structured_duplicate_rows() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_file(
        &dir,
        "edges.csv",
        "shared_object,base_addr,prev_addr,cur_addr\n\
         libc.so,0x1000,0x10,0x20\n\
         libc.so,0x1000,0x10,0x20\n",
    );

    let args = SummarizeArgs {
        logs: vec![log.clone()],
        format: TraceFormat::Structured,
        ..Default::default()
    };
    let (_, report) = build_summary(&args).unwrap();

    assert_eq!(report.rows.len(), 1);
    assert_eq!(
        cell_values(&report.rows[0].cells),
        vec![log.display().to_string(), "libc.so".into(), "0x1000".into(), "0x10".into(), "0x20".into(), "2".into()]
    );
}

#[test]
fn test_scenario_unmatched_source_still_listed() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_file(&dir, "first.log", "f: switch edge to 0x1\n");
    let second = write_file(&dir, "second.log", "nothing\nto see\n");

    let args = SummarizeArgs {
        logs: vec![first, second.clone()],
        ..Default::default()
    };
    let (_, report) = build_summary(&args).unwrap();

    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.rows[1].source, second.display().to_string());
    assert!(report.rows[1].cells[1..].iter().all(|c| *c == Cell::Count(0)));
}

#[test]
fn test_scenario_missing_required_field() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_file(
        &dir,
        "edges.csv",
        "shared_object,base_addr,prev_addr\nlibc.so,0x1000,0x10\n",
    );
    let classifier = EdgeClassifier::with_defaults().unwrap();
    let mut table = CountTable::new();

    let result = aggregate_file(
        &mut table,
        &classifier,
        &log,
        ReadOptions::new(TraceFormat::Structured),
    );

    assert!(matches!(result, Err(SummaryError::MalformedRecord { line: 1, .. })));
    assert_eq!(table.source_total(&source_id(&log)), 0);
}

#[test]
fn test_missing_input_fails_run() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_file(&dir, "good.log", "f: return edge\n");

    let args = SummarizeArgs {
        logs: vec![good, dir.path().join("missing.log")],
        ..Default::default()
    };
    let err = build_summary(&args).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<SummaryError>(),
        Some(SummaryError::InputNotFound { .. })
    ));
}

#[test]
fn test_counts_never_exceed_lines() {
    let dir = tempfile::tempdir().unwrap();
    let lines = [
        "a: direct call edge",
        "b: indirect call edge",
        "c: return edge",
        "d: nothing",
        "e: unconditional branch edge",
        "",
        "f: switch edge",
        "g: unknown edge here",
    ];
    let log = write_file(&dir, "mixed.log", &lines.join("\n"));

    let args = SummarizeArgs {
        logs: vec![log.clone()],
        ..Default::default()
    };
    let (table, _) = build_summary(&args).unwrap();

    let counts = table.get(&source_id(&log)).unwrap();
    let stats = counts.stats();
    assert_eq!(stats.records_read, lines.len() as u64);
    assert_eq!(counts.total(), stats.records_read - stats.unmatched);
    assert_eq!(counts.total(), 6);
}

#[test]
fn test_custom_kinds_order() {
    let dir = tempfile::tempdir().unwrap();
    let kinds = write_file(
        &dir,
        "kinds.toml",
        "[[kinds]]\nlabel = \"call\"\npattern = \"call\"\n\n[[kinds]]\nlabel = \"indirect\"\npattern = \"indirect\"\n",
    );
    let log = write_file(&dir, "a.log", "f: indirect call edge\n");

    let args = SummarizeArgs {
        logs: vec![log],
        kinds_file: Some(kinds),
        ..Default::default()
    };
    let (_, report) = build_summary(&args).unwrap();

    assert_eq!(report.columns, vec!["source", "call", "indirect"]);
    assert_eq!(report.rows[0].cells[1..].to_vec(), vec![Cell::Count(1), Cell::Count(0)]);
}

#[test]
fn test_reserved_kind_label_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let kinds = write_file(
        &dir,
        "kinds.toml",
        "[[kinds]]\nlabel = \"count\"\npattern = \"call\"\n\n[[kinds]]\nlabel = \"ret\"\npattern = \"return\"\n",
    );
    let log = write_file(&dir, "a.log", "x call\ny return\nz return\n");

    let args = SummarizeArgs {
        logs: vec![log],
        kinds_file: Some(kinds),
        include_total: true,
        ..Default::default()
    };
    let err = build_summary(&args).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<SummaryError>(),
        Some(SummaryError::InvalidPattern { label, .. }) if label == "count"
    ));
}

#[test]
fn test_signed_address_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_file(&dir, "edges.csv", "prev_addr,cur_addr\n0x+10,16\n");

    let args = SummarizeArgs {
        logs: vec![log],
        format: TraceFormat::Structured,
        ..Default::default()
    };
    let err = build_summary(&args).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<SummaryError>(),
        Some(SummaryError::MalformedRecord { line: 2, .. })
    ));
}

#[test]
fn test_independent_classifiers() {
    let first = EdgeClassifier::new(&ClassifierConfig::new(vec![
        EdgeKindPattern::new("a", "x"),
    ]))
    .unwrap();
    let second = EdgeClassifier::new(&ClassifierConfig::new(vec![
        EdgeKindPattern::new("b", "x"),
    ]))
    .unwrap();

    assert_eq!(first.labels().collect::<Vec<_>>(), vec!["a"]);
    assert_eq!(second.labels().collect::<Vec<_>>(), vec!["b"]);
}

#[test]
fn test_export_idempotent_and_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_file(
        &dir,
        "one.csv",
        "shared_object,base_addr,prev_addr,cur_addr\n\
         \"lib, with comma.so\",0x1000,0x10,0x20\n\
         libc.so,4096,16,32\n\
         libc.so,0x1000,0x10,0x20\n",
    );
    let second = write_file(&dir, "two.csv", "prev_addr,cur_addr\n1,2\n");

    let args = SummarizeArgs {
        logs: vec![first.clone(), second.clone()],
        format: TraceFormat::Structured,
        ..Default::default()
    };

    let out_a = dir.path().join("a.csv");
    let out_b = dir.path().join("b.csv");

    let (_, report) = build_summary(&args).unwrap();
    write_export(&report, &out_a, ExportFormat::Csv).unwrap();
    let (table, report) = build_summary(&args).unwrap();
    write_export(&report, &out_b, ExportFormat::Csv).unwrap();

    assert_eq!(fs::read(&out_a).unwrap(), fs::read(&out_b).unwrap());

    let summary = read_export(&out_a).unwrap();
    assert_eq!(summary.rows, 3);
    assert_eq!(
        summary.source_totals,
        vec![
            (source_id(&first), table.source_total(&source_id(&first))),
            (source_id(&second), table.source_total(&source_id(&second))),
        ]
    );
    assert_eq!(summary.source_totals[0].1, 3);
}

#[test]
fn test_kind_export_round_trip_with_total() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_file(&dir, "a.log", "f: return edge\ng: switch edge\nh: return edge\n");

    let args = SummarizeArgs {
        logs: vec![log.clone()],
        include_total: true,
        ..Default::default()
    };
    let (table, report) = build_summary(&args).unwrap();

    let out = dir.path().join("kinds.csv");
    write_export(&report, &out, ExportFormat::Csv).unwrap();

    let summary = read_export(&out).unwrap();
    assert_eq!(
        summary.source_totals,
        vec![(source_id(&log), table.source_total(&source_id(&log)))]
    );
}

#[test]
fn test_failed_export_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_file(&dir, "a.log", "f: return edge\n");
    let args = SummarizeArgs {
        logs: vec![log],
        ..Default::default()
    };
    let (_, report) = build_summary(&args).unwrap();

    // A regular file where the parent directory should be
    let blocker = write_file(&dir, "blocker", "");
    let out = blocker.join("summary.csv");

    let result = write_export(&report, &out, ExportFormat::Csv);

    assert!(matches!(result, Err(SummaryError::OutputWriteFailed { .. })));
    assert!(!Path::new(&out).exists());
}

#[test]
fn test_console_table_lists_every_source() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_file(&dir, "a.log", "f: return edge\n");
    let args = SummarizeArgs {
        logs: vec![log.clone()],
        ..Default::default()
    };
    let (_, report) = build_summary(&args).unwrap();

    let rendered = render_table(&report, false);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("source"));
    assert!(lines[2].starts_with(&log.display().to_string()));
}
