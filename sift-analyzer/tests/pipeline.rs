mod common;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use common::*;
use sift_analyzer::{
    AnalysisError, Analyzer, AnalyzerOptions, BinaryOperator, CancellationFlag, DiagnosticCode,
    ModuleIndex, SourceFile, SourceId,
};
use tempfile::tempdir;

const UNDEFINED_Y: &str = r#"{
  "path": "app/main.py",
  "source": "y\n",
  "module": {
    "body": [
      {
        "span": {"line": 1, "column": 1, "end_line": 1, "end_column": 2},
        "kind": "expression",
        "expression": {
          "span": {"line": 1, "column": 1, "end_line": 1, "end_column": 2},
          "kind": "name",
          "id": "y"
        }
      }
    ]
  }
}"#;

#[test]
fn tree_documents_load_from_disk() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("main.json");
    fs::write(&path, UNDEFINED_Y).expect("write tree");

    let file = SourceFile::load(SourceId(7), &path).expect("load tree");
    assert_eq!(file.path, PathBuf::from("app/main.py"));
    assert_eq!(file.line(1), Some("y"));

    let report = Analyzer::with_standard_stubs(AnalyzerOptions::default()).analyze(&file);
    assert_eq!(report.path, PathBuf::from("app/main.py"));
    assert_eq!(codes(&report), vec![DiagnosticCode::UndefinedName]);
    assert_eq!(file.snippet(&report.diagnostics[0].span), Some("y"));
}

const WIDE_INT: &str = r#"{
  "path": "app/big.py",
  "source": "100000000000000000000000000000\n",
  "module": {
    "body": [
      {
        "span": {"line": 1, "column": 1, "end_line": 1, "end_column": 31},
        "kind": "expression",
        "expression": {
          "span": {"line": 1, "column": 1, "end_line": 1, "end_column": 31},
          "kind": "literal",
          "value": {"int": 100000000000000000000000000000}
        }
      }
    ]
  }
}"#;

#[test]
fn int_literals_wider_than_i64_still_load() {
    let file = SourceFile::from_json_str(SourceId(3), Path::new("big.json"), WIDE_INT)
        .expect("decode wide literal");

    let report = Analyzer::with_standard_stubs(AnalyzerOptions::default()).analyze(&file);
    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
}

#[test]
fn missing_tree_files_are_read_errors() {
    let dir = tempdir().expect("tempdir");
    let error = SourceFile::load(SourceId(0), &dir.path().join("absent.json"))
        .expect_err("missing file");
    assert!(matches!(error, AnalysisError::Read { .. }));
    assert!(!error.is_cancelled());
}

#[test]
fn written_trees_decode_to_the_same_diagnostics() {
    let tree = module(vec![expr_stmt(call(name(1, 1, "print"), vec![name(1, 7, "ghost")]))]);
    let original = SourceFile::new(SourceId(1), PathBuf::from("ghost.py"), tree);
    let json = original.to_json_string().expect("encode");
    let decoded = SourceFile::from_json_str(SourceId(1), Path::new("copy.json"), &json)
        .expect("decode");

    let analyzer = Analyzer::with_standard_stubs(AnalyzerOptions::default());
    assert_eq!(analyzer.analyze(&original), analyzer.analyze(&decoded));
}

#[test]
fn project_modules_come_from_an_index_file() {
    let dir = tempdir().expect("tempdir");
    let index_path = dir.path().join("modules.json");
    fs::write(
        &index_path,
        r#"{"modules": [{"name": "helpers", "exports": {"VERSION": {"Primitive": "Str"}}}]}"#,
    )
    .expect("write index");

    let mut index = ModuleIndex::with_standard_stubs();
    index.load(&index_path).expect("load index");
    assert!(index.names().any(|name| name == "helpers"));

    // import helpers
    // helpers.VERSION + 1
    // helpers.missing
    let tree = module(vec![
        import(1, &["helpers"]),
        expr_stmt(binary(
            BinaryOperator::Add,
            attribute(name(2, 1, "helpers"), "VERSION"),
            int(2, 19, 1),
        )),
        expr_stmt(attribute(name(3, 1, "helpers"), "missing")),
    ]);

    let report = analyze_with(&tree, AnalyzerOptions::default(), index);
    assert_eq!(
        messages(&report),
        vec![
            "unsupported operand types for +: 'str' and 'int'",
            "module 'helpers' has no attribute 'missing'",
        ]
    );
}

fn batch() -> Vec<SourceFile> {
    (0..8)
        .map(|index| {
            let body = if index % 2 == 0 {
                vec![expr_stmt(name(1, 1, "missing"))]
            } else {
                vec![pass(1, 1)]
            };
            SourceFile::new(
                SourceId(index),
                PathBuf::from(format!("file_{index}.py")),
                module(body),
            )
        })
        .collect()
}

#[test]
fn batch_results_keep_input_order() {
    let files = batch();
    let analyzer = Analyzer::new(
        AnalyzerOptions::default(),
        Arc::new(ModuleIndex::with_standard_stubs()),
    );

    let results = analyzer.analyze_batch(&files, &CancellationFlag::new());
    assert_eq!(results.len(), files.len());
    for (file, result) in files.iter().zip(results) {
        let report = result.expect("not cancelled");
        assert_eq!(report.path, file.path);
        assert_eq!(report.has_errors(), file.id.0 % 2 == 0);
    }
}

#[test]
fn cancelled_batches_report_cancellation() {
    let files = batch();
    let analyzer = Analyzer::with_standard_stubs(AnalyzerOptions::default());
    let flag = CancellationFlag::new();
    let observer = flag.clone();
    flag.cancel();
    assert!(observer.is_cancelled());

    for result in analyzer.analyze_batch(&files, &flag) {
        let error = result.expect_err("cancelled");
        assert!(error.is_cancelled());
    }
}

#[test]
fn repeated_runs_are_identical() {
    let files = batch();
    let analyzer = Analyzer::with_standard_stubs(AnalyzerOptions::default());
    let first: Vec<_> = files.iter().map(|file| analyzer.analyze(file)).collect();
    let second: Vec<_> = files.iter().map(|file| analyzer.analyze(file)).collect();
    assert_eq!(first, second);
}
