//! Tests for loading questionnaire data from disk.

use std::io::Write;
use std::path::PathBuf;

use rankbayes::data::{load_likert_csv, parse_values, DataError, LikertScale};
use rankbayes_core::RankTestError;
use tempfile::NamedTempFile;

fn demo_csv() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/likability_pre_post.csv")
}

const PRE: [&str; 3] = ["pre_1", "pre_2", "pre_3"];
const POST: [&str; 3] = ["post_1", "post_2", "post_3"];

#[test]
fn demo_data_loads() {
    let table = load_likert_csv(&demo_csv(), LikertScale::new(1, 7)).unwrap();
    assert_eq!(table.n_rows(), 22);
    assert_eq!(table.headers()[0], "id", "byte-order mark must be stripped");

    let sample = table.paired(&POST, &PRE).unwrap();
    assert_eq!(sample.len(), 22);
    // Respondent 1: post (5+5+6)/3, pre (3+4+3)/3
    assert!((sample.x()[0] - 16.0 / 3.0).abs() < 1e-12);
    assert!((sample.y()[0] - 10.0 / 3.0).abs() < 1e-12);
}

#[test]
fn demo_data_rejects_narrow_scale() {
    // Loading succeeds; responses are checked when items are read
    let table = load_likert_csv(&demo_csv(), LikertScale::new(1, 5)).unwrap();
    assert_eq!(table.n_rows(), 22);

    match table.paired(&POST, &PRE) {
        Err(DataError::OutOfScale { column, value, .. }) => {
            assert!(column.starts_with("post_"));
            assert!(value > 5.0);
        }
        other => panic!("Expected OutOfScale error, got {:?}", other),
    }
}

#[test]
fn id_column_beyond_scale_does_not_block_loading() {
    let table = load_likert_csv(&demo_csv(), LikertScale::new(1, 7)).unwrap();
    let ids = table.headers().iter().position(|h| h == "id").unwrap();
    assert_eq!(ids, 0);
    assert!(matches!(
        table.column("id"),
        Err(DataError::OutOfScale { line: 9, .. })
    ));
}

#[test]
fn unknown_item_lists_available_columns() {
    let table = load_likert_csv(&demo_csv(), LikertScale::default()).unwrap();
    match table.paired(&["post_9"], &["pre_1"]) {
        Err(DataError::UnknownColumn { name, available }) => {
            assert_eq!(name, "post_9");
            assert!(available.iter().any(|h| h == "post_1"));
        }
        other => panic!("Expected UnknownColumn error, got {:?}", other),
    }
}

#[test]
fn incomplete_respondents_are_dropped_pairwise() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "pre_a,pre_b,post_a,post_b").unwrap();
    writeln!(file, "3,4,5,5").unwrap();
    writeln!(file, "2,NA,4,4").unwrap();
    writeln!(file, "4,4,,6").unwrap();
    writeln!(file, "1,2,3,3").unwrap();
    file.flush().unwrap();

    let table = load_likert_csv(file.path(), LikertScale::default()).unwrap();
    let sample = table.paired(&["post_a", "post_b"], &["pre_a", "pre_b"]).unwrap();
    assert_eq!(sample.x(), &[5.0, 3.0]);
    assert_eq!(sample.y(), &[3.5, 1.5]);
}

#[test]
fn everyone_incomplete_is_insufficient() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "pre,post").unwrap();
    writeln!(file, "3,").unwrap();
    writeln!(file, ",4").unwrap();
    file.flush().unwrap();

    let table = load_likert_csv(file.path(), LikertScale::default()).unwrap();
    assert!(matches!(
        table.paired(&["post"], &["pre"]),
        Err(DataError::Sample(RankTestError::InsufficientData { .. }))
    ));
}

#[test]
fn parse_values_accepts_mixed_separators() {
    assert_eq!(
        parse_values("1, 2;3  4.5\n-1").unwrap(),
        vec![1.0, 2.0, 3.0, 4.5, -1.0]
    );
    assert!(matches!(
        parse_values("1, two, 3"),
        Err(DataError::InvalidValue { .. })
    ));
}

#[test]
fn missing_file_is_io_error() {
    let path = PathBuf::from("/nonexistent/rankbayes/responses.csv");
    assert!(matches!(
        load_likert_csv(&path, LikertScale::default()),
        Err(DataError::Io(_))
    ));
}
