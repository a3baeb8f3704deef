use std::fs;

use oracle_progress::{parse_file, score_marker, LogParser, ProgressError, ORACLE_MARKER};

fn write_log(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn two_records_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let body = format!(
        "loading model\n\
         {score}2.5\n{ORACLE_MARKER}10\n\
         epoch 2\n\
         {score}4.0\n{ORACLE_MARKER}20\n",
        score = score_marker("logp"),
    );
    let path = write_log(&dir, "output_logp.txt", &body);
    let map = parse_file(&path, "logp").unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get(10), Some(2.5));
    assert_eq!(map.get(20), Some(4.0));
}

#[test]
fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = parse_file(dir.path().join("nope.txt"), "logp").unwrap_err();
    match err {
        ProgressError::FileNotFound { path } => assert!(path.ends_with("nope.txt")),
        other => panic!("expected FileNotFound, got {other:?}"),
    }
}

#[test]
fn empty_file_gives_empty_map() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_log(&dir, "empty.txt", "");
    assert!(parse_file(&path, "logp").unwrap().is_empty());
}

#[test]
fn truncated_log_fails_whole_parse() {
    let dir = tempfile::tempdir().unwrap();
    let body = format!(
        "{s}1.0\n{ORACLE_MARKER}5\n{s}2.0",
        s = score_marker("logp")
    );
    let path = write_log(&dir, "cut.txt", &body);
    let err = parse_file(&path, "logp").unwrap_err();
    assert!(matches!(err, ProgressError::TruncatedRecord { line: 3 }));
}

#[test]
fn interleaved_tasks_only_match_label() {
    let parser = LogParser::new("ranolazine_mpo").unwrap();
    let body = format!(
        "{a}0.1\n{ORACLE_MARKER}4\n{b}0.7\n{ORACLE_MARKER}8\n",
        a = score_marker("logp"),
        b = score_marker("ranolazine_mpo"),
    );
    let map = parser.parse_str(&body).unwrap();
    assert_eq!(map.oracle_calls(), vec![8]);
    assert_eq!(parser.task_label(), "ranolazine_mpo");
}

#[test]
fn repeated_call_count_last_write_wins() {
    let body = format!(
        "{s}1.0\n{ORACLE_MARKER}5\n{s}3.0\n{ORACLE_MARKER}9\n{s}2.0\n{ORACLE_MARKER}5\n",
        s = score_marker("logp")
    );
    let map = LogParser::new("logp").unwrap().parse_str(&body).unwrap();
    assert_eq!(map.oracle_calls(), vec![5, 9]);
    assert_eq!(map.get(5), Some(2.0));
}

#[test]
fn plot_log_without_outputs_returns_data() {
    let dir = tempfile::tempdir().unwrap();
    let body = format!("{}3.0\n{ORACLE_MARKER}4\n", score_marker("logp"));
    let path = write_log(&dir, "run.txt", &body);
    let opts = oracle_progress::PlotOptions {
        output: None,
        show: false,
        ..Default::default()
    };
    let data = oracle_progress::plot_log(&path, "logp", Some(4.52), &opts).unwrap();
    assert_eq!(data.calls, vec![4]);
    assert_eq!(data.best_in_set, Some(4.52));
    assert_eq!(data.standard_error, None);
    assert_eq!(
        data.expanded.unwrap().scores,
        vec![0.0, 0.0, 0.0, 3.0]
    );
}

#[test]
fn huge_call_count_parses_but_does_not_expand() {
    let body = format!("{}2.5\n{ORACLE_MARKER}18446744073709551615\n", score_marker("logp"));
    let map = LogParser::new("logp").unwrap().parse_str(&body).unwrap();
    assert_eq!(map.max_oracle_calls(), Some(u64::MAX));
    assert!(matches!(map.expand(), Err(ProgressError::InvalidPoint(_))));
}

#[test]
fn trailing_text_is_a_parse_error() {
    let body = format!("{}2.5 (new best!)\n{ORACLE_MARKER}10\n", score_marker("logp"));
    let err = LogParser::new("logp").unwrap().parse_str(&body).unwrap_err();
    assert!(matches!(err, ProgressError::Parse { line: 1, .. }));
}
