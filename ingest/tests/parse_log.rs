use nvbench_ingest::{parse_file, ConfigKey, IngestError, ParserOptions, SKIPPED_KEY};
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn parses_recorded_results_file() {
    let report = parse_file(&fixture("list_versions.log"), &ParserOptions::default()).unwrap();

    let counter = ConfigKey::new("List", "Auto", "persist_counter", 1000, 20, 4).to_string();
    let throughput = report.throughput.get(&counter).unwrap();
    assert_eq!(throughput.mean, 10.0);
    assert_eq!(throughput.stddev, 2.0);

    let flushes = report.flushes.get(&counter).unwrap();
    assert_eq!(flushes.mean, 1.0);
    assert_eq!(flushes.stddev, 0.5);

    assert_eq!(
        report.throughput.mean(&ConfigKey::original("List", 1000, 20, 4).to_string()),
        Some(20.0)
    );
    assert_eq!(
        report.flushes.mean("List_Manual_persist_simple_1000s_20up_4th"),
        Some(6.0)
    );
    assert_eq!(report.throughput.mean(SKIPPED_KEY), Some(0.0));

    assert_eq!(report.axes.versions, ["Original", "Auto", "Manual"]);
    assert_eq!(report.axes.primary_version(), Some("Auto"));
    assert_eq!(
        report.irregular_trials(2),
        vec![
            ("List_Manual_persist_simple_1000s_20up_4th".to_owned(), 1),
            ("List_Original_1000s_20up_4th".to_owned(), 1),
        ]
    );
}

#[test]
fn missing_results_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.txt");

    match parse_file(&missing, &ParserOptions::default()) {
        Err(IngestError::ReadResults { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected read error, got {other:?}"),
    }
}
