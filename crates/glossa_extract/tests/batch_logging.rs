//! Failure containment and logging in the batch driver.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use glossa_extract::{ExtractError, Extractors, extract_files};
use glossa_syntax::{MAX_NESTING, ParseErrorKind};
use log::Level;
use logtest::Logger;
use rstest::rstest;
use tempfile::TempDir;

fn write(root: &Utf8Path, name: &str, contents: &str) -> Utf8PathBuf {
    let path = root.join(name);
    fs::write(&path, contents).expect("write fixture file");
    path
}

#[rstest]
fn failures_are_contained_and_logged() {
    let mut logger = Logger::start();
    let dir = TempDir::new().expect("create temporary directory");
    let root = Utf8Path::from_path(dir.path()).expect("temporary directory should be UTF-8");
    let paths = vec![
        write(root, "broken.ts", "call(gt`fine`"),
        write(root, "ok.ts", "gt`fine`"),
        root.join("missing.js"),
        write(root, "notes.txt", "gt`ignored`"),
    ];

    let report = extract_files(&Extractors::default(), &paths, 2);

    assert_eq!(report.files, 4);
    assert_eq!(report.records.len(), 1);
    assert!(!report.is_clean());
    let kinds: Vec<_> = report
        .failures
        .iter()
        .map(|failure| match failure.error {
            ExtractError::Parse { .. } => "parse",
            ExtractError::Io { .. } => "io",
            ExtractError::Unsupported { .. } => "unsupported",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["parse", "io", "unsupported"]);

    let mut warnings = Vec::new();
    while let Some(record) = logger.pop() {
        if record.level() == Level::Warn
            && record.target() == "glossa::extract"
            && record.args().to_string().contains(root.as_str())
        {
            warnings.push(record.args().to_string());
        }
    }
    assert_eq!(warnings.len(), 3, "unexpected warnings: {warnings:?}");
    assert!(
        warnings
            .first()
            .is_some_and(|warning| warning.contains("broken.ts")),
        "unexpected warnings: {warnings:?}"
    );
}

// `Logger::start` installs a process-wide logger, so only the test above
// captures records. Each test filters by its own temporary directory.
#[rstest]
#[case(1)]
#[case(2)]
fn deeply_nested_files_fail_without_stopping_the_batch(#[case] jobs: usize) {
    let dir = TempDir::new().expect("create temporary directory");
    let root = Utf8Path::from_path(dir.path()).expect("temporary directory should be UTF-8");
    let nested = format!("{}x{}", "(".repeat(100_000), ")".repeat(100_000));
    let paths = vec![
        write(root, "deep.js", &nested),
        write(root, "ok.js", "gt`fine`"),
    ];

    let report = extract_files(&Extractors::default(), &paths, jobs);

    assert_eq!(report.files, 2);
    assert_eq!(report.records.len(), 1);
    let [failure] = report.failures.as_slice() else {
        panic!("expected one failure, got {:?}", report.failures);
    };
    assert_eq!(failure.path.file_name(), Some("deep.js"));
    assert!(
        matches!(
            &failure.error,
            ExtractError::Parse { source, .. }
                if source.kind() == &ParseErrorKind::NestingTooDeep { limit: MAX_NESTING }
        ),
        "unexpected failure: {:?}",
        failure.error
    );
}
