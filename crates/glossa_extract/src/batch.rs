//! Extraction across many files.
//!
//! Files are independent, so they are spread across scoped worker threads.
//! Outcomes are merged back in input order, which keeps the report identical
//! whatever the job count. A file that fails is recorded in the report and
//! logged; it never stops the batch.

use std::collections::BTreeSet;
use std::fs;
use std::panic;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use camino::{Utf8Path, Utf8PathBuf};
use glossa_common::MessageRecord;
use log::{debug, warn};

use crate::error::ExtractError;
use crate::extractor::Extractors;

const LOG_TARGET: &str = "glossa::extract";

/// A file that contributed no records, and why.
#[derive(Debug)]
pub struct FileFailure {
    /// File that failed.
    pub path: Utf8PathBuf,
    /// What went wrong.
    pub error: ExtractError,
}

/// Combined outcome of a batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Records from every successful file, in input then walk order.
    pub records: Vec<MessageRecord>,
    /// Files that failed, in input order.
    pub failures: Vec<FileFailure>,
    /// Number of files attempted.
    pub files: usize,
}

impl BatchReport {
    /// Whether every file was extracted.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

type Outcome = Result<Vec<MessageRecord>, ExtractError>;

/// Extract every file in `paths` using up to `jobs` worker threads.
///
/// A `jobs` of zero is treated as one. Unreadable, unparseable, or
/// unsupported files are reported in [`BatchReport::failures`] and logged at
/// `warn`.
#[must_use]
pub fn extract_files(extractors: &Extractors, paths: &[Utf8PathBuf], jobs: usize) -> BatchReport {
    let workers = jobs.clamp(1, paths.len().max(1));
    let outcomes = if workers == 1 {
        paths
            .iter()
            .map(|path| extract_file(extractors, path))
            .collect()
    } else {
        extract_parallel(extractors, paths, workers)
    };

    let mut report = BatchReport {
        files: paths.len(),
        ..BatchReport::default()
    };
    for (path, outcome) in paths.iter().zip(outcomes) {
        match outcome {
            Ok(records) => report.records.extend(records),
            Err(error) => {
                warn!(target: LOG_TARGET, "skipping {path}: {error}");
                report.failures.push(FileFailure {
                    path: path.clone(),
                    error,
                });
            }
        }
    }
    debug!(
        target: LOG_TARGET,
        "extracted {} records from {} files ({} failed, {workers} workers)",
        report.records.len(),
        report.files,
        report.failures.len(),
    );
    report
}

fn extract_parallel(extractors: &Extractors, paths: &[Utf8PathBuf], workers: usize) -> Vec<Outcome> {
    let next = AtomicUsize::new(0);
    let mut indexed: Vec<(usize, Outcome)> = thread::scope(|scope| {
        let mut handles = Vec::with_capacity(workers);
        for _ in 0..workers {
            handles.push(scope.spawn(|| drain_queue(extractors, paths, &next)));
        }
        handles
            .into_iter()
            .flat_map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|payload| panic::resume_unwind(payload))
            })
            .collect()
    });
    indexed.sort_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, outcome)| outcome).collect()
}

/// Claim files from the shared cursor until none are left.
fn drain_queue(
    extractors: &Extractors,
    paths: &[Utf8PathBuf],
    next: &AtomicUsize,
) -> Vec<(usize, Outcome)> {
    let mut done = Vec::new();
    loop {
        let index = next.fetch_add(1, Ordering::Relaxed);
        let Some(path) = paths.get(index) else {
            return done;
        };
        done.push((index, extract_file(extractors, path)));
    }
}

fn extract_file(extractors: &Extractors, path: &Utf8Path) -> Outcome {
    if extractors.for_path(path).is_none() {
        return Err(ExtractError::Unsupported {
            path: path.to_path_buf(),
        });
    }
    let source = fs::read_to_string(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    extractors.extract_source(path, &source)
}

/// Expand include patterns into the supported files they match.
///
/// Each pattern is a glob; an existing directory stands for every file
/// beneath it. Files no extractor handles are dropped, and each path is kept
/// once, at its first match.
///
/// # Errors
///
/// Returns [`ExtractError::Pattern`] for a malformed glob.
pub fn collect_inputs(
    extractors: &Extractors,
    patterns: &[String],
) -> Result<Vec<Utf8PathBuf>, ExtractError> {
    let mut seen = BTreeSet::new();
    let mut inputs = Vec::new();
    for pattern in patterns {
        let expanded = if Utf8Path::new(pattern).is_dir() {
            format!("{}/**/*", glob::Pattern::escape(pattern.trim_end_matches('/')))
        } else {
            pattern.clone()
        };
        let entries = glob::glob(&expanded).map_err(|source| ExtractError::Pattern {
            pattern: pattern.clone(),
            source,
        })?;
        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(error) => {
                    warn!(target: LOG_TARGET, "skipping unreadable match of `{pattern}`: {error}");
                    continue;
                }
            };
            let path = match Utf8PathBuf::from_path_buf(path) {
                Ok(path) => path,
                Err(path) => {
                    warn!(target: LOG_TARGET, "skipping non-UTF-8 path {}", path.display());
                    continue;
                }
            };
            if path.is_file() && extractors.for_path(&path).is_some() && seen.insert(path.clone())
            {
                inputs.push(path);
            }
        }
    }
    debug!(target: LOG_TARGET, "collected {} input files", inputs.len());
    Ok(inputs)
}
