//! The `extract` command.
//!
//! Configuration is resolved first, then inputs are collected and extracted
//! in a batch. Records from every readable file are written even when some
//! files fail; the failures are reported and turn into a non-zero exit.

use std::fs;
use std::io::Write;

use camino::Utf8Path;
use glossa::{CONFIG_FILE_NAME, SharedConfig};
use glossa_extract::{BatchReport, collect_inputs, extract_files};
use log::debug;

use crate::cli::ExtractArgs;
use crate::error::{CliError, Result};
use crate::output::{ExtractionDocument, summary_message};
use crate::write_stderr_line;

const LOG_TARGET: &str = "glossa::cli";

/// Resolve the configuration named by `--config`, or `glossa.toml` in
/// `working_dir` when it exists, or the defaults.
///
/// # Errors
///
/// Returns [`CliError::Config`] when the chosen file cannot be loaded.
pub fn resolve_config(args: &ExtractArgs, working_dir: &Utf8Path) -> Result<SharedConfig> {
    if let Some(path) = &args.config {
        debug!(target: LOG_TARGET, "loading configuration from {path}");
        return Ok(SharedConfig::load_from(path)?);
    }
    let discovered = working_dir.join(CONFIG_FILE_NAME);
    if discovered.is_file() {
        debug!(target: LOG_TARGET, "loading configuration from {discovered}");
        return Ok(SharedConfig::load_from(&discovered)?);
    }
    debug!(target: LOG_TARGET, "no configuration file; using defaults");
    Ok(SharedConfig::default())
}

/// Run `glossa extract` relative to `working_dir`.
///
/// # Errors
///
/// Returns [`CliError::NoInputs`] when no input is named, the configuration
/// and write failures of the run, and [`CliError::FailedFiles`] after
/// writing when any file could not be extracted.
pub fn run_extract(args: &ExtractArgs, working_dir: &Utf8Path, stderr: &mut dyn Write) -> Result<()> {
    let config = resolve_config(args, working_dir)?;
    let patterns: Vec<String> = if args.paths.is_empty() {
        config.include.clone()
    } else {
        args.paths.clone()
    };
    if patterns.is_empty() {
        return Err(CliError::NoInputs);
    }
    let patterns: Vec<String> = patterns
        .iter()
        .map(|pattern| anchor(working_dir, pattern))
        .collect();

    let extractors = config.extractors();
    let inputs = collect_inputs(&extractors, &patterns)?;
    let jobs = args.jobs.map_or_else(|| config.jobs(), usize::from);
    if !args.quiet {
        write_stderr_line(
            stderr,
            format!("Extracting {} file(s) with {jobs} worker(s)...", inputs.len()),
        );
    }
    let report = extract_files(&extractors, &inputs, jobs);
    report_failures(&report, stderr);

    let output = working_dir.join(args.output.as_deref().unwrap_or_else(|| config.output()));
    write_document(&config, &report, &output)?;
    if !args.quiet {
        write_stderr_line(
            stderr,
            summary_message(report.records.len(), report.files - report.failures.len(), &output),
        );
    }

    if report.is_clean() {
        Ok(())
    } else {
        Err(CliError::FailedFiles {
            count: report.failures.len(),
        })
    }
}

/// Interpret relative patterns against `working_dir`.
fn anchor(working_dir: &Utf8Path, pattern: &str) -> String {
    if Utf8Path::new(pattern).is_absolute() {
        pattern.to_owned()
    } else {
        working_dir.join(pattern).into_string()
    }
}

fn report_failures(report: &BatchReport, stderr: &mut dyn Write) {
    for failure in &report.failures {
        write_stderr_line(stderr, format!("warning: {}", failure.error));
    }
}

fn write_document(config: &SharedConfig, report: &BatchReport, output: &Utf8Path) -> Result<()> {
    let document = ExtractionDocument {
        source_locale: config.source_locale(),
        locales: config.locales(),
        messages: &report.records,
    };
    let mut json = serde_json::to_string_pretty(&document)?;
    json.push('\n');
    let write_error = |source| CliError::Write {
        path: output.to_path_buf(),
        source,
    };
    if let Some(parent) = output.parent()
        && !parent.as_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(output, json).map_err(write_error)
}
