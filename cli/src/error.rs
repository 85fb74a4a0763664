//! Error types for the `glossa` CLI.
//!
//! Each variant renders as a single line suitable for stderr, with a hint
//! where the fix is not obvious.

use camino::Utf8PathBuf;
use glossa::ConfigError;
use glossa_extract::ExtractError;
use thiserror::Error;

/// Errors that end a CLI run.
#[derive(Debug, Error)]
pub enum CliError {
    /// The configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An include pattern was malformed.
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// Neither the command line nor the configuration named any inputs.
    #[error("no input paths; pass PATH arguments or set `include` in glossa.toml")]
    NoInputs,

    /// The output file could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Output path.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Records could not be serialised.
    #[error("failed to serialise message records: {0}")]
    Serialise(#[from] serde_json::Error),

    /// Some files could not be extracted; the rest were written.
    #[error("{count} file(s) could not be extracted; see the warnings above")]
    FailedFiles {
        /// Number of failed files.
        count: usize,
    },
}

/// Result type alias using [`CliError`].
pub type Result<T> = std::result::Result<T, CliError>;
