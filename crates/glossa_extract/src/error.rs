//! Extraction failures.

use camino::Utf8PathBuf;
use glossa_syntax::ParseError;
use thiserror::Error;

/// Why a file contributed no records.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The source could not be parsed.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// File being extracted.
        path: Utf8PathBuf,
        /// Underlying parse failure with its position.
        #[source]
        source: ParseError,
    },
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File being read.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// A structured marker or component has no `message`.
    #[error("{path}:{line}:{column}: `{marker}` is missing a message")]
    MissingMessage {
        /// File being extracted.
        path: Utf8PathBuf,
        /// Name of the offending call or component.
        marker: String,
        /// One-based line of the marker.
        line: usize,
        /// Zero-based column of the marker.
        column: usize,
    },
    /// No extractor accepts the file's extension.
    #[error("no extractor handles {path}")]
    Unsupported {
        /// File that was skipped.
        path: Utf8PathBuf,
    },
    /// An include pattern is not a valid glob.
    #[error("invalid include pattern `{pattern}`: {source}")]
    Pattern {
        /// Pattern as configured.
        pattern: String,
        /// Underlying glob failure.
        #[source]
        source: glob::PatternError,
    },
}

impl ExtractError {
    /// Path of the file the failure concerns, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::Parse { path, .. }
            | Self::Io { path, .. }
            | Self::MissingMessage { path, .. }
            | Self::Unsupported { path } => Some(path),
            Self::Pattern { .. } => None,
        }
    }
}
