//! Resolution and catalog loading failures.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Why a descriptor could not be resolved.
///
/// A missing translation is never an error; resolution falls back to the
/// source text instead.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// A structured descriptor has an empty `message`.
    #[error("message descriptor has an empty `message`")]
    MissingMessage,
    /// Template chunks and arguments do not interleave.
    #[error("template has {chunks} chunks for {args} arguments; expected exactly one more chunk")]
    TemplateArity {
        /// Number of literal chunks.
        chunks: usize,
        /// Number of substituted arguments.
        args: usize,
    },
    /// A plural message did not parse or had no branch for the count.
    #[error("invalid plural message `{message}`: {reason}")]
    InvalidPlural {
        /// The offending message text.
        message: String,
        /// What was wrong with it.
        reason: &'static str,
    },
}

/// Why a catalog could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The locale tag cannot name a catalog file.
    #[error("`{locale}` is not a usable locale tag")]
    InvalidLocale {
        /// The rejected tag.
        locale: String,
    },
    /// The catalog file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    Io {
        /// Catalog path.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The catalog file is not a JSON object of strings.
    #[error("failed to parse catalog {path}: {source}")]
    Json {
        /// Catalog path.
        path: Utf8PathBuf,
        /// Underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },
}
