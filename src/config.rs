//! Project configuration loaded from `glossa.toml`.
//!
//! Every field is optional. A missing file section falls back to the
//! built-in defaults, so an empty file and no file at all behave the same.
//! Unknown keys are rejected to catch typos early.

use std::fs;
use std::io;
use std::num::NonZeroUsize;
use std::thread;

use camino::{Utf8Path, Utf8PathBuf};
use glossa_common::{DEFAULT_LOCALE, normalise_locale};
use glossa_extract::{Extractors, RecognizedNames, ScriptExtractor, TemplateExtractor};
use serde::Deserialize;
use thiserror::Error;

/// File name looked up in the working directory when no path is given.
pub const CONFIG_FILE_NAME: &str = "glossa.toml";

/// Output path used when neither the file nor the caller names one.
pub const DEFAULT_OUTPUT: &str = "locales/messages.json";

/// Why the configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Configuration path.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The file is not valid configuration.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Configuration path.
        path: Utf8PathBuf,
        /// TOML failure, including the offending key.
        #[source]
        source: Box<toml::de::Error>,
    },
    /// `jobs` was set to zero.
    #[error("{path}: `jobs` must be at least 1")]
    ZeroJobs {
        /// Configuration path.
        path: Utf8PathBuf,
    },
}

/// Settings shared by the extractor and the command line.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SharedConfig {
    /// Locales the project is translated into.
    pub locales: Vec<String>,
    /// Locale the source text is written in.
    ///
    /// Blank values fall back to [`DEFAULT_LOCALE`], so `source_locale = ""`
    /// behaves like leaving the key out.
    pub source_locale: Option<String>,
    /// Glob patterns or directories to extract from.
    pub include: Vec<String>,
    /// Where extracted records are written.
    pub output: Option<Utf8PathBuf>,
    /// Worker threads used for extraction.
    pub jobs: Option<usize>,
    /// Recognised names for plain scripts.
    pub script: NameOverrides,
    /// Recognised names for component templates.
    pub template: NameOverrides,
}

impl SharedConfig {
    /// Load the configuration stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read and
    /// [`ConfigError::Parse`] or [`ConfigError::ZeroJobs`] when its contents
    /// are invalid.
    pub fn load_from(path: &Utf8Path) -> Result<Self, ConfigError> {
        Self::load_with(path, |path| fs::read_to_string(path))
    }

    /// Load the configuration for `path` with an injected reader.
    ///
    /// This is the seam used by tests to supply file contents without
    /// touching the file system.
    ///
    /// # Errors
    ///
    /// As for [`Self::load_from`].
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use glossa::SharedConfig;
    ///
    /// let config = SharedConfig::load_with(Utf8Path::new("glossa.toml"), |_| {
    ///     Ok("locales = [\"en\", \"ja\"]\njobs = 2\n".to_owned())
    /// })
    /// .expect("configuration should parse");
    /// assert_eq!(config.locales(), vec!["en", "ja"]);
    /// assert_eq!(config.jobs(), 2);
    /// ```
    pub fn load_with<F>(path: &Utf8Path, read: F) -> Result<Self, ConfigError>
    where
        F: FnOnce(&Utf8Path) -> io::Result<String>,
    {
        let text = read(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;
        if config.jobs == Some(0) {
            return Err(ConfigError::ZeroJobs {
                path: path.to_path_buf(),
            });
        }
        Ok(config)
    }

    /// Source locale, defaulting to [`DEFAULT_LOCALE`].
    #[must_use]
    pub fn source_locale(&self) -> &str {
        normalise_locale(self.source_locale.as_deref()).unwrap_or(DEFAULT_LOCALE)
    }

    /// Target locales with blanks and repeats removed, in file order.
    #[must_use]
    pub fn locales(&self) -> Vec<&str> {
        let mut locales: Vec<&str> = Vec::with_capacity(self.locales.len());
        for locale in &self.locales {
            if let Some(locale) = normalise_locale(Some(locale))
                && !locales.contains(&locale)
            {
                locales.push(locale);
            }
        }
        locales
    }

    /// Extraction output path.
    #[must_use]
    pub fn output(&self) -> &Utf8Path {
        self.output
            .as_deref()
            .unwrap_or_else(|| Utf8Path::new(DEFAULT_OUTPUT))
    }

    /// Worker count, defaulting to the available parallelism.
    #[must_use]
    pub fn jobs(&self) -> usize {
        self.jobs.unwrap_or_else(|| {
            thread::available_parallelism().map_or(1, NonZeroUsize::get)
        })
    }

    /// Extractors for both dialects with the configured names applied.
    #[must_use]
    pub fn extractors(&self) -> Extractors {
        Extractors::new(
            ScriptExtractor::new(self.script.apply(RecognizedNames::script())),
            TemplateExtractor::new(self.template.apply(RecognizedNames::template())),
        )
    }
}

/// Replacement name lists for one dialect.
///
/// Each list that is present replaces the dialect default outright.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct NameOverrides {
    /// Tags and callees for plain, templated, and structured messages.
    pub messages: Option<Vec<String>>,
    /// Callees taking a count and then the plural variations.
    pub plurals: Option<Vec<String>>,
    /// Callees taking only the plural variations.
    pub plural_definitions: Option<Vec<String>>,
    /// Message components.
    pub components: Option<Vec<String>>,
}

impl NameOverrides {
    /// Apply these overrides on top of `defaults`.
    #[must_use]
    pub fn apply(&self, defaults: RecognizedNames) -> RecognizedNames {
        let pick = |custom: &Option<Vec<String>>, default: Vec<String>| {
            custom.clone().unwrap_or(default)
        };
        RecognizedNames {
            messages: pick(&self.messages, defaults.messages),
            plurals: pick(&self.plurals, defaults.plurals),
            plural_definitions: pick(&self.plural_definitions, defaults.plural_definitions),
            components: pick(&self.components, defaults.components),
        }
    }
}
