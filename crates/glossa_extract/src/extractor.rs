//! Dialect-specific extractors.

use std::fmt;

use camino::Utf8Path;
use glossa_common::MessageRecord;
use glossa_syntax::{Passthrough, Preprocessor, parse_script, parse_template_with};

use crate::error::ExtractError;
use crate::names::RecognizedNames;
use crate::recognizer::Recognizer;

/// File extensions handled by [`ScriptExtractor`].
pub const SCRIPT_EXTENSIONS: &[&str] = &["js", "mjs", "cjs", "ts", "mts", "cts"];

/// File extension handled by [`TemplateExtractor`].
pub const TEMPLATE_EXTENSION: &str = "svelte";

/// Finds message markers in one source dialect.
pub trait Extractor: Send + Sync {
    /// Whether this extractor handles `path`.
    fn matches(&self, path: &Utf8Path) -> bool;

    /// Parse `source` and pass every record found to `emit`, in walk order.
    ///
    /// Records are only emitted once the whole file has been walked, so a
    /// failing file emits nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Parse`] when `source` cannot be parsed and
    /// [`ExtractError::MissingMessage`] when a structured marker has no
    /// message.
    fn extract(
        &self,
        path: &Utf8Path,
        source: &str,
        emit: &mut dyn FnMut(MessageRecord),
    ) -> Result<(), ExtractError>;
}

fn emit_all(records: Vec<MessageRecord>, emit: &mut dyn FnMut(MessageRecord)) {
    for record in records {
        emit(record);
    }
}

fn has_extension(path: &Utf8Path, extensions: &[&str]) -> bool {
    path.extension()
        .is_some_and(|extension| extensions.contains(&extension))
}

/// Extractor for plain script files.
#[derive(Clone, Debug)]
pub struct ScriptExtractor {
    names: RecognizedNames,
}

impl ScriptExtractor {
    /// Build an extractor recognising `names`.
    #[must_use]
    pub const fn new(names: RecognizedNames) -> Self {
        Self { names }
    }

    /// Names this extractor recognises.
    #[must_use]
    pub const fn names(&self) -> &RecognizedNames {
        &self.names
    }
}

impl Default for ScriptExtractor {
    fn default() -> Self {
        Self::new(RecognizedNames::script())
    }
}

impl Extractor for ScriptExtractor {
    fn matches(&self, path: &Utf8Path) -> bool {
        has_extension(path, SCRIPT_EXTENSIONS)
    }

    fn extract(
        &self,
        path: &Utf8Path,
        source: &str,
        emit: &mut dyn FnMut(MessageRecord),
    ) -> Result<(), ExtractError> {
        let root = parse_script(source).map_err(|source| ExtractError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        emit_all(Recognizer::new(&self.names, path).run(&root)?, emit);
        Ok(())
    }
}

/// Extractor for component templates.
pub struct TemplateExtractor {
    names: RecognizedNames,
    preprocessor: Box<dyn Preprocessor + Send + Sync>,
}

impl TemplateExtractor {
    /// Build an extractor recognising `names`, without preprocessing.
    #[must_use]
    pub fn new(names: RecognizedNames) -> Self {
        Self {
            names,
            preprocessor: Box::new(Passthrough),
        }
    }

    /// Run `preprocessor` over every template before parsing it.
    #[must_use]
    pub fn with_preprocessor<P>(mut self, preprocessor: P) -> Self
    where
        P: Preprocessor + Send + Sync + 'static,
    {
        self.preprocessor = Box::new(preprocessor);
        self
    }

    /// Names this extractor recognises.
    #[must_use]
    pub const fn names(&self) -> &RecognizedNames {
        &self.names
    }
}

impl Default for TemplateExtractor {
    fn default() -> Self {
        Self::new(RecognizedNames::template())
    }
}

impl fmt::Debug for TemplateExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateExtractor")
            .field("names", &self.names)
            .finish_non_exhaustive()
    }
}

impl Extractor for TemplateExtractor {
    fn matches(&self, path: &Utf8Path) -> bool {
        has_extension(path, &[TEMPLATE_EXTENSION])
    }

    fn extract(
        &self,
        path: &Utf8Path,
        source: &str,
        emit: &mut dyn FnMut(MessageRecord),
    ) -> Result<(), ExtractError> {
        let root = parse_template_with(source, self.preprocessor.as_ref()).map_err(|source| {
            ExtractError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        emit_all(Recognizer::new(&self.names, path).run(&root)?, emit);
        Ok(())
    }
}

/// The script and template extractors, dispatched by file extension.
#[derive(Debug, Default)]
pub struct Extractors {
    script: ScriptExtractor,
    template: TemplateExtractor,
}

impl Extractors {
    /// Combine a script and a template extractor.
    #[must_use]
    pub const fn new(script: ScriptExtractor, template: TemplateExtractor) -> Self {
        Self { script, template }
    }

    /// The extractor that handles `path`, if any.
    #[must_use]
    pub fn for_path(&self, path: &Utf8Path) -> Option<&dyn Extractor> {
        if self.template.matches(path) {
            Some(&self.template)
        } else if self.script.matches(path) {
            Some(&self.script)
        } else {
            None
        }
    }

    /// Extract records from one in-memory file.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Unsupported`] when no extractor handles
    /// `path`, and otherwise whatever the matching extractor reports.
    pub fn extract_source(
        &self,
        path: &Utf8Path,
        source: &str,
    ) -> Result<Vec<MessageRecord>, ExtractError> {
        let extractor = self
            .for_path(path)
            .ok_or_else(|| ExtractError::Unsupported {
                path: path.to_path_buf(),
            })?;
        let mut records = Vec::new();
        extractor.extract(path, source, &mut |record| records.push(record))?;
        Ok(records)
    }
}

/// Extract records from one in-memory file using the default names.
///
/// # Errors
///
/// See [`Extractors::extract_source`].
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use glossa_extract::extract_source;
///
/// let records = extract_source(Utf8Path::new("greet.ts"), "gt`hello ${name}`")
///     .expect("extraction should succeed");
/// assert_eq!(records[0].message(), "hello {0}");
/// ```
pub fn extract_source(path: &Utf8Path, source: &str) -> Result<Vec<MessageRecord>, ExtractError> {
    Extractors::default().extract_source(path, source)
}
