//! Static extraction of translatable messages.
//!
//! Source files are parsed with `glossa_syntax` and walked for the call-site
//! shapes that mark messages:
//!
//! - a tagged template such as ``gt`Hello ${name}` ``;
//! - a structured call such as `msg({ message: 'Right', context: 'direction' })`;
//! - a plural call such as `gPlural(count, { one: '# item', other: '# items' })`,
//!   or a plural definition taking the variations alone;
//! - in component templates, an inline component such as `<T msg="Hello" />`.
//!
//! Each match becomes a [`MessageRecord`](glossa_common::MessageRecord) keyed
//! exactly as the runtime will look it up. [`extract_files`] runs extraction
//! over many files and contains per-file failures.

mod batch;
mod error;
mod extractor;
mod names;
mod recognizer;

pub use batch::{BatchReport, FileFailure, collect_inputs, extract_files};
pub use error::ExtractError;
pub use extractor::{
    Extractor, Extractors, SCRIPT_EXTENSIONS, ScriptExtractor, TEMPLATE_EXTENSION,
    TemplateExtractor, extract_source,
};
pub use names::RecognizedNames;

#[cfg(test)]
mod tests;
