//! The extraction output document and progress messages.

use camino::Utf8Path;
use glossa_common::MessageRecord;
use serde::Serialize;

/// JSON document written by `glossa extract`.
///
/// # Example
///
/// ```
/// use glossa_cli::output::ExtractionDocument;
///
/// let document = ExtractionDocument {
///     source_locale: "en",
///     locales: vec!["ja"],
///     messages: &[],
/// };
/// let json = serde_json::to_string(&document).expect("document serialises");
/// assert_eq!(json, r#"{"source_locale":"en","locales":["ja"],"messages":[]}"#);
/// ```
#[derive(Debug, Serialize)]
pub struct ExtractionDocument<'a> {
    /// Locale the messages are written in.
    pub source_locale: &'a str,
    /// Locales the project is translated into.
    pub locales: Vec<&'a str>,
    /// Every record found, in input order.
    pub messages: &'a [MessageRecord],
}

/// Summary printed after a successful extraction.
#[must_use]
pub fn summary_message(records: usize, files: usize, output: &Utf8Path) -> String {
    let noun = if records == 1 { "message" } else { "messages" };
    let file_noun = if files == 1 { "file" } else { "files" };
    format!("Extracted {records} {noun} from {files} {file_noun} to {output}")
}
