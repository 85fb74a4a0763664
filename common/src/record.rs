//! Extracted message records.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::message_id::{MessageId, generate_message_id};
use crate::span::SourceLocation;

/// Where an extracted message was found.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Origin {
    /// Path of the source file, as passed to the extractor.
    pub file: Utf8PathBuf,
    /// One-based line of the matched node.
    pub line: usize,
    /// Zero-based column of the matched node.
    pub column: usize,
}

impl Origin {
    /// Build an origin from a file path and a resolved location.
    #[must_use]
    pub fn new(file: impl Into<Utf8PathBuf>, location: SourceLocation) -> Self {
        Self {
            file: file.into(),
            line: location.line(),
            column: location.column(),
        }
    }
}

/// One message found during extraction.
///
/// Records are immutable once built. The id is always derived from
/// `message` and `context`, never from `comment`, so equal message/context
/// pairs anywhere in a project share one catalog entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    id: MessageId,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
    origin: Origin,
}

impl MessageRecord {
    /// Build a record, deriving its id from `message` and `context`.
    ///
    /// Empty context and comment strings are normalised to `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use glossa_common::{MessageRecord, Origin, SourceLocation};
    ///
    /// let origin = Origin::new("src/App.svelte", SourceLocation::new(4, 2));
    /// let record = MessageRecord::new("right", Some("direction"), None, origin);
    /// assert_eq!(record.id().as_str(), "d1wX4r");
    /// ```
    #[must_use]
    pub fn new(
        message: impl Into<String>,
        context: Option<&str>,
        comment: Option<&str>,
        origin: Origin,
    ) -> Self {
        let message = message.into();
        let context = non_empty(context);
        let comment = non_empty(comment);
        Self {
            id: generate_message_id(&message, context.as_deref()),
            message,
            context,
            comment,
            origin,
        }
    }

    /// Catalog key of the message.
    #[must_use]
    pub const fn id(&self) -> &MessageId {
        &self.id
    }

    /// Source-language message text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Disambiguating context, if any.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Note for translators, if any.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Source position of the call site.
    #[must_use]
    pub const fn origin(&self) -> &Origin {
        &self.origin
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|text| !text.is_empty()).map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn origin() -> Origin {
        Origin::new("src/lib/App.svelte", SourceLocation::new(3, 7))
    }

    #[rstest]
    fn comment_does_not_affect_the_id(origin: Origin) {
        let plain = MessageRecord::new("right", Some("correct"), None, origin.clone());
        let commented = MessageRecord::new(
            "right",
            Some("correct"),
            Some("Comment for translator"),
            origin,
        );
        assert_eq!(plain.id(), commented.id());
        assert_eq!(commented.comment(), Some("Comment for translator"));
    }

    #[rstest]
    fn empty_context_is_dropped(origin: Origin) {
        let record = MessageRecord::new("hello", Some(""), Some(""), origin);
        assert_eq!(record.context(), None);
        assert_eq!(record.comment(), None);
        assert_eq!(record.id().as_str(), "WfCysZ");
    }

    #[rstest]
    fn serialises_without_absent_fields(origin: Origin) {
        let record = MessageRecord::new("hello", None, None, origin);
        let json = serde_json::to_value(&record).expect("record should serialise");
        assert_eq!(
            json,
            serde_json::json!({
                "id": "WfCysZ",
                "message": "hello",
                "origin": { "file": "src/lib/App.svelte", "line": 3, "column": 7 }
            })
        );
    }
}
