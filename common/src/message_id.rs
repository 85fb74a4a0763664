//! Stable short identifiers for catalog entries.
//!
//! The extractor writes catalog entries under these identifiers and the
//! runtime recomputes them to look translations up, so both sides must derive
//! an id from a message and its optional context in exactly the same way:
//!
//! 1. join `message`, [`UNIT_SEPARATOR`], and `context` (empty when absent);
//! 2. hash the UTF-8 bytes with SHA-256;
//! 3. encode the digest with the standard base64 alphabet;
//! 4. keep the first [`MESSAGE_ID_LEN`] characters.
//!
//! Truncation makes collisions possible on very large catalogs. Existing
//! catalogs depend on this exact pipeline, so it must not change.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Separator placed between the message and its context before hashing.
pub const UNIT_SEPARATOR: char = '\u{1f}';

/// Number of base64 characters retained from the encoded digest.
pub const MESSAGE_ID_LEN: usize = 6;

/// Short identifier keying a message in a catalog.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Return the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for MessageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<MessageId> for String {
    fn from(value: MessageId) -> Self {
        value.0
    }
}

/// Derive the catalog identifier for `message` within `context`.
///
/// An absent context and an empty context produce the same identifier.
///
/// # Examples
///
/// ```
/// use glossa_common::generate_message_id;
///
/// assert_eq!(generate_message_id("hello", None).as_str(), "WfCysZ");
/// assert_eq!(
///     generate_message_id("hello", Some("")),
///     generate_message_id("hello", None),
/// );
/// ```
#[must_use]
pub fn generate_message_id(message: &str, context: Option<&str>) -> MessageId {
    let mut separator = [0_u8; 4];
    let mut hasher = Sha256::new();
    hasher.update(message.as_bytes());
    hasher.update(UNIT_SEPARATOR.encode_utf8(&mut separator).as_bytes());
    hasher.update(context.unwrap_or_default().as_bytes());

    let mut encoded = STANDARD.encode(hasher.finalize());
    // The base64 alphabet is ASCII, so truncating by bytes keeps whole chars.
    encoded.truncate(MESSAGE_ID_LEN);
    MessageId(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("hello", None, "WfCysZ")]
    #[case("hello {0}", None, "6uab1l")]
    #[case("John", None, "KFXip/")]
    #[case("right", Some("direction"), "d1wX4r")]
    #[case("right", Some("correct"), "7RmZ+T")]
    #[case("", None, "/+Z5u4")]
    #[case(
        "{num, plural, one {There is # item.} other {There are # items.}}",
        Some("messages"),
        "liQRLu"
    )]
    fn matches_published_catalog_keys(
        #[case] message: &str,
        #[case] context: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(generate_message_id(message, context).as_str(), expected);
    }

    #[rstest]
    fn is_deterministic_across_calls() {
        let first = generate_message_id("Hello World", Some("greeting"));
        let second = generate_message_id("Hello World", Some("greeting"));
        assert_eq!(first, second);
    }

    #[rstest]
    fn empty_context_matches_missing_context() {
        assert_eq!(
            generate_message_id("Hello World", Some("")),
            generate_message_id("Hello World", None)
        );
    }

    #[rstest]
    fn context_distinguishes_identical_messages() {
        assert_ne!(
            generate_message_id("right", Some("direction")),
            generate_message_id("right", Some("correct"))
        );
    }

    #[rstest]
    fn separator_prevents_boundary_collisions() {
        assert_ne!(
            generate_message_id("ab", Some("c")),
            generate_message_id("a", Some("bc"))
        );
    }

    #[rstest]
    fn ids_have_fixed_length() {
        for message in ["", "a", "a much longer message with unicode: こんにちは"] {
            assert_eq!(generate_message_id(message, None).as_str().len(), MESSAGE_ID_LEN);
        }
    }

    #[rstest]
    fn serialises_as_a_plain_string() {
        let id = generate_message_id("hello", None);
        let json = serde_json::to_string(&id).expect("id should serialise");
        assert_eq!(json, "\"WfCysZ\"");
    }
}
