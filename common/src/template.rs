//! Canonical text of templated messages.

/// Join template chunks with positional placeholders `{0}`, `{1}`, ….
///
/// Both the extractor and the runtime key templated messages by this text,
/// so `hello ${name}!` is catalogued as `hello {0}!`.
///
/// # Examples
///
/// ```
/// use glossa_common::canonical_template;
///
/// assert_eq!(canonical_template(&["hello ", "!"]), "hello {0}!");
/// assert_eq!(canonical_template(&["plain"]), "plain");
/// ```
#[must_use]
pub fn canonical_template<S: AsRef<str>>(chunks: &[S]) -> String {
    let mut text = String::new();
    for (position, chunk) in chunks.iter().enumerate() {
        if let Some(slot) = position.checked_sub(1) {
            text.push('{');
            text.push_str(&slot.to_string());
            text.push('}');
        }
        text.push_str(chunk.as_ref());
    }
    text
}
