//! Plural variation sets and their ICU message form.
//!
//! A plural call site supplies an ordered set of selectors (`one`, `other`,
//! `=0`, ...) mapped to sub-messages. [`compile_plural`] folds that set into
//! one ICU plural message such as `{num, plural, one {# item} other {# items}}`.
//! The compiled string is the message whose id keys the catalog entry, and
//! the runtime evaluator parses the same shape back.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Argument name used in compiled plural messages.
pub const PLURAL_ARGUMENT: &str = "num";

/// CLDR plural categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PluralCategory {
    /// `zero`
    Zero,
    /// `one`
    One,
    /// `two`
    Two,
    /// `few`
    Few,
    /// `many`
    Many,
    /// `other`, the mandatory fallback.
    Other,
}

impl PluralCategory {
    /// Return the CLDR keyword for the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::One => "one",
            Self::Two => "two",
            Self::Few => "few",
            Self::Many => "many",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PluralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when a selector is neither a CLDR keyword nor `=N`.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unrecognised plural selector `{selector}`")]
pub struct SelectorError {
    /// The rejected selector text.
    pub selector: String,
}

impl FromStr for PluralCategory {
    type Err = SelectorError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "zero" => Ok(Self::Zero),
            "one" => Ok(Self::One),
            "two" => Ok(Self::Two),
            "few" => Ok(Self::Few),
            "many" => Ok(Self::Many),
            "other" => Ok(Self::Other),
            _ => Err(SelectorError {
                selector: input.to_owned(),
            }),
        }
    }
}

/// Parsed form of a plural selector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PluralSelector {
    /// Matches when the locale's plural rules pick this category.
    Category(PluralCategory),
    /// Matches only when the number equals the value exactly (`=N`).
    Exact(f64),
}

impl FromStr for PluralSelector {
    type Err = SelectorError;

    /// Parse a selector.
    ///
    /// ```
    /// use glossa_common::{PluralCategory, PluralSelector};
    ///
    /// assert_eq!("=5".parse(), Ok(PluralSelector::Exact(5.0)));
    /// assert_eq!("few".parse(), Ok(PluralSelector::Category(PluralCategory::Few)));
    /// assert!("lots".parse::<PluralSelector>().is_err());
    /// ```
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if let Some(value) = input.strip_prefix('=') {
            return value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|number| number.is_finite())
                .map(Self::Exact)
                .ok_or_else(|| SelectorError {
                    selector: input.to_owned(),
                });
        }
        input.parse().map(Self::Category)
    }
}

/// Ordered mapping from selector to sub-message.
///
/// Order is significant: it determines the compiled message text and
/// therefore the catalog id. Inserting an existing selector replaces its text
/// without moving it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PluralVariations {
    entries: Vec<(String, String)>,
}

impl PluralVariations {
    /// Create an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert `text` under `selector`, keeping the first insertion position.
    pub fn insert(&mut self, selector: impl Into<String>, text: impl Into<String>) {
        let selector = selector.into();
        let text = text.into();
        match self.entries.iter_mut().find(|(key, _)| *key == selector) {
            Some((_, existing)) => *existing = text,
            None => self.entries.push((selector, text)),
        }
    }

    /// Builder-style [`Self::insert`].
    #[must_use]
    pub fn with(mut self, selector: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(selector, text);
        self
    }

    /// Look up the text stored for `selector`.
    #[must_use]
    pub fn get(&self, selector: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == selector)
            .map(|(_, text)| text.as_str())
    }

    /// Iterate over `(selector, text)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(selector, text)| (selector.as_str(), text.as_str()))
    }

    /// Number of selectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no selectors are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S, T> FromIterator<(S, T)> for PluralVariations
where
    S: Into<String>,
    T: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        let mut variations = Self::new();
        for (selector, text) in iter {
            variations.insert(selector, text);
        }
        variations
    }
}

impl<S, T, const N: usize> From<[(S, T); N]> for PluralVariations
where
    S: Into<String>,
    T: Into<String>,
{
    fn from(entries: [(S, T); N]) -> Self {
        entries.into_iter().collect()
    }
}

/// Compile `variations` into a single ICU plural message.
///
/// Each entry contributes ` <selector> {<text>}` in insertion order; no other
/// normalisation takes place.
///
/// # Examples
///
/// ```
/// use glossa_common::{PluralVariations, compile_plural};
///
/// let variations = PluralVariations::from([("one", "# item"), ("other", "# items")]);
/// assert_eq!(
///     compile_plural(&variations),
///     "{num, plural, one {# item} other {# items}}",
/// );
/// ```
#[must_use]
pub fn compile_plural(variations: &PluralVariations) -> String {
    let mut message = format!("{{{PLURAL_ARGUMENT}, plural,");
    for (selector, text) in variations.iter() {
        message.push(' ');
        message.push_str(selector);
        message.push_str(" {");
        message.push_str(text);
        message.push('}');
    }
    message.push('}');
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn compiles_in_insertion_order() {
        let variations = PluralVariations::new()
            .with("other", "There are # items.")
            .with("one", "There is # item.");
        assert_eq!(
            compile_plural(&variations),
            "{num, plural, other {There are # items.} one {There is # item.}}"
        );
    }

    #[rstest]
    fn exact_selectors_are_emitted_verbatim() {
        let variations = PluralVariations::from([("=5", "five items"), ("other", "# items")]);
        assert_eq!(
            compile_plural(&variations),
            "{num, plural, =5 {five items} other {# items}}"
        );
    }

    #[rstest]
    fn empty_set_compiles_to_bare_header() {
        assert_eq!(compile_plural(&PluralVariations::new()), "{num, plural,}");
    }

    #[rstest]
    fn reinserting_keeps_position() {
        let mut variations = PluralVariations::from([("one", "a"), ("other", "b")]);
        variations.insert("one", "c");
        let pairs: Vec<_> = variations.iter().collect();
        assert_eq!(pairs, vec![("one", "c"), ("other", "b")]);
    }

    #[rstest]
    #[case("zero", PluralSelector::Category(PluralCategory::Zero))]
    #[case("other", PluralSelector::Category(PluralCategory::Other))]
    #[case("=0", PluralSelector::Exact(0.0))]
    #[case("=12", PluralSelector::Exact(12.0))]
    fn parses_selectors(#[case] input: &str, #[case] expected: PluralSelector) {
        assert_eq!(input.parse::<PluralSelector>(), Ok(expected));
    }

    #[rstest]
    #[case("")]
    #[case("=")]
    #[case("=abc")]
    #[case("plenty")]
    fn rejects_unknown_selectors(#[case] input: &str) {
        assert!(input.parse::<PluralSelector>().is_err());
    }
}
