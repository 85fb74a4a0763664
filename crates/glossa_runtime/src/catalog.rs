//! Translations keyed by message id.

use std::collections::BTreeMap;

use glossa_common::{MessageId, generate_message_id};
use serde::{Deserialize, Serialize};

/// Mapping from message id to translated text.
///
/// Serialises as a flat JSON object, e.g. `{"WfCysZ": "こんにちは"}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: BTreeMap<String, String>,
}

impl Catalog {
    /// An empty catalog.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Build a catalog from `(message, context, translation)` triples, keying
    /// each entry exactly as the resolver will.
    ///
    /// # Examples
    ///
    /// ```
    /// use glossa_runtime::Catalog;
    ///
    /// let catalog = Catalog::from_messages([("hello", None, "こんにちは")]);
    /// assert_eq!(catalog.get("WfCysZ"), Some("こんにちは"));
    /// ```
    #[must_use]
    pub fn from_messages<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>, &'a str)>,
    {
        entries
            .into_iter()
            .map(|(message, context, translation)| {
                (generate_message_id(message, context), translation.to_owned())
            })
            .collect()
    }

    /// Add or replace a translation, returning the previous one.
    pub fn insert(&mut self, id: impl Into<String>, translation: impl Into<String>) -> Option<String> {
        self.entries.insert(id.into(), translation.into())
    }

    /// Translation stored under `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    /// Number of translations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no translations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(id, translation)| (id.as_str(), translation.as_str()))
    }
}

impl FromIterator<(MessageId, String)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (MessageId, String)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(id, translation)| (id.into_inner(), translation))
                .collect(),
        }
    }
}
