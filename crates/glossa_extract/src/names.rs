//! Callee and component names that mark messages.

/// Names the recognisers look for in one dialect.
///
/// Matching is by exact identifier; member calls such as `store.gt` are not
/// recognised.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecognizedNames {
    /// Tags and callees for plain, templated, and structured messages.
    pub messages: Vec<String>,
    /// Callees taking a count and then the plural variations.
    pub plurals: Vec<String>,
    /// Callees taking the plural variations as their only argument.
    pub plural_definitions: Vec<String>,
    /// Components carrying `msg`, `ctx`, and `cmt` attributes.
    pub components: Vec<String>,
}

impl RecognizedNames {
    /// Defaults for component templates.
    ///
    /// # Examples
    ///
    /// ```
    /// use glossa_extract::RecognizedNames;
    ///
    /// let names = RecognizedNames::template();
    /// assert!(names.is_message("$t"));
    /// assert!(names.is_plural("$plural"));
    /// assert!(names.is_component("T"));
    /// ```
    #[must_use]
    pub fn template() -> Self {
        Self {
            messages: owned(&["$t", "msg"]),
            plurals: owned(&["$plural"]),
            plural_definitions: owned(&["msgPlural"]),
            components: owned(&["T"]),
        }
    }

    /// Defaults for plain scripts.
    #[must_use]
    pub fn script() -> Self {
        Self {
            messages: owned(&["gt", "msg"]),
            plurals: owned(&["gPlural"]),
            plural_definitions: owned(&["msgPlural"]),
            components: Vec::new(),
        }
    }

    /// Whether `name` marks a message.
    #[must_use]
    pub fn is_message(&self, name: &str) -> bool {
        contains(&self.messages, name)
    }

    /// Whether `name` is a plural call.
    #[must_use]
    pub fn is_plural(&self, name: &str) -> bool {
        contains(&self.plurals, name)
    }

    /// Whether `name` is a plural definition.
    #[must_use]
    pub fn is_plural_definition(&self, name: &str) -> bool {
        contains(&self.plural_definitions, name)
    }

    /// Whether `name` is a message component.
    #[must_use]
    pub fn is_component(&self, name: &str) -> bool {
        contains(&self.components, name)
    }
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_owned()).collect()
}

fn contains(names: &[String], name: &str) -> bool {
    names.iter().any(|candidate| candidate == name)
}
