//! What application code asks to have translated.

use glossa_common::PluralVariations;

use crate::error::ResolveError;

/// A marked message awaiting resolution.
#[derive(Clone, Debug, PartialEq)]
pub enum MessageDescriptor {
    /// Literal text; it is both the lookup source and the fallback.
    Text(String),
    /// Literal chunks interleaved with argument values.
    Template(Template),
    /// Message with optional context and translator comment.
    Structured(Structured),
    /// Plural variations selected by `count`.
    Plural {
        /// The number being pluralised.
        count: f64,
        /// Sub-messages by selector.
        variations: PluralVariations,
    },
}

impl From<&str> for MessageDescriptor {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for MessageDescriptor {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Template> for MessageDescriptor {
    fn from(template: Template) -> Self {
        Self::Template(template)
    }
}

impl From<Structured> for MessageDescriptor {
    fn from(structured: Structured) -> Self {
        Self::Structured(structured)
    }
}

/// Literal chunks and the arguments substituted between them.
///
/// There is always exactly one more chunk than there are arguments, as with
/// a tagged template literal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    chunks: Vec<String>,
    args: Vec<String>,
}

impl Template {
    /// Pair `chunks` with `args`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::TemplateArity`] unless there is exactly one
    /// more chunk than arguments.
    ///
    /// # Examples
    ///
    /// ```
    /// use glossa_runtime::Template;
    ///
    /// let template = Template::new(["hello ", ""], ["John"]).expect("arity matches");
    /// assert_eq!(template.raw_text(), "hello John");
    /// assert!(Template::new(["a", "b"], Vec::<String>::new()).is_err());
    /// ```
    pub fn new<C, A>(chunks: C, args: A) -> Result<Self, ResolveError>
    where
        C: IntoIterator,
        C::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        let chunks: Vec<String> = chunks.into_iter().map(Into::into).collect();
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        if chunks.len() != args.len() + 1 {
            return Err(ResolveError::TemplateArity {
                chunks: chunks.len(),
                args: args.len(),
            });
        }
        Ok(Self { chunks, args })
    }

    /// Literal chunks.
    #[must_use]
    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    /// Argument values.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Chunks and arguments joined without translation.
    #[must_use]
    pub fn raw_text(&self) -> String {
        let mut text = String::new();
        for (position, chunk) in self.chunks.iter().enumerate() {
            if let Some(arg) = position.checked_sub(1).and_then(|slot| self.args.get(slot)) {
                text.push_str(arg);
            }
            text.push_str(chunk);
        }
        text
    }
}

/// Message with optional context and translator comment.
///
/// The comment is metadata for translators and never affects lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Structured {
    /// Source-language text.
    pub message: String,
    /// Disambiguating context.
    pub context: Option<String>,
    /// Note for translators.
    pub comment: Option<String>,
}

impl Structured {
    /// Describe `message` with no context or comment.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Attach a context.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Attach a translator comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Mark a message for extraction without translating it.
///
/// Structured descriptors pass through unchanged so they can be resolved
/// later; templates collapse to their raw joined text.
#[must_use]
pub fn msg(descriptor: impl Into<MessageDescriptor>) -> MessageDescriptor {
    match descriptor.into() {
        MessageDescriptor::Template(template) => MessageDescriptor::Text(template.raw_text()),
        other => other,
    }
}

/// Mark plural variations for extraction without resolving them.
#[must_use]
pub fn msg_plural(variations: PluralVariations) -> PluralVariations {
    variations
}
