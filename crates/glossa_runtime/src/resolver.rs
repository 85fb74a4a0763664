//! Descriptor resolution against one locale snapshot.

use glossa_common::{PluralVariations, canonical_template, compile_plural, generate_message_id};

use crate::descriptor::MessageDescriptor;
use crate::error::ResolveError;
use crate::interpolate::interpolate;
use crate::plural::format_plural;
use crate::store::LocaleState;

/// Resolves descriptors against one consistent locale snapshot.
///
/// Resolution is pure: it reads the snapshot and never changes it. A message
/// missing from the catalog resolves to its source text.
#[derive(Clone, Copy, Debug)]
pub struct Resolver<'s> {
    state: &'s LocaleState,
}

impl<'s> Resolver<'s> {
    /// Resolve against `state`.
    #[must_use]
    pub const fn new(state: &'s LocaleState) -> Self {
        Self { state }
    }

    /// Produce display text for `descriptor`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::MissingMessage`] for a structured descriptor
    /// with an empty message and [`ResolveError::InvalidPlural`] when a
    /// plural message cannot be evaluated.
    pub fn resolve(&self, descriptor: &MessageDescriptor) -> Result<String, ResolveError> {
        match descriptor {
            MessageDescriptor::Text(text) => Ok(self.lookup(text, None).to_owned()),
            MessageDescriptor::Structured(structured) => {
                if structured.message.is_empty() {
                    return Err(ResolveError::MissingMessage);
                }
                Ok(self
                    .lookup(&structured.message, structured.context.as_deref())
                    .to_owned())
            }
            MessageDescriptor::Template(template) => {
                let canonical = canonical_template(template.chunks());
                Ok(interpolate(self.lookup(&canonical, None), template.args()))
            }
            MessageDescriptor::Plural { count, variations } => {
                self.resolve_plural(*count, variations)
            }
        }
    }

    /// Produce display text for `count` under `variations`.
    ///
    /// The variations are compiled into an ICU plural message, which is
    /// looked up and then evaluated for `count`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidPlural`] when the chosen message does
    /// not parse or has no branch for `count`.
    pub fn resolve_plural(
        &self,
        count: f64,
        variations: &PluralVariations,
    ) -> Result<String, ResolveError> {
        let canonical = compile_plural(variations);
        format_plural(self.lookup(&canonical, None), count, self.state.plural_rules())
    }

    fn lookup<'a>(&'a self, message: &'a str, context: Option<&str>) -> &'a str {
        let id = generate_message_id(message, context);
        self.state.catalog().get(id.as_str()).unwrap_or(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::descriptor::{Structured, Template};
    use rstest::{fixture, rstest};

    #[fixture]
    fn japanese() -> LocaleState {
        LocaleState::new(
            "ja",
            Catalog::from_messages([
                ("hello", None, "こんにちは"),
                ("hello {0}", None, "こんにちは {0}"),
                ("John", None, "ジョン"),
                ("right", Some("direction"), "右"),
                ("right", Some("correct"), "正しい"),
                ("{num, plural, one {# item} other {# items}}", None, "{num, plural, other {#個}}"),
                ("{num, plural, other {broken}}", None, "{num, plural, other {oops}"),
            ]),
        )
    }

    #[fixture]
    fn empty() -> LocaleState {
        LocaleState::new("en", Catalog::new())
    }

    fn text(value: &str) -> MessageDescriptor {
        MessageDescriptor::from(value)
    }

    #[rstest]
    fn falls_back_to_source_text(empty: LocaleState) {
        let resolver = Resolver::new(&empty);
        assert_eq!(resolver.resolve(&text("hello")).as_deref(), Ok("hello"));
    }

    #[rstest]
    fn translates_plain_text(japanese: LocaleState) {
        let resolver = Resolver::new(&japanese);
        assert_eq!(resolver.resolve(&text("hello")).as_deref(), Ok("こんにちは"));
    }

    #[rstest]
    fn interpolates_translated_templates(japanese: LocaleState) {
        let resolver = Resolver::new(&japanese);
        let name = resolver.resolve(&text("John")).expect("plain text resolves");
        let template = Template::new(["hello ", ""], [name]).expect("arity matches");
        assert_eq!(
            resolver.resolve(&template.into()).as_deref(),
            Ok("こんにちは ジョン")
        );
    }

    #[rstest]
    fn untranslated_templates_still_interpolate(empty: LocaleState) {
        let template = Template::new(["", " of ", ""], ["{1}", "3"]).expect("arity matches");
        assert_eq!(
            Resolver::new(&empty).resolve(&template.into()).as_deref(),
            Ok("{1} of 3")
        );
    }

    #[rstest]
    fn context_selects_the_entry_and_comment_is_ignored(japanese: LocaleState) {
        let resolver = Resolver::new(&japanese);
        let direction = Structured::new("right")
            .with_context("direction")
            .with_comment("Arrow label");
        let correct = Structured::new("right").with_context("correct");
        assert_eq!(resolver.resolve(&direction.into()).as_deref(), Ok("右"));
        assert_eq!(resolver.resolve(&correct.into()).as_deref(), Ok("正しい"));
        assert_eq!(
            resolver.resolve(&Structured::new("right").into()).as_deref(),
            Ok("right")
        );
    }

    #[rstest]
    fn empty_structured_messages_are_rejected(empty: LocaleState) {
        assert_eq!(
            Resolver::new(&empty).resolve(&Structured::new("").into()),
            Err(ResolveError::MissingMessage)
        );
    }

    #[rstest]
    #[case(1.0, "1 item")]
    #[case(2.0, "2 items")]
    #[case(0.0, "0 items")]
    fn plural_round_trip_in_english(empty: LocaleState, #[case] count: f64, #[case] expected: &str) {
        let variations = PluralVariations::from([("one", "# item"), ("other", "# items")]);
        let descriptor = MessageDescriptor::Plural { count, variations };
        assert_eq!(
            Resolver::new(&empty).resolve(&descriptor).as_deref(),
            Ok(expected)
        );
    }

    #[rstest]
    fn exact_match_takes_precedence(empty: LocaleState) {
        let variations = PluralVariations::from([
            ("one", "# item"),
            ("=5", "five exactly"),
            ("other", "# items"),
        ]);
        let resolver = Resolver::new(&empty);
        assert_eq!(resolver.resolve_plural(5.0, &variations).as_deref(), Ok("five exactly"));
        assert_eq!(resolver.resolve_plural(4.0, &variations).as_deref(), Ok("4 items"));
    }

    #[rstest]
    fn plural_translations_use_the_active_locale_rules(japanese: LocaleState) {
        let variations = PluralVariations::from([("one", "# item"), ("other", "# items")]);
        assert_eq!(
            Resolver::new(&japanese).resolve_plural(1.0, &variations).as_deref(),
            Ok("1個")
        );
    }

    #[rstest]
    fn broken_plural_translations_are_reported(japanese: LocaleState) {
        let variations = PluralVariations::from([("other", "broken")]);
        assert!(matches!(
            Resolver::new(&japanese).resolve_plural(2.0, &variations),
            Err(ResolveError::InvalidPlural { .. })
        ));
    }
}
