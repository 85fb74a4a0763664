//! Plural rule selection and ICU plural message evaluation.
//!
//! Only the plural form is understood:
//! `{arg, plural, [offset:n] selector {text} ...}`, optionally surrounded by
//! literal text. Exact selectors (`=N`) are compared with the count itself and
//! win over categories; categories are chosen for `count - offset` and fall
//! back to `other`. Every `#` in the chosen branch becomes `count - offset`.

use std::fmt;

use glossa_common::{DEFAULT_LOCALE, PluralCategory, PluralSelector};
use intl_pluralrules::{PluralRuleType, PluralRules};
use unic_langid::LanguageIdentifier;

use crate::error::ResolveError;

/// Cardinal plural rules for one locale.
pub struct PluralRuleSet {
    locale: String,
    rules: Option<PluralRules>,
}

impl PluralRuleSet {
    /// Rules for `locale`.
    ///
    /// The full tag is tried first, then its language alone, then English.
    #[must_use]
    pub fn for_locale(locale: &str) -> Self {
        let rules = locale
            .parse::<LanguageIdentifier>()
            .ok()
            .and_then(|langid| {
                let language = LanguageIdentifier::from_parts(langid.language, None, None, &[]);
                cardinal_rules(langid).or_else(|| cardinal_rules(language))
            })
            .or_else(|| {
                DEFAULT_LOCALE
                    .parse::<LanguageIdentifier>()
                    .ok()
                    .and_then(cardinal_rules)
            });
        Self {
            locale: locale.to_owned(),
            rules,
        }
    }

    /// Plural category of `count`.
    #[must_use]
    pub fn category(&self, count: f64) -> PluralCategory {
        let selected = self
            .rules
            .as_ref()
            .and_then(|rules| rules.select(count).ok());
        match selected {
            Some(intl_pluralrules::PluralCategory::ZERO) => PluralCategory::Zero,
            Some(intl_pluralrules::PluralCategory::ONE) => PluralCategory::One,
            Some(intl_pluralrules::PluralCategory::TWO) => PluralCategory::Two,
            Some(intl_pluralrules::PluralCategory::FEW) => PluralCategory::Few,
            Some(intl_pluralrules::PluralCategory::MANY) => PluralCategory::Many,
            Some(intl_pluralrules::PluralCategory::OTHER) => PluralCategory::Other,
            // English: only an exact 1 is singular.
            None if count == 1.0 => PluralCategory::One,
            None => PluralCategory::Other,
        }
    }
}

impl fmt::Debug for PluralRuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluralRuleSet")
            .field("locale", &self.locale)
            .field("resolved", &self.rules.is_some())
            .finish()
    }
}

fn cardinal_rules(langid: LanguageIdentifier) -> Option<PluralRules> {
    PluralRules::create(langid, PluralRuleType::CARDINAL).ok()
}

/// A parsed plural message borrowing from its source text.
#[derive(Debug, PartialEq)]
pub(crate) struct PluralMessage<'m> {
    prefix: &'m str,
    offset: f64,
    branches: Vec<(PluralSelector, &'m str)>,
    suffix: &'m str,
}

impl<'m> PluralMessage<'m> {
    pub(crate) fn parse(message: &'m str) -> Result<Self, ResolveError> {
        let invalid = |reason| ResolveError::InvalidPlural {
            message: message.to_owned(),
            reason,
        };
        let open = message.find('{').ok_or_else(|| invalid("no plural block"))?;
        let prefix = message.get(..open).unwrap_or_default();
        let mut cursor = Cursor::new(message, open + 1);

        let argument = cursor.take_until(',').ok_or_else(|| invalid("missing argument name"))?;
        if argument.trim().is_empty() {
            return Err(invalid("missing argument name"));
        }
        let keyword = cursor.take_until(',').ok_or_else(|| invalid("missing `plural` keyword"))?;
        if keyword.trim() != "plural" {
            return Err(invalid("only `plural` arguments are supported"));
        }

        let mut offset = 0.0;
        let mut branches = Vec::new();
        loop {
            cursor.skip_whitespace();
            if cursor.eat('}') {
                break;
            }
            let token = cursor.take_word();
            if token.is_empty() {
                return Err(invalid("unterminated plural block"));
            }
            if let Some(value) = token.strip_prefix("offset:") {
                offset = value
                    .parse::<f64>()
                    .map_err(|_| invalid("offset is not a number"))?;
                continue;
            }
            let selector = token
                .parse::<PluralSelector>()
                .map_err(|_| invalid("unknown plural selector"))?;
            cursor.skip_whitespace();
            if !cursor.eat('{') {
                return Err(invalid("selector without a sub-message"));
            }
            let text = cursor.take_balanced().ok_or_else(|| invalid("unbalanced braces"))?;
            branches.push((selector, text));
        }

        Ok(Self {
            prefix,
            offset,
            branches,
            suffix: cursor.rest(),
        })
    }

    /// Render the branch selected for `count`.
    pub(crate) fn format(&self, count: f64, rules: &PluralRuleSet) -> Option<String> {
        let shown = count - self.offset;
        let exact = self.branches.iter().find_map(|(selector, text)| match selector {
            PluralSelector::Exact(value) if *value == count => Some(*text),
            _ => None,
        });
        let text = exact
            .or_else(|| self.category_branch(rules.category(shown)))
            .or_else(|| self.category_branch(PluralCategory::Other))?;

        let mut rendered = String::with_capacity(self.prefix.len() + text.len() + self.suffix.len());
        rendered.push_str(self.prefix);
        rendered.push_str(&text.replace('#', &shown.to_string()));
        rendered.push_str(self.suffix);
        Some(rendered)
    }

    fn category_branch(&self, category: PluralCategory) -> Option<&'m str> {
        self.branches.iter().find_map(|(selector, text)| {
            (*selector == PluralSelector::Category(category)).then_some(*text)
        })
    }
}

/// Evaluate plural `message` for `count` under `rules`.
pub(crate) fn format_plural(
    message: &str,
    count: f64,
    rules: &PluralRuleSet,
) -> Result<String, ResolveError> {
    PluralMessage::parse(message)?
        .format(count, rules)
        .ok_or_else(|| ResolveError::InvalidPlural {
            message: message.to_owned(),
            reason: "no branch matches and there is no `other` branch",
        })
}

struct Cursor<'m> {
    text: &'m str,
    pos: usize,
}

impl<'m> Cursor<'m> {
    const fn new(text: &'m str, pos: usize) -> Self {
        Self { text, pos }
    }

    fn rest(&self) -> &'m str {
        self.text.get(self.pos..).unwrap_or_default()
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.rest().starts_with(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// Text up to `delimiter`, consuming the delimiter too.
    fn take_until(&mut self, delimiter: char) -> Option<&'m str> {
        let rest = self.rest();
        let end = rest.find(delimiter)?;
        self.pos += end + delimiter.len_utf8();
        rest.get(..end)
    }

    /// A selector or `offset:n` token.
    fn take_word(&mut self) -> &'m str {
        let rest = self.rest();
        let end = rest
            .find(|ch: char| ch.is_whitespace() || ch == '{' || ch == '}')
            .unwrap_or(rest.len());
        self.pos += end;
        rest.get(..end).unwrap_or_default()
    }

    /// Text up to the `}` closing an already consumed `{`.
    fn take_balanced(&mut self) -> Option<&'m str> {
        let rest = self.rest();
        let mut depth = 0_usize;
        for (offset, ch) in rest.char_indices() {
            match ch {
                '{' => depth += 1,
                '}' if depth == 0 => {
                    self.pos += offset + 1;
                    return rest.get(..offset);
                }
                '}' => depth -= 1,
                _ => {}
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn english() -> PluralRuleSet {
        PluralRuleSet::for_locale("en")
    }

    const ITEMS: &str = "{num, plural, one {# item} other {# items}}";

    #[rstest]
    #[case(1.0, "1 item")]
    #[case(2.0, "2 items")]
    #[case(0.0, "0 items")]
    #[case(1.5, "1.5 items")]
    fn english_categories(english: PluralRuleSet, #[case] count: f64, #[case] expected: &str) {
        assert_eq!(format_plural(ITEMS, count, &english).as_deref(), Ok(expected));
    }

    #[rstest]
    fn exact_selectors_win_over_categories(english: PluralRuleSet) {
        let message = "{num, plural, one {one} =5 {exactly five} other {#}}";
        assert_eq!(format_plural(message, 5.0, &english).as_deref(), Ok("exactly five"));
        assert_eq!(format_plural(message, 6.0, &english).as_deref(), Ok("6"));
    }

    #[rstest]
    fn missing_categories_fall_back_to_other(english: PluralRuleSet) {
        let message = "{num, plural, few {few} other {# left}}";
        assert_eq!(format_plural(message, 1.0, &english).as_deref(), Ok("1 left"));
    }

    #[rstest]
    fn offsets_shift_categories_and_hashes(english: PluralRuleSet) {
        let message = "{num, plural, offset:1 =0 {nobody} =1 {just you} one {you and # other} other {you and # others}}";
        assert_eq!(format_plural(message, 1.0, &english).as_deref(), Ok("just you"));
        assert_eq!(format_plural(message, 2.0, &english).as_deref(), Ok("you and 1 other"));
        assert_eq!(format_plural(message, 3.0, &english).as_deref(), Ok("you and 2 others"));
    }

    #[rstest]
    fn surrounding_text_and_nested_braces_are_kept(english: PluralRuleSet) {
        let message = "Cart: {n, plural, one {{0} has # item} other {{0} has # items}}!";
        assert_eq!(
            format_plural(message, 3.0, &english).as_deref(),
            Ok("Cart: {0} has 3 items!")
        );
    }

    #[rstest]
    #[case("plain text")]
    #[case("{num, select, a {b}}")]
    #[case("{num, plural, lots {x} other {y}}")]
    #[case("{num, plural, one {x}")]
    #[case("{num, plural, one x}")]
    #[case("{num, plural, one {x}}")]
    fn malformed_or_unusable_messages_are_errors(english: PluralRuleSet, #[case] message: &str) {
        assert!(matches!(
            format_plural(message, 2.0, &english),
            Err(ResolveError::InvalidPlural { .. })
        ));
    }

    #[rstest]
    #[case("ja", 1.0, PluralCategory::Other)]
    #[case("pl", 3.0, PluralCategory::Few)]
    #[case("pl", 5.0, PluralCategory::Many)]
    #[case("ar", 0.0, PluralCategory::Zero)]
    #[case("en-GB", 1.0, PluralCategory::One)]
    #[case("not a tag", 1.0, PluralCategory::One)]
    #[case("tlh", 2.0, PluralCategory::Other)]
    fn categories_follow_cldr(#[case] locale: &str, #[case] count: f64, #[case] expected: PluralCategory) {
        assert_eq!(PluralRuleSet::for_locale(locale).category(count), expected);
    }
}
