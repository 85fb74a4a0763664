//! Parse failures reported by the script and template parsers.

use glossa_common::SourceLocation;
use thiserror::Error;

/// What went wrong while parsing.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A quoted string ran to the end of the line or input.
    #[error("unterminated string literal")]
    UnterminatedString,
    /// A template literal was never closed with a backtick.
    #[error("unterminated template literal")]
    UnterminatedTemplate,
    /// A block comment was never closed.
    #[error("unterminated block comment")]
    UnterminatedComment,
    /// A regular expression literal ran to the end of the line.
    #[error("unterminated regular expression")]
    UnterminatedRegex,
    /// A closing delimiter did not match the innermost open one.
    #[error("expected `{expected}` but found `{found}`")]
    MismatchedDelimiter {
        /// Delimiter that would have closed the open group.
        expected: char,
        /// Delimiter actually found.
        found: char,
    },
    /// A closing delimiter appeared with nothing open.
    #[error("unexpected `{found}`")]
    UnexpectedDelimiter {
        /// The stray delimiter.
        found: char,
    },
    /// Input ended while a group was still open.
    #[error("expected `{expected}` before end of input")]
    UnclosedDelimiter {
        /// Delimiter that would have closed the open group.
        expected: char,
    },
    /// Groups, blocks, templates, or elements nested past [`MAX_NESTING`].
    ///
    /// [`MAX_NESTING`]: crate::MAX_NESTING
    #[error("nesting deeper than {limit} levels")]
    NestingTooDeep {
        /// Deepest nesting accepted.
        limit: usize,
    },
    /// A markup tag was not closed with `>`.
    #[error("unterminated tag")]
    UnterminatedTag,
    /// A raw-text section (`<script>`, `<style>`, `<!-- -->`) was never closed.
    #[error("unterminated {section} section")]
    UnterminatedSection {
        /// Section name.
        section: &'static str,
    },
    /// An element was still open at the end of the template.
    #[error("<{name}> was left open")]
    UnclosedElement {
        /// Element name.
        name: String,
    },
    /// A closing tag had no matching open element.
    #[error("</{name}> attempted to close an element that was not open")]
    UnexpectedClosingTag {
        /// Element name.
        name: String,
    },
}

/// A parse failure and the position where it was detected.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{kind} at line {}, column {}", .location.line(), .location.column())]
pub struct ParseError {
    kind: ParseErrorKind,
    location: SourceLocation,
}

impl ParseError {
    pub(crate) const fn new(kind: ParseErrorKind, location: SourceLocation) -> Self {
        Self { kind, location }
    }

    /// The failure category.
    #[must_use]
    pub const fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    /// Where the failure was detected.
    #[must_use]
    pub const fn location(&self) -> SourceLocation {
        self.location
    }
}
