//! Tolerant parsers for Glossa's two source dialects.
//!
//! [`parse_script`] handles plain script files and [`parse_template`] handles
//! component templates, whose `<script>` bodies and `{...}` expressions are
//! parsed with the script parser. Both produce the same [`Node`] tree, which
//! is walked with a [`Visitor`].
//!
//! The parsers recover only the structure that message extraction needs.
//! They are not validators: most syntax errors in expressions go unnoticed,
//! but unbalanced delimiters, unterminated literals, and malformed markup are
//! reported as [`ParseError`]s with a line and column.

mod error;
mod lexer;
mod node;
mod script;
mod template;

/// Deepest nesting the parsers accept before failing with
/// [`ParseErrorKind::NestingTooDeep`].
///
/// Bracketed groups, braces, template substitutions, member or call chains,
/// and markup elements all count towards it. Parsing recurses once per level,
/// so this also bounds stack use.
pub const MAX_NESTING: usize = 256;

pub use error::{ParseError, ParseErrorKind};
pub use node::{
    Attribute, AttributeChunk, AttributeValue, Element, Node, NodeKind, ObjectMember, PropertyKey,
    TemplateLiteral, Visitor, walk_node,
};
pub use script::parse_script;
pub use template::{Passthrough, Preprocessor, parse_template, parse_template_with};
