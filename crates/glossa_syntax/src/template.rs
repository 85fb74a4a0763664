//! Parser for the component-template dialect.
//!
//! Markup is scanned into [`Element`] nodes. `<script>` bodies and every
//! `{...}` expression are handed to the script parser in place, so positions
//! inside them are reported against the whole file. Control blocks such as
//! `{#if cond}` and `{:else}` contribute only their expressions.

use std::borrow::Cow;

use glossa_common::{LineIndex, SourceLocation};

use crate::MAX_NESTING;
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{Token, TokenKind, is_ident_continue, tokenize_braced};
use crate::node::{Attribute, AttributeChunk, AttributeValue, Element, Node, NodeKind};
use crate::script::{collapse, parse_range, parse_tokens};

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Rewrites template source before it is parsed.
///
/// Implementations may compile away syntax the parser does not understand,
/// such as a stylesheet language, provided they keep line structure intact
/// so reported positions stay meaningful.
pub trait Preprocessor {
    /// Transform `source`.
    fn preprocess<'src>(&self, source: &'src str) -> Cow<'src, str>;
}

/// Preprocessor that returns its input unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct Passthrough;

impl Preprocessor for Passthrough {
    fn preprocess<'src>(&self, source: &'src str) -> Cow<'src, str> {
        Cow::Borrowed(source)
    }
}

/// Parse a component template without preprocessing.
///
/// # Examples
///
/// ```
/// use glossa_syntax::{NodeKind, parse_template};
///
/// let root = parse_template("<p>{$t`Hello`}</p>").expect("valid template");
/// assert!(matches!(root.kind, NodeKind::Program(_)));
/// ```
pub fn parse_template(source: &str) -> Result<Node, ParseError> {
    parse_template_with(source, &Passthrough)
}

/// Preprocess and then parse a component template.
pub fn parse_template_with<P>(source: &str, preprocessor: &P) -> Result<Node, ParseError>
where
    P: Preprocessor + ?Sized,
{
    let processed = preprocessor.preprocess(source);
    let index = LineIndex::new(&processed);
    let children = TemplateParser::new(&processed, &index).parse()?;
    Ok(Node::new(NodeKind::Program(children), SourceLocation::new(1, 0)))
}

struct OpenElement {
    name: String,
    attributes: Vec<Attribute>,
    children: Vec<Node>,
    offset: usize,
}

impl OpenElement {
    fn into_node(self, index: &LineIndex<'_>) -> Node {
        element_node(
            self.name,
            self.attributes,
            self.children,
            index.location(self.offset),
        )
    }
}

struct TemplateParser<'src, 'idx> {
    source: &'src str,
    index: &'idx LineIndex<'src>,
    pos: usize,
    stack: Vec<OpenElement>,
    root: Vec<Node>,
}

impl<'src, 'idx> TemplateParser<'src, 'idx> {
    const fn new(source: &'src str, index: &'idx LineIndex<'src>) -> Self {
        Self {
            source,
            index,
            pos: 0,
            stack: Vec::new(),
            root: Vec::new(),
        }
    }

    fn parse(mut self) -> Result<Vec<Node>, ParseError> {
        while let Some(ch) = self.peek() {
            match ch {
                '<' => self.parse_angle()?,
                '{' => self.parse_mustache()?,
                _ => self.skip_text(),
            }
        }
        if let Some(open) = self.stack.pop() {
            return Err(self.error(ParseErrorKind::UnclosedElement { name: open.name }, open.offset));
        }
        Ok(self.root)
    }

    fn rest(&self) -> &'src str {
        self.source.get(self.pos..).unwrap_or_default()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn error(&self, kind: ParseErrorKind, offset: usize) -> ParseError {
        ParseError::new(kind, self.index.location(offset))
    }

    fn push(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(open) => open.children.push(node),
            None => self.root.push(node),
        }
    }

    fn skip_text(&mut self) {
        let rest = self.rest();
        let len = rest
            .char_indices()
            .skip(1)
            .find(|&(_, ch)| ch == '<' || ch == '{')
            .map_or(rest.len(), |(offset, _)| offset);
        self.pos += len;
    }

    fn parse_angle(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        let rest = self.rest();

        if rest.starts_with("<!--") {
            let Some(end) = rest.find("-->") else {
                return Err(self.error(
                    ParseErrorKind::UnterminatedSection { section: "comment" },
                    start,
                ));
            };
            self.pos += end + "-->".len();
            return Ok(());
        }

        if let Some(after) = rest.strip_prefix("</") {
            let Some(close) = after.find('>') else {
                return Err(self.error(ParseErrorKind::UnterminatedTag, start));
            };
            let name = after.get(..close).unwrap_or_default().trim();
            self.pos += "</".len() + close + 1;
            return self.close_element(name, start);
        }

        if rest.starts_with("<!") {
            let Some(close) = rest.find('>') else {
                return Err(self.error(ParseErrorKind::UnterminatedTag, start));
            };
            self.pos += close + 1;
            return Ok(());
        }

        let after = rest.get(1..).unwrap_or_default();
        if !after.starts_with(|ch: char| ch.is_ascii_alphabetic()) {
            // A lone `<` in text.
            self.pos += 1;
            return Ok(());
        }
        let name_len = after.find(|ch: char| !is_tag_name_char(ch)).unwrap_or(after.len());
        let name = after.get(..name_len).unwrap_or_default().to_owned();
        self.pos += 1 + name_len;

        let (attributes, self_closing) = self.parse_attributes(start)?;
        let lowered = name.to_ascii_lowercase();
        let location = self.index.location(start);

        if self_closing || VOID_ELEMENTS.contains(&lowered.as_str()) {
            self.push(element_node(name, attributes, Vec::new(), location));
        } else if lowered == "script" {
            let children = self.parse_raw_section("script", start)?;
            self.push(element_node(name, attributes, children, location));
        } else if lowered == "style" {
            self.parse_raw_section("style", start)?;
            self.push(element_node(name, attributes, Vec::new(), location));
        } else if self.stack.len() >= MAX_NESTING {
            return Err(self.error(
                ParseErrorKind::NestingTooDeep { limit: MAX_NESTING },
                start,
            ));
        } else {
            self.stack.push(OpenElement {
                name,
                attributes,
                children: Vec::new(),
                offset: start,
            });
        }
        Ok(())
    }

    /// Consume a raw-text section up to its closing tag. Script bodies are
    /// parsed; anything else is skipped.
    fn parse_raw_section(
        &mut self,
        section: &'static str,
        start: usize,
    ) -> Result<Vec<Node>, ParseError> {
        let closing = format!("</{section}");
        let body_start = self.pos;
        let Some(relative_end) = self.rest().to_ascii_lowercase().find(&closing) else {
            return Err(self.error(ParseErrorKind::UnterminatedSection { section }, start));
        };
        let body_end = body_start + relative_end;
        let children = if section == "script" {
            parse_range(self.source, body_start, body_end, self.index)?
        } else {
            Vec::new()
        };
        self.pos = body_end;
        let Some(close) = self.rest().find('>') else {
            return Err(self.error(ParseErrorKind::UnterminatedTag, body_end));
        };
        self.pos += close + 1;
        Ok(children)
    }

    fn close_element(&mut self, name: &str, start: usize) -> Result<(), ParseError> {
        let Some(depth) = self.stack.iter().rposition(|open| open.name == name) else {
            return Err(self.error(
                ParseErrorKind::UnexpectedClosingTag {
                    name: name.to_owned(),
                },
                start,
            ));
        };
        // Elements left open inside the closed one end with it, as in HTML.
        while self.stack.len() > depth {
            let Some(open) = self.stack.pop() else {
                break;
            };
            let node = open.into_node(self.index);
            self.push(node);
        }
        Ok(())
    }

    /// Parse attributes up to and including `>` or `/>`.
    fn parse_attributes(&mut self, start: usize) -> Result<(Vec<Attribute>, bool), ParseError> {
        let mut attributes = Vec::new();
        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.starts_with("/>") {
                self.pos += 2;
                return Ok((attributes, true));
            }
            match rest.chars().next() {
                None => return Err(self.error(ParseErrorKind::UnterminatedTag, start)),
                Some('>') => {
                    self.pos += 1;
                    return Ok((attributes, false));
                }
                Some('{') => attributes.push(self.parse_braced_attribute()?),
                Some(_) => attributes.push(self.parse_named_attribute()?),
            }
        }
    }

    /// `{...spread}` or the `{name}` shorthand.
    fn parse_braced_attribute(&mut self) -> Result<Attribute, ParseError> {
        let open = self.pos;
        let location = self.index.location(open);
        let (tokens, close) = tokenize_braced(self.source, open + 1, self.index)?;
        self.pos = close + 1;

        if let Some((first, rest)) = tokens.split_first()
            && first.kind == TokenKind::Spread
        {
            let node = self.expression(rest, first.offset)?;
            return Ok(Attribute {
                name: None,
                value: AttributeValue::Spread(node),
                location,
            });
        }
        let name = match tokens.as_slice() {
            [
                Token {
                    kind: TokenKind::Identifier(name),
                    ..
                },
            ] => Some(name.clone()),
            _ => None,
        };
        let node = self.expression(&tokens, open + 1)?;
        Ok(Attribute {
            name,
            value: AttributeValue::Expression(node),
            location,
        })
    }

    fn parse_named_attribute(&mut self) -> Result<Attribute, ParseError> {
        let start = self.pos;
        let rest = self.rest();
        let name_len = rest
            .find(|ch: char| ch.is_whitespace() || matches!(ch, '=' | '>' | '/' | '{'))
            .unwrap_or(rest.len())
            .max(rest.chars().next().map_or(0, char::len_utf8));
        let name = rest.get(..name_len).unwrap_or_default().to_owned();
        self.pos += name_len;
        let location = self.index.location(start);

        self.skip_whitespace();
        if self.peek() != Some('=') {
            return Ok(Attribute {
                name: Some(name),
                value: AttributeValue::Bare,
                location,
            });
        }
        self.pos += 1;
        self.skip_whitespace();
        let value = self.parse_attribute_value(start)?;
        Ok(Attribute {
            name: Some(name),
            value,
            location,
        })
    }

    fn parse_attribute_value(&mut self, tag_start: usize) -> Result<AttributeValue, ParseError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let chunks = self.parse_value_chunks(|ch| ch == quote, tag_start)?;
                if self.peek() != Some(quote) {
                    return Err(self.error(ParseErrorKind::UnterminatedTag, tag_start));
                }
                self.pos += 1;
                Ok(chunks_into_value(chunks))
            }
            Some(_) => {
                let chunks = self.parse_value_chunks(
                    |ch| ch.is_whitespace() || ch == '>' || ch == '/',
                    tag_start,
                )?;
                Ok(chunks_into_value(chunks))
            }
            None => Err(self.error(ParseErrorKind::UnterminatedTag, tag_start)),
        }
    }

    fn parse_value_chunks(
        &mut self,
        is_end: impl Fn(char) -> bool,
        tag_start: usize,
    ) -> Result<Vec<AttributeChunk>, ParseError> {
        let mut chunks = Vec::new();
        let mut text = String::new();
        loop {
            match self.peek() {
                None => return Err(self.error(ParseErrorKind::UnterminatedTag, tag_start)),
                Some(ch) if is_end(ch) => break,
                Some('{') => {
                    if !text.is_empty() {
                        chunks.push(AttributeChunk::Text(std::mem::take(&mut text)));
                    }
                    let open = self.pos;
                    let (tokens, close) = tokenize_braced(self.source, open + 1, self.index)?;
                    self.pos = close + 1;
                    chunks.push(AttributeChunk::Expression(self.expression(&tokens, open + 1)?));
                }
                Some(ch) => {
                    text.push(ch);
                    self.pos += ch.len_utf8();
                }
            }
        }
        if !text.is_empty() {
            chunks.push(AttributeChunk::Text(text));
        }
        Ok(chunks)
    }

    /// `{expression}` in text, or a control block tag such as `{#if cond}`.
    fn parse_mustache(&mut self) -> Result<(), ParseError> {
        let open = self.pos;
        self.pos += 1;
        self.skip_whitespace();
        if matches!(self.peek(), Some('#' | ':' | '/' | '@')) {
            self.skip_block_keyword();
        }
        let body_start = self.pos;
        let (tokens, close) = tokenize_braced(self.source, body_start, self.index)?;
        self.pos = close + 1;
        if tokens.is_empty() {
            return Ok(());
        }
        let node = self.expression(&tokens, open)?;
        self.push(node);
        Ok(())
    }

    /// Skip `#each`, `:else if`, `/if`, `@html` and similar.
    fn skip_block_keyword(&mut self) {
        let sigil = self.peek();
        self.pos += 1;
        self.skip_word();
        if sigil == Some(':') {
            let rest = self.rest().trim_start();
            if rest
                .strip_prefix("if")
                .is_some_and(|tail| !tail.starts_with(is_ident_continue))
            {
                self.skip_whitespace();
                self.skip_word();
            }
        }
    }

    fn skip_word(&mut self) {
        let rest = self.rest();
        let len = rest.find(|ch: char| !is_ident_continue(ch)).unwrap_or(rest.len());
        self.pos += len;
    }

    fn expression(&self, tokens: &[Token], fallback_offset: usize) -> Result<Node, ParseError> {
        let nodes = parse_tokens(tokens, self.index)?;
        let location = tokens
            .first()
            .map_or(fallback_offset, |token| token.offset);
        Ok(collapse(nodes, self.index.location(location)))
    }
}

fn element_node(
    name: String,
    attributes: Vec<Attribute>,
    children: Vec<Node>,
    location: SourceLocation,
) -> Node {
    Node::new(
        NodeKind::Element(Element {
            name,
            attributes,
            children,
        }),
        location,
    )
}

fn chunks_into_value(mut chunks: Vec<AttributeChunk>) -> AttributeValue {
    match chunks.len() {
        0 => AttributeValue::Text(String::new()),
        1 => match chunks.pop() {
            Some(AttributeChunk::Text(text)) => AttributeValue::Text(text),
            Some(AttributeChunk::Expression(node)) => AttributeValue::Expression(node),
            None => AttributeValue::Text(String::new()),
        },
        _ => AttributeValue::Mixed(chunks),
    }
}

fn is_tag_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '-' | ':' | '.' | '_')
}
