//! Structural parser for the script dialect.
//!
//! This is not a full grammar. Statements and operators are flattened into
//! sequences of operands, but the shapes that call-site recognisers match on
//! are built faithfully: calls with comma-separated arguments, member access,
//! tagged templates, and object literals with their keys. Mismatched
//! delimiters and unterminated literals are reported as errors.

use glossa_common::{LineIndex, SourceLocation};

use crate::MAX_NESTING;
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{TemplateToken, Token, TokenKind, closing_for, tokenize};
use crate::node::{Node, NodeKind, ObjectMember, PropertyKey, TemplateLiteral};

/// Keywords that never act as callees or template tags.
const NON_CALLABLE_KEYWORDS: &[&str] = &[
    "await",
    "case",
    "catch",
    "class",
    "const",
    "delete",
    "do",
    "else",
    "export",
    "extends",
    "for",
    "if",
    "in",
    "instanceof",
    "let",
    "new",
    "of",
    "return",
    "switch",
    "throw",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    "yield",
];

/// Parse a complete script file.
///
/// # Examples
///
/// ```
/// use glossa_syntax::{NodeKind, parse_script};
///
/// let program = parse_script("const a = gt`Hello`;").expect("valid script");
/// assert!(matches!(program.kind, NodeKind::Program(_)));
/// ```
pub fn parse_script(source: &str) -> Result<Node, ParseError> {
    let index = LineIndex::new(source);
    let nodes = parse_range(source, 0, source.len(), &index)?;
    Ok(Node::new(NodeKind::Program(nodes), SourceLocation::new(1, 0)))
}

/// Parse `source[start..end]`, resolving positions against the whole source.
pub(crate) fn parse_range(
    source: &str,
    start: usize,
    end: usize,
    index: &LineIndex<'_>,
) -> Result<Vec<Node>, ParseError> {
    let tokens = tokenize(source, start, end, index)?;
    parse_tokens(&tokens, index)
}

/// Parse an already tokenised region into top-level expressions.
pub(crate) fn parse_tokens(tokens: &[Token], index: &LineIndex<'_>) -> Result<Vec<Node>, ParseError> {
    Parser::new(tokens, index, 0).parse_list(None)
}

/// Collapse parsed expressions into one node located at `location`.
pub(crate) fn collapse(mut nodes: Vec<Node>, location: SourceLocation) -> Node {
    match nodes.len() {
        0 => Node::new(NodeKind::Other, location),
        1 => nodes.pop().unwrap_or_else(|| Node::new(NodeKind::Other, location)),
        _ => {
            let first = nodes.first().map_or(location, |node| node.location);
            Node::new(NodeKind::Sequence(nodes), first)
        }
    }
}

/// Pair each opening delimiter with the position of its closer.
///
/// Pairing stops at the first mismatched closer; the parser reports that
/// mismatch when it reaches it.
fn match_delimiters(tokens: &[Token]) -> Vec<Option<usize>> {
    let mut closers = vec![None; tokens.len()];
    let mut open = Vec::new();
    for (position, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Punct(ch @ ('(' | '[' | '{')) => open.push((position, closing_for(ch))),
            TokenKind::Punct(ch) if is_closer(ch) => match open.pop() {
                Some((opener, expected)) if expected == ch => {
                    if let Some(slot) = closers.get_mut(opener) {
                        *slot = Some(position);
                    }
                }
                _ => break,
            },
            _ => {}
        }
    }
    closers
}

struct Parser<'tok, 'idx, 'src> {
    tokens: &'tok [Token],
    /// Position of the matching closer for every opening delimiter.
    closers: Vec<Option<usize>>,
    pos: usize,
    /// Operands and postfix links open on the current path.
    depth: usize,
    index: &'idx LineIndex<'src>,
}

impl<'tok, 'idx, 'src> Parser<'tok, 'idx, 'src> {
    fn new(tokens: &'tok [Token], index: &'idx LineIndex<'src>, depth: usize) -> Self {
        Self {
            tokens,
            closers: match_delimiters(tokens),
            pos: 0,
            depth,
            index,
        }
    }
}

impl<'tok> Parser<'tok, '_, '_> {
    fn peek(&self) -> Option<&'tok Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&'tok TokenKind> {
        self.peek().map(|token| &token.kind)
    }

    fn peek_kind_at(&self, ahead: usize) -> Option<&'tok TokenKind> {
        self.tokens.get(self.pos + ahead).map(|token| &token.kind)
    }

    fn kind_at(&self, at: usize) -> Option<&'tok TokenKind> {
        self.tokens.get(at).map(|token| &token.kind)
    }

    /// Position just past the group opened at `at`.
    fn after_group(&self, at: usize) -> Option<usize> {
        self.closers.get(at).copied().flatten().map(|close| close + 1)
    }

    fn bump(&mut self) -> Option<&'tok Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn location(&self, offset: usize) -> SourceLocation {
        self.index.location(offset)
    }

    fn error(&self, kind: ParseErrorKind, offset: usize) -> ParseError {
        ParseError::new(kind, self.location(offset))
    }

    fn descend(&mut self, offset: usize) -> Result<(), ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(self.error(
                ParseErrorKind::NestingTooDeep { limit: MAX_NESTING },
                offset,
            ));
        }
        self.depth += 1;
        Ok(())
    }

    /// Parse `,`/`;`-separated expressions until `close` is consumed, or to
    /// the end of input when there is no enclosing delimiter.
    fn parse_list(&mut self, close: Option<(char, usize)>) -> Result<Vec<Node>, ParseError> {
        let mut items = Vec::new();
        loop {
            let Some(token) = self.peek() else {
                return match close {
                    None => Ok(items),
                    Some((expected, open)) => {
                        Err(self.error(ParseErrorKind::UnclosedDelimiter { expected }, open))
                    }
                };
            };
            match token.kind {
                TokenKind::Punct(found) if is_closer(found) => {
                    return match close {
                        Some((expected, _)) if expected == found => {
                            self.bump();
                            Ok(items)
                        }
                        Some((expected, _)) => Err(self.error(
                            ParseErrorKind::MismatchedDelimiter { expected, found },
                            token.offset,
                        )),
                        None => Err(self.error(
                            ParseErrorKind::UnexpectedDelimiter { found },
                            token.offset,
                        )),
                    };
                }
                TokenKind::Punct(',' | ';') => {
                    self.bump();
                }
                _ => items.extend(self.parse_expression()?),
            }
        }
    }

    /// Parse operands up to the next separator or closing delimiter, which
    /// is left unconsumed.
    fn parse_expression(&mut self) -> Result<Option<Node>, ParseError> {
        let mut operands = Vec::new();
        while let Some(kind) = self.peek_kind() {
            if matches!(kind, TokenKind::Punct(c) if *c == ',' || *c == ';' || is_closer(*c)) {
                break;
            }
            operands.extend(self.parse_operand()?);
        }
        Ok(match operands.len() {
            0 => None,
            _ => {
                let location = operands
                    .first()
                    .map_or_else(SourceLocation::default, |node| node.location);
                Some(collapse(operands, location))
            }
        })
    }

    fn parse_operand(&mut self) -> Result<Option<Node>, ParseError> {
        let Some(token) = self.peek() else {
            return Ok(None);
        };
        self.descend(token.offset)?;
        let operand = self.parse_primary();
        self.depth -= 1;
        operand
    }

    fn parse_primary(&mut self) -> Result<Option<Node>, ParseError> {
        let Some(token) = self.bump() else {
            return Ok(None);
        };
        let location = self.location(token.offset);
        let primary = match &token.kind {
            TokenKind::Identifier(name) if name == "function" => {
                return self.parse_function_head(location).map(Some);
            }
            TokenKind::Identifier(name) => {
                let node = Node::new(NodeKind::Identifier(name.clone()), location);
                if NON_CALLABLE_KEYWORDS.contains(&name.as_str()) {
                    return Ok(Some(node));
                }
                node
            }
            TokenKind::String(value) => Node::new(NodeKind::StringLiteral(value.clone()), location),
            TokenKind::Number(raw) => Node::new(NodeKind::NumberLiteral(raw.clone()), location),
            TokenKind::Template(template) => self.template_node(template, location)?,
            TokenKind::Regex => Node::new(NodeKind::Other, location),
            TokenKind::Punct('(') => Node::new(
                NodeKind::Group(self.parse_list(Some((')', token.offset)))?),
                location,
            ),
            TokenKind::Punct('[') => Node::new(
                NodeKind::Array(self.parse_list(Some((']', token.offset)))?),
                location,
            ),
            TokenKind::Punct('{') => self.parse_brace(token.offset, location)?,
            TokenKind::Punct(_) | TokenKind::Spread | TokenKind::Arrow | TokenKind::OptionalChain => {
                return Ok(None);
            }
        };
        self.parse_postfix(primary).map(Some)
    }

    fn parse_postfix(&mut self, node: Node) -> Result<Node, ParseError> {
        let entered = self.depth;
        let chained = self.parse_chain(node);
        self.depth = entered;
        chained
    }

    /// Each call, index, member access, or tag wraps the node built so far,
    /// so every link counts as one level of nesting.
    fn parse_chain(&mut self, mut node: Node) -> Result<Node, ParseError> {
        loop {
            let Some(token) = self.peek() else {
                return Ok(node);
            };
            let location = node.location;
            node = match &token.kind {
                TokenKind::Punct('(') => {
                    self.descend(token.offset)?;
                    self.bump();
                    let arguments = self.parse_list(Some((')', token.offset)))?;
                    Node::new(
                        NodeKind::Call {
                            callee: Box::new(node),
                            arguments,
                        },
                        location,
                    )
                }
                TokenKind::Punct('[') => {
                    self.descend(token.offset)?;
                    self.bump();
                    let index = self.parse_list(Some((']', token.offset)))?;
                    Node::new(
                        NodeKind::Index {
                            object: Box::new(node),
                            index,
                        },
                        location,
                    )
                }
                TokenKind::Punct('.') | TokenKind::OptionalChain => {
                    let optional = matches!(token.kind, TokenKind::OptionalChain);
                    match self.peek_kind_at(1) {
                        Some(TokenKind::Identifier(property)) => {
                            self.descend(token.offset)?;
                            self.pos += 2;
                            Node::new(
                                NodeKind::Member {
                                    object: Box::new(node),
                                    property: property.clone(),
                                },
                                location,
                            )
                        }
                        // `a?.(x)` and `a?.[x]` continue as a call or index.
                        Some(TokenKind::Punct('(' | '[')) if optional => {
                            self.bump();
                            continue;
                        }
                        _ => return Ok(node),
                    }
                }
                TokenKind::Template(template) => {
                    self.descend(token.offset)?;
                    self.bump();
                    let quasi = self.template_node(template, self.location(token.offset))?;
                    Node::new(
                        NodeKind::TaggedTemplate {
                            tag: Box::new(node),
                            quasi: Box::new(quasi),
                        },
                        location,
                    )
                }
                _ => return Ok(node),
            };
        }
    }

    fn parse_function_head(&mut self, location: SourceLocation) -> Result<Node, ParseError> {
        if matches!(self.peek_kind(), Some(TokenKind::Punct('*'))) {
            self.bump();
        }
        if matches!(self.peek_kind(), Some(TokenKind::Identifier(_))) {
            self.bump();
        }
        match self.peek() {
            Some(token) if token.kind == TokenKind::Punct('(') => {
                self.bump();
                let params = self.parse_list(Some((')', token.offset)))?;
                Ok(Node::new(NodeKind::Group(params), location))
            }
            _ => Ok(Node::new(NodeKind::Other, location)),
        }
    }

    fn template_node(
        &self,
        template: &TemplateToken,
        location: SourceLocation,
    ) -> Result<Node, ParseError> {
        let expressions = template
            .substitutions
            .iter()
            .map(|tokens| {
                let nodes = Parser::new(tokens, self.index, self.depth).parse_list(None)?;
                let at = tokens
                    .first()
                    .map_or(location, |token| self.location(token.offset));
                Ok(collapse(nodes, at))
            })
            .collect::<Result<Vec<_>, ParseError>>()?;
        Ok(Node::new(
            NodeKind::TemplateLiteral(TemplateLiteral {
                quasis: template.quasis.clone(),
                expressions,
            }),
            location,
        ))
    }

    /// Parse `{ ... }` as an object literal when it has that shape, and as a
    /// block otherwise.
    fn parse_brace(&mut self, open: usize, location: SourceLocation) -> Result<Node, ParseError> {
        if self.brace_opens_object() {
            let checkpoint = self.pos;
            if let Some(members) = self.try_parse_object(open)? {
                return Ok(Node::new(NodeKind::Object(members), location));
            }
            self.pos = checkpoint;
        }
        let statements = self.parse_list(Some(('}', open)))?;
        Ok(Node::new(NodeKind::Block(statements), location))
    }

    /// Decide from the tokens alone whether the brace just consumed opens an
    /// object literal: every member has an object member's shape and is
    /// followed by `,` or the closing brace. Nested groups are skipped
    /// through their closers, so nothing inside them is parsed twice.
    fn brace_opens_object(&self) -> bool {
        let mut at = self.pos;
        loop {
            let member_end = match self.kind_at(at) {
                None => return false,
                Some(TokenKind::Punct('}')) => return true,
                Some(TokenKind::Spread) => self.value_end(at + 1),
                Some(_) => self.member_end(at),
            };
            let Some(end) = member_end else {
                return false;
            };
            at = match self.kind_at(end) {
                Some(TokenKind::Punct(',')) => end + 1,
                Some(TokenKind::Punct('}')) => end,
                _ => return false,
            };
        }
    }

    /// Position just past the object member starting at `start`.
    fn member_end(&self, start: usize) -> Option<usize> {
        let mut at = start;
        while self.is_method_prefix_at(at) {
            at += 1;
        }
        let prefixed = at > start;
        let shorthand = matches!(self.kind_at(at), Some(TokenKind::Identifier(_)));
        let after_key = match self.kind_at(at)? {
            TokenKind::Identifier(_) | TokenKind::String(_) | TokenKind::Number(_) => at + 1,
            TokenKind::Punct('[') => self.after_group(at)?,
            _ => return None,
        };
        match self.kind_at(after_key)? {
            TokenKind::Punct(':') if !prefixed => self.value_end(after_key + 1),
            TokenKind::Punct('(') => {
                let body = self.after_group(after_key)?;
                match self.kind_at(body)? {
                    TokenKind::Punct('{') => self.after_group(body),
                    _ => None,
                }
            }
            TokenKind::Punct(',' | '}') if !prefixed && shorthand => Some(after_key),
            TokenKind::Punct('=') if !prefixed && shorthand => {
                self.expression_end(after_key + 1).map(|(end, _)| end)
            }
            _ => None,
        }
    }

    /// End of a non-empty expression starting at `start`.
    fn value_end(&self, start: usize) -> Option<usize> {
        self.expression_end(start)
            .and_then(|(end, has_operand)| has_operand.then_some(end))
    }

    /// Where [`Self::parse_expression`] would stop if started at `start`,
    /// and whether it would find an operand on the way.
    fn expression_end(&self, start: usize) -> Option<(usize, bool)> {
        let mut at = start;
        let mut has_operand = false;
        while let Some(kind) = self.kind_at(at) {
            at = match kind {
                TokenKind::Punct(c) if *c == ',' || *c == ';' || is_closer(*c) => break,
                TokenKind::Punct('(' | '[' | '{') => {
                    has_operand = true;
                    self.after_group(at)?
                }
                TokenKind::Punct(_)
                | TokenKind::Spread
                | TokenKind::Arrow
                | TokenKind::OptionalChain => at + 1,
                TokenKind::Identifier(_)
                | TokenKind::String(_)
                | TokenKind::Number(_)
                | TokenKind::Template(_)
                | TokenKind::Regex => {
                    has_operand = true;
                    at + 1
                }
            };
        }
        Some((at, has_operand))
    }

    fn try_parse_object(&mut self, open: usize) -> Result<Option<Vec<ObjectMember>>, ParseError> {
        let mut members = Vec::new();
        loop {
            let Some(token) = self.bump() else {
                return Err(self.error(ParseErrorKind::UnclosedDelimiter { expected: '}' }, open));
            };
            let member = match &token.kind {
                TokenKind::Punct('}') => return Ok(Some(members)),
                TokenKind::Spread => match self.parse_expression()? {
                    Some(value) => ObjectMember::Spread(value),
                    None => return Ok(None),
                },
                _ => match self.parse_member(token)? {
                    Some(member) => member,
                    None => return Ok(None),
                },
            };
            members.push(member);
            match self.peek_kind() {
                Some(TokenKind::Punct(',')) => {
                    self.bump();
                }
                Some(TokenKind::Punct('}')) => {}
                _ => return Ok(None),
            }
        }
    }

    fn parse_member(&mut self, first: &'tok Token) -> Result<Option<ObjectMember>, ParseError> {
        let mut key_token = first;
        let mut prefixed = false;
        // `get x() {}`, `async *x() {}`, `*x() {}`
        while self.is_method_prefix_at(self.pos - 1) {
            let Some(next) = self.bump() else {
                return Ok(None);
            };
            key_token = next;
            prefixed = true;
        }
        let Some(key) = self.object_key(key_token)? else {
            return Ok(None);
        };

        match self.peek_kind() {
            Some(TokenKind::Punct(':')) if !prefixed => {
                self.bump();
                Ok(self
                    .parse_expression()?
                    .map(|value| ObjectMember::Property { key, value }))
            }
            Some(TokenKind::Punct('(')) => self.parse_method(key),
            Some(TokenKind::Punct(',' | '}' | '=')) if !prefixed => {
                let PropertyKey::Identifier(name) = &key else {
                    return Ok(None);
                };
                let value = Node::new(
                    NodeKind::Identifier(name.clone()),
                    self.location(key_token.offset),
                );
                if matches!(self.peek_kind(), Some(TokenKind::Punct('='))) {
                    // Destructuring default; the default itself is skipped over.
                    self.bump();
                    self.parse_expression()?;
                }
                Ok(Some(ObjectMember::Property { key, value }))
            }
            _ => Ok(None),
        }
    }

    fn is_method_prefix_at(&self, at: usize) -> bool {
        let starts_key = matches!(
            self.kind_at(at + 1),
            Some(
                TokenKind::Identifier(_)
                    | TokenKind::String(_)
                    | TokenKind::Number(_)
                    | TokenKind::Punct('[' | '*')
            )
        );
        match self.kind_at(at) {
            Some(TokenKind::Identifier(name)) => {
                matches!(name.as_str(), "get" | "set" | "async" | "static") && starts_key
            }
            Some(TokenKind::Punct('*')) => true,
            _ => false,
        }
    }

    fn parse_method(&mut self, key: PropertyKey) -> Result<Option<ObjectMember>, ParseError> {
        let Some(open_params) = self.bump() else {
            return Ok(None);
        };
        let mut body = self.parse_list(Some((')', open_params.offset)))?;
        let Some(open_body) = self.peek() else {
            return Ok(None);
        };
        if open_body.kind != TokenKind::Punct('{') {
            return Ok(None);
        }
        self.bump();
        body.extend(self.parse_list(Some(('}', open_body.offset)))?);
        Ok(Some(ObjectMember::Method { key, body }))
    }

    fn object_key(&mut self, token: &Token) -> Result<Option<PropertyKey>, ParseError> {
        Ok(match &token.kind {
            TokenKind::Identifier(name) => Some(PropertyKey::Identifier(name.clone())),
            TokenKind::String(value) => Some(PropertyKey::String(value.clone())),
            TokenKind::Number(raw) => Some(PropertyKey::Number(raw.clone())),
            TokenKind::Punct('[') => {
                let nodes = self.parse_list(Some((']', token.offset)))?;
                Some(PropertyKey::Computed(Box::new(collapse(
                    nodes,
                    self.location(token.offset),
                ))))
            }
            _ => None,
        })
    }
}

const fn is_closer(ch: char) -> bool {
    matches!(ch, ')' | ']' | '}')
}
