//! Tokeniser for the script dialect.
//!
//! The lexer only distinguishes what the structural parser needs: names,
//! literals, template literals (with their substitutions lexed recursively),
//! and punctuation. Multi-character operators are left as runs of single
//! punctuation tokens except for `...`, `?.`, and `=>`.

use glossa_common::LineIndex;

use crate::MAX_NESTING;
use crate::error::{ParseError, ParseErrorKind};

/// Keywords after which a `/` starts a regular expression rather than a
/// division.
const REGEX_PREFIX_KEYWORDS: &[&str] = &[
    "await",
    "case",
    "delete",
    "do",
    "else",
    "in",
    "instanceof",
    "new",
    "of",
    "return",
    "throw",
    "typeof",
    "void",
    "yield",
];

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) offset: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum TokenKind {
    Identifier(String),
    /// Cooked string literal value.
    String(String),
    /// Raw numeric literal text.
    Number(String),
    Template(TemplateToken),
    Regex,
    Punct(char),
    Spread,
    OptionalChain,
    Arrow,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TemplateToken {
    /// Raw text chunks; always one more than `substitutions`.
    pub(crate) quasis: Vec<String>,
    /// Tokens of each `${...}` substitution, without the braces.
    pub(crate) substitutions: Vec<Vec<Token>>,
    /// Offset just past the closing backtick.
    pub(crate) end: usize,
}

/// Tokenise `source[start..end]`.
pub(crate) fn tokenize(
    source: &str,
    start: usize,
    end: usize,
    index: &LineIndex<'_>,
) -> Result<Vec<Token>, ParseError> {
    let mut lexer = Lexer::new(source, start, end, index);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

/// Tokenise from `start` up to the first unmatched `}`.
///
/// Returns the tokens and the offset of the closing brace. Used to delimit
/// `{...}` expressions embedded in markup.
pub(crate) fn tokenize_braced(
    source: &str,
    start: usize,
    index: &LineIndex<'_>,
) -> Result<(Vec<Token>, usize), ParseError> {
    let mut lexer = Lexer::new(source, start, source.len(), index);
    lexer.lex_until_close_brace('{', start)
}

struct Lexer<'src, 'idx> {
    source: &'src str,
    index: &'idx LineIndex<'src>,
    pos: usize,
    end: usize,
    regex_allowed: bool,
    /// Template substitutions currently open.
    depth: usize,
}

impl<'src, 'idx> Lexer<'src, 'idx> {
    fn new(source: &'src str, start: usize, end: usize, index: &'idx LineIndex<'src>) -> Self {
        Self {
            source,
            index,
            pos: start,
            end: end.min(source.len()),
            regex_allowed: true,
            depth: 0,
        }
    }

    fn error(&self, kind: ParseErrorKind, offset: usize) -> ParseError {
        ParseError::new(kind, self.index.location(offset))
    }

    fn rest(&self) -> &'src str {
        self.source.get(self.pos..self.end).unwrap_or_default()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        self.skip_trivia()?;
        let offset = self.pos;
        let Some(ch) = self.peek() else {
            return Ok(None);
        };

        let kind = match ch {
            '"' | '\'' => self.lex_string(ch)?,
            '`' => self.lex_template()?,
            '/' if self.regex_allowed => self.lex_regex()?,
            c if c.is_ascii_digit() => self.lex_number(),
            '.' if self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => self.lex_number(),
            c if is_ident_start(c) => self.lex_identifier(),
            _ => self.lex_punct(),
        };

        self.regex_allowed = allows_regex_after(&kind);
        Ok(Some(Token { kind, offset }))
    }

    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            let rest = self.rest();
            if rest.starts_with("//") {
                let len = rest.find('\n').unwrap_or(rest.len());
                self.pos += len;
            } else if rest.starts_with("/*") {
                let start = self.pos;
                let Some(close) = rest.get(2..).and_then(|body| body.find("*/")) else {
                    return Err(self.error(ParseErrorKind::UnterminatedComment, start));
                };
                self.pos += close + 4;
            } else if self.peek().is_some_and(char::is_whitespace) {
                self.bump();
            } else {
                return Ok(());
            }
        }
    }

    fn lex_identifier(&mut self) -> TokenKind {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_continue) {
            self.bump();
        }
        TokenKind::Identifier(self.source.get(start..self.pos).unwrap_or_default().to_owned())
    }

    fn lex_number(&mut self) -> TokenKind {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
        {
            self.bump();
        }
        TokenKind::Number(self.source.get(start..self.pos).unwrap_or_default().to_owned())
    }

    fn lex_punct(&mut self) -> TokenKind {
        let rest = self.rest();
        if rest.starts_with("...") {
            self.pos += 3;
            return TokenKind::Spread;
        }
        if rest.starts_with("?.") && !self.peek_nth(2).is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 2;
            return TokenKind::OptionalChain;
        }
        if rest.starts_with("=>") {
            self.pos += 2;
            return TokenKind::Arrow;
        }
        // `next_token` only calls this with input remaining.
        let ch = self.bump().unwrap_or_default();
        TokenKind::Punct(ch)
    }

    fn lex_string(&mut self, quote: char) -> Result<TokenKind, ParseError> {
        let start = self.pos;
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                None | Some('\n') => {
                    return Err(self.error(ParseErrorKind::UnterminatedString, start));
                }
                Some(c) if c == quote => return Ok(TokenKind::String(value)),
                Some('\\') => self.lex_escape(&mut value, start)?,
                Some(c) => value.push(c),
            }
        }
    }

    fn lex_escape(&mut self, value: &mut String, start: usize) -> Result<(), ParseError> {
        let Some(escaped) = self.bump() else {
            return Err(self.error(ParseErrorKind::UnterminatedString, start));
        };
        match escaped {
            'n' => value.push('\n'),
            't' => value.push('\t'),
            'r' => value.push('\r'),
            'b' => value.push('\u{8}'),
            'f' => value.push('\u{c}'),
            'v' => value.push('\u{b}'),
            '0' if !self.peek().is_some_and(|c| c.is_ascii_digit()) => value.push('\0'),
            'x' => self.lex_hex_escape(value, 2),
            'u' if self.peek() == Some('{') => {
                self.bump();
                let digits_start = self.pos;
                while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                    self.bump();
                }
                let digits = self.source.get(digits_start..self.pos).unwrap_or_default();
                if self.peek() == Some('}') {
                    self.bump();
                }
                push_code_point(value, digits);
            }
            'u' => self.lex_hex_escape(value, 4),
            // Line continuation.
            '\n' => {}
            '\r' => {
                if self.peek() == Some('\n') {
                    self.bump();
                }
            }
            other => value.push(other),
        }
        Ok(())
    }

    fn lex_hex_escape(&mut self, value: &mut String, width: usize) {
        let digits_start = self.pos;
        for _ in 0..width {
            if self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.bump();
            }
        }
        push_code_point(value, self.source.get(digits_start..self.pos).unwrap_or_default());
    }

    fn lex_template(&mut self) -> Result<TokenKind, ParseError> {
        let start = self.pos;
        self.bump();
        let mut quasis = Vec::new();
        let mut substitutions = Vec::new();
        let mut chunk = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error(ParseErrorKind::UnterminatedTemplate, start)),
                Some('`') => break,
                Some('\\') => {
                    chunk.push('\\');
                    if let Some(escaped) = self.bump() {
                        chunk.push(escaped);
                    }
                }
                Some('$') if self.peek() == Some('{') => {
                    let open = self.pos;
                    self.bump();
                    quasis.push(normalise_newlines(&chunk));
                    chunk.clear();
                    let (tokens, _) = self.lex_until_close_brace('{', open)?;
                    substitutions.push(tokens);
                }
                Some(c) => chunk.push(c),
            }
        }
        quasis.push(normalise_newlines(&chunk));
        Ok(TokenKind::Template(TemplateToken {
            quasis,
            substitutions,
            end: self.pos,
        }))
    }

    /// Lex tokens until the `}` matching an already consumed `open`.
    fn lex_until_close_brace(
        &mut self,
        open: char,
        open_offset: usize,
    ) -> Result<(Vec<Token>, usize), ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(self.error(
                ParseErrorKind::NestingTooDeep { limit: MAX_NESTING },
                open_offset,
            ));
        }
        self.depth += 1;
        let lexed = self.lex_braced(open, open_offset);
        self.depth -= 1;
        lexed
    }

    fn lex_braced(
        &mut self,
        open: char,
        open_offset: usize,
    ) -> Result<(Vec<Token>, usize), ParseError> {
        let saved_regex = self.regex_allowed;
        self.regex_allowed = true;
        let mut depth = 0_usize;
        let mut tokens = Vec::new();
        loop {
            let Some(token) = self.next_token()? else {
                return Err(self.error(
                    ParseErrorKind::UnclosedDelimiter {
                        expected: closing_for(open),
                    },
                    open_offset,
                ));
            };
            match token.kind {
                TokenKind::Punct('{') => depth += 1,
                TokenKind::Punct('}') if depth == 0 => {
                    self.regex_allowed = saved_regex;
                    return Ok((tokens, token.offset));
                }
                TokenKind::Punct('}') => depth -= 1,
                _ => {}
            }
            tokens.push(token);
        }
    }

    fn lex_regex(&mut self) -> Result<TokenKind, ParseError> {
        let start = self.pos;
        self.bump();
        let mut in_class = false;
        loop {
            match self.bump() {
                None | Some('\n') => {
                    return Err(self.error(ParseErrorKind::UnterminatedRegex, start));
                }
                Some('\\') => {
                    self.bump();
                }
                Some('[') => in_class = true,
                Some(']') => in_class = false,
                Some('/') if !in_class => break,
                Some(_) => {}
            }
        }
        while self.peek().is_some_and(is_ident_continue) {
            self.bump();
        }
        Ok(TokenKind::Regex)
    }
}

pub(crate) const fn closing_for(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

fn allows_regex_after(kind: &TokenKind) -> bool {
    match kind {
        TokenKind::Identifier(name) => REGEX_PREFIX_KEYWORDS.contains(&name.as_str()),
        TokenKind::Punct(c) => !matches!(c, ')' | ']' | '}'),
        TokenKind::Spread | TokenKind::Arrow | TokenKind::OptionalChain => true,
        TokenKind::String(_) | TokenKind::Number(_) | TokenKind::Template(_) | TokenKind::Regex => {
            false
        }
    }
}

pub(crate) fn is_ident_start(ch: char) -> bool {
    ch == '_' || ch == '$' || ch.is_alphabetic()
}

pub(crate) fn is_ident_continue(ch: char) -> bool {
    ch == '_' || ch == '$' || ch.is_alphanumeric() || ch == '\u{200c}' || ch == '\u{200d}'
}

fn push_code_point(value: &mut String, digits: &str) {
    if let Some(ch) = u32::from_str_radix(digits, 16).ok().and_then(char::from_u32) {
        value.push(ch);
    }
}

fn normalise_newlines(raw: &str) -> String {
    raw.replace("\r\n", "\n").replace('\r', "\n")
}
