//! Structural node tree shared by both dialects.
//!
//! The tree keeps only what call-site recognisers need: names, literals,
//! calls, tagged templates, object literals, and markup elements with their
//! attributes. Everything else collapses into [`NodeKind::Sequence`] or
//! [`NodeKind::Other`] while keeping nested children reachable.

use glossa_common::SourceLocation;

/// A node and the position of its first character.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Node shape.
    pub kind: NodeKind,
    /// Start position in the original source.
    pub location: SourceLocation,
}

/// Node shapes.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// Root of a parsed file.
    Program(Vec<Node>),
    /// Statements or expressions inside `{ ... }` that are not an object.
    Block(Vec<Node>),
    /// Operands of an expression joined by operators or keywords.
    Sequence(Vec<Node>),
    /// Parenthesised expressions.
    Group(Vec<Node>),
    /// `[ ... ]` literal.
    Array(Vec<Node>),
    /// Name reference.
    Identifier(String),
    /// String literal with escapes resolved.
    StringLiteral(String),
    /// Numeric literal as written.
    NumberLiteral(String),
    /// Template literal.
    TemplateLiteral(TemplateLiteral),
    /// `tag` applied directly to a template literal.
    TaggedTemplate {
        /// Tag expression.
        tag: Box<Node>,
        /// The template literal; its location is the opening backtick.
        quasi: Box<Node>,
    },
    /// Function call.
    Call {
        /// Called expression.
        callee: Box<Node>,
        /// Comma-separated arguments.
        arguments: Vec<Node>,
    },
    /// `object.property` or `object?.property`.
    Member {
        /// Receiver.
        object: Box<Node>,
        /// Property name.
        property: String,
    },
    /// `object[index]`.
    Index {
        /// Receiver.
        object: Box<Node>,
        /// Index expressions.
        index: Vec<Node>,
    },
    /// Object literal.
    Object(Vec<ObjectMember>),
    /// Markup element from the template dialect.
    Element(Element),
    /// Anything the recognisers never inspect, such as regular expressions.
    Other,
}

/// Chunks and substitutions of a template literal.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateLiteral {
    /// Raw text chunks, one more than `expressions`.
    pub quasis: Vec<String>,
    /// Substituted expressions.
    pub expressions: Vec<Node>,
}

/// Member of an object literal.
#[derive(Clone, Debug, PartialEq)]
pub enum ObjectMember {
    /// `key: value`, or shorthand `key` whose value is an identifier.
    Property {
        /// Property key.
        key: PropertyKey,
        /// Property value.
        value: Node,
    },
    /// `key(...) { ... }`, including getters and setters.
    Method {
        /// Method name.
        key: PropertyKey,
        /// Parameters and body.
        body: Vec<Node>,
    },
    /// `...expression`
    Spread(Node),
}

/// Object literal key.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyKey {
    /// Bare identifier key.
    Identifier(String),
    /// Quoted key.
    String(String),
    /// Numeric key as written.
    Number(String),
    /// `[expression]` key.
    Computed(Box<Node>),
}

impl PropertyKey {
    /// Static name of the key, if it has one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Identifier(name) | Self::String(name) | Self::Number(name) => Some(name.as_str()),
            Self::Computed(_) => None,
        }
    }
}

/// Markup element.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    /// Tag name as written.
    pub name: String,
    /// Attributes in source order.
    pub attributes: Vec<Attribute>,
    /// Child nodes.
    pub children: Vec<Node>,
}

impl Element {
    /// Find an attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name.as_deref() == Some(name))
    }

    /// Whether the element has a `{...spread}` attribute.
    #[must_use]
    pub fn has_spread(&self) -> bool {
        self.attributes
            .iter()
            .any(|attribute| matches!(attribute.value, AttributeValue::Spread(_)))
    }
}

/// Markup attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    /// Attribute name; `None` for spreads.
    pub name: Option<String>,
    /// Attribute value.
    pub value: AttributeValue,
    /// Position of the attribute.
    pub location: SourceLocation,
}

/// Value carried by a markup attribute.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    /// Attribute with no value, e.g. `disabled`.
    Bare,
    /// Static text.
    Text(String),
    /// Single `{expression}`.
    Expression(Node),
    /// Text interleaved with expressions, e.g. `"a {b} c"`.
    Mixed(Vec<AttributeChunk>),
    /// `{...expression}`.
    Spread(Node),
}

/// Piece of a mixed attribute value.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeChunk {
    /// Static text.
    Text(String),
    /// Embedded expression.
    Expression(Node),
}

impl Node {
    pub(crate) const fn new(kind: NodeKind, location: SourceLocation) -> Self {
        Self { kind, location }
    }

    /// Name of an identifier node.
    #[must_use]
    pub fn as_identifier(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Identifier(name) => Some(name.as_str()),
            _ => None,
        }
    }

    /// Text of a string literal, or of a template literal without
    /// substitutions.
    #[must_use]
    pub fn as_static_text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::StringLiteral(text) => Some(text.as_str()),
            NodeKind::TemplateLiteral(template) if template.expressions.is_empty() => {
                template.quasis.first().map(String::as_str)
            }
            _ => None,
        }
    }

    /// Direct children in source order.
    #[must_use]
    pub fn children(&self) -> Vec<&Self> {
        match &self.kind {
            NodeKind::Program(nodes)
            | NodeKind::Block(nodes)
            | NodeKind::Sequence(nodes)
            | NodeKind::Group(nodes)
            | NodeKind::Array(nodes) => nodes.iter().collect(),
            NodeKind::TemplateLiteral(template) => template.expressions.iter().collect(),
            NodeKind::TaggedTemplate { tag, quasi } => vec![&**tag, &**quasi],
            NodeKind::Call { callee, arguments } => {
                std::iter::once(&**callee).chain(arguments).collect()
            }
            NodeKind::Member { object, .. } => vec![&**object],
            NodeKind::Index { object, index } => std::iter::once(&**object).chain(index).collect(),
            NodeKind::Object(members) => members.iter().flat_map(member_children).collect(),
            NodeKind::Element(element) => element
                .attributes
                .iter()
                .flat_map(|attribute| attribute_children(&attribute.value))
                .chain(&element.children)
                .collect(),
            NodeKind::Identifier(_)
            | NodeKind::StringLiteral(_)
            | NodeKind::NumberLiteral(_)
            | NodeKind::Other => Vec::new(),
        }
    }
}

fn member_children(member: &ObjectMember) -> Vec<&Node> {
    match member {
        ObjectMember::Property { key, value } => key_child(key).into_iter().chain([value]).collect(),
        ObjectMember::Method { key, body } => key_child(key).into_iter().chain(body).collect(),
        ObjectMember::Spread(node) => vec![node],
    }
}

fn key_child(key: &PropertyKey) -> Option<&Node> {
    match key {
        PropertyKey::Computed(node) => Some(node),
        PropertyKey::Identifier(_) | PropertyKey::String(_) | PropertyKey::Number(_) => None,
    }
}

fn attribute_children(value: &AttributeValue) -> Vec<&Node> {
    match value {
        AttributeValue::Bare | AttributeValue::Text(_) => Vec::new(),
        AttributeValue::Expression(node) | AttributeValue::Spread(node) => vec![node],
        AttributeValue::Mixed(chunks) => chunks
            .iter()
            .filter_map(|chunk| match chunk {
                AttributeChunk::Expression(node) => Some(node),
                AttributeChunk::Text(_) => None,
            })
            .collect(),
    }
}

/// Depth-first traversal over a node tree.
///
/// Override [`Visitor::visit_node`] to inspect nodes and call [`walk_node`]
/// to continue into children. Traversal is pre-order and left-to-right.
pub trait Visitor<'ast> {
    /// Visit `node`; the default implementation walks its children.
    fn visit_node(&mut self, node: &'ast Node) {
        walk_node(self, node);
    }
}

/// Visit every child of `node` in source order.
pub fn walk_node<'ast, V>(visitor: &mut V, node: &'ast Node)
where
    V: Visitor<'ast> + ?Sized,
{
    for child in node.children() {
        visitor.visit_node(child);
    }
}
