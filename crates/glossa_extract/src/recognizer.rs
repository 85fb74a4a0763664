//! Call-site shape recognition shared by both dialects.

use camino::Utf8Path;
use glossa_common::{
    MessageRecord, Origin, PluralVariations, SourceLocation, canonical_template, compile_plural,
};
use glossa_syntax::{
    Attribute, AttributeValue, Element, Node, NodeKind, ObjectMember, Visitor, walk_node,
};

use crate::error::ExtractError;
use crate::names::RecognizedNames;

/// Value of a `message`, `context`, or `comment` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field<'ast> {
    Absent,
    Literal(&'ast str),
    Dynamic,
}

impl<'ast> Field<'ast> {
    fn from_node(node: &'ast Node) -> Self {
        node.as_static_text().map_or(Self::Dynamic, Self::Literal)
    }

    fn from_attribute(attribute: Option<&'ast Attribute>) -> Self {
        match attribute.map(|attribute| &attribute.value) {
            None => Self::Absent,
            Some(AttributeValue::Bare) => Self::Literal(""),
            Some(AttributeValue::Text(text)) => Self::Literal(text),
            Some(AttributeValue::Expression(node)) => Self::from_node(node),
            Some(AttributeValue::Mixed(_) | AttributeValue::Spread(_)) => Self::Dynamic,
        }
    }
}

/// Fields of a structured descriptor found at one call site.
struct Descriptor<'ast> {
    marker: &'ast str,
    location: SourceLocation,
    message: Field<'ast>,
    context: Field<'ast>,
    comment: Field<'ast>,
}

/// Walks a parsed file and collects its message records.
///
/// The first failure stops the walk; records gathered before it are
/// discarded by [`Recognizer::run`].
pub(crate) struct Recognizer<'a> {
    names: &'a RecognizedNames,
    path: &'a Utf8Path,
    records: Vec<MessageRecord>,
    error: Option<ExtractError>,
}

impl<'a> Recognizer<'a> {
    pub(crate) const fn new(names: &'a RecognizedNames, path: &'a Utf8Path) -> Self {
        Self {
            names,
            path,
            records: Vec::new(),
            error: None,
        }
    }

    pub(crate) fn run(mut self, root: &Node) -> Result<Vec<MessageRecord>, ExtractError> {
        self.visit_node(root);
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.records),
        }
    }

    fn origin(&self, location: SourceLocation) -> Origin {
        Origin::new(self.path.to_path_buf(), location)
    }

    fn recognise(&mut self, node: &Node) -> Result<(), ExtractError> {
        match &node.kind {
            NodeKind::TaggedTemplate { tag, quasi } => {
                self.tagged_template(tag, quasi);
                Ok(())
            }
            NodeKind::Call { callee, arguments } => self.call(node.location, callee, arguments),
            NodeKind::Element(element) => self.component(node.location, element),
            _ => Ok(()),
        }
    }

    fn tagged_template(&mut self, tag: &Node, quasi: &Node) {
        let is_marker = tag
            .as_identifier()
            .is_some_and(|name| self.names.is_message(name));
        if let (true, NodeKind::TemplateLiteral(template)) = (is_marker, &quasi.kind) {
            let message = canonical_template(&template.quasis);
            let origin = self.origin(quasi.location);
            self.records
                .push(MessageRecord::new(message, None, None, origin));
        }
    }

    fn call(
        &mut self,
        location: SourceLocation,
        callee: &Node,
        arguments: &[Node],
    ) -> Result<(), ExtractError> {
        let Some(name) = callee.as_identifier() else {
            return Ok(());
        };
        if self.names.is_message(name)
            && let Some(members) = arguments.first().and_then(object_members)
        {
            return self.structured(name, location, members);
        }
        if self.names.is_plural(name)
            && let Some(members) = arguments.get(1).and_then(object_members)
        {
            self.plural(location, members);
        } else if self.names.is_plural_definition(name)
            && let Some(members) = arguments.first().and_then(object_members)
        {
            self.plural(location, members);
        }
        Ok(())
    }

    fn structured(
        &mut self,
        marker: &str,
        location: SourceLocation,
        members: &[ObjectMember],
    ) -> Result<(), ExtractError> {
        let mut descriptor = Descriptor {
            marker,
            location,
            message: Field::Absent,
            context: Field::Absent,
            comment: Field::Absent,
        };
        for member in members {
            let (key, field) = match member {
                ObjectMember::Spread(_) => return Ok(()),
                ObjectMember::Property { key, value } => (key.name(), Field::from_node(value)),
                ObjectMember::Method { key, .. } => (key.name(), Field::Dynamic),
            };
            match key {
                // Computed keys could name any field.
                None => return Ok(()),
                Some("message") => descriptor.message = field,
                Some("context") => descriptor.context = field,
                Some("comment") => descriptor.comment = field,
                Some(_) => {}
            }
        }
        self.emit_descriptor(&descriptor)
    }

    fn component(&mut self, location: SourceLocation, element: &Element) -> Result<(), ExtractError> {
        if !self.names.is_component(&element.name) || element.has_spread() {
            return Ok(());
        }
        self.emit_descriptor(&Descriptor {
            marker: &element.name,
            location,
            message: Field::from_attribute(element.attribute("msg")),
            context: Field::from_attribute(element.attribute("ctx")),
            comment: Field::from_attribute(element.attribute("cmt")),
        })
    }

    fn emit_descriptor(&mut self, descriptor: &Descriptor<'_>) -> Result<(), ExtractError> {
        let message = match descriptor.message {
            Field::Literal(text) if !text.is_empty() => text,
            Field::Absent | Field::Literal(_) => {
                return Err(ExtractError::MissingMessage {
                    path: self.path.to_path_buf(),
                    marker: descriptor.marker.to_owned(),
                    line: descriptor.location.line(),
                    column: descriptor.location.column(),
                });
            }
            Field::Dynamic => return Ok(()),
        };
        // A dynamic context changes the key, so the message cannot be keyed
        // statically.
        let context = match descriptor.context {
            Field::Absent => None,
            Field::Literal(text) => Some(text),
            Field::Dynamic => return Ok(()),
        };
        let comment = match descriptor.comment {
            Field::Literal(text) => Some(text),
            Field::Absent | Field::Dynamic => None,
        };
        let origin = self.origin(descriptor.location);
        self.records
            .push(MessageRecord::new(message, context, comment, origin));
        Ok(())
    }

    fn plural(&mut self, location: SourceLocation, members: &[ObjectMember]) {
        let mut variations = PluralVariations::new();
        for member in members {
            let ObjectMember::Property { key, value } = member else {
                return;
            };
            let (Some(selector), Some(text)) = (key.name(), value.as_static_text()) else {
                return;
            };
            variations.insert(selector, text);
        }
        if variations.is_empty() {
            return;
        }
        let origin = self.origin(location);
        self.records.push(MessageRecord::new(
            compile_plural(&variations),
            None,
            None,
            origin,
        ));
    }
}

impl<'ast> Visitor<'ast> for Recognizer<'_> {
    fn visit_node(&mut self, node: &'ast Node) {
        if self.error.is_some() {
            return;
        }
        if let Err(error) = self.recognise(node) {
            self.error = Some(error);
            return;
        }
        walk_node(self, node);
    }
}

fn object_members(node: &Node) -> Option<&[ObjectMember]> {
    match &node.kind {
        NodeKind::Object(members) => Some(members),
        _ => None,
    }
}
