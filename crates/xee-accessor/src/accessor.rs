//! Element accessor over a shared XML document

use std::collections::HashMap;
use std::fmt;

use tracing::warn;
use xml_accessor_traits::{
    error::{Error, Result},
    transform::XmlTransform,
    tree::{MutableXmlTree, NodeType, XmlTree},
};
use xot::Node;

use crate::document::XmlDocument;
use crate::pretty::PRETTY_PRINT;

/// What an accessor can be built from
#[derive(Debug, Clone)]
pub enum AccessorSource {
    /// An element node inside an existing document
    Element(XmlDocument, Node),
    /// A whole document; its first child is wrapped
    Document(XmlDocument),
    /// A tag name for a brand-new single-element document
    RootName(String),
}

impl From<XmlDocument> for AccessorSource {
    fn from(document: XmlDocument) -> Self {
        AccessorSource::Document(document)
    }
}

impl From<&str> for AccessorSource {
    fn from(name: &str) -> Self {
        AccessorSource::RootName(name.to_string())
    }
}

impl From<String> for AccessorSource {
    fn from(name: String) -> Self {
        AccessorSource::RootName(name)
    }
}

/// A reference to one element node within a shared document.
///
/// Accessors are cheap to create and to clone. They do not own the
/// document; every accessor derived from another one refers to the same
/// document.
#[derive(Clone)]
pub struct NodeAccessor {
    document: XmlDocument,
    node: Node,
}

impl NodeAccessor {
    /// Build an accessor from an optional source.
    ///
    /// `None` fails with [`Error::MissingArgument`]; a resolved node that is
    /// not an element fails with [`Error::NotAnElement`].
    pub fn new(source: Option<AccessorSource>) -> Result<Self> {
        match source {
            Some(AccessorSource::Element(document, node)) => Self::from_node(document, node),
            Some(AccessorSource::Document(document)) => Self::from_document(document),
            Some(AccessorSource::RootName(name)) => Self::with_root(&name),
            None => Err(Error::missing_argument(
                "an element, a document or a root name is required",
            )),
        }
    }

    /// Wrap a node owned by `document`
    pub fn from_node(document: XmlDocument, node: Node) -> Result<Self> {
        let node_type = document.node_type(node);
        if !node_type.is_element() {
            return Err(Error::NotAnElement(node_type));
        }
        Ok(Self { document, node })
    }

    /// Wrap the first child of a whole document.
    ///
    /// This is the first child, not the first element: a document starting
    /// with a comment fails with [`Error::NotAnElement`].
    pub fn from_document(document: XmlDocument) -> Result<Self> {
        let first = document
            .first_child()
            .ok_or_else(|| Error::missing_argument("document has no child nodes"))?;
        Self::from_node(document, first)
    }

    /// Create a new document `<name></name>` and wrap its root element.
    ///
    /// An empty name counts as no argument at all.
    pub fn with_root(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(Error::missing_argument("root name is empty"));
        }
        Self::from_document(XmlDocument::with_root(name)?)
    }

    /// The document this accessor points into
    pub fn document(&self) -> &XmlDocument {
        &self.document
    }

    /// The wrapped element node
    pub fn node(&self) -> Node {
        self.node
    }

    /// Always [`NodeType::Element`]
    pub fn node_type(&self) -> NodeType {
        self.document.node_type(self.node)
    }

    /// Tag name of the wrapped element
    pub fn name(&self) -> String {
        self.document
            .tree()
            .node_name(self.node)
            .unwrap_or_default()
    }

    /// Accessor for the document's first child
    pub fn root(&self) -> Result<NodeAccessor> {
        Self::from_document(self.document.clone())
    }

    /// Accessor for the parent element.
    ///
    /// The root element's parent is the document node, which fails with
    /// [`Error::NotAnElement`].
    pub fn parent(&self) -> Result<NodeAccessor> {
        let parent = self
            .document
            .tree()
            .parent(self.node)
            .ok_or_else(|| Error::missing_argument("node has no parent"))?;
        Self::from_node(self.document.clone(), parent)
    }

    /// First element matching `path`, evaluated from this node
    pub fn child(&self, path: &str) -> Result<Option<NodeAccessor>> {
        self.document
            .select_first(self.node, path)?
            .map(|node| Self::from_node(self.document.clone(), node))
            .transpose()
    }

    /// All elements matching `path` in document order; empty when nothing
    /// matches
    pub fn children(&self, path: &str) -> Result<Vec<NodeAccessor>> {
        self.document
            .select(self.node, path)?
            .into_iter()
            .map(|node| Self::from_node(self.document.clone(), node))
            .collect()
    }

    /// Text content of the first element matching `path`
    pub fn child_value(&self, path: &str) -> Result<Option<String>> {
        Ok(self.child(path)?.map(|child| child.value()))
    }

    /// Set the text content of the first element matching `path`.
    ///
    /// Returns `false` and leaves the document untouched when nothing
    /// matches.
    pub fn set_child_value(&self, path: &str, value: &str) -> Result<bool> {
        match self.child(path)? {
            Some(child) => {
                child.set_value(value)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Append a new element named `name` as the last child of this node
    pub fn child_append(&self, name: &str) -> Result<NodeAccessor> {
        let element = self
            .document
            .tree_mut()
            .append_element(self.node, name)?;
        Ok(Self {
            document: self.document.clone(),
            node: element,
        })
    }

    /// Concatenated text of all descendant text nodes; empty if there is none
    pub fn value(&self) -> String {
        self.document.tree().text_content(self.node)
    }

    /// Replace all children with a single text node holding `value`
    pub fn set_value(&self, value: &str) -> Result<()> {
        self.document
            .tree_mut()
            .set_text_content(self.node, value)
    }

    /// All attributes as a map from qualified name (`prefix:local`) to value
    pub fn attrs(&self) -> HashMap<String, String> {
        self.document
            .tree()
            .attributes(self.node)
            .into_iter()
            .collect()
    }

    /// A single attribute value by qualified name, `None` when absent
    pub fn attr(&self, name: &str) -> Option<String> {
        self.document.tree().attribute(self.node, name)
    }

    /// Create or overwrite an attribute.
    ///
    /// A prefixed name must use a prefix declared on this element or an
    /// ancestor.
    pub fn set_attr(&self, name: &str, value: &str) -> Result<()> {
        self.document
            .tree_mut()
            .set_attribute(self.node, name, value)
    }

    /// Attribute parsed as a base-10 integer.
    ///
    /// Parsing reads an optional sign and the leading run of digits, so
    /// `"42px"` gives 42. `None` when the attribute is absent, has no
    /// leading digits, or does not fit in an `i64`.
    pub fn attr_int(&self, name: &str) -> Option<i64> {
        self.attr(name).as_deref().and_then(parse_int_prefix)
    }

    /// Markup of this element without any formatting
    pub fn to_raw_string(&self) -> Result<String> {
        self.document.tree().serialize(self.node)
    }

    /// Serialize through `transform`, falling back to the raw markup when
    /// the transform fails
    pub fn format_with(&self, transform: &dyn XmlTransform) -> String {
        let raw = match self.to_raw_string() {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "raw serialization failed");
                return String::new();
            }
        };
        match transform.transform(&raw) {
            Ok(formatted) => formatted,
            Err(e) => {
                warn!(transform = transform.name(), error = %e, "transform failed, using raw markup");
                raw
            }
        }
    }
}

fn parse_int_prefix(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    let (negative, rest) = match trimmed.as_bytes().first()? {
        b'-' => (true, &trimmed[1..]),
        b'+' => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits = rest
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

impl fmt::Display for NodeAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with(&PRETTY_PRINT))
    }
}

impl fmt::Debug for NodeAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeAccessor")
            .field("name", &self.name())
            .field("node", &self.node)
            .finish()
    }
}

impl PartialEq for NodeAccessor {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node && self.document.same_document(&other.document)
    }
}

impl Eq for NodeAccessor {}

impl TryFrom<AccessorSource> for NodeAccessor {
    type Error = Error;

    fn try_from(source: AccessorSource) -> Result<Self> {
        Self::new(Some(source))
    }
}
