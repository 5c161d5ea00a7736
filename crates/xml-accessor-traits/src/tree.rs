//! XML tree abstraction traits

use crate::error::Result;
use std::fmt::Debug;

/// Type of XML node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// Document node
    Document,
    /// Element node
    Element,
    /// Attribute node
    Attribute,
    /// Text node (CDATA sections included)
    Text,
    /// Comment node
    Comment,
    /// Processing instruction node
    ProcessingInstruction,
    /// Namespace node
    Namespace,
}

impl NodeType {
    /// Whether this is an element node
    pub fn is_element(self) -> bool {
        self == NodeType::Element
    }
}

/// Read access to an XML tree.
///
/// Implementations hold every document they hand out nodes for; node
/// handles are only meaningful together with the tree that produced them.
pub trait XmlTree {
    /// Type representing a node handle in this tree
    type Node: Copy + Eq + Debug;

    /// Get the type of a node
    fn node_type(&self, node: Self::Node) -> NodeType;

    /// Get the parent of a node, if it has one
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Get the first child of a node, if it has one
    fn first_child(&self, node: Self::Node) -> Option<Self::Node>;

    /// Get all children of a node
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    /// Get the tag name of an element node
    fn node_name(&self, node: Self::Node) -> Option<String>;

    /// Get the concatenated text of all descendant text nodes
    fn text_content(&self, node: Self::Node) -> String;

    /// Get all attributes of an element node as (qualified name, value) pairs
    fn attributes(&self, node: Self::Node) -> Vec<(String, String)>;

    /// Get a single attribute value of an element node by qualified name
    fn attribute(&self, node: Self::Node, name: &str) -> Option<String>;

    /// Serialize a node to XML markup without any formatting
    fn serialize(&self, node: Self::Node) -> Result<String>;
}

/// Mutation operations on an XML tree
pub trait MutableXmlTree: XmlTree {
    /// Create a new element and append it as the last child of `parent`
    fn append_element(&mut self, parent: Self::Node, name: &str) -> Result<Self::Node>;

    /// Replace all children of `node` with a single text node.
    ///
    /// An empty `text` leaves the node without children.
    fn set_text_content(&mut self, node: Self::Node, text: &str) -> Result<()>;

    /// Create or overwrite an attribute on an element.
    ///
    /// A prefixed `name` must use a prefix declared in scope of `node`.
    fn set_attribute(&mut self, node: Self::Node, name: &str, value: &str) -> Result<()>;
}
