//! Shared XML document handle

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use xml_accessor_traits::{
    error::{Error, Result},
    query::PathQuery,
    transform::XML_DECLARATION,
    tree::{NodeType, XmlTree},
};
use xot::Node;

use crate::query::XeeQuery;
use crate::tree::XotTree;

/// A parsed XML document that any number of accessors may share.
///
/// Cloning the handle is cheap and yields another reference to the same
/// document. The document lives as long as any handle or accessor does.
#[derive(Clone)]
pub struct XmlDocument {
    tree: Rc<RefCell<XotTree>>,
    node: Node,
}

impl XmlDocument {
    /// Parse XML text into a new document
    pub fn parse(xml: &str) -> Result<Self> {
        let mut tree = XotTree::new();
        let node = tree.parse_xml(xml)?;
        Ok(Self {
            tree: Rc::new(RefCell::new(tree)),
            node,
        })
    }

    /// Create a document consisting of a single empty root element.
    ///
    /// `name` is used verbatim; an illegal element name fails to parse.
    pub fn with_root(name: &str) -> Result<Self> {
        Self::parse(&root_markup(name))
    }

    /// The document node itself
    pub fn document_node(&self) -> Node {
        self.node
    }

    /// First child of the document node (usually the root element)
    pub fn first_child(&self) -> Option<Node> {
        self.tree().first_child(self.node)
    }

    /// The root element, skipping any leading comments or processing
    /// instructions
    pub fn document_element(&self) -> Option<Node> {
        let tree = self.tree();
        tree.children(self.node)
            .into_iter()
            .find(|&child| tree.node_type(child).is_element())
    }

    /// Type of a node belonging to this document
    pub fn node_type(&self, node: Node) -> NodeType {
        self.tree().node_type(node)
    }

    /// Evaluate a path with `context` as focus and return matching nodes of
    /// any kind (text and comment nodes included)
    pub fn select(&self, context: Node, path: &str) -> Result<Vec<Node>> {
        XeeQuery::new().select_all(&mut self.tree_mut(), context, path)
    }

    /// Evaluate a path and return the first matching node
    pub fn select_first(&self, context: Node, path: &str) -> Result<Option<Node>> {
        XeeQuery::new().select_first(&mut self.tree_mut(), context, path)
    }

    /// Serialize the whole document, prefixed with the XML declaration
    pub fn to_xml_string(&self) -> Result<String> {
        let body = self.tree().serialize(self.node)?;
        Ok(format!("{}\n{}", XML_DECLARATION, body))
    }

    /// Whether two handles refer to the same document
    pub fn same_document(&self, other: &XmlDocument) -> bool {
        Rc::ptr_eq(&self.tree, &other.tree)
    }

    /// Borrow the underlying tree
    pub fn tree(&self) -> Ref<'_, XotTree> {
        self.tree.borrow()
    }

    /// Borrow the underlying tree mutably
    pub fn tree_mut(&self) -> RefMut<'_, XotTree> {
        self.tree.borrow_mut()
    }
}

impl fmt::Debug for XmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XmlDocument")
            .field("node", &self.node)
            .finish_non_exhaustive()
    }
}

/// Markup of a new single-element document
pub fn root_markup(name: &str) -> String {
    format!("{}\n<{}></{}>", XML_DECLARATION, name, name)
}

impl TryFrom<&str> for XmlDocument {
    type Error = Error;

    fn try_from(xml: &str) -> Result<Self> {
        Self::parse(xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_markup() {
        assert_eq!(
            root_markup("scenario"),
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<scenario></scenario>"
        );
    }

    #[test]
    fn test_document_element_skips_comments() {
        let doc = XmlDocument::parse("<!-- header --><root/>").unwrap();
        let first = doc.first_child().unwrap();
        assert_eq!(doc.node_type(first), NodeType::Comment);
        let root = doc.document_element().unwrap();
        assert_eq!(doc.node_type(root), NodeType::Element);
    }

    #[test]
    fn test_clones_share_the_tree() {
        let doc = XmlDocument::parse("<root/>").unwrap();
        let other = doc.clone();
        assert!(doc.same_document(&other));
        assert!(!doc.same_document(&XmlDocument::parse("<root/>").unwrap()));
    }

    #[test]
    fn test_parse_error() {
        let err = XmlDocument::parse("<root>").unwrap_err();
        assert!(matches!(err, Error::XmlParse(_)));
    }
}
