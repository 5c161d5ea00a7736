//! XmlTree implementation for xot

use xml_accessor_traits::{
    error::{Error, Result},
    tree::{MutableXmlTree, NodeType, XmlTree},
};
use xot::{NameId, Node, Value, ValueType, Xot};

use crate::query::QuerySnapshot;

/// Wrapper around Xot that implements the tree traits.
///
/// Every mutation bumps a generation counter so that query snapshots built
/// from an older state of the tree are rebuilt before they are used again.
pub struct XotTree {
    pub(crate) xot: Xot,
    generation: u64,
    pub(crate) snapshot: Option<QuerySnapshot>,
}

impl XotTree {
    /// Create a new, empty XotTree
    pub fn new() -> Self {
        Self {
            xot: Xot::new(),
            generation: 0,
            snapshot: None,
        }
    }

    /// Get a reference to the underlying Xot
    pub fn xot(&self) -> &Xot {
        &self.xot
    }

    /// Parse XML into a new document node
    pub fn parse_xml(&mut self, xml: &str) -> Result<Node> {
        self.touch();
        self.xot.parse(xml).map_err(|e| Error::xml_parse(e.to_string()))
    }

    /// Current mutation generation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Topmost ancestor of a node (the document node for attached nodes)
    pub fn root_of(&self, node: Node) -> Node {
        let mut current = node;
        while let Some(parent) = self.xot.parent(current) {
            current = parent;
        }
        current
    }

    fn touch(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Find a name as written in markup, resolving its prefix against the
    /// namespaces in scope of `node`
    fn lookup_name(&self, node: Node, name: &str) -> Option<NameId> {
        match split_qualified_name(name)? {
            (None, local) => self.xot.name(local),
            (Some(prefix), local) => {
                let prefix = self.xot.prefix(prefix)?;
                let namespace = self.xot.namespace_for_prefix(node, prefix)?;
                self.xot.name_ns(local, namespace)
            }
        }
    }

    /// Like `lookup_name`, but registers names not seen before.
    ///
    /// Fails with [`Error::Tree`] for malformed names and undeclared
    /// prefixes.
    fn resolve_name(&mut self, node: Node, name: &str) -> Result<NameId> {
        let (prefix, local) = split_qualified_name(name)
            .ok_or_else(|| Error::tree(format!("'{}' is not a valid XML name", name)))?;
        let Some(prefix) = prefix else {
            return Ok(self.xot.add_name(local));
        };
        let namespace = self
            .xot
            .prefix(prefix)
            .and_then(|prefix| self.xot.namespace_for_prefix(node, prefix))
            .ok_or_else(|| Error::tree(format!("namespace prefix '{}' is not declared", prefix)))?;
        Ok(self.xot.add_name_ns(local, namespace))
    }

    /// `prefix:local` as in scope of `node`; Clark notation if no prefix is
    /// bound to the namespace
    fn qualified_name(&self, node: Node, name: NameId) -> String {
        self.xot.full_name(node, name).unwrap_or_else(|_| {
            let (local, uri) = self.xot.name_ns_str(name);
            format!("{{{}}}{}", uri, local)
        })
    }
}

/// Split `prefix:local`; `None` unless both parts are valid NCNames
fn split_qualified_name(name: &str) -> Option<(Option<&str>, &str)> {
    match name.split_once(':') {
        Some((prefix, local)) if is_ncname(prefix) && is_ncname(local) => {
            Some((Some(prefix), local))
        }
        None if is_ncname(name) => Some((None, name)),
        _ => None,
    }
}

fn is_ncname(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '.' | '_' | '\u{B7}'))
}

impl Default for XotTree {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for XotTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XotTree")
            .field("generation", &self.generation)
            .field("snapshot", &self.snapshot.is_some())
            .finish()
    }
}

pub(crate) fn node_type_of(value_type: ValueType) -> NodeType {
    match value_type {
        ValueType::Document => NodeType::Document,
        ValueType::Element => NodeType::Element,
        ValueType::Text => NodeType::Text,
        ValueType::Comment => NodeType::Comment,
        ValueType::ProcessingInstruction => NodeType::ProcessingInstruction,
        ValueType::Attribute => NodeType::Attribute,
        ValueType::Namespace => NodeType::Namespace,
    }
}

impl XmlTree for XotTree {
    type Node = Node;

    fn node_type(&self, node: Node) -> NodeType {
        node_type_of(self.xot.value_type(node))
    }

    fn parent(&self, node: Node) -> Option<Node> {
        self.xot.parent(node)
    }

    fn first_child(&self, node: Node) -> Option<Node> {
        self.xot.first_child(node)
    }

    fn children(&self, node: Node) -> Vec<Node> {
        self.xot.children(node).collect()
    }

    fn node_name(&self, node: Node) -> Option<String> {
        self.xot
            .element(node)
            .map(|element| self.qualified_name(node, element.name()))
    }

    fn text_content(&self, node: Node) -> String {
        self.xot
            .descendants(node)
            .filter_map(|n| match self.xot.value(n) {
                Value::Text(text) => Some(text.get()),
                _ => None,
            })
            .collect()
    }

    fn attributes(&self, node: Node) -> Vec<(String, String)> {
        self.xot
            .attributes(node)
            .iter()
            .map(|(name, value)| (self.qualified_name(node, name), value.clone()))
            .collect()
    }

    fn attribute(&self, node: Node, name: &str) -> Option<String> {
        let name = self.lookup_name(node, name)?;
        self.xot.attributes(node).get(name).cloned()
    }

    fn serialize(&self, node: Node) -> Result<String> {
        self.xot
            .to_string(node)
            .map_err(|e| Error::tree(format!("Serialization error: {}", e)))
    }
}

impl MutableXmlTree for XotTree {
    fn append_element(&mut self, parent: Node, name: &str) -> Result<Node> {
        let name_id = self.resolve_name(parent, name)?;
        self.touch();
        let element = self.xot.new_element(name_id);
        self.xot
            .append(parent, element)
            .map_err(|e| Error::tree(e.to_string()))?;
        Ok(element)
    }

    fn set_text_content(&mut self, node: Node, text: &str) -> Result<()> {
        self.touch();
        let children: Vec<Node> = self.xot.children(node).collect();
        for child in children {
            self.xot
                .remove(child)
                .map_err(|e| Error::tree(e.to_string()))?;
        }
        if !text.is_empty() {
            let text_node = self.xot.new_text(text);
            self.xot
                .append(node, text_node)
                .map_err(|e| Error::tree(e.to_string()))?;
        }
        Ok(())
    }

    fn set_attribute(&mut self, node: Node, name: &str, value: &str) -> Result<()> {
        let name_id = self.resolve_name(node, name)?;
        self.touch();
        self.xot
            .attributes_mut(node)
            .insert(name_id, value.to_string());
        Ok(())
    }
}
