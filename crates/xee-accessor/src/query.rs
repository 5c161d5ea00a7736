//! PathQuery implementation for xee
//!
//! xee evaluates over documents it owns, so queries run against a snapshot
//! of the accessor's tree: the tree is serialized, re-parsed into a xee
//! `Documents` store, and the two trees are paired node by node. Results are
//! mapped back to the accessor's own nodes. A snapshot is reused until the
//! tree's generation changes.

use std::collections::HashMap;

use tracing::debug;
use xee_xpath::{Documents, Queries, Query};
use xml_accessor_traits::{
    error::{Error, Result},
    query::PathQuery,
    tree::NodeType,
};
use xot::{Node, ValueType, Xot};

use crate::tree::{node_type_of, XotTree};

/// Query state mirroring one root of a [`XotTree`]
pub(crate) struct QuerySnapshot {
    root: Node,
    generation: u64,
    documents: Documents,
    to_snapshot: HashMap<Node, Node>,
    from_snapshot: HashMap<Node, Node>,
}

impl QuerySnapshot {
    fn build(tree: &XotTree, root: Node) -> Result<Self> {
        let xot = tree.xot();
        let markup = xot
            .to_string(root)
            .map_err(|e| Error::xpath_eval(format!("cannot snapshot tree: {}", e)))?;

        let mut documents = Documents::new();
        let handle = documents
            .add_string_without_uri(&markup)
            .map_err(|e| Error::xpath_eval(format!("{:?}", e)))?;
        let snapshot_document = {
            let queries = Queries::default();
            let query = queries
                .sequence("/")
                .map_err(|e| Error::xpath_compile(format!("{:?}", e)))?;
            query
                .execute(&mut documents, handle)
                .map_err(|e| Error::xpath_eval(format!("{:?}", e)))?
                .iter()
                .find_map(|item| match item {
                    xee_xpath::Item::Node(node) => Some(node),
                    _ => None,
                })
                .ok_or_else(|| Error::xpath_eval("snapshot has no document node"))?
        };

        let snapshot_xot = documents.xot();
        // A detached element serializes as a bare element, which parses back
        // into a document around it.
        let snapshot_root = if xot.value_type(root) == ValueType::Document {
            snapshot_document
        } else {
            snapshot_xot
                .document_element(snapshot_document)
                .map_err(|e| Error::xpath_eval(e.to_string()))?
        };

        let (to_snapshot, from_snapshot) = pair_nodes(xot, root, snapshot_xot, snapshot_root)?;
        debug!(nodes = to_snapshot.len(), "built query snapshot");

        Ok(Self {
            root,
            generation: tree.generation(),
            documents,
            to_snapshot,
            from_snapshot,
        })
    }

    fn is_current(&self, tree: &XotTree, root: Node) -> bool {
        self.root == root && self.generation == tree.generation()
    }

    fn evaluate(&mut self, context: Node, path: &str) -> Result<Vec<Node>> {
        let snapshot_context = *self
            .to_snapshot
            .get(&context)
            .ok_or_else(|| Error::xpath_eval("context node is not part of the queried tree"))?;

        let queries = Queries::default();
        let query = queries
            .sequence(path)
            .map_err(|e| Error::xpath_compile(format!("{:?}", e)))?;
        let sequence = query
            .execute(&mut self.documents, snapshot_context)
            .map_err(|e| Error::xpath_eval(format!("{:?}", e)))?;

        let mut nodes = Vec::new();
        for item in sequence.iter() {
            match item {
                xee_xpath::Item::Node(node) => match self.from_snapshot.get(&node) {
                    Some(own) => nodes.push(*own),
                    // Attribute and namespace nodes are never paired
                    None => {
                        return Err(Error::NotAnElement(node_type_of(
                            self.documents.xot().value_type(node),
                        )))
                    }
                },
                _ => {
                    return Err(Error::NonNodeResult(format!(
                        "'{}' produced a value that is not a node",
                        path
                    )))
                }
            }
        }
        Ok(nodes)
    }
}

type NodePairs = (HashMap<Node, Node>, HashMap<Node, Node>);

/// Walk both trees in lockstep and pair every child node
fn pair_nodes(ours: &Xot, root: Node, theirs: &Xot, snapshot_root: Node) -> Result<NodePairs> {
    let mut to_snapshot = HashMap::new();
    let mut from_snapshot = HashMap::new();
    let mut stack = vec![(root, snapshot_root)];

    while let Some((own, other)) = stack.pop() {
        to_snapshot.insert(own, other);
        from_snapshot.insert(other, own);

        let own_children: Vec<Node> = ours.children(own).collect();
        let other_children: Vec<Node> = theirs.children(other).collect();
        if own_children.len() != other_children.len() {
            return Err(Error::xpath_eval(
                "query snapshot does not match the document structure",
            ));
        }
        stack.extend(own_children.into_iter().zip(other_children));
    }

    Ok((to_snapshot, from_snapshot))
}

/// xee XPath query engine
#[derive(Debug, Clone, Copy, Default)]
pub struct XeeQuery;

impl XeeQuery {
    /// Create a new query engine
    pub fn new() -> Self {
        Self
    }
}

impl PathQuery for XeeQuery {
    type Tree = XotTree;

    fn select_all(&self, tree: &mut XotTree, context: Node, path: &str) -> Result<Vec<Node>> {
        let context_type = node_type_of(tree.xot().value_type(context));
        if matches!(context_type, NodeType::Attribute | NodeType::Namespace) {
            return Err(Error::NotAnElement(context_type));
        }

        let root = tree.root_of(context);
        let stale = tree
            .snapshot
            .as_ref()
            .map_or(true, |snapshot| !snapshot.is_current(tree, root));
        if stale {
            tree.snapshot = Some(QuerySnapshot::build(tree, root)?);
        }

        let snapshot = tree
            .snapshot
            .as_mut()
            .ok_or_else(|| Error::xpath_eval("query snapshot unavailable"))?;
        let nodes = snapshot.evaluate(context, path)?;
        debug!(path, matches = nodes.len(), "evaluated path");
        Ok(nodes)
    }
}
