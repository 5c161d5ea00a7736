//! Path query abstraction trait

use crate::error::Result;
use crate::tree::XmlTree;

/// Trait for path query engines.
///
/// A query engine answers two questions for a path expression evaluated with
/// a context node as focus: which node comes first, and which nodes match at
/// all. Both answer in document order.
///
/// Note: evaluation takes the tree mutably because engines commonly cache
/// compiled state or document indexes inside the tree they evaluate over.
pub trait PathQuery {
    /// The XML tree implementation this engine works with
    type Tree: XmlTree;

    /// Evaluate `path` against `context` and return every matching node
    fn select_all(
        &self,
        tree: &mut Self::Tree,
        context: <Self::Tree as XmlTree>::Node,
        path: &str,
    ) -> Result<Vec<<Self::Tree as XmlTree>::Node>>;

    /// Evaluate `path` against `context` and return the first matching node
    fn select_first(
        &self,
        tree: &mut Self::Tree,
        context: <Self::Tree as XmlTree>::Node,
        path: &str,
    ) -> Result<Option<<Self::Tree as XmlTree>::Node>> {
        Ok(self.select_all(tree, context, path)?.into_iter().next())
    }
}
