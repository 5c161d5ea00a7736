//! Error types for node accessor operations

use crate::tree::NodeType;

/// Result type for node accessor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for accessor construction, queries and formatting
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Construction was attempted without a node, document or root name
    #[error("Missing argument: {0}")]
    MissingArgument(String),

    /// The resolved node is not an element
    #[error("Not an element: found {0:?} node")]
    NotAnElement(NodeType),

    /// XML parsing failed
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// XPath compilation failed
    #[error("XPath compilation error: {0}")]
    XPathCompile(String),

    /// XPath evaluation failed
    #[error("XPath evaluation error: {0}")]
    XPathEval(String),

    /// The expression produced values that are not nodes
    #[error("XPath result is not a node sequence: {0}")]
    NonNodeResult(String),

    /// Pretty-print transform failed
    #[error("Transform error: {0}")]
    Transform(String),

    /// Tree manipulation failed in the backing store
    #[error("Tree error: {0}")]
    Tree(String),
}

impl Error {
    /// Create a new missing argument error
    pub fn missing_argument<S: Into<String>>(msg: S) -> Self {
        Error::MissingArgument(msg.into())
    }

    /// Create a new XML parsing error
    pub fn xml_parse<S: Into<String>>(msg: S) -> Self {
        Error::XmlParse(msg.into())
    }

    /// Create a new XPath compilation error
    pub fn xpath_compile<S: Into<String>>(msg: S) -> Self {
        Error::XPathCompile(msg.into())
    }

    /// Create a new XPath evaluation error
    pub fn xpath_eval<S: Into<String>>(msg: S) -> Self {
        Error::XPathEval(msg.into())
    }

    /// Create a new transform error
    pub fn transform<S: Into<String>>(msg: S) -> Self {
        Error::Transform(msg.into())
    }

    /// Create a new tree manipulation error
    pub fn tree<S: Into<String>>(msg: S) -> Self {
        Error::Tree(msg.into())
    }

    /// Whether this error came from accessor construction
    pub fn is_construction(&self) -> bool {
        matches!(self, Error::MissingArgument(_) | Error::NotAnElement(_))
    }
}
