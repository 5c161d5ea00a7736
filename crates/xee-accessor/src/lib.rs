//! Element accessors over XML documents, backed by xot and xee.
//!
//! A [`NodeAccessor`] pairs a shared [`XmlDocument`] with one element in it
//! and offers XPath navigation, text and attribute access, element creation
//! and pretty-printed serialization.
//!
//! ```rust,ignore
//! use xee_accessor::NodeAccessor;
//!
//! let scenario = NodeAccessor::with_root("scenario")?;
//! let page = scenario.child_append("page")?;
//! page.set_attr("id", "start");
//! assert_eq!(scenario.child("page[@id='start']")?, Some(page));
//! println!("{scenario}");
//! ```

pub mod accessor;
pub mod document;
pub mod pretty;
pub mod query;
pub mod tree;

// Re-export main types
pub use accessor::{AccessorSource, NodeAccessor};
pub use document::XmlDocument;
pub use pretty::{PrettyPrint, PRETTY_PRINT};
pub use query::XeeQuery;
pub use tree::XotTree;

// Re-export key types for convenience
pub use xml_accessor_traits::{
    Error, IdentityTransform, NodeType, PrettyPrintOptions, Result, XmlTransform,
};
pub use xot::Node;
