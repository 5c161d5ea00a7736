//! Core trait abstractions for XML node accessors.
//!
//! This crate defines the error taxonomy and the seams an accessor
//! implementation is built on: tree access, path queries and the markup
//! transform used for pretty printing.

pub mod error;
pub mod query;
pub mod transform;
pub mod tree;

pub use error::{Error, Result};
pub use query::PathQuery;
pub use transform::{IdentityTransform, PrettyPrintOptions, XmlTransform, XML_DECLARATION};
pub use tree::{MutableXmlTree, NodeType, XmlTree};
