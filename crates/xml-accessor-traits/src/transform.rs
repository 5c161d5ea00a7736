//! Markup transform abstraction trait

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// The declaration written in front of serialized documents
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Trait for markup-to-markup transforms used when serializing nodes.
///
/// Transforms are shared process-wide, so they must be usable from any
/// thread once constructed.
pub trait XmlTransform: Send + Sync {
    /// Transform serialized markup into its formatted representation
    fn transform(&self, markup: &str) -> Result<String>;

    /// Short name used in diagnostics
    fn name(&self) -> &'static str;
}

/// Transform that hands markup back untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransform;

impl XmlTransform for IdentityTransform {
    fn transform(&self, markup: &str) -> Result<String> {
        Ok(markup.to_string())
    }

    fn name(&self) -> &'static str {
        "identity"
    }
}

/// Options for the pretty-print transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrettyPrintOptions {
    /// Indent nested elements
    pub indent: bool,
    /// Drop whitespace-only text nodes before formatting
    pub strip_whitespace: bool,
    /// Prefix the output with the XML declaration
    pub declaration: bool,
}

impl PrettyPrintOptions {
    /// Options used by the process-wide pretty printer
    pub const DEFAULT: Self = Self {
        indent: true,
        strip_whitespace: true,
        declaration: false,
    };
}

impl Default for PrettyPrintOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_returns_input() {
        let out = IdentityTransform.transform("<a x=\"1\">hi</a>").unwrap();
        assert_eq!(out, "<a x=\"1\">hi</a>");
    }

    #[test]
    fn options_fill_missing_fields_from_default() {
        let options: PrettyPrintOptions = serde_json::from_str(r#"{"declaration": true}"#).unwrap();
        assert!(options.indent);
        assert!(options.strip_whitespace);
        assert!(options.declaration);
    }
}
