//! Output configuration for the scenario CLI

use std::path::Path;

use anyhow::{Context, Result};
use xee_accessor::{IdentityTransform, PrettyPrint, PrettyPrintOptions, XmlTransform};

/// How documents and nodes are written to stdout
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    pub options: PrettyPrintOptions,
    pub raw: bool,
}

impl OutputConfig {
    /// Load pretty-print options from an optional JSON file
    pub fn load(path: Option<&Path>, raw: bool) -> Result<Self> {
        let options = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                parse_options(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => PrettyPrintOptions::default(),
        };
        Ok(Self { options, raw })
    }

    /// The transform matching this configuration
    pub fn transform(&self) -> Box<dyn XmlTransform> {
        if self.raw {
            Box::new(IdentityTransform)
        } else {
            Box::new(PrettyPrint::new(self.options))
        }
    }
}

fn parse_options(text: &str) -> Result<PrettyPrintOptions> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_options() {
        let options = parse_options(r#"{"indent": false}"#).unwrap();
        assert!(!options.indent);
        assert!(options.strip_whitespace);
        assert!(!options.declaration);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_options("indent = false").is_err());
    }

    #[test]
    fn test_raw_uses_identity() {
        let config = OutputConfig {
            options: PrettyPrintOptions::default(),
            raw: true,
        };
        assert_eq!(config.transform().name(), "identity");
    }
}
