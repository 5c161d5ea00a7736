//! Pretty-print transform for serialized nodes

use xml_accessor_traits::{
    error::{Error, Result},
    transform::{PrettyPrintOptions, XmlTransform, XML_DECLARATION},
};
use xot::output::{xml::Parameters, Indentation};
use xot::{Node, Value, Xot};

/// Process-wide pretty printer used by `NodeAccessor`'s `Display`.
///
/// Built at compile time, read-only, never torn down.
pub static PRETTY_PRINT: PrettyPrint = PrettyPrint::new(PrettyPrintOptions::DEFAULT);

/// Formats markup by dropping whitespace-only text and re-indenting.
///
/// The markup is parsed into a scratch arena owned by the call, so one
/// instance can be shared by every accessor in the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrettyPrint {
    options: PrettyPrintOptions,
}

impl PrettyPrint {
    /// Create a pretty printer with the given options
    pub const fn new(options: PrettyPrintOptions) -> Self {
        Self { options }
    }

    /// The options this printer was built with
    pub fn options(&self) -> PrettyPrintOptions {
        self.options
    }
}

impl XmlTransform for PrettyPrint {
    fn transform(&self, markup: &str) -> Result<String> {
        let mut xot = Xot::new();
        let document = xot
            .parse(markup)
            .map_err(|e| Error::transform(e.to_string()))?;

        if self.options.strip_whitespace {
            strip_whitespace(&mut xot, document)?;
        }

        let formatted = if self.options.indent {
            let parameters = Parameters {
                indentation: Some(Indentation::default()),
                ..Default::default()
            };
            xot.serialize_xml_string(parameters, document)
                .map_err(|e| Error::transform(e.to_string()))?
        } else {
            xot.to_string(document)
                .map_err(|e| Error::transform(e.to_string()))?
        };

        let formatted = formatted.trim_end();
        if self.options.declaration {
            Ok(format!("{}\n{}", XML_DECLARATION, formatted))
        } else {
            Ok(formatted.to_string())
        }
    }

    fn name(&self) -> &'static str {
        "pretty-print"
    }
}

/// Remove text nodes consisting only of whitespace
fn strip_whitespace(xot: &mut Xot, document: Node) -> Result<()> {
    let blank: Vec<Node> = xot
        .descendants(document)
        .filter(|&node| match xot.value(node) {
            Value::Text(text) => text.get().trim().is_empty(),
            _ => false,
        })
        .collect();
    for node in blank {
        xot.remove(node).map_err(|e| Error::transform(e.to_string()))?;
    }
    Ok(())
}
