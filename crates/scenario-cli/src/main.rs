//! CLI for inspecting and editing scenario XML documents

mod config;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use xee_accessor::{NodeAccessor, XmlDocument};

use crate::config::OutputConfig;

#[derive(Parser)]
#[command(name = "scenario", author, version, about, long_about = None)]
struct Cli {
    /// JSON file with pretty-print options
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print markup without pretty printing
    #[arg(long, global = true)]
    raw: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a new document with an empty root element
    New { root: String },
    /// Pretty print a document
    Format { file: PathBuf },
    /// Print the text content of the first element matching a path
    Get { file: PathBuf, path: String },
    /// Set the text content of the first element matching a path
    Set {
        file: PathBuf,
        path: String,
        value: String,
        /// Write the result back to the file
        #[arg(long)]
        write: bool,
    },
    /// Print every element matching a path
    List { file: PathBuf, path: String },
    /// Print the attributes of the first element matching a path as JSON
    Attrs { file: PathBuf, path: String },
    /// Read or set one attribute of the first element matching a path
    Attr {
        file: PathBuf,
        path: String,
        name: String,
        /// New attribute value
        #[arg(long)]
        set: Option<String>,
        /// Write the result back to the file
        #[arg(long)]
        write: bool,
    },
    /// Print an attribute parsed as an integer
    AttrInt {
        file: PathBuf,
        path: String,
        name: String,
    },
    /// Append a new element to the first element matching a path
    Append {
        file: PathBuf,
        path: String,
        name: String,
        /// Write the result back to the file
        #[arg(long)]
        write: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let output = OutputConfig::load(cli.config.as_deref(), cli.raw)?;

    match cli.command {
        Command::New { root } => {
            let accessor = NodeAccessor::with_root(&root)?;
            print_document(&accessor, &output);
        }
        Command::Format { file } => {
            let root = open(&file)?;
            print_document(&root, &output);
        }
        Command::Get { file, path } => {
            let root = open(&file)?;
            let value = root
                .child_value(&path)?
                .ok_or_else(|| anyhow!("no element matches '{}'", path))?;
            println!("{}", value);
        }
        Command::Set {
            file,
            path,
            value,
            write,
        } => {
            let root = open(&file)?;
            if !root.set_child_value(&path, &value)? {
                return Err(anyhow!("no element matches '{}'", path));
            }
            finish(&root, &file, write, &output)?;
        }
        Command::List { file, path } => {
            let root = open(&file)?;
            let transform = output.transform();
            let matches = root.children(&path)?;
            info!("{} element(s) match '{}'", matches.len(), path);
            for element in matches {
                println!("{}", element.format_with(transform.as_ref()));
            }
        }
        Command::Attrs { file, path } => {
            let element = first_match(&open(&file)?, &path)?;
            println!("{}", serde_json::to_string_pretty(&element.attrs())?);
        }
        Command::Attr {
            file,
            path,
            name,
            set,
            write,
        } => {
            let root = open(&file)?;
            let element = first_match(&root, &path)?;
            match set {
                Some(value) => {
                    element.set_attr(&name, &value)?;
                    finish(&root, &file, write, &output)?;
                }
                None => {
                    let value = element
                        .attr(&name)
                        .ok_or_else(|| anyhow!("attribute '{}' not found", name))?;
                    println!("{}", value);
                }
            }
        }
        Command::AttrInt { file, path, name } => {
            let element = first_match(&open(&file)?, &path)?;
            println!("{}", int_or_nan(element.attr_int(&name)));
        }
        Command::Append {
            file,
            path,
            name,
            write,
        } => {
            let root = open(&file)?;
            let parent = first_match(&root, &path)?;
            let added = parent.child_append(&name)?;
            debug!("appended <{}> to <{}>", added.name(), parent.name());
            finish(&root, &file, write, &output)?;
        }
    }

    Ok(())
}

/// Parse a file and wrap its root element
fn open(file: &Path) -> Result<NodeAccessor> {
    let xml = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let document = XmlDocument::parse(&xml)
        .with_context(|| format!("parsing {}", file.display()))?;
    let root = document
        .document_element()
        .ok_or_else(|| anyhow!("{} has no root element", file.display()))?;
    Ok(NodeAccessor::from_node(document, root)?)
}

/// First element matching `path` from the root; "." is the root itself
fn first_match(root: &NodeAccessor, path: &str) -> Result<NodeAccessor> {
    root.child(path)?
        .ok_or_else(|| anyhow!("no element matches '{}'", path))
}

/// Render an integer attribute, `NaN` when it is absent or not a number
fn int_or_nan(value: Option<i64>) -> String {
    value.map_or_else(|| "NaN".to_string(), |value| value.to_string())
}

fn print_document(root: &NodeAccessor, output: &OutputConfig) {
    let transform = output.transform();
    println!("{}", root.format_with(transform.as_ref()));
}

fn finish(root: &NodeAccessor, file: &Path, write: bool, output: &OutputConfig) -> Result<()> {
    if write {
        let xml = root.document().to_xml_string()?;
        std::fs::write(file, xml).with_context(|| format!("writing {}", file.display()))?;
        info!("wrote {}", file.display());
    } else {
        print_document(root, output);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGES_XML: &str = r#"<scenario><page id="start" timeout="30s"/><page id="menu"/></scenario>"#;

    fn pages() -> NodeAccessor {
        let document = XmlDocument::parse(PAGES_XML).unwrap();
        let root = document.document_element().unwrap();
        NodeAccessor::from_node(document, root).unwrap()
    }

    #[test]
    fn test_first_match_dot_is_root() {
        let root = pages();
        assert_eq!(first_match(&root, ".").unwrap(), root);
    }

    #[test]
    fn test_first_match_path() {
        let root = pages();
        let page = first_match(&root, "page[2]").unwrap();
        assert_eq!(page.attr("id").as_deref(), Some("menu"));
    }

    #[test]
    fn test_first_match_no_match_is_an_error() {
        let err = first_match(&pages(), "missing").unwrap_err();
        assert!(err.to_string().contains("no element matches 'missing'"));
    }

    #[test]
    fn test_attr_int_output() {
        let start = first_match(&pages(), "page[@id='start']").unwrap();
        assert_eq!(int_or_nan(start.attr_int("timeout")), "30");
        assert_eq!(int_or_nan(start.attr_int("id")), "NaN");
        assert_eq!(int_or_nan(start.attr_int("missing")), "NaN");
    }

    #[test]
    fn test_cli_parses_attr_int() {
        let cli = Cli::try_parse_from(["scenario", "--raw", "attr-int", "a.xml", ".", "version"])
            .unwrap();
        assert!(cli.raw);
        assert!(matches!(
            cli.command,
            Command::AttrInt { ref path, ref name, .. } if path == "." && name == "version"
        ));
    }
}
