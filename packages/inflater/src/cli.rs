//! Command-line interface for the layout inflater.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use console::style;

use crate::config::{validate_type_name, InflaterConfig};
use crate::context::{ContextRef, LayoutContext, ResourceId};
use crate::element::Element;
use crate::error::{InflaterError, Result};
use crate::inflater::Inflater;
use crate::markup::{MarkupStream, XmlMarkupStream};
use crate::registry::{create_widget_registry, TypeRegistry};
use crate::snapshot::ElementSnapshot;

/// Layout Inflater - Build element trees from layout markup.
#[derive(Parser)]
#[command(name = "layout-inflater")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// How an inflated tree is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Tree,
    Yaml,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inflate a layout file and print the resulting tree.
    Inflate {
        /// Layout markup file
        file: PathBuf,

        /// Type of a parent element to inflate into (e.g., FrameLayout)
        #[arg(short, long)]
        parent: Option<String>,

        /// Attach the inflated root to the parent
        #[arg(short, long, requires = "parent")]
        attach: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Tree)]
        format: OutputFormat,

        /// Inflater config file (prefixes)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Inflate a layout resource declared in a config file.
    Resource {
        /// Resource id, hex (0x7f030000) or decimal
        id: String,

        /// Inflater config file declaring the layouts
        #[arg(short, long)]
        config: PathBuf,

        /// Type of a parent element to inflate into
        #[arg(short, long)]
        parent: Option<String>,

        /// Attach the inflated root to the parent
        #[arg(short, long, requires = "parent")]
        attach: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Tree)]
        format: OutputFormat,
    },

    /// List the registered element types.
    Types,
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inflate {
            file,
            parent,
            attach,
            format,
            config,
        } => inflate_command(&file, parent.as_deref(), attach, format, config.as_deref()),
        Commands::Resource {
            id,
            config,
            parent,
            attach,
            format,
        } => resource_command(&id, &config, parent.as_deref(), attach, format),
        Commands::Types => types_command(),
    }
}

fn widget_registry() -> Result<Arc<TypeRegistry>> {
    Ok(Arc::new(create_widget_registry()?))
}

/// Build the parent element by inflating a single empty tag of that type.
fn create_parent(inflater: &mut Inflater, type_name: &str) -> Result<Box<dyn Element>> {
    validate_type_name(type_name)?;
    let mut stream = XmlMarkupStream::parse("--parent", &format!("<{type_name}/>"))?;
    let inflated = inflater.inflate(&mut stream, None)?;
    stream.close();
    inflated
        .into_root()
        .ok_or_else(|| InflaterError::IllegalState("parent inflation returned no root".to_string()))
}

/// Execute the inflate command.
fn inflate_command(
    file: &Path,
    parent: Option<&str>,
    attach: bool,
    format: OutputFormat,
    config: Option<&Path>,
) -> Result<()> {
    let config = match config {
        Some(path) => InflaterConfig::load(path)?,
        None => InflaterConfig::default(),
    };
    let context = LayoutContext::new("cli", widget_registry()?).into_ref();
    let mut inflater = Inflater::from_config(context, &config)?;

    let text = fs::read_to_string(file)?;
    let mut stream = XmlMarkupStream::parse(file.display().to_string(), &text)?;
    let mut parent_element = parent
        .map(|name| create_parent(&mut inflater, name))
        .transpose()?;

    let result = inflater.inflate_with_attach(&mut stream, parent_element.as_deref_mut(), attach);
    stream.close();
    let snapshot = ElementSnapshot::capture(result?.element());

    print_snapshot(&snapshot, format)
}

/// Execute the resource command.
fn resource_command(
    id: &str,
    config_path: &Path,
    parent: Option<&str>,
    attach: bool,
    format: OutputFormat,
) -> Result<()> {
    let resource: ResourceId = id.parse()?;
    let config = InflaterConfig::load(config_path)?;
    let context: ContextRef =
        LayoutContext::from_config("cli", widget_registry()?, &config)?.into_ref();
    let mut inflater = Inflater::from_config(context, &config)?;

    let mut parent_element = parent
        .map(|name| create_parent(&mut inflater, name))
        .transpose()?;
    let inflated =
        inflater.inflate_resource_with_attach(resource, parent_element.as_deref_mut(), attach)?;
    let snapshot = ElementSnapshot::capture(inflated.element());

    print_snapshot(&snapshot, format)
}

/// Execute the types command.
fn types_command() -> Result<()> {
    let registry = create_widget_registry()?;
    println!("{}", style("Registered element types").bold());
    for name in registry.registered_types() {
        println!("  {}", style(name).cyan());
    }
    Ok(())
}

fn print_snapshot(snapshot: &ElementSnapshot, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Tree => {
            print!("{}", snapshot.to_tree());
            println!();
            println!(
                "{} {} element(s)",
                style("Inflated").green().bold(),
                snapshot.count()
            );
        }
        OutputFormat::Yaml => print!("{}", snapshot.to_yaml()?),
        OutputFormat::Json => println!("{}", snapshot.to_json()?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_inflate() {
        let cli = Cli::parse_from(["layout-inflater", "inflate", "main.xml"]);

        let Commands::Inflate {
            file,
            parent,
            attach,
            format,
            config,
        } = cli.command
        else {
            panic!("expected inflate command");
        };
        assert_eq!(file, PathBuf::from("main.xml"));
        assert!(parent.is_none());
        assert!(!attach);
        assert_eq!(format, OutputFormat::Tree);
        assert!(config.is_none());
    }

    #[test]
    fn test_cli_parse_inflate_with_parent() {
        let cli = Cli::parse_from([
            "layout-inflater",
            "inflate",
            "main.xml",
            "--parent",
            "FrameLayout",
            "--attach",
            "--format",
            "json",
        ]);

        let Commands::Inflate {
            parent,
            attach,
            format,
            ..
        } = cli.command
        else {
            panic!("expected inflate command");
        };
        assert_eq!(parent.as_deref(), Some("FrameLayout"));
        assert!(attach);
        assert_eq!(format, OutputFormat::Json);
    }

    #[test]
    fn test_cli_attach_requires_parent() {
        let result = Cli::try_parse_from(["layout-inflater", "inflate", "main.xml", "--attach"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_resource() {
        let cli = Cli::parse_from([
            "layout-inflater",
            "resource",
            "0x7f030000",
            "--config",
            "inflater.yaml",
        ]);

        let Commands::Resource { id, config, .. } = cli.command else {
            panic!("expected resource command");
        };
        assert_eq!(id, "0x7f030000");
        assert_eq!(config, PathBuf::from("inflater.yaml"));
    }

    #[test]
    fn test_create_parent() {
        let context = LayoutContext::new("test", widget_registry().unwrap()).into_ref();
        let mut inflater = Inflater::new(context);

        let parent = create_parent(&mut inflater, "FrameLayout").unwrap();
        assert_eq!(parent.type_name(), "ui.widget.FrameLayout");
        assert!(create_parent(&mut inflater, "<bad>").is_err());
    }
}
