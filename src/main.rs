/*!
# Formdef CLI

Command-line front end of the definition loader: inspect a form's property
graph, validate every form of a store, list application menus.
*/

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

use formdef::cli_common::{self, OutputFormat, OutputWriter};
use formdef::model::{FormProperties, PropertyNode};
use formdef::{ComponentRegistry, DefinitionLoader, FileSystemSource, LoaderConfig};

#[derive(Parser)]
#[command(
    name = "formdef",
    version = env!("CARGO_PKG_VERSION"),
    about = "Declarative form definition loader",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to formdef.toml (default: ./formdef.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Definition store root, overrides the configuration
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a form and print its property graph
    Inspect {
        /// Form name (without extension)
        form: String,

        /// Print JSON instead of a tree
        #[arg(long)]
        json: bool,
    },

    /// Load every form of the store
    Validate {
        /// Number of parallel workers
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Print the application menus
    Menus,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli_common::init_logging(cli.verbose)?;

    let loader = create_loader(cli.config.as_ref(), cli.root.as_ref())?;

    match cli.command {
        Commands::Inspect { form, json } => inspect_command(&loader, &form, json),
        Commands::Validate { jobs, format } => validate_command(&loader, jobs, &format),
        Commands::Menus => menus_command(&loader),
    }
}

fn create_loader(config_path: Option<&PathBuf>, root: Option<&PathBuf>) -> Result<DefinitionLoader> {
    let mut config = match config_path {
        Some(path) => {
            cli_common::validate_path(path, "Configuration file")?;
            LoaderConfig::load(path)?
        }
        None => LoaderConfig::discover(".")?,
    };
    if let Some(root) = root {
        config.definitions.root = root.clone();
    }
    cli_common::validate_path(&config.definitions.root, "Definition store")?;
    info!("definition store: {}", cli_common::display_path(&config.definitions.root)?);

    let source = FileSystemSource::new(&config);
    DefinitionLoader::new(config, source, ComponentRegistry::new()).context("Failed to read application properties")
}

fn inspect_command(loader: &DefinitionLoader, name: &str, json: bool) -> Result<()> {
    let form = loader
        .load_form(name)
        .with_context(|| format!("Failed to load form {}", name))?;

    if json {
        let mut writer = OutputWriter::stdout(OutputFormat::Json).with_pretty(true);
        writer.write_object(form.as_ref())?;
        return writer.flush();
    }

    print_node(&form, PropertyNode::Form(&form), 0);
    Ok(())
}

fn print_node(form: &FormProperties, node: PropertyNode<'_>, depth: usize) {
    println!("{}{} {}", "  ".repeat(depth), node.name().bold(), format!("[{}]", node.tag()).dimmed());
    for child in node.children(Some(form)) {
        print_node(form, child, depth + 1);
    }
}

fn validate_command(loader: &DefinitionLoader, jobs: Option<usize>, format: &str) -> Result<()> {
    let format: OutputFormat = format.parse()?;
    let forms = loader.list_forms();
    if forms.is_empty() {
        cli_common::print_warning("No forms found in the definition store");
        return Ok(());
    }

    let started = Instant::now();
    let load_all = || {
        forms
            .par_iter()
            .map(|name| {
                let form_started = Instant::now();
                let result = loader.load_form(name);
                (name.clone(), result, form_started.elapsed())
            })
            .collect::<Vec<_>>()
    };
    let results = match jobs {
        Some(jobs) => rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("Failed to create worker pool")?
            .install(load_all),
        None => load_all(),
    };

    let mut failed = 0;
    let rows: Vec<Vec<String>> = results
        .into_iter()
        .map(|(name, result, elapsed)| {
            let (status, detail) = match result {
                Ok(form) => ("ok".to_string(), format!("{} blocks", form.blocks.len())),
                Err(err) => {
                    failed += 1;
                    ("failed".to_string(), err.to_string())
                }
            };
            vec![name, status, cli_common::format_duration(elapsed), detail]
        })
        .collect();

    let mut writer = OutputWriter::stdout(format);
    writer.write_table(&["form", "status", "time", "detail"], rows)?;
    writer.flush()?;

    let summary = format!(
        "{} forms checked in {}, {} failed",
        forms.len(),
        cli_common::format_duration(started.elapsed()),
        failed
    );
    if failed > 0 {
        cli_common::print_error(&summary);
        anyhow::bail!("{} of {} forms failed to load", failed, forms.len());
    }
    if format == OutputFormat::Text {
        cli_common::print_success(&summary);
    }
    Ok(())
}

fn menus_command(loader: &DefinitionLoader) -> Result<()> {
    let app = loader.application();
    if app.menus.is_empty() {
        cli_common::print_warning("No application menus are defined");
        return Ok(());
    }

    let default = app.default_menu().map(|m| m.name.clone());
    let mut writer = OutputWriter::stdout(OutputFormat::Text);
    for menu in app.menus.iter() {
        let title = if default.as_deref() == Some(menu.name.as_str()) {
            format!("{} (default)", menu.name)
        } else {
            menu.name.clone()
        };
        writer.write_header(&title)?;
        for leaf in menu.leaves.iter() {
            print_leaf(PropertyNode::MenuLeaf(leaf), 1);
        }
    }
    writer.flush()
}

fn print_leaf(node: PropertyNode<'_>, depth: usize) {
    let label = match node {
        PropertyNode::MenuLeaf(leaf) => leaf
            .display_name
            .clone()
            .or_else(|| leaf.form_name.clone())
            .unwrap_or_default(),
        _ => String::new(),
    };
    println!("{}{} {} {}", "  ".repeat(depth), node.name().bold(), label, format!("[{}]", node.tag()).dimmed());
    for child in node.children(None) {
        print_leaf(child, depth + 1);
    }
}
