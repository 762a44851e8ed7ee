//! wmap CLI - inspect and convert workflow maps

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::debug;

use wmap::{sample_workflow_map, FixSuggestion, Format, WmapError, WorkflowMap};

#[derive(Parser)]
#[command(name = "wmap")]
#[command(about = "Inspect and convert collect/process/publish workflow maps")]
#[command(version)]
struct Cli {
    /// Log decoding details to stderr (RUST_LOG also applies)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the diagnostic rendering of a workflow map
    Render {
        /// Path to a .json, .yaml or .yml workflow map
        file: String,

        /// Input format (inferred from the extension when omitted)
        #[arg(short, long)]
        format: Option<Format>,
    },

    /// Decode a workflow map and print a summary
    Validate {
        /// Path to a .json, .yaml or .yml workflow map
        file: String,

        /// Input format (inferred from the extension when omitted)
        #[arg(short, long)]
        format: Option<Format>,
    },

    /// Re-encode a workflow map in another format
    Convert {
        /// Path to a .json, .yaml or .yml workflow map
        file: String,

        /// Output format
        #[arg(short, long)]
        to: Format,

        /// Input format (inferred from the extension when omitted)
        #[arg(short, long)]
        format: Option<Format>,

        /// Indent JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the sample workflow map
    Sample {
        /// Output format
        #[arg(short, long, default_value = "json")]
        to: Format,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render { file, format } => render_map(&file, format),
        Commands::Validate { file, format } => validate_map(&file, format),
        Commands::Convert {
            file,
            to,
            format,
            pretty,
        } => convert_map(&file, format, to, pretty),
        Commands::Sample { to } => print_sample(to),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.downcast_ref::<WmapError>().and_then(|e| e.fix_suggestion()) {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

fn load_map(file: &str, format: Option<Format>) -> anyhow::Result<WorkflowMap> {
    let format = format
        .or_else(|| Format::from_path(file))
        .ok_or_else(|| anyhow!("Cannot infer format of '{}', pass --format json|yaml", file))?;

    let bytes = fs::read(Path::new(file)).with_context(|| format!("Failed to read {}", file))?;
    debug!(file, %format, bytes = bytes.len(), "loading workflow map");

    Ok(WorkflowMap::from_payload(format, bytes)?)
}

fn render_map(file: &str, format: Option<Format>) -> anyhow::Result<()> {
    let wmap = load_map(file, format)?;
    print!("{}", wmap);
    Ok(())
}

fn validate_map(file: &str, format: Option<Format>) -> anyhow::Result<()> {
    let wmap = load_map(file, format)?;

    println!("{} Workflow map '{}' is valid", "✓".green(), file);
    match wmap.collect() {
        Some(collect) => {
            println!("  Namespaces: {}", collect.metric_namespaces().len());
            println!("  Process nodes: {}", collect.process_nodes().len());
            println!("  Publish nodes: {}", collect.publish_nodes().len());
            println!("  Total nodes: {}", collect.node_count());
        }
        None => println!("  No collect node"),
    }
    Ok(())
}

fn convert_map(
    file: &str,
    format: Option<Format>,
    to: Format,
    pretty: bool,
) -> anyhow::Result<()> {
    let wmap = load_map(file, format)?;
    let out = match to {
        Format::Json if pretty => wmap.to_json_pretty()?,
        other => wmap.encode(other)?,
    };
    print_document(&out);
    Ok(())
}

fn print_sample(to: Format) -> anyhow::Result<()> {
    let out = sample_workflow_map()?.encode(to)?;
    print_document(&out);
    Ok(())
}

fn print_document(doc: &str) {
    if doc.ends_with('\n') {
        print!("{}", doc);
    } else {
        println!("{}", doc);
    }
}
