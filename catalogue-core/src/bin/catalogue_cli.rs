//! Catalogue CLI - bridge for the document exporters
//!
//! Commands: layouts, barcode, plan, assemble
//! Outputs JSON to stdout, logs to stderr
//! Returns 2 on configuration errors, 1 on unreadable input

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use catalogue_core::{
    barcode, AssembleRequest, CatalogueAssembler, CatalogueError, EngineConfig, LayoutCatalog,
    ProofRenderer,
};

#[derive(Parser)]
#[command(name = "catalogue-cli")]
#[command(about = "Catalogue CLI - pagination, barcodes and text budgets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to engine config (JSON)
    #[arg(short, long, default_value = "catalogue.json")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// List the page densities
    Layouts,

    /// Derive the EAN-13 symbol for an identifier
    Barcode {
        identifier: String,
    },

    /// Group items into pages without annotating them
    Plan {
        /// JSON payload (AssembleRequest), or @path to read it from a file
        #[arg(short, long)]
        payload: String,
    },

    /// Plan and annotate a catalogue
    Assemble {
        /// JSON payload (AssembleRequest), or @path to read it from a file
        #[arg(short, long)]
        payload: String,

        /// Print a text proof instead of JSON
        #[arg(long)]
        proof: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("CATALOGUE_LOG").unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match EngineConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };

    let result = match cli.command {
        Commands::Layouts => to_json(&LayoutCatalog::all()),
        Commands::Barcode { identifier } => to_json(&serde_json::json!({
            "identifier": identifier,
            "barcode": barcode::encode(&identifier),
        })),
        Commands::Plan { payload } => plan(config, &payload),
        Commands::Assemble { payload, proof } => assemble(config, &payload, proof),
    };

    match result {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn plan(config: EngineConfig, payload: &str) -> Result<String, CatalogueError> {
    let request = read_request(payload)?;
    let assembler = CatalogueAssembler::new(config);
    let (items, assignment) = assembler.prepare(&request)?;
    let pages = assembler.plan(&items, &assignment)?;
    let pages: Vec<_> = pages
        .into_iter()
        .map(|page| page.map(|item| item.identifier.as_str()))
        .collect();
    to_json(&pages)
}

fn assemble(config: EngineConfig, payload: &str, proof: bool) -> Result<String, CatalogueError> {
    let request = read_request(payload)?;
    let assembler = CatalogueAssembler::new(config);
    let catalogue = assembler.assemble_request(&request)?;

    if proof {
        return Ok(ProofRenderer::new().render(&catalogue));
    }

    let manifest = assembler.manifest(&catalogue)?;
    to_json(&serde_json::json!({
        "success": true,
        "manifest": manifest,
        "catalogue": catalogue,
    }))
}

fn read_request(payload: &str) -> Result<AssembleRequest, CatalogueError> {
    let content = match payload.strip_prefix('@') {
        Some(path) => fs::read_to_string(path)?,
        None => payload.to_string(),
    };
    Ok(serde_json::from_str(&content)?)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, CatalogueError> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn fail(error: &CatalogueError) -> ExitCode {
    tracing::error!(error = %error, "request failed");
    let output = serde_json::json!({
        "success": false,
        "error": error.to_string(),
    });
    println!("{}", output);
    if error.is_configuration() {
        ExitCode::from(2)
    } else {
        ExitCode::FAILURE
    }
}
