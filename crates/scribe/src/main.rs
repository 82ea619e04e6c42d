//! Scribe CLI - rich-text documents and AI content generation.
//!
//! Provides commands for:
//! - `convert`: Parse HTML into a JSON document tree
//! - `render`: Serialize a JSON document tree back to HTML
//! - `generate`: Generate HTML content with the configured AI providers
//! - `health`: Report provider health

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ConvertArgs, GenerateArgs, HealthArgs, RenderArgs};
use output::Output;

/// Scribe - rich-text documents and AI content generation.
#[derive(Parser)]
#[command(name = "scribe", version, about)]
struct Cli {
    /// Enable verbose output (provider selection, retries, parser fallbacks).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an HTML file into a JSON document.
    Convert(ConvertArgs),
    /// Serialize a JSON document to HTML.
    Render(RenderArgs),
    /// Generate content with the configured AI providers.
    Generate(GenerateArgs),
    /// Check the health of the configured AI providers.
    Health(HealthArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Convert(args) => args.execute(),
        Commands::Render(args) => args.execute(),
        Commands::Generate(args) => {
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            rt.block_on(args.execute())
        }
        Commands::Health(args) => {
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            rt.block_on(args.execute())
        }
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
