//! CLI application for parsing shipping documents into consignment CSVs.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{audit, domestic, export, packing};

/// docket - Parse shipping documents into structured consignment CSVs
#[derive(Parser)]
#[command(name = "docket")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse export orders (one CSV per document, one row per batch)
    Export(export::ExportArgs),

    /// Parse domestic delivery notes (batch table + SSCC detail table)
    Domestic(domestic::DomesticArgs),

    /// Parse packing lists (single-row CSV per document)
    Packing(packing::PackingArgs),

    /// Audit a combined CSV for rows needing manual attention
    Audit(audit::AuditArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Execute command
    match cli.command {
        Commands::Export(args) => export::run(args, cli.config.as_deref()).await,
        Commands::Domestic(args) => domestic::run(args, cli.config.as_deref()).await,
        Commands::Packing(args) => packing::run(args, cli.config.as_deref()).await,
        Commands::Audit(args) => audit::run(args).await,
    }
}
