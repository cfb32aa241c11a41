//! CLI binary entry point for training-docs-cli

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use training_docs_sdk::cli::commands::diagnose::{handle_apply_fixes, handle_diagnose};
#[cfg(feature = "cli")]
use training_docs_sdk::cli::commands::migrate::{
    handle_full_migrate, handle_migrate, handle_verify,
};
#[cfg(feature = "cli")]
use training_docs_sdk::cli::commands::render::{handle_render, RenderArgs};
#[cfg(feature = "cli")]
use training_docs_sdk::cli::commands::StoreConfig;
#[cfg(feature = "cli")]
use training_docs_sdk::cli::error::CliError;
#[cfg(feature = "cli")]
use training_docs_sdk::models::DocumentType;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "training-docs-cli")]
#[command(about = "Back-office tooling for training documents and signatures")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Scan both signature tables and report problems
    Diagnose,
    /// Apply the suggested fixes from a fresh diagnostic scan
    ApplyFixes,
    /// Migrate legacy signature rows to the canonical table
    Migrate,
    /// Recount both tables and check trainer signature coverage
    Verify,
    /// Diagnose, migrate and verify in one run
    FullMigrate,
    /// Render one document to an A4 PDF
    Render {
        /// Document kind to render
        #[arg(value_enum)]
        kind: DocumentKindArg,
        /// Training record id
        training_id: String,
        /// Participant record id
        participant_id: String,
        /// TTF font file used for rasterization
        #[arg(long)]
        font: PathBuf,
        /// Output path (defaults to the standard filename)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum DocumentKindArg {
    Convention,
    Attestation,
    AttendanceSheet,
    Certificate,
}

#[cfg(feature = "cli")]
fn convert_document_kind(kind: DocumentKindArg) -> DocumentType {
    match kind {
        DocumentKindArg::Convention => DocumentType::Convention,
        DocumentKindArg::Attestation => DocumentType::Attestation,
        DocumentKindArg::AttendanceSheet => DocumentType::AttendanceSheet,
        DocumentKindArg::Certificate => DocumentType::Certificate,
    }
}

#[cfg(feature = "cli")]
async fn run(cli: Cli) -> Result<(), CliError> {
    let config = StoreConfig::from_env()?;
    let (records, assets) = config.open()?;

    match cli.command {
        Commands::Diagnose => handle_diagnose(&records, &assets).await,
        Commands::ApplyFixes => handle_apply_fixes(&records, &assets).await,
        Commands::Migrate => handle_migrate(&records, &assets).await,
        Commands::Verify => handle_verify(&records, &assets).await,
        Commands::FullMigrate => handle_full_migrate(&records, &assets).await,
        Commands::Render {
            kind,
            training_id,
            participant_id,
            font,
            output,
        } => {
            handle_render(
                &records,
                RenderArgs {
                    kind: convert_document_kind(kind),
                    training_id,
                    participant_id,
                    font,
                    output,
                },
            )
            .await
        }
    }
}

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    run(cli).await?;
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("training-docs-cli requires the 'cli' feature");
    std::process::exit(1);
}
