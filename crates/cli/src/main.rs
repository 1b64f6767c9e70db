//! Product Configurator CLI - database migrations and Shopify setup.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! pc-cli migrate
//!
//! # Register the `design` metaobject definition
//! pc-cli designs ensure-definition
//!
//! # Rebuild the screenprint fee table from the fee product
//! pc-cli fees rebuild --handle screenprint-fees --tiers-file tiers.json
//!
//! # Fill a development store with demo products and designs
//! pc-cli demo import
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pc-cli")]
#[command(author, version, about = "Product configurator CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage the design metaobject
    Designs {
        #[command(subcommand)]
        action: DesignsAction,
    },
    /// Manage decoration fee tables
    Fees {
        #[command(subcommand)]
        action: FeesAction,
    },
    /// Demo data for development stores
    Demo {
        #[command(subcommand)]
        action: DemoAction,
    },
}

#[derive(Subcommand)]
enum DemoAction {
    /// Create the demo products and design submissions
    Import,
}

#[derive(Subcommand)]
enum DesignsAction {
    /// Create the `design` metaobject definition if it is missing
    EnsureDefinition,
}

#[derive(Subcommand)]
enum FeesAction {
    /// Rebuild the screenprint fee map from a fee product
    Rebuild {
        /// Handle of the fee product
        #[arg(long)]
        handle: String,

        /// JSON file with the quantity tiers
        #[arg(long)]
        tiers_file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Designs { action } => match action {
            DesignsAction::EnsureDefinition => commands::shopify::ensure_definition().await?,
        },
        Commands::Fees { action } => match action {
            FeesAction::Rebuild { handle, tiers_file } => {
                commands::shopify::rebuild_fees(&handle, tiers_file.as_deref()).await?;
            }
        },
        Commands::Demo { action } => match action {
            DemoAction::Import => commands::shopify::import_demo().await?,
        },
    }
    Ok(())
}
