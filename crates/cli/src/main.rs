//! La Floresta CLI - order listings, summaries and exports.
//!
//! # Usage
//!
//! ```bash
//! # List this month's pickup orders, newest total first
//! floresta-cli orders list --logistics pickup --sort total
//!
//! # Metric summary for March 2024
//! floresta-cli orders summary --month 2024-03
//!
//! # Export completed orders as YAML
//! floresta-cli orders export --status completed --format yaml --output pedidos.yaml
//! ```
//!
//! Credentials are read from the same `WC_*` environment variables as the
//! dashboard (a `.env` file is honoured).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::orders::{ExportFormat, QueryArgs};

#[derive(Parser)]
#[command(name = "floresta-cli")]
#[command(author, version, about = "La Floresta order tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query the month's orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// Log one line per matching order
    List {
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Log counts and amounts for the matching orders
    Summary {
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Write the matching normalized orders to a file or stdout
    Export {
        #[command(flatten)]
        query: QueryArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
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
        Commands::Orders { action } => match action {
            OrdersAction::List { query } => commands::orders::list(&query).await?,
            OrdersAction::Summary { query } => commands::orders::summary(&query).await?,
            OrdersAction::Export {
                query,
                format,
                output,
            } => commands::orders::export(&query, format, output.as_deref()).await?,
        },
    }
    Ok(())
}
