//! Terminal Café CLI - Operator tools.
//!
//! # Usage
//!
//! ```bash
//! # Check how a menu file parses
//! tc-cli menu products/menu.md
//!
//! # Quote shipping to a CEP
//! tc-cli quote 20040002
//!
//! # Take an order on this terminal
//! tc-cli order --menu products/menu.md
//! ```
//!
//! # Commands
//!
//! - `menu` - Parse a menu document and print the catalog
//! - `quote` - Request a Correios shipping quote
//! - `order` - Run one order session on the local terminal

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "tc-cli")]
#[command(author, version, about = "Terminal Café operator tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a menu document and print the catalog
    Menu {
        /// Path to the menu document
        path: PathBuf,
    },
    /// Request a shipping quote for a destination CEP
    Quote {
        /// Destination CEP (8 digits)
        cep: String,
    },
    /// Run one order session on this terminal
    Order {
        /// Menu document (default: `CAFE_MENU_PATH` or products/menu.md)
        #[arg(short, long)]
        menu: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so they never interleave with the session transcript
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::error!("Command failed: {e}");
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<i32, Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Menu { path } => commands::menu::show(&path)?,
        Commands::Quote { cep } => commands::quote::quote(&cep).await?,
        Commands::Order { menu } => {
            let outcome = commands::order::run(menu).await?;
            return Ok(outcome.exit_code());
        }
    }
    Ok(0)
}
