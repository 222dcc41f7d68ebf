//! Keebcraft CLI - drive the storefront engine from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! keebcraft catalog list
//! keebcraft catalog search tkl
//! keebcraft catalog filter 20 100
//!
//! # Authenticate (set KEEBCRAFT_SESSION_FILE to keep the session
//! # across invocations)
//! keebcraft auth signup -u mika -p hunter
//! keebcraft auth login -u mika -p hunter
//!
//! # Customize and order
//! keebcraft cart add 3 --size full --switch red
//! keebcraft cart show
//! keebcraft cart checkout
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use keebcraft_storefront::{Config, StoreApp};

mod commands;

#[derive(Parser)]
#[command(name = "keebcraft")]
#[command(version, about = "Keebcraft storefront tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and manage the keyboard catalog
    Catalog {
        #[command(subcommand)]
        action: commands::catalog::CatalogAction,
    },
    /// Sign up, log in, log out
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Inspect and mutate the cart, place orders
    Cart {
        #[command(subcommand)]
        action: commands::cart::CartAction,
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
    let config = Config::from_env()?;
    let app = StoreApp::new(config)?;

    match cli.command {
        Commands::Catalog { action } => commands::catalog::run(&app, action).await?,
        Commands::Auth { action } => commands::auth::run(&app, action).await?,
        Commands::Cart { action } => commands::cart::run(&app, action).await?,
    }
    Ok(())
}
