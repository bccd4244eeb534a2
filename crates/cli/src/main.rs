//! Freshkeep CLI - Database migrations and demo data.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! freshkeep-cli migrate
//!
//! # Create a demo household with a user, some items and a shopping list
//! freshkeep-cli seed --household "Demo Home" --email demo@example.com \
//!     --name "Demo User" --password "correct horse"
//! ```
//!
//! Both commands read `FRESHKEEP_DATABASE_URL` (or `DATABASE_URL`), loading
//! `.env` if present.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "freshkeep-cli")]
#[command(author, version, about = "Freshkeep CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Create a demo household, user, items and shopping list
    Seed {
        /// Household name
        #[arg(long, default_value = "Demo Home")]
        household: String,

        /// User email address
        #[arg(short, long)]
        email: String,

        /// User display name
        #[arg(short, long)]
        name: String,

        /// User password (at least 8 characters)
        #[arg(short, long)]
        password: String,
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed {
            household,
            email,
            name,
            password,
        } => {
            commands::seed::demo(commands::seed::SeedOptions {
                household,
                email,
                name,
                password,
            })
            .await?;
        }
    }
    Ok(())
}
