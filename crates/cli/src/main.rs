//! TeknoKalakal CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! tk-cli migrate storefront
//!
//! # Create an admin account (or promote an existing one)
//! tk-cli admin create -e admin@teknokalakal.ph -n "Site Admin" -u siteadmin
//! tk-cli admin promote -e vendor@teknokalakal.ph
//!
//! # Seed the database with demo data
//! tk-cli seed
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `admin create` / `admin promote` - Manage admin accounts
//! - `seed` - Seed the database with demo categories and products

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "tk-cli")]
#[command(author, version, about = "TeknoKalakal CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Seed the database with demo data
    Seed,
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Run storefront database migrations
    Storefront,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin account (prompts for the password)
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin display name
        #[arg(short, long)]
        name: String,

        /// Admin username
        #[arg(short, long)]
        username: String,
    },
    /// Promote an existing account to admin
    Promote {
        /// Account email address
        #[arg(short, long)]
        email: String,
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
        Commands::Migrate { target } => match target {
            MigrateTarget::Storefront => commands::migrate::storefront().await?,
        },
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                name,
                username,
            } => commands::admin::create(&email, &name, &username).await?,
            AdminAction::Promote { email } => commands::admin::promote(&email).await?,
        },
        Commands::Seed => commands::seed::run().await?,
    }

    Ok(())
}
