//! Stockroom CLI - Database migrations, seeding and account management.
//!
//! # Usage
//!
//! ```bash
//! # Apply inventory schema migrations
//! sr-cli migrate
//!
//! # Load the sample catalogue (safe to repeat)
//! sr-cli seed --admin-password admin123
//!
//! # Create a staff account (password read from STOCKROOM_ACCOUNT_PASSWORD)
//! sr-cli account create -u jdoe -e jdoe@example.com --position Clerk
//! ```
//!
//! All commands read `STOCKROOM_DATABASE_URL` (or `DATABASE_URL`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use secrecy::SecretString;

mod commands;

#[derive(Parser)]
#[command(name = "sr-cli")]
#[command(author, version, about = "Stockroom CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the admin account and the sample catalogue
    Seed {
        /// Password for the `admin` account if it has to be created
        #[arg(
            long,
            env = "STOCKROOM_ADMIN_PASSWORD",
            default_value = stockroom_admin::seed::DEFAULT_ADMIN_PASSWORD,
            hide_env_values = true
        )]
        admin_password: String,
    },
    /// Manage accounts
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Create a staff account
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Phone number
        #[arg(long)]
        phone: Option<String>,

        /// Job title
        #[arg(long)]
        position: Option<String>,

        /// Grant superuser rights
        #[arg(long)]
        superuser: bool,
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
        Commands::Seed { admin_password } => {
            commands::seed::run(SecretString::from(admin_password)).await?;
        }
        Commands::Account { action } => match action {
            AccountAction::Create {
                username,
                email,
                phone,
                position,
                superuser,
            } => {
                commands::account::create(&username, &email, phone, position, superuser).await?;
            }
        },
    }
    Ok(())
}
