//! EchoVault command-line client.
//!
//! Subcommands mirror the dashboard screens:
//! - `schedule`: create a (possibly recurring) delivery of a voice note
//! - `contacts` / `notes` / `scheduled` / `stats`: the user-facing lists
//! - `admin`: the moderation queue, users, audit logs, and wills

use clap::{Parser, Subcommand};
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use echovault_api::VaultClient;

mod admin;
mod schedule;
mod vault;

#[derive(Parser)]
#[command(name = "echovault")]
#[command(about = "Client for the EchoVault voice-messaging vault", long_about = None)]
struct Cli {
    /// Base URL of the EchoVault API
    #[arg(long, env = "ECHOVAULT_API_URL", global = true, default_value = "https://api.echovault.app")]
    api_url: String,

    /// Bearer token for an existing session
    #[arg(long, env = "ECHOVAULT_TOKEN", global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with email and password and print a session token
    Login {
        /// Account email
        #[arg(long, env = "ECHOVAULT_EMAIL")]
        email: String,

        /// Account password
        #[arg(long, env = "ECHOVAULT_PASSWORD")]
        password: String,
    },

    /// Schedule a voice note for delivery
    Schedule(schedule::ScheduleArgs),

    /// Manage saved contacts
    Contacts {
        #[command(subcommand)]
        command: vault::ContactsCommand,
    },

    /// Manage recorded voice notes
    Notes {
        #[command(subcommand)]
        command: vault::NotesCommand,
    },

    /// List or cancel scheduled deliveries
    Scheduled {
        #[command(subcommand)]
        command: vault::ScheduledCommand,
    },

    /// Show dashboard counts and storage usage
    Stats,

    /// Admin moderation and account management
    Admin {
        #[command(subcommand)]
        command: admin::AdminCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "echovault=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let Cli {
        api_url,
        token,
        command,
    } = Cli::parse();

    match command {
        Commands::Login { email, password } => {
            let client = VaultClient::new(&api_url);
            let session = client
                .login(&email, &password)
                .await
                .map_err(|e| miette::miette!("{}", e))?;
            println!("{}", session.token);
            Ok(())
        }

        Commands::Schedule(args) => schedule::run(&authed(&api_url, &token)?, args).await,

        Commands::Contacts { command } => {
            vault::run_contacts(&authed(&api_url, &token)?, command).await
        }

        Commands::Notes { command } => vault::run_notes(&authed(&api_url, &token)?, command).await,

        Commands::Scheduled { command } => {
            vault::run_scheduled(&authed(&api_url, &token)?, command).await
        }

        Commands::Stats => vault::run_stats(&authed(&api_url, &token)?).await,

        Commands::Admin { command } => admin::run(&authed(&api_url, &token)?, command).await,
    }
}

/// Build an authenticated client from the global flags.
fn authed(api_url: &str, token: &Option<String>) -> Result<VaultClient> {
    let token = token.as_deref().ok_or_else(|| {
        miette::miette!("no token; pass --token or set ECHOVAULT_TOKEN (see `echovault login`)")
    })?;
    Ok(VaultClient::with_token(api_url, token))
}
