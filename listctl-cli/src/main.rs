//! listctl CLI - shared to-do list service
//!
//! Entry point for the `listctl` binary:
//! - `serve`: run the HTTP API
//! - `user`: register and list the usernames the API recognises

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "listctl",
    author,
    version,
    about = "Shared to-do lists with membership-gated editing",
    long_about = "Serve a JSON API for shared to-do lists. Callers are identified by an \
                  upstream authenticating proxy; only list members may change a list."
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve(commands::serve::ServeArgs),
    /// Manage known users (register, list)
    User(commands::user::UserArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env values must be in the environment before clap reads env fallbacks
    let env_files = config::load_dotenv();
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();
    config::log_dotenv(&env_files);

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::User(args) => commands::run_user(args).await?,
    }

    Ok(())
}
