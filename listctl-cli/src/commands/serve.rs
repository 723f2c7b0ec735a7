//! HTTP server command

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;

use listctl_server::db;
use listctl_server::identity::DEFAULT_IDENTITY_HEADER;
use listctl_server::{run_server, ServerConfig};

use crate::config::DEFAULT_DATABASE_URL;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "LISTCTL_BIND", default_value = "127.0.0.1:3030")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,

    /// Request header in which the upstream authenticator puts the username
    #[arg(long, env = "LISTCTL_IDENTITY_HEADER", default_value = DEFAULT_IDENTITY_HEADER)]
    pub identity_header: String,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
        ..ServerConfig::default()
    }
    .with_identity_header(&args.identity_header)?;

    tracing::info!("Starting listctl server on {}", args.bind);

    // Schema is created here, once, before any request is served
    let pool = db::init(&args.database_url)
        .await
        .with_context(|| format!("Failed to open database at {}", args.database_url))?;

    // Run server (blocks until shutdown)
    run_server(pool, config).await.context("Server error")?;

    Ok(())
}
