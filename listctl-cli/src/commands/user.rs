//! User registration
//!
//! Passwords and sessions belong to the upstream identity provider. The
//! API still needs to know which usernames exist so lists can be shared
//! with them; this command manages that roster.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

use listctl_server::db::{self, UserRepo};
use listctl_server::models::Username;

use crate::config::DEFAULT_DATABASE_URL;

#[derive(Parser, Debug)]
pub struct UserArgs {
    /// Database URL
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,

    #[command(subcommand)]
    pub command: UserCommands,
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Register a username
    Add {
        /// Username as the identity provider reports it
        name: String,
    },
    /// List registered usernames
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn run_user(args: UserArgs) -> Result<()> {
    let pool = db::init(&args.database_url)
        .await
        .with_context(|| format!("Failed to open database at {}", args.database_url))?;
    let repo = UserRepo::new(&pool);

    match args.command {
        UserCommands::Add { name } => {
            let username = Username::new(&name)?;
            let user = repo
                .create(&username)
                .await
                .with_context(|| format!("failed to register user '{}'", name))?;
            println!("{}\t{}", user.id, user.username);
        }
        UserCommands::List { json } => {
            let users = repo.list().await?;
            if json {
                let out: Vec<_> = users
                    .iter()
                    .map(|u| {
                        json!({
                            "id": u.id.to_string(),
                            "username": u.username,
                            "created_at": u.created_at.to_rfc3339(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                for user in users {
                    println!("{}\t{}", user.id, user.username);
                }
            }
        }
    }

    pool.close().await;
    Ok(())
}
