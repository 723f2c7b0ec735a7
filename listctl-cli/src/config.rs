//! Environment-based configuration
//!
//! Settings come from command-line flags, which fall back to environment
//! variables. `.env` files are loaded into the environment first.

use std::path::PathBuf;

use tracing::{debug, info};

/// Used when neither `--database-url` nor `DATABASE_URL` is given
pub const DEFAULT_DATABASE_URL: &str = "sqlite://listctl.db";

/// Load environment variables from .env files in multiple locations
///
/// Priority order (highest to lowest):
/// 1. Environment variables already set
/// 2. Current directory .env
/// 3. ~/.listctl/.env
///
/// dotenvy never overwrites a variable that is already set, so loading the
/// current directory first gives it precedence over the home directory.
///
/// Runs before logging is initialised; returns the files it loaded so they
/// can be reported afterwards.
pub fn load_dotenv() -> Vec<PathBuf> {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        loaded_from.push(path);
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() && dotenvy::from_path(&env_file).is_ok() {
            loaded_from.push(env_file);
        }
    }

    loaded_from
}

/// Report what [`load_dotenv`] found
pub fn log_dotenv(loaded_from: &[PathBuf]) {
    if loaded_from.is_empty() {
        debug!("No .env files found (current dir or ~/.listctl)");
        return;
    }

    for path in loaded_from {
        info!("Loaded configuration from {}", path.display());
    }
}

/// Get the listctl config directory path (~/.listctl)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".listctl"))
}
