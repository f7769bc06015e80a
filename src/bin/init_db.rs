//! Recreate the registrations database from scratch.
//!
//! Usage: `cargo run --bin init_db` (reads `DB_PATH`, `.env` included).

use std::path::PathBuf;
use std::process::ExitCode;

use faceit_card_bot::Storage;

const DEFAULT_DB_PATH: &str = "faceit_bot.sqlite3";

fn main() -> ExitCode {
    tracing_subscriber::fmt().init();
    dotenvy::dotenv().ok();

    let path = std::env::var("DB_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

    match Storage::reset(&path) {
        Ok(_) => {
            tracing::info!(path = %path.display(), "database initialized");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to initialize database");
            ExitCode::FAILURE
        }
    }
}
