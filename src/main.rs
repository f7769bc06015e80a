use std::path::PathBuf;
use std::process::ExitCode;

use faceit_card_bot::config::{Config, DEFAULT_LOG_FILE};
use faceit_card_bot::{bot, logging, CardService};
use teloxide::Bot;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::from_env();
    let log_file = config
        .as_ref()
        .map(|c| c.log_file.clone())
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_FILE));
    logging::init_logging(&log_file);

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let service = CardService::from_config(&config);
    if let Err(e) = service.storage().init_schema() {
        error!(path = %config.db_path.display(), error = %e, "cannot prepare database");
        return ExitCode::FAILURE;
    }

    bot::run(Bot::new(&config.bot_token), service).await;
    ExitCode::SUCCESS
}
