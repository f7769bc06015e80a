use tracing::{error, info, instrument, warn};

use crate::client::StatsClient;
use crate::config::Config;
use crate::error::{self, FetchError, RenderError, StorageError};
use crate::model::PlayerStats;
use crate::render::CardRenderer;
use crate::storage::Storage;

/// Outcome of a registration attempt.
#[derive(Debug)]
pub enum Registration {
    /// The nickname resolved and is now linked to the user.
    Registered(PlayerStats),
    /// The nickname does not resolve to a player; nothing was written.
    NotFound,
    /// The nickname resolved but could not be stored.
    StorageFailed(StorageError),
}

/// Everything a chat command needs: stats lookup, registrations and cards.
#[derive(Clone)]
pub struct CardService {
    client: StatsClient,
    storage: Storage,
    renderer: CardRenderer,
}

impl CardService {
    pub fn new(client: StatsClient, storage: Storage, renderer: CardRenderer) -> Self {
        Self {
            client,
            storage,
            renderer,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let client = StatsClient::new().with_base_url(&config.stats_base_url);
        let renderer = CardRenderer::new(client.http().clone(), &config.fonts_dir);
        Self::new(client, Storage::new(&config.db_path), renderer)
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Stats for `nickname`; `Ok(None)` when the site has no such player.
    #[instrument(skip(self))]
    pub async fn player_stats(&self, nickname: &str) -> Result<Option<PlayerStats>, FetchError> {
        match self.client.get_player_stats(nickname).await {
            Err(FetchError::UnexpectedStatus { status, .. })
                if status == reqwest::StatusCode::NOT_FOUND =>
            {
                info!("stats page not found");
                Ok(None)
            }
            result => result,
        }
    }

    /// Link `telegram_id` to `nickname` once the nickname resolves to a player.
    #[instrument(skip(self))]
    pub async fn register(&self, telegram_id: i64, nickname: &str) -> Result<Registration, FetchError> {
        let Some(stats) = self.player_stats(nickname).await? else {
            info!("nickname does not resolve, nothing stored");
            return Ok(Registration::NotFound);
        };

        let nickname = nickname.to_string();
        let stored = self
            .with_storage(move |storage| storage.upsert_registration(telegram_id, &nickname))
            .await;
        match stored {
            Ok(()) => Ok(Registration::Registered(stats)),
            Err(e) => {
                warn!(error = %e, "failed to store registration");
                Ok(Registration::StorageFailed(e))
            }
        }
    }

    /// Nickname a `/stat` command refers to: the first word of `argument`,
    /// or the caller's registered nickname when the argument is blank.
    pub async fn resolve_nickname(&self, telegram_id: i64, argument: &str) -> Option<String> {
        if let Some(nickname) = argument.split_whitespace().next() {
            return Some(nickname.to_string());
        }
        self.with_storage(move |storage| Ok(storage.lookup_nickname(telegram_id)))
            .await
            .unwrap_or_else(|e| {
                error!(error = %e, "nickname lookup did not complete");
                None
            })
    }

    /// Run a blocking storage operation off the async worker threads.
    async fn with_storage<T, F>(&self, op: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&Storage) -> Result<T, StorageError> + Send + 'static,
    {
        let storage = self.storage.clone();
        tokio::task::spawn_blocking(move || op(&storage)).await?
    }

    /// Stats and rendered PNG card of `nickname`; `Ok(None)` when the site
    /// has no such player.
    pub async fn player_card(&self, nickname: &str) -> error::Result<Option<(PlayerStats, Vec<u8>)>> {
        let Some(stats) = self.player_stats(nickname).await? else {
            return Ok(None);
        };
        let png = self.card(&stats).await?;
        Ok(Some((stats, png)))
    }

    /// Render the PNG player card for `stats`.
    pub async fn card(&self, stats: &PlayerStats) -> Result<Vec<u8>, RenderError> {
        self.renderer.render_png(stats).await
    }
}
