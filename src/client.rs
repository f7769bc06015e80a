use std::time::Duration;

use tracing::instrument;

use crate::error::FetchError;
use crate::model::PlayerStats;
use crate::scraper::{self, BASE_URL};

const PAGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for faceitanalyser.com stats pages.
///
/// `StatsClient` wraps a [`reqwest::Client`] and turns a faceit nickname into
/// [`PlayerStats`].
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> Result<(), faceit_card_bot::error::FetchError> {
/// use faceit_card_bot::StatsClient;
///
/// let client = StatsClient::new();
/// match client.get_player_stats("s1mple").await? {
///     Some(stats) => println!("{} has {}", stats.name, stats.elo),
///     None => println!("no such player"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct StatsClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl StatsClient {
    /// Create a new client with default settings.
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Create a new client using the provided [`reqwest::Client`].
    ///
    /// Use this when you need to configure proxies or default headers.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            http: client,
            base_url: BASE_URL.to_string(),
            timeout: PAGE_TIMEOUT,
        }
    }

    /// Limit for a whole stats page request. Defaults to 30 seconds.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Point the client at another origin serving the same page layout.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The underlying HTTP client, shared with the card renderer.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Stats page URL for `nickname`. The nickname is used verbatim as a path segment.
    pub fn stats_url(&self, nickname: &str) -> String {
        format!("{}/stats/{nickname}/cs2", self.base_url)
    }

    /// Download the raw stats page for `nickname`.
    #[instrument(skip(self))]
    pub async fn fetch_page(&self, nickname: &str) -> Result<String, FetchError> {
        scraper::fetch_page(&self.http, &self.stats_url(nickname), self.timeout).await
    }

    /// Fetch and extract the stats of `nickname`.
    ///
    /// `Ok(None)` means the page was served but does not describe a player.
    #[instrument(skip(self))]
    pub async fn get_player_stats(&self, nickname: &str) -> Result<Option<PlayerStats>, FetchError> {
        let html = self.fetch_page(nickname).await?;
        Ok(scraper::profile::extract_with_base(&html, &self.base_url))
    }
}

impl Default for StatsClient {
    fn default() -> Self {
        Self::new()
    }
}
