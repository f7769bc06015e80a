pub(crate) mod profile;

pub use profile::extract;

use std::time::Duration;

use ::scraper::{ElementRef, Selector};
use tracing::debug;

use crate::error::FetchError;

/// Origin of the stats site; relative image paths are resolved against it.
pub const BASE_URL: &str = "https://faceitanalyser.com";

/// Fetch a URL and return the response body as text. `timeout` covers the
/// whole request including the body.
pub(crate) async fn fetch_page(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<String, FetchError> {
    debug!(url, "fetching page");

    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| FetchError::Http {
            url: url.to_owned(),
            source: e,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::UnexpectedStatus {
            url: url.to_owned(),
            status,
        });
    }

    response.text().await.map_err(|e| FetchError::ResponseBody {
        url: url.to_owned(),
        source: e,
    })
}

/// Extract trimmed text content from the first element matching `selector`
/// inside `element`. Returns `None` if nothing matches.
pub(crate) fn select_text(element: &ElementRef, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|e| e.text().map(str::trim).collect::<String>())
}

/// Normalize a potentially relative image URL to an absolute URL on `base`.
pub(crate) fn normalize_img_url(base: &str, src: &str) -> String {
    let base = base.trim_end_matches('/');
    if src.starts_with("http://") || src.starts_with("https://") {
        src.to_string()
    } else if src.starts_with("//") {
        format!("https:{src}")
    } else if src.starts_with('/') {
        format!("{base}{src}")
    } else {
        format!("{base}/{src}")
    }
}
