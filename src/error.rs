use ::scraper::error::SelectorErrorKind;
use std::num::ParseFloatError;

/// Errors raised while downloading a stats page.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// Server returned a non-success HTTP status code.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Failed to read the response body as text.
    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },
}

/// Errors raised while loading one auxiliary card image (avatar, flag, level).
///
/// These never escape the renderer; they are turned into placeholders.
#[derive(thiserror::Error, Debug)]
pub enum ImageLoadError {
    #[error("image url is missing")]
    MissingUrl,

    #[error("image request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    #[error("unexpected status {status} for image {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to convert svg {url}: {source}")]
    Svg {
        url: String,
        source: resvg::usvg::Error,
    },

    #[error("failed to decode image {url}: {source}")]
    Decode {
        url: String,
        source: image::ImageError,
    },

    #[error("cannot allocate a {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },
}

/// Errors from the SQLite registration store.
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to remove database file: {0}")]
    Io(#[from] std::io::Error),

    #[error("database task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Unexpected failures while composing a player card.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// A thresholded main value could not be read as a number.
    #[error("main value {value:?} of {title:?} is not a number: {source}")]
    InvalidMainValue {
        title: String,
        value: String,
        source: ParseFloatError,
    },

    #[error("failed to parse card svg: {0}")]
    Svg(#[from] resvg::usvg::Error),

    #[error("cannot allocate the card canvas")]
    Canvas,

    #[error("failed to encode png: {0}")]
    Encode(String),

    #[error("render task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Startup configuration errors.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),
}

/// All errors surfaced by the crate.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Render(#[from] RenderError),

    /// A CSS selector string could not be parsed.
    #[error("invalid CSS selector: {0}")]
    Selector(String),
}

impl<'a> From<SelectorErrorKind<'a>> for Error {
    fn from(err: SelectorErrorKind<'a>) -> Self {
        Error::Selector(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
