pub use client::StatsClient;
pub use error::{Error, Result};
pub use model::*;
pub use render::CardRenderer;
pub use scraper::extract;
pub use service::{CardService, Registration};
pub use storage::Storage;

pub mod bot;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod render;
pub mod scraper;
pub mod service;
pub mod storage;
