use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info,hyper=warn,reqwest=warn";

/// Install the global subscriber: human-readable logs to stderr and, when
/// the file can be opened, the same records appended to `log_file`.
///
/// `RUST_LOG` overrides the default filter.
pub fn init_logging(log_file: &Path) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file = OpenOptions::new().create(true).append(true).open(log_file);
    let file_error = file.as_ref().err().map(ToString::to_string);
    let file_layer = file.ok().map(|file| {
        fmt::layer()
            .with_ansi(false)
            .with_writer(Arc::new(file))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    if let Some(error) = file_error {
        tracing::warn!(path = %log_file.display(), error = %error, "cannot open log file, logging to stderr only");
    }
}
