//! Logging initialization
//!
//! Writes structured logs to a file under the feedkit data directory. The
//! filter comes from `RUST_LOG`, then `FEEDKIT_LOGLEVEL`, then defaults to
//! info for this crate only.

use color_eyre::eyre::Result;
use tracing_error::ErrorLayer;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::Layer;

use super::paths::{get_data_dir, LOG_ENV, LOG_FILE};

pub fn initialize_logging() -> Result<()> {
    let directory = get_data_dir();
    std::fs::create_dir_all(&directory)?;
    let log_file = std::fs::File::create(directory.join(LOG_FILE.clone()))?;

    std::env::set_var(
        "RUST_LOG",
        std::env::var("RUST_LOG")
            .or_else(|_| std::env::var(LOG_ENV.clone()))
            .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME"))),
    );

    let file_layer = tracing_subscriber::fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_filter(EnvFilter::from_default_env());

    // A host app may have installed its own subscriber before initializing
    // the SDK; feedkit then logs through that one instead of claiming the
    // global default.
    let already_set = tracing_subscriber::registry()
        .with(file_layer)
        .with(ErrorLayer::default())
        .try_init()
        .is_err();
    if already_set {
        tracing::debug!("global tracing subscriber already set, keeping it");
    }

    Ok(())
}
