//! Tracing subscriber setup.

use crate::config::{Config, DEFAULT_LOG_LEVEL, LoggingConfig};

use tracing::{info, warn};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_PREFIX: &str = "autoclicker.log";

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over the configured level. The returned guard flushes
/// the file writer on drop and must be held for the life of the process.
pub(crate) fn init(logging: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let mut dir_error = None;
    let (file_writer, guard) = match logging.file.then(Config::log_dir) {
        Some(Ok(dir)) => {
            let appender = rolling::daily(&dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some((writer, dir)), Some(guard))
        }
        Some(Err(e)) => {
            dir_error = Some(e);
            (None, None)
        }
        None => (None, None),
    };

    let log_dir = file_writer.as_ref().map(|(_, dir)| dir.clone());
    let file_writer = file_writer.map(|(writer, _)| writer);

    let text_file = file_writer
        .clone()
        .filter(|_| !logging.json)
        .map(|writer| fmt::layer().with_ansi(false).with_writer(writer));
    let json_file = file_writer
        .filter(|_| logging.json)
        .map(|writer| fmt::layer().json().with_writer(writer));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(text_file)
        .with(json_file)
        .try_init();

    if let Err(e) = installed {
        eprintln!("Failed to install tracing subscriber: {}", e);
        return guard;
    }

    if let Some(e) = dir_error {
        warn!(error = %e, "File logging disabled");
    }
    if let Some(dir) = log_dir {
        info!(log_dir = ?dir, json = logging.json, "File logging enabled");
    }

    guard
}
