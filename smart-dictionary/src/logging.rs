use std::fs::File;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Logs go to stderr at `warn` unless `RUST_LOG` says otherwise.
///
/// Set `SMART_DICTIONARY_LOG` to a file path to keep them out of the prompt.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let log_path = std::env::var("SMART_DICTIONARY_LOG").ok();
    let Some(file) = open_log_file(log_path.as_deref()) else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .init();
        return;
    };

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();
}

/// `None` sends logs to stderr, either because no path was given or because
/// the file can't be created.
fn open_log_file(path: Option<&str>) -> Option<File> {
    let path = path?;
    match File::create(path) {
        Ok(file) => Some(file),
        Err(error) => {
            eprintln!("Warning: Failed to create log file {path}: {error}, logging to stderr");
            None
        }
    }
}
