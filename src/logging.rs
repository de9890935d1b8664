use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install the global subscriber.
///
/// Terminal output goes to stderr: `dinghy=debug` with `--verbose`, otherwise
/// `RUST_LOG` (default `dinghy=warn`). Every run also appends `dinghy=debug`
/// to `log_file`; if it cannot be opened, file logging is skipped.
pub fn init(verbose: bool, log_file: &Path) {
    let terminal_filter = if verbose {
        EnvFilter::new("dinghy=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dinghy=warn"))
    };

    let terminal_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(terminal_filter);

    let file_layer = match open_log_file(log_file) {
        Ok(file) => Some(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .with_filter(EnvFilter::new("dinghy=debug")),
        ),
        Err(e) => {
            eprintln!(
                "warning: not writing debug log to {}: {e}",
                log_file.display()
            );
            None
        }
    };

    tracing_subscriber::registry()
        .with(terminal_layer)
        .with(file_layer)
        .init();
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
