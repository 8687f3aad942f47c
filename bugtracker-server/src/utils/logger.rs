//! Logging Infrastructure
//!
//! Structured logging setup with support for both development and production environments.

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize the logger with optional JSON lines and file output
///
/// `RUST_LOG` takes precedence over `log_level` when set. Console output
/// goes to stderr; stdout is reserved for exported data.
pub fn init_logger_with_file(log_level: Option<&str>, json: bool, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(true)
        .with_writer(std::io::stderr);

    // Add file output if log_dir is provided
    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists() {
            let file_appender = tracing_appender::rolling::daily(log_path, "bugtracker");
            let subscriber = subscriber.with_ansi(false).with_writer(file_appender);
            let result = if json {
                subscriber.json().try_init()
            } else {
                subscriber.try_init()
            };
            report(result);
            return;
        }
    }

    let result = if json {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };
    report(result);
}

fn report(result: Result<(), Box<dyn std::error::Error + Send + Sync>>) {
    // A global subscriber may already be installed (tests, embedding)
    if let Err(e) = result {
        tracing::debug!("Logger already initialized: {}", e);
    }
}
