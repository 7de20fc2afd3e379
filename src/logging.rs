//! Tracing setup.
//!
//! Filtering follows `RUST_LOG` (default `info`), e.g.
//! `RUST_LOG=artisanpost::share=debug`.
//!
//! The dashboard owns the terminal, so it logs to
//! `<data_dir>/artisanpost/logs/artisanpost.log` with daily rotation.
//! Headless commands log to stderr.

use crate::config::APP_DIR;
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_FILE: &str = "artisanpost.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn default_log_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join(APP_DIR).join("logs"))
}

/// File logging for the TUI. Falls back to no logging if the directory
/// cannot be created; stderr is not usable once the screen is taken over.
pub fn init_file(log_dir: Option<PathBuf>) {
    let file_layer = log_dir
        .or_else(default_log_dir)
        .and_then(|dir| match std::fs::create_dir_all(&dir) {
            Ok(()) => Some(dir),
            Err(e) => {
                eprintln!("Warning: Could not initialize file logging: {}", e);
                None
            }
        })
        .map(|dir| {
            let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE);
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true)
                .with_filter(env_filter())
        });

    let _ = tracing_subscriber::registry().with(file_layer).try_init();
}

pub fn init_stderr() {
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(env_filter());

    let _ = tracing_subscriber::registry().with(console_layer).try_init();
}
