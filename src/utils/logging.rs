//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging
//! utilities for the UniEvent application.

use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration.
///
/// Returns the worker guard for the non-blocking file writer; the caller
/// must keep it alive for the lifetime of the process or file output stops.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "unievent.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log admin mutations with structured data
pub fn log_admin_action(admin_email: &str, action: &str, target: &str) {
    info!(
        admin = admin_email,
        action = action,
        target = target,
        "Admin action performed"
    );
}
