//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the ZapOfertas application.

use tracing::{info, warn, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration
pub fn init_logging(config: &LoggingConfig) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "zapofertas.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log the outcome of one dispatch attempt
pub fn log_dispatch(group_name: &str, product_title: &str, success: bool, error: Option<&str>) {
    if success {
        info!(
            group = group_name,
            product = product_title,
            "Offer dispatched"
        );
    } else {
        error!(
            group = group_name,
            product = product_title,
            error = error,
            "Offer dispatch failed"
        );
    }
}

/// Log a category rotation transition
pub fn log_rotation(group_name: &str, from_category: Option<i64>, to_category: Option<i64>, cooldown_minutes: i64) {
    info!(
        group = group_name,
        from_category = from_category,
        to_category = to_category,
        cooldown_minutes = cooldown_minutes,
        "Category rotated"
    );
}

/// Log an upstream API failure with context
pub fn log_upstream_error(api: &str, error: &str, context: Option<&str>) {
    warn!(
        api = api,
        error = error,
        context = context,
        "Upstream API error"
    );
}
