//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{ZapOfertasError, Result};
use super::Settings;
use super::settings::ALLOWED_INTERVALS;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_shopee_config(&settings.shopee)?;
    validate_whatsapp_config(&settings.whatsapp)?;
    validate_database_config(&settings.database)?;
    validate_scheduler_config(&settings.scheduler)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate Shopee affiliate API configuration
fn validate_shopee_config(config: &super::ShopeeConfig) -> Result<()> {
    if config.app_id.is_empty() {
        return Err(ZapOfertasError::Config(
            "Shopee app_id is required".to_string()
        ));
    }

    if config.app_secret.is_empty() {
        return Err(ZapOfertasError::Config(
            "Shopee app_secret is required".to_string()
        ));
    }

    url::Url::parse(&config.api_url)
        .map_err(|_| ZapOfertasError::Config(
            format!("Invalid Shopee API URL: {}", config.api_url)
        ))?;

    if config.page_size == 0 {
        return Err(ZapOfertasError::Config(
            "Shopee page_size must be greater than 0".to_string()
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(ZapOfertasError::Config(
            "Shopee timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate WhatsApp gateway configuration
fn validate_whatsapp_config(config: &super::WhatsAppConfig) -> Result<()> {
    url::Url::parse(&config.api_url)
        .map_err(|_| ZapOfertasError::Config(
            format!("Invalid WhatsApp gateway URL: {}", config.api_url)
        ))?;

    if config.timeout_seconds == 0 {
        return Err(ZapOfertasError::Config(
            "WhatsApp timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(ZapOfertasError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(ZapOfertasError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(ZapOfertasError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate scheduler configuration
fn validate_scheduler_config(config: &super::SchedulerConfig) -> Result<()> {
    if !ALLOWED_INTERVALS.contains(&config.default_interval_minutes) {
        return Err(ZapOfertasError::Config(
            format!(
                "Invalid default interval: {}. Valid intervals: {:?}",
                config.default_interval_minutes, ALLOWED_INTERVALS
            )
        ));
    }

    if config.default_keywords.is_empty() {
        return Err(ZapOfertasError::Config(
            "At least one default keyword is required".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(ZapOfertasError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(ZapOfertasError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.shopee.app_id = "18330800100".to_string();
        settings.shopee.app_secret = "secret".to_string();
        settings
    }

    #[test]
    fn default_settings_with_credentials_validate() {
        assert!(validate_settings(&valid_settings()).is_ok());
    }

    #[test]
    fn missing_app_id_is_rejected() {
        let mut settings = valid_settings();
        settings.shopee.app_id.clear();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn interval_outside_allowed_set_is_rejected() {
        let mut settings = valid_settings();
        settings.scheduler.default_interval_minutes = 45;
        assert!(validate_settings(&settings).is_err());
    }
}
