//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Allowed scheduler intervals in minutes
pub const ALLOWED_INTERVALS: [i32; 4] = [5, 15, 30, 60];

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub shopee: ShopeeConfig,
    pub whatsapp: WhatsAppConfig,
    pub database: DatabaseConfig,
    pub scheduler: SchedulerConfig,
    pub logging: LoggingConfig,
}

/// Shopee affiliate API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShopeeConfig {
    pub api_url: String,
    pub app_id: String,
    pub app_secret: String,
    pub page_size: u32,
    pub timeout_seconds: u64,
}

/// WhatsApp gateway configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WhatsAppConfig {
    pub api_url: String,
    pub api_key: String,
    pub timeout_seconds: u64,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Scheduler configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchedulerConfig {
    /// Interval used when the automation record has not been configured yet
    pub default_interval_minutes: i32,
    /// Pause between groups on timer-driven runs
    pub scheduled_delay_seconds: u64,
    /// Pause between groups on manual run-once triggers
    pub manual_delay_seconds: u64,
    /// Keyword set applied to groups that define no keywords of their own
    pub default_keywords: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("ZAPOFERTAS"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::ZapOfertasError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            shopee: ShopeeConfig {
                api_url: "https://open-api.affiliate.shopee.com.br/graphql".to_string(),
                app_id: String::new(),
                app_secret: String::new(),
                page_size: 20,
                timeout_seconds: 10,
            },
            whatsapp: WhatsAppConfig {
                api_url: "http://localhost:21465".to_string(),
                api_key: String::new(),
                timeout_seconds: 15,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/zapofertas".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            scheduler: SchedulerConfig {
                default_interval_minutes: 60,
                scheduled_delay_seconds: 30,
                manual_delay_seconds: 5,
                default_keywords: vec![
                    "promoção".to_string(),
                    "oferta".to_string(),
                    "desconto".to_string(),
                ],
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "/var/log/zapofertas".to_string(),
            },
        }
    }
}
