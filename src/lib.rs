//! ZapOfertas
//!
//! Backend for broadcasting Shopee affiliate offers into WhatsApp groups.
//! The core is a dispatch scheduler: per active group it rotates through
//! configured product categories, fetches candidate offers, filters them by
//! keyword/blacklist/threshold rules, renders the match through a message
//! template and sends it via the WhatsApp gateway, logging every outcome.

pub mod config;
pub mod database;
pub mod models;
pub mod scheduler;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{ZapOfertasError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use scheduler::{Scheduler, BatchTrigger, BatchSummary};
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
