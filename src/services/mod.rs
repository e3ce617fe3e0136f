//! Services module
//!
//! This module contains business logic services

pub mod channel;
pub mod dispatch;
pub mod filter;
pub mod offers;
pub mod rotation;

// Re-export commonly used services
pub use channel::{WhatsAppChannel, ChannelStatus};
pub use dispatch::DispatchService;
pub use filter::{FilterCriteria, select_offer};
pub use offers::{OffersClient, resolve_category, resolve_category_name};
pub use rotation::{RotationPolicy, Cursor, EmptyOutcome};

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Debug, Clone)]
pub struct ServiceFactory {
    pub offers_client: OffersClient,
    pub channel: WhatsAppChannel,
    pub dispatch_service: DispatchService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: &Settings, db: DatabaseService) -> Result<Self> {
        let offers_client = OffersClient::new(settings.shopee.clone())?;
        let channel = WhatsAppChannel::new(settings.whatsapp.clone())?;
        let dispatch_service = DispatchService::new(channel.clone(), db);

        Ok(Self {
            offers_client,
            channel,
            dispatch_service,
        })
    }
}
