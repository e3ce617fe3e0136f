//! Database repositories module
//!
//! This module contains repository implementations for data access

pub mod group;
pub mod log;
pub mod template;
pub mod automation;

pub use group::GroupRepository;
pub use log::LogRepository;
pub use template::TemplateRepository;
pub use automation::AutomationRepository;
