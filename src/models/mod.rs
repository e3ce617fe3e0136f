//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod group;
pub mod offer;
pub mod log;
pub mod template;
pub mod automation;

// Re-export commonly used models
pub use group::{Group, CategoryRef, RotationState, SortType, CreateGroupRequest, UpdateGroupRequest};
pub use offer::Offer;
pub use log::{LogEntry, LogStatus, CreateLogRequest, ReportSummary};
pub use template::{MessageTemplate, SaveTemplateRequest};
pub use automation::AutomationConfig;
