//! Dispatch log model
//!
//! Log entries are append-only and never mutated after creation. They are
//! the source of truth for the reports aggregation.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "log_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum LogStatus {
    Sent,
    Error,
    Pending,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LogEntry {
    pub id: i64,
    /// Group name denormalized at dispatch time
    pub group_name: String,
    pub product_title: String,
    /// Formatted price string as it appeared in the message
    pub price: String,
    pub status: LogStatus,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLogRequest {
    pub group_name: String,
    pub product_title: String,
    pub price: String,
    pub status: LogStatus,
    pub error_message: Option<String>,
}

/// Aggregated log counts surfaced by the reports API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub sent: i64,
    pub errors: i64,
    pub pending: i64,
    /// Most recent error message, if any
    pub last_error: Option<String>,
}
