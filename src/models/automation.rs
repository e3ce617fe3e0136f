//! Automation configuration model
//!
//! A single-row record read at the top of each scheduler tick. Toggling
//! `active` takes effect before the next tick; it never interrupts an
//! in-flight batch.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AutomationConfig {
    pub id: i64,
    pub active: bool,
    pub interval_minutes: i32,
    pub updated_at: DateTime<Utc>,
}
