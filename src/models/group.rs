//! Group model and rotation state

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use sqlx::types::Json;

/// Sort preference applied when querying the offers upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "sort_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SortType {
    SalesDesc,
    CommissionDesc,
    DiscountDesc,
}

impl SortType {
    /// Numeric sort code expected by the affiliate API
    pub fn as_api_code(&self) -> i32 {
        match self {
            SortType::SalesDesc => 2,
            SortType::CommissionDesc => 3,
            SortType::DiscountDesc => 4,
        }
    }
}

/// A configured target category: either a canonical numeric id or a
/// human-entered name that must be resolved before use
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Numeric(i64),
    Named(String),
}

/// Per-group cursor over the configured category list
///
/// Owned by the group row and persisted atomically with it. Mutated
/// exclusively by the rotation engine after each fetch attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationState {
    /// Currently active category id; always a member of the group's
    /// resolved category list, or None when rotation is inapplicable
    pub category_id: Option<i64>,
    /// Page to request next; reset to 1 only when the category changes
    pub page: u32,
    /// Consecutive fetch+filter cycles that produced no accepted offer
    pub empty_count: u32,
    /// Category id -> timestamp after which it may be retried
    pub cooldowns: HashMap<i64, DateTime<Utc>>,
}

impl Default for RotationState {
    fn default() -> Self {
        Self {
            category_id: None,
            page: 1,
            empty_count: 0,
            cooldowns: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub invite_link: Option<String>,
    /// Chat identifier on the messaging channel; absent until the bot joins
    pub chat_id: Option<String>,
    pub is_active: bool,
    /// Ordered keyword list; empty means the global default set applies
    pub keywords: Json<Vec<String>>,
    /// Negative keywords; any match suppresses the offer
    pub blacklist: Json<Vec<String>>,
    /// Free-text label for organizing groups
    pub category_label: Option<String>,
    /// Target categories for offer fetching
    pub product_categories: Json<Vec<CategoryRef>>,
    pub sort_type: SortType,
    pub min_discount: Option<i32>,
    pub min_rating: Option<f64>,
    pub min_sales: Option<i64>,
    pub rotation_enabled: bool,
    pub rotation_empty_threshold: i32,
    pub rotation_cooldown_minutes: i64,
    pub rotation_state: Json<RotationState>,
    pub last_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    pub invite_link: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub blacklist: Option<Vec<String>>,
    pub category_label: Option<String>,
    pub product_categories: Option<Vec<CategoryRef>>,
    pub sort_type: Option<SortType>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateGroupRequest {
    pub name: Option<String>,
    pub invite_link: Option<String>,
    pub chat_id: Option<String>,
    pub is_active: Option<bool>,
    pub keywords: Option<Vec<String>>,
    pub blacklist: Option<Vec<String>>,
    pub category_label: Option<String>,
    pub product_categories: Option<Vec<CategoryRef>>,
    pub sort_type: Option<SortType>,
    pub min_discount: Option<i32>,
    pub min_rating: Option<f64>,
    pub min_sales: Option<i64>,
    pub rotation_enabled: Option<bool>,
    pub rotation_empty_threshold: Option<i32>,
    pub rotation_cooldown_minutes: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_ref_deserializes_number_or_string() {
        let refs: Vec<CategoryRef> = serde_json::from_str(r#"[100113, "beleza"]"#).unwrap();
        assert_eq!(refs[0], CategoryRef::Numeric(100113));
        assert_eq!(refs[1], CategoryRef::Named("beleza".to_string()));
    }

    #[test]
    fn rotation_state_starts_at_page_one() {
        let state = RotationState::default();
        assert_eq!(state.page, 1);
        assert_eq!(state.empty_count, 0);
        assert!(state.category_id.is_none());
        assert!(state.cooldowns.is_empty());
    }

    #[test]
    fn rotation_state_round_trips_through_json() {
        let mut state = RotationState::default();
        state.category_id = Some(100113);
        state.cooldowns.insert(100109, Utc::now());

        let json = serde_json::to_string(&state).unwrap();
        let back: RotationState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
