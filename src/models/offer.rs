//! Offer model
//!
//! Offers are ephemeral: produced by the offers client per fetch call,
//! consumed immediately by the filter engine, and never stored beyond the
//! dispatch cycle except as a log entry summary.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub title: String,
    pub price: f64,
    pub original_price: f64,
    pub discount_percent: i32,
    /// Rating on a 0-5 scale
    pub rating: f64,
    pub sales_count: i64,
    pub affiliate_link: String,
    pub category_id: Option<i64>,
}
