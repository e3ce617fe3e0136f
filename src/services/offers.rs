//! Shopee affiliate offers client
//!
//! This service wraps the affiliate GraphQL endpoint: signed request
//! construction, response parsing into `Offer` values, and mapping of
//! upstream failures into recoverable errors. It also owns the category
//! name-to-id table used to resolve operator-entered category names into
//! canonical numeric ids at configuration-save time.

use std::time::Duration;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use crate::config::settings::ShopeeConfig;
use crate::models::{CategoryRef, Offer, SortType};
use crate::utils::errors::{ZapOfertasError, Result};
use crate::utils::helpers::truncate_text;
use crate::utils::logging::log_upstream_error;

/// Category name-to-id table for the Brazilian marketplace
///
/// Operator-facing names are matched lowercase and trimmed. Unknown names
/// resolve to `None`; they never silently default.
const CATEGORY_TABLE: &[(&str, i64)] = &[
    ("casa", 100113),
    ("beleza", 100109),
    ("eletronicos", 100011),
    ("moda feminina", 100017),
    ("moda masculina", 100018),
    ("bebes", 100023),
    ("esporte", 100035),
    ("informatica", 100042),
    ("celulares", 100051),
];

/// Resolve a category name to its upstream numeric id
///
/// A purely numeric string always resolves to that number unchanged.
pub fn resolve_category_name(name: &str) -> Option<i64> {
    let normalized = name.trim().to_lowercase();

    if let Ok(id) = normalized.parse::<i64>() {
        return Some(id);
    }

    CATEGORY_TABLE
        .iter()
        .find(|(key, _)| *key == normalized)
        .map(|(_, id)| *id)
}

/// Resolve a configured category reference to a canonical numeric id
pub fn resolve_category(category: &CategoryRef) -> Result<i64> {
    match category {
        CategoryRef::Numeric(id) => Ok(*id),
        CategoryRef::Named(name) => resolve_category_name(name)
            .ok_or_else(|| ZapOfertasError::CategoryResolution { name: name.clone() }),
    }
}

/// Affiliate API response envelope
#[derive(Debug, Clone, Deserialize)]
struct OffersResponse {
    data: Option<OffersData>,
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Clone, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Clone, Deserialize)]
struct OffersData {
    #[serde(rename = "productOfferV2")]
    product_offer_v2: Option<OfferPage>,
}

#[derive(Debug, Clone, Deserialize)]
struct OfferPage {
    nodes: Vec<OfferNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OfferNode {
    product_name: String,
    price_min: String,
    price_max: String,
    price_discount_rate: i32,
    rating_star: String,
    sales: i64,
    offer_link: String,
    #[serde(default)]
    product_cat_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize)]
struct GraphqlRequest {
    query: String,
}

/// Client for the Shopee affiliate offers upstream
#[derive(Debug, Clone)]
pub struct OffersClient {
    client: Client,
    config: ShopeeConfig,
}

impl OffersClient {
    /// Create a new OffersClient instance
    pub fn new(config: ShopeeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("ZapOfertas/1.0")
            .build()
            .map_err(ZapOfertasError::Http)?;

        Ok(Self { client, config })
    }

    /// Fetch one page of offers for a category and sort preference
    ///
    /// `category_id` of `None` queries without a category constraint.
    /// Upstream failures surface as `Upstream` errors: recoverable for this
    /// cycle, never fatal to the batch.
    pub async fn fetch_offers(
        &self,
        category_id: Option<i64>,
        sort: SortType,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Offer>> {
        let payload = serde_json::to_string(&GraphqlRequest {
            query: build_query(category_id, sort, page, page_size),
        })?;

        let timestamp = chrono::Utc::now().timestamp();
        let signature = sign_request(&self.config.app_id, timestamp, &payload, &self.config.app_secret);
        let authorization = format!(
            "SHA256 Credential={}, Timestamp={}, Signature={}",
            self.config.app_id, timestamp, signature
        );

        debug!(category_id = category_id, page = page, "Fetching offers");

        let response = self.client
            .post(&self.config.api_url)
            .header("Authorization", authorization)
            .header("Content-Type", "application/json")
            .body(payload)
            .send()
            .await
            .map_err(ZapOfertasError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let message = truncate_text(&response.text().await.unwrap_or_default(), 300);
            log_upstream_error("shopee", &message, Some(&format!("status {}", status)));
            return Err(ZapOfertasError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let body: OffersResponse = response.json().await.map_err(ZapOfertasError::Http)?;

        if let Some(errors) = body.errors {
            let message = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            log_upstream_error("shopee", &message, None);
            return Err(ZapOfertasError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let nodes = body.data
            .and_then(|d| d.product_offer_v2)
            .map(|p| p.nodes)
            .unwrap_or_default();

        let offers = nodes.into_iter().map(|node| node_to_offer(node, category_id)).collect();
        Ok(offers)
    }
}

/// Build the productOfferV2 query for one page
fn build_query(category_id: Option<i64>, sort: SortType, page: u32, page_size: u32) -> String {
    let category_arg = category_id
        .map(|id| format!("productCatId: {}, ", id))
        .unwrap_or_default();

    format!(
        "{{ productOfferV2({}sortType: {}, page: {}, limit: {}) {{ \
         nodes {{ productName priceMin priceMax priceDiscountRate ratingStar sales offerLink productCatIds }} }} }}",
        category_arg,
        sort.as_api_code(),
        page,
        page_size
    )
}

/// Compute the affiliate request signature: sha256(app_id + timestamp + payload + secret)
fn sign_request(app_id: &str, timestamp: i64, payload: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(app_id.as_bytes());
    hasher.update(timestamp.to_string().as_bytes());
    hasher.update(payload.as_bytes());
    hasher.update(secret.as_bytes());

    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}

fn node_to_offer(node: OfferNode, requested_category: Option<i64>) -> Offer {
    let price = parse_price(&node.price_min);
    let original_price = parse_price(&node.price_max);

    // Prefer the upstream's own category tag; fall back to what was asked for
    let category_id = node.product_cat_ids.first().copied().or(requested_category);

    Offer {
        title: node.product_name,
        price,
        original_price: if original_price > 0.0 { original_price } else { price },
        discount_percent: node.price_discount_rate,
        rating: node.rating_star.parse().unwrap_or(0.0),
        sales_count: node.sales,
        affiliate_link: node.offer_link,
        category_id,
    }
}

fn parse_price(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or_else(|_| {
        warn!(raw = raw, "Unparseable price from upstream, treating as 0");
        0.0
    })
}
