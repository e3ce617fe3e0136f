//! Offer filter engine
//!
//! Applies a group's keyword, blacklist and numeric-floor criteria to a page
//! of offers and returns the first acceptable match in upstream order. An
//! empty result is a normal outcome, not an error; it feeds the rotation
//! engine's empty-result counter.

use tracing::trace;
use crate::models::{Group, Offer};
use crate::utils::helpers::contains_ignore_case;

/// Filter criteria derived from a group plus the global defaults
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    /// Inclusion keywords; the title must contain at least one
    pub keywords: Vec<String>,
    /// Exclusion terms; any match rejects the offer outright
    pub blacklist: Vec<String>,
    pub min_discount: Option<i32>,
    pub min_rating: Option<f64>,
    pub min_sales: Option<i64>,
}

impl FilterCriteria {
    /// Build criteria for a group; groups without keywords of their own use
    /// the global default keyword set
    pub fn from_group(group: &Group, default_keywords: &[String]) -> Self {
        let keywords = if group.keywords.0.is_empty() {
            default_keywords.to_vec()
        } else {
            group.keywords.0.clone()
        };

        Self {
            keywords,
            blacklist: group.blacklist.0.clone(),
            min_discount: group.min_discount,
            min_rating: group.min_rating,
            min_sales: group.min_sales,
        }
    }
}

/// Select the first offer passing every filter stage, in upstream order
///
/// Stage order: blacklist rejection first (highest-precedence exclusion),
/// then keyword inclusion, then numeric floors. No re-ranking is applied.
pub fn select_offer(offers: &[Offer], criteria: &FilterCriteria) -> Option<Offer> {
    offers.iter().find(|offer| accepts(offer, criteria)).cloned()
}

fn accepts(offer: &Offer, criteria: &FilterCriteria) -> bool {
    if criteria.blacklist.iter().any(|term| contains_ignore_case(&offer.title, term)) {
        trace!(title = %offer.title, "Offer rejected by blacklist");
        return false;
    }

    if !criteria.keywords.is_empty()
        && !criteria.keywords.iter().any(|kw| contains_ignore_case(&offer.title, kw))
    {
        trace!(title = %offer.title, "Offer rejected: no keyword match");
        return false;
    }

    if let Some(min_discount) = criteria.min_discount {
        if offer.discount_percent < min_discount {
            return false;
        }
    }

    if let Some(min_rating) = criteria.min_rating {
        if offer.rating < min_rating {
            return false;
        }
    }

    if let Some(min_sales) = criteria.min_sales {
        if offer.sales_count < min_sales {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(title: &str, discount: i32) -> Offer {
        Offer {
            title: title.to_string(),
            price: 50.0,
            original_price: 80.0,
            discount_percent: discount,
            rating: 4.5,
            sales_count: 1000,
            affiliate_link: "https://s.shopee.com.br/abc".to_string(),
            category_id: Some(100113),
        }
    }

    fn criteria() -> FilterCriteria {
        FilterCriteria {
            keywords: vec!["casa".to_string()],
            blacklist: vec!["usado".to_string()],
            min_discount: Some(20),
            min_rating: None,
            min_sales: None,
        }
    }

    #[test]
    fn blacklist_takes_precedence_over_keyword_match() {
        // Matches the "casa" keyword, but the blacklisted "usado" wins
        let offers = vec![offer("Casa Usada kit 25% off", 25)];
        assert_eq!(select_offer(&offers, &criteria()), None);
    }

    #[test]
    fn blacklist_matches_inflected_and_plural_forms() {
        let offers = vec![
            offer("Kit casas usadas 40% off", 40), // plural of the blacklisted term
            offer("Casa com uso aparente", 40),    // "uso" is a different word
        ];

        let selected = select_offer(&offers, &criteria()).unwrap();
        assert_eq!(selected.title, "Casa com uso aparente");
    }

    #[test]
    fn accepts_first_offer_passing_all_stages() {
        let offers = vec![
            offer("Casa Usada kit 25% off", 25),       // blacklist
            offer("Kit Casa Organização 30% off", 30), // accepted
            offer("Kit Casa 10% off", 10),             // below floor, never reached
        ];

        let selected = select_offer(&offers, &criteria()).unwrap();
        assert_eq!(selected.title, "Kit Casa Organização 30% off");
    }

    #[test]
    fn rejects_offers_below_the_discount_floor() {
        let offers = vec![offer("Kit Casa 10% off", 10)];
        assert_eq!(select_offer(&offers, &criteria()), None);
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        let mut c = criteria();
        c.min_discount = None;
        let offers = vec![offer("KIT CASA premium", 5)];
        assert!(select_offer(&offers, &c).is_some());
    }

    #[test]
    fn rating_and_sales_floors_apply_when_set() {
        let mut c = criteria();
        c.min_discount = None;
        c.min_rating = Some(4.8);
        let offers = vec![offer("Kit Casa", 30)];
        assert_eq!(select_offer(&offers, &c), None);

        c.min_rating = None;
        c.min_sales = Some(5000);
        assert_eq!(select_offer(&offers, &c), None);

        c.min_sales = Some(500);
        assert!(select_offer(&offers, &c).is_some());
    }

    #[test]
    fn no_match_is_none_not_an_error() {
        let offers = vec![offer("Fone de ouvido bluetooth", 50)];
        assert_eq!(select_offer(&offers, &criteria()), None);
    }

    #[test]
    fn empty_page_yields_none() {
        assert_eq!(select_offer(&[], &criteria()), None);
    }
}
