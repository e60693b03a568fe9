//! Deal Aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::domain::value_objects::DiscountRate;

/// Category value that makes a deal apply to every medicine.
pub const ALL_CATEGORIES: &str = "All";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Deal {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Free text as entered by the admin, e.g. `"15%"`.
    pub discount: String,
    pub code: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct DealDraft {
    pub title: String,
    pub description: String,
    pub discount: String,
    pub code: String,
    pub category: String,
}

impl Default for DealDraft {
    fn default() -> Self {
        Self {
            title: String::new(), description: String::new(), discount: "0%".into(),
            code: "OFFER".into(), category: ALL_CATEGORIES.into(),
        }
    }
}

impl Deal {
    pub fn create(draft: DealDraft) -> Self {
        Self {
            id: Uuid::now_v7(), title: draft.title, description: draft.description, discount: draft.discount,
            code: draft.code, category: draft.category, created_at: Utc::now(),
        }
    }

    pub fn applies_to(&self, category: &str) -> bool {
        self.category == category || self.category == ALL_CATEGORIES
    }

    pub fn rate(&self) -> DiscountRate { DiscountRate::parse_or_none(&self.discount) }
}

/// True when some deal covers `category`.
pub fn category_has_deal(deals: &[Deal], category: &str) -> bool {
    deals.iter().any(|d| d.applies_to(category))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deal(category: &str, discount: &str) -> Deal {
        Deal::create(DealDraft { title: "Promo".into(), category: category.into(), discount: discount.into(), ..Default::default() })
    }

    #[test]
    fn test_applies_to() {
        assert!(deal("Vitamins", "10%").applies_to("Vitamins"));
        assert!(!deal("Vitamins", "10%").applies_to("vitamins"));
        assert!(deal(ALL_CATEGORIES, "10%").applies_to("Anything"));
    }

    #[test]
    fn test_defaults_and_rate() {
        let d = Deal::create(DealDraft { title: "Launch".into(), ..Default::default() });
        assert_eq!((d.code.as_str(), d.category.as_str()), ("OFFER", ALL_CATEGORIES));
        assert!(d.rate().is_zero());
        assert!(deal("Vitamins", "bogus").rate().is_zero());
    }

    #[test]
    fn test_category_has_deal() {
        let deals = vec![deal("Skin Care", "5%")];
        assert!(category_has_deal(&deals, "Skin Care"));
        assert!(!category_has_deal(&deals, "Vitamins"));
        assert!(!category_has_deal(&[], "Vitamins"));
    }
}
