//! Promotion engine: applies active deals to a cart.
//!
//! Each cart line is matched against the deal list in order; the first deal
//! whose category equals the line's category, or is [`ALL_CATEGORIES`], wins
//! even if its discount text cannot be read (that counts as 0%).
//!
//! [`ALL_CATEGORIES`]: crate::domain::aggregates::ALL_CATEGORIES

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;
use crate::domain::aggregates::{CartItem, Deal};
use crate::domain::value_objects::{DiscountRate, Money, Quantity};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AppliedDeal {
    pub id: Uuid,
    pub title: String,
    pub code: String,
    pub category: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PricedLine {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub category: String,
    pub quantity: Quantity,
    pub original_price: Money,
    pub final_price: Money,
    pub discount_percent: Decimal,
    pub applied_deal: Option<AppliedDeal>,
    pub line_total: Money,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PricedCart {
    pub lines: Vec<PricedLine>,
    /// Before discounts.
    pub original_total: Money,
    pub total_savings: Money,
    /// Amount charged at payment.
    pub total: Money,
}

pub fn find_deal<'a>(category: &str, deals: &'a [Deal]) -> Option<&'a Deal> {
    deals.iter().find(|d| d.applies_to(category))
}

pub fn price_line(item: &CartItem, deals: &[Deal]) -> PricedLine {
    let deal = find_deal(&item.category, deals);
    let rate = deal.map(Deal::rate).unwrap_or(DiscountRate::NONE);
    let final_price = item.price.discounted(rate);
    PricedLine {
        id: item.id,
        name: item.name.clone(),
        image: item.image.clone(),
        category: item.category.clone(),
        quantity: item.quantity,
        original_price: item.price,
        final_price,
        discount_percent: rate.percent(),
        applied_deal: deal.map(|d| AppliedDeal { id: d.id, title: d.title.clone(), code: d.code.clone(), category: d.category.clone() }),
        line_total: final_price.multiply(item.quantity),
    }
}

pub fn price_cart(items: &[CartItem], deals: &[Deal]) -> PricedCart {
    let lines: Vec<PricedLine> = items.iter().map(|i| price_line(i, deals)).collect();
    let original: Money = lines.iter().map(|l| l.original_price.multiply(l.quantity)).sum();
    let total: Money = lines.iter().map(|l| l.line_total).sum();
    PricedCart {
        original_total: original.rounded(),
        total_savings: (original - total).rounded(),
        total: total.rounded(),
        lines,
    }
}
