//! Order Aggregate
//!
//! Orders are written once at payment time and never modified afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::domain::aggregates::cart::CartItem;
use crate::domain::events::{DomainEvent, OrderEvent};
use crate::domain::value_objects::Money;

pub const PAYMENT_METHOD_CARD: &str = "Card";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInfo {
    pub card_last4: String,
    pub method: String,
}

impl PaymentInfo {
    /// Keeps only the last four characters of the submitted card number.
    pub fn card(card_number: &str) -> Self {
        let chars: Vec<char> = card_number.trim().chars().collect();
        let start = chars.len().saturating_sub(4);
        Self { card_last4: chars[start..].iter().collect(), method: PAYMENT_METHOD_CARD.to_string() }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub user_email: String,
    pub user_name: String,
    pub cart: Vec<CartItem>,
    pub total: Money,
    pub payment_info: PaymentInfo,
    pub date: DateTime<Utc>,
}

impl Order {
    pub fn place(customer: Customer, cart: Vec<CartItem>, total: Money, payment_info: PaymentInfo) -> Result<Self, OrderError> {
        if cart.is_empty() { return Err(OrderError::NoItems); }
        Ok(Self {
            id: Uuid::now_v7(), user_email: customer.email, user_name: customer.name,
            cart, total: total.rounded(), payment_info, date: Utc::now(),
        })
    }

    pub fn belongs_to(&self, email: &str) -> bool { self.user_email == email }

    pub fn unit_count(&self) -> u32 { self.cart.iter().map(|i| i.quantity.value()).sum() }

    pub fn placed_event(&self) -> DomainEvent {
        DomainEvent::Order(OrderEvent::Placed {
            order_id: self.id, user_email: self.user_email.clone(), total: self.total.amount(), units: self.unit_count(),
        })
    }
}

/// The paying customer, as recorded on the order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Customer { pub name: String, pub email: String }

#[derive(Debug, Clone, PartialEq, Eq)] pub enum OrderError { NoItems }
impl std::error::Error for OrderError {}
impl std::fmt::Display for OrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "Cart is empty") }
}
