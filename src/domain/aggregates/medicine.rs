//! Medicine Aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::domain::value_objects::{Money, Quantity};

pub const DEFAULT_CATEGORY: &str = "General";
pub const DEFAULT_IMAGE: &str = "/static/images/default.png";

/// Largest accepted unit price, the most a `NUMERIC(12, 2)` column holds.
/// Cart and order arithmetic stays far from `Decimal`'s range below it.
pub const MAX_PRICE: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2); // 9_999_999_999.99

/// Below this many units a medicine counts as low stock.
pub const LOW_STOCK_THRESHOLD: i32 = 10;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Medicine {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub price: Money,
    pub quantity: i32,
    pub sold: i32,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel { InStock, LowStock, OutOfStock }

/// Fields an admin supplies when adding or editing a medicine.
#[derive(Clone, Debug)]
pub struct MedicineDraft {
    pub name: String,
    pub category: String,
    pub price: Money,
    pub quantity: i32,
    pub image: String,
}

impl Medicine {
    pub fn create(draft: MedicineDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(), name: draft.name, category: draft.category, price: draft.price,
            quantity: draft.quantity, sold: 0, image: draft.image, created_at: now, updated_at: now,
        }
    }

    /// Replaces the editable fields; `sold` is left alone.
    pub fn apply(&mut self, draft: MedicineDraft) {
        self.name = draft.name;
        self.category = draft.category;
        self.price = draft.price;
        self.quantity = draft.quantity;
        self.image = draft.image;
        self.touch();
    }

    pub fn is_in_stock(&self) -> bool { self.quantity > 0 }

    pub fn has_stock_for(&self, qty: Quantity) -> bool {
        i64::from(self.quantity) >= i64::from(qty.value())
    }

    pub fn stock_level(&self) -> StockLevel {
        match self.quantity {
            q if q <= 0 => StockLevel::OutOfStock,
            q if q < LOW_STOCK_THRESHOLD => StockLevel::LowStock,
            _ => StockLevel::InStock,
        }
    }

    pub fn record_sale(&mut self, qty: Quantity) -> Result<(), MedicineError> {
        if !self.has_stock_for(qty) { return Err(MedicineError::InsufficientStock); }
        let units = i32::try_from(qty.value()).map_err(|_| MedicineError::InsufficientStock)?;
        self.quantity -= units;
        self.sold = self.sold.saturating_add(units);
        self.touch();
        Ok(())
    }

    fn touch(&mut self) { self.updated_at = Utc::now(); }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum MedicineError { InsufficientStock }
impl std::error::Error for MedicineError {}
impl std::fmt::Display for MedicineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "Insufficient stock") }
}
