//! Session cart and wishlist

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::domain::aggregates::medicine::Medicine;
use crate::domain::value_objects::{Money, Quantity};

/// Snapshot of a medicine taken when it was put in the cart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: Uuid,
    pub name: String,
    pub price: Money,
    pub category: String,
    pub image: String,
    pub quantity: Quantity,
}

impl CartItem {
    pub fn from_medicine(med: &Medicine) -> Self {
        Self {
            id: med.id, name: med.name.clone(), price: med.price, category: med.category.clone(),
            image: med.image.clone(), quantity: Quantity::ONE,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self { Self::default() }

    pub fn items(&self) -> &[CartItem] { &self.items }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    pub fn quantity_of(&self, id: Uuid) -> Quantity {
        self.items.iter().find(|i| i.id == id).map(|i| i.quantity).unwrap_or_default()
    }

    /// Adds one more unit of the medicine, merging with an existing line.
    pub fn add(&mut self, med: &Medicine) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.id == med.id) {
            existing.quantity = existing.quantity.add(1);
        } else {
            self.items.push(CartItem::from_medicine(med));
        }
    }

    /// Drops every line for `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        self.items.len() != before
    }

    /// Puts back lines taken out for checkout ahead of anything added since,
    /// merging quantities for the same medicine.
    pub fn restore(&mut self, taken: Cart) {
        let added_since = std::mem::replace(&mut self.items, taken.items);
        for line in added_since {
            match self.items.iter_mut().find(|i| i.id == line.id) {
                Some(existing) => existing.quantity = existing.quantity.add(line.quantity.value()),
                None => self.items.push(line),
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub id: Uuid,
    pub name: String,
    pub price: Money,
    pub category: String,
    pub image: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WishlistAction { Added, Exists }

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wishlist {
    items: Vec<WishlistItem>,
}

impl Wishlist {
    pub fn items(&self) -> &[WishlistItem] { &self.items }
    pub fn contains(&self, id: Uuid) -> bool { self.items.iter().any(|i| i.id == id) }

    pub fn add(&mut self, med: &Medicine) -> WishlistAction {
        if self.contains(med.id) { return WishlistAction::Exists; }
        self.items.push(WishlistItem {
            id: med.id, name: med.name.clone(), price: med.price,
            category: med.category.clone(), image: med.image.clone(),
        });
        WishlistAction::Added
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        self.items.len() != before
    }
}
