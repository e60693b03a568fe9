//! Domain events
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "aggregate", content = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    Order(OrderEvent),
    Catalog(CatalogEvent),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderEvent {
    Placed { order_id: Uuid, user_email: String, total: Decimal, units: u32 },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CatalogEvent {
    MedicineAdded { medicine_id: Uuid, name: String },
    MedicineUpdated { medicine_id: Uuid },
    MedicineRemoved { medicine_id: Uuid },
    DealAdded { deal_id: Uuid, category: String },
    DealRemoved { deal_id: Uuid },
}

impl DomainEvent {
    /// NATS subject suffix, e.g. `order.placed`.
    pub fn subject(&self) -> &'static str {
        match self {
            Self::Order(OrderEvent::Placed { .. }) => "order.placed",
            Self::Catalog(CatalogEvent::MedicineAdded { .. }) => "catalog.medicine_added",
            Self::Catalog(CatalogEvent::MedicineUpdated { .. }) => "catalog.medicine_updated",
            Self::Catalog(CatalogEvent::MedicineRemoved { .. }) => "catalog.medicine_removed",
            Self::Catalog(CatalogEvent::DealAdded { .. }) => "catalog.deal_added",
            Self::Catalog(CatalogEvent::DealRemoved { .. }) => "catalog.deal_removed",
        }
    }
}
