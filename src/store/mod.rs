//! Persistence for accounts, catalog, storefront content and the order ledger.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use crate::domain::aggregates::{Admin, Banner, Brand, Deal, Medicine, MedicineDraft, Order, User};
use crate::Result;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Backing store. Listing methods return records in insertion order unless
/// noted otherwise.
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user(&self, email: &str) -> Result<Option<User>>;

    /// Fails with `EmailTaken` if the email is already registered.
    async fn insert_user(&self, user: User) -> Result<User>;

    async fn update_user_profile(&self, email: &str, owner_name: &str, phone: &str) -> Result<()>;

    async fn count_users(&self) -> Result<i64>;

    async fn find_admin(&self, email: &str) -> Result<Option<Admin>>;

    async fn insert_admin(&self, admin: Admin) -> Result<Admin>;

    async fn list_medicines(&self) -> Result<Vec<Medicine>>;

    async fn get_medicine(&self, id: Uuid) -> Result<Option<Medicine>>;

    async fn insert_medicine(&self, medicine: Medicine) -> Result<Medicine>;

    /// Replaces the editable fields. `sold` is preserved.
    async fn update_medicine(&self, id: Uuid, draft: MedicineDraft) -> Result<Medicine>;

    async fn delete_medicine(&self, id: Uuid) -> Result<()>;

    async fn list_deals(&self) -> Result<Vec<Deal>>;

    async fn insert_deal(&self, deal: Deal) -> Result<Deal>;

    async fn delete_deal(&self, id: Uuid) -> Result<()>;

    async fn list_banners(&self) -> Result<Vec<Banner>>;

    async fn insert_banner(&self, banner: Banner) -> Result<Banner>;

    async fn delete_banner(&self, id: Uuid) -> Result<()>;

    async fn list_brands(&self) -> Result<Vec<Brand>>;

    async fn insert_brand(&self, brand: Brand) -> Result<Brand>;

    async fn delete_brand(&self, id: Uuid) -> Result<()>;

    /// Decrements stock and bumps `sold` for every line whose medicine still
    /// exists, then records the order, all or nothing. Lines for deleted
    /// medicines adjust nothing.
    async fn place_order(&self, order: Order) -> Result<Order>;

    async fn get_order(&self, id: Uuid) -> Result<Option<Order>>;

    /// Newest first.
    async fn orders_for_user(&self, email: &str) -> Result<Vec<Order>>;

    async fn list_orders(&self) -> Result<Vec<Order>>;

    async fn orders_since(&self, since: DateTime<Utc>) -> Result<Vec<Order>>;
}
