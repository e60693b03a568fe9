//! In-process store used by tests and `STORAGE_BACKEND=memory`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;
use crate::domain::aggregates::{Admin, Banner, Brand, Deal, Medicine, MedicineDraft, Order, User};
use crate::domain::value_objects::Quantity;
use crate::store::Store;
use crate::{Result, StorefrontError};

#[derive(Default)]
struct State {
    users: Vec<User>,
    admins: Vec<Admin>,
    medicines: Vec<Medicine>,
    deals: Vec<Deal>,
    banners: Vec<Banner>,
    brands: Vec<Brand>,
    orders: Vec<Order>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }
}

fn remove_by<T>(items: &mut Vec<T>, what: &'static str, matches: impl Fn(&T) -> bool) -> Result<()> {
    let before = items.len();
    items.retain(|i| !matches(i));
    if items.len() == before { Err(StorefrontError::NotFound(what)) } else { Ok(()) }
}

fn newest_first(mut orders: Vec<Order>) -> Vec<Order> {
    orders.sort_by(|a, b| b.date.cmp(&a.date));
    orders
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user(&self, email: &str) -> Result<Option<User>> {
        Ok(self.state.read().await.users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, user: User) -> Result<User> {
        let mut state = self.state.write().await;
        if state.users.iter().any(|u| u.email == user.email) {
            return Err(StorefrontError::EmailTaken);
        }
        state.users.push(user.clone());
        Ok(user)
    }

    async fn update_user_profile(&self, email: &str, owner_name: &str, phone: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let user = state.users.iter_mut().find(|u| u.email == email).ok_or(StorefrontError::NotFound("User"))?;
        user.owner_name = owner_name.to_string();
        user.phone = phone.to_string();
        Ok(())
    }

    async fn count_users(&self) -> Result<i64> {
        Ok(self.state.read().await.users.len() as i64)
    }

    async fn find_admin(&self, email: &str) -> Result<Option<Admin>> {
        Ok(self.state.read().await.admins.iter().find(|a| a.email == email).cloned())
    }

    async fn insert_admin(&self, admin: Admin) -> Result<Admin> {
        let mut state = self.state.write().await;
        if state.admins.iter().any(|a| a.email == admin.email) {
            return Err(StorefrontError::EmailTaken);
        }
        state.admins.push(admin.clone());
        Ok(admin)
    }

    async fn list_medicines(&self) -> Result<Vec<Medicine>> {
        Ok(self.state.read().await.medicines.clone())
    }

    async fn get_medicine(&self, id: Uuid) -> Result<Option<Medicine>> {
        Ok(self.state.read().await.medicines.iter().find(|m| m.id == id).cloned())
    }

    async fn insert_medicine(&self, medicine: Medicine) -> Result<Medicine> {
        self.state.write().await.medicines.push(medicine.clone());
        Ok(medicine)
    }

    async fn update_medicine(&self, id: Uuid, draft: MedicineDraft) -> Result<Medicine> {
        let mut state = self.state.write().await;
        let medicine = state.medicines.iter_mut().find(|m| m.id == id).ok_or(StorefrontError::MedicineNotFound)?;
        medicine.apply(draft);
        Ok(medicine.clone())
    }

    async fn delete_medicine(&self, id: Uuid) -> Result<()> {
        let mut state = self.state.write().await;
        remove_by(&mut state.medicines, "Medicine", |m| m.id == id).map_err(|_| StorefrontError::MedicineNotFound)
    }

    async fn list_deals(&self) -> Result<Vec<Deal>> {
        Ok(self.state.read().await.deals.clone())
    }

    async fn insert_deal(&self, deal: Deal) -> Result<Deal> {
        self.state.write().await.deals.push(deal.clone());
        Ok(deal)
    }

    async fn delete_deal(&self, id: Uuid) -> Result<()> {
        remove_by(&mut self.state.write().await.deals, "Deal", |d| d.id == id)
    }

    async fn list_banners(&self) -> Result<Vec<Banner>> {
        Ok(self.state.read().await.banners.clone())
    }

    async fn insert_banner(&self, banner: Banner) -> Result<Banner> {
        self.state.write().await.banners.push(banner.clone());
        Ok(banner)
    }

    async fn delete_banner(&self, id: Uuid) -> Result<()> {
        remove_by(&mut self.state.write().await.banners, "Banner", |b| b.id == id)
    }

    async fn list_brands(&self) -> Result<Vec<Brand>> {
        Ok(self.state.read().await.brands.clone())
    }

    async fn insert_brand(&self, brand: Brand) -> Result<Brand> {
        self.state.write().await.brands.push(brand.clone());
        Ok(brand)
    }

    async fn delete_brand(&self, id: Uuid) -> Result<()> {
        remove_by(&mut self.state.write().await.brands, "Brand", |b| b.id == id)
    }

    async fn place_order(&self, order: Order) -> Result<Order> {
        let mut state = self.state.write().await;

        let mut wanted: HashMap<Uuid, u32> = HashMap::new();
        for line in &order.cart {
            *wanted.entry(line.id).or_default() += line.quantity.value();
        }

        // Check everything before touching anything.
        for medicine in state.medicines.iter().filter(|m| wanted.contains_key(&m.id)) {
            if !medicine.has_stock_for(Quantity::new(wanted[&medicine.id])) {
                return Err(StorefrontError::InsufficientStock(medicine.name.clone()));
            }
        }
        for medicine in state.medicines.iter_mut() {
            if let Some(units) = wanted.get(&medicine.id) {
                medicine
                    .record_sale(Quantity::new(*units))
                    .map_err(|_| StorefrontError::InsufficientStock(medicine.name.clone()))?;
            }
        }

        state.orders.push(order.clone());
        Ok(order)
    }

    async fn get_order(&self, id: Uuid) -> Result<Option<Order>> {
        Ok(self.state.read().await.orders.iter().find(|o| o.id == id).cloned())
    }

    async fn orders_for_user(&self, email: &str) -> Result<Vec<Order>> {
        let orders = self.state.read().await.orders.iter().filter(|o| o.belongs_to(email)).cloned().collect();
        Ok(newest_first(orders))
    }

    async fn list_orders(&self) -> Result<Vec<Order>> {
        Ok(self.state.read().await.orders.clone())
    }

    async fn orders_since(&self, since: DateTime<Utc>) -> Result<Vec<Order>> {
        Ok(self.state.read().await.orders.iter().filter(|o| o.date >= since).cloned().collect())
    }
}
