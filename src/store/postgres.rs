//! PostgreSQL store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use uuid::Uuid;
use crate::domain::aggregates::{Admin, Banner, Brand, CartItem, Deal, Medicine, MedicineDraft, Order, PaymentInfo, User};
use crate::domain::value_objects::Money;
use crate::store::Store;
use crate::{Result, StorefrontError};

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    user_email: String,
    user_name: String,
    items: Json<Vec<CartItem>>,
    total: Money,
    card_last4: String,
    payment_method: String,
    placed_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(r: OrderRow) -> Self {
        Order {
            id: r.id, user_email: r.user_email, user_name: r.user_name, cart: r.items.0, total: r.total,
            payment_info: PaymentInfo { card_last4: r.card_last4, method: r.payment_method }, date: r.placed_at,
        }
    }
}

const ORDER_COLUMNS: &str = "id, user_email, user_name, items, total, card_last4, payment_method, placed_at";

impl PgStore {
    /// Connects and runs the embedded migrations.
    pub async fn connect(url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new().max_connections(max_connections).connect(url).await?;
        sqlx::migrate!("./migrations").run(&db).await?;
        Ok(Self { db })
    }

    async fn delete_row(&self, table: &'static str, what: &'static str, id: Uuid) -> Result<()> {
        let done = sqlx::query(&format!("DELETE FROM {table} WHERE id = $1")).bind(id).execute(&self.db).await?;
        if done.rows_affected() == 0 { Err(StorefrontError::NotFound(what)) } else { Ok(()) }
    }

    async fn fetch_orders(&self, filter: &str, bind: Option<OrderFilter<'_>>) -> Result<Vec<Order>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders {filter}");
        let query = sqlx::query_as::<_, OrderRow>(&sql);
        let query = match bind {
            Some(OrderFilter::Email(email)) => query.bind(email.to_string()),
            Some(OrderFilter::Since(since)) => query.bind(since),
            None => query,
        };
        Ok(query.fetch_all(&self.db).await?.into_iter().map(Order::from).collect())
    }
}

enum OrderFilter<'a> { Email(&'a str), Since(DateTime<Utc>) }

#[async_trait]
impl Store for PgStore {
    async fn find_user(&self, email: &str) -> Result<Option<User>> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1").bind(email).fetch_optional(&self.db).await?)
    }

    async fn insert_user(&self, u: User) -> Result<User> {
        sqlx::query_as::<_, User>("INSERT INTO users (id, owner_name, email, phone, password_hash, role, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *")
            .bind(u.id).bind(&u.owner_name).bind(&u.email).bind(&u.phone).bind(&u.password_hash).bind(&u.role).bind(u.created_at)
            .fetch_one(&self.db).await
            .map_err(|e| {
                if e.as_database_error().is_some_and(|d| d.is_unique_violation()) {
                    StorefrontError::EmailTaken
                } else {
                    StorefrontError::Database(e)
                }
            })
    }

    async fn update_user_profile(&self, email: &str, owner_name: &str, phone: &str) -> Result<()> {
        let done = sqlx::query("UPDATE users SET owner_name = $2, phone = $3 WHERE email = $1")
            .bind(email).bind(owner_name).bind(phone).execute(&self.db).await?;
        if done.rows_affected() == 0 { return Err(StorefrontError::NotFound("User")); }
        Ok(())
    }

    async fn count_users(&self) -> Result<i64> {
        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users").fetch_one(&self.db).await?;
        Ok(total.0)
    }

    async fn find_admin(&self, email: &str) -> Result<Option<Admin>> {
        Ok(sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE email = $1").bind(email).fetch_optional(&self.db).await?)
    }

    async fn insert_admin(&self, a: Admin) -> Result<Admin> {
        Ok(sqlx::query_as::<_, Admin>("INSERT INTO admins (id, owner_name, email, password_hash, created_at) VALUES ($1, $2, $3, $4, $5) RETURNING *")
            .bind(a.id).bind(&a.owner_name).bind(&a.email).bind(&a.password_hash).bind(a.created_at)
            .fetch_one(&self.db).await?)
    }

    async fn list_medicines(&self) -> Result<Vec<Medicine>> {
        Ok(sqlx::query_as::<_, Medicine>("SELECT * FROM medicines ORDER BY created_at, id").fetch_all(&self.db).await?)
    }

    async fn get_medicine(&self, id: Uuid) -> Result<Option<Medicine>> {
        Ok(sqlx::query_as::<_, Medicine>("SELECT * FROM medicines WHERE id = $1").bind(id).fetch_optional(&self.db).await?)
    }

    async fn insert_medicine(&self, m: Medicine) -> Result<Medicine> {
        Ok(sqlx::query_as::<_, Medicine>("INSERT INTO medicines (id, name, category, price, quantity, sold, image, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *")
            .bind(m.id).bind(&m.name).bind(&m.category).bind(m.price).bind(m.quantity).bind(m.sold).bind(&m.image).bind(m.created_at).bind(m.updated_at)
            .fetch_one(&self.db).await?)
    }

    async fn update_medicine(&self, id: Uuid, d: MedicineDraft) -> Result<Medicine> {
        sqlx::query_as::<_, Medicine>("UPDATE medicines SET name = $2, category = $3, price = $4, quantity = $5, image = $6, updated_at = NOW() WHERE id = $1 RETURNING *")
            .bind(id).bind(&d.name).bind(&d.category).bind(d.price).bind(d.quantity).bind(&d.image)
            .fetch_optional(&self.db).await?.ok_or(StorefrontError::MedicineNotFound)
    }

    async fn delete_medicine(&self, id: Uuid) -> Result<()> {
        self.delete_row("medicines", "Medicine", id).await.map_err(|e| match e {
            StorefrontError::NotFound(_) => StorefrontError::MedicineNotFound,
            other => other,
        })
    }

    async fn list_deals(&self) -> Result<Vec<Deal>> {
        Ok(sqlx::query_as::<_, Deal>("SELECT * FROM deals ORDER BY created_at, id").fetch_all(&self.db).await?)
    }

    async fn insert_deal(&self, d: Deal) -> Result<Deal> {
        Ok(sqlx::query_as::<_, Deal>("INSERT INTO deals (id, title, description, discount, code, category, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *")
            .bind(d.id).bind(&d.title).bind(&d.description).bind(&d.discount).bind(&d.code).bind(&d.category).bind(d.created_at)
            .fetch_one(&self.db).await?)
    }

    async fn delete_deal(&self, id: Uuid) -> Result<()> { self.delete_row("deals", "Deal", id).await }

    async fn list_banners(&self) -> Result<Vec<Banner>> {
        Ok(sqlx::query_as::<_, Banner>("SELECT * FROM banners ORDER BY created_at, id").fetch_all(&self.db).await?)
    }

    async fn insert_banner(&self, b: Banner) -> Result<Banner> {
        Ok(sqlx::query_as::<_, Banner>("INSERT INTO banners (id, title, description, image, link, created_at) VALUES ($1, $2, $3, $4, $5, $6) RETURNING *")
            .bind(b.id).bind(&b.title).bind(&b.description).bind(&b.image).bind(&b.link).bind(b.created_at)
            .fetch_one(&self.db).await?)
    }

    async fn delete_banner(&self, id: Uuid) -> Result<()> { self.delete_row("banners", "Banner", id).await }

    async fn list_brands(&self) -> Result<Vec<Brand>> {
        Ok(sqlx::query_as::<_, Brand>("SELECT * FROM brands ORDER BY created_at, id").fetch_all(&self.db).await?)
    }

    async fn insert_brand(&self, b: Brand) -> Result<Brand> {
        Ok(sqlx::query_as::<_, Brand>("INSERT INTO brands (id, name, image, created_at) VALUES ($1, $2, $3, $4) RETURNING *")
            .bind(b.id).bind(&b.name).bind(&b.image).bind(b.created_at)
            .fetch_one(&self.db).await?)
    }

    async fn delete_brand(&self, id: Uuid) -> Result<()> { self.delete_row("brands", "Brand", id).await }

    async fn place_order(&self, order: Order) -> Result<Order> {
        let mut tx = self.db.begin().await?;

        for line in &order.cart {
            let units = i32::try_from(line.quantity.value()).map_err(|_| StorefrontError::InsufficientStock(line.name.clone()))?;
            let updated = sqlx::query("UPDATE medicines SET quantity = quantity - $2, sold = sold + $2, updated_at = NOW() WHERE id = $1 AND quantity >= $2")
                .bind(line.id).bind(units).execute(&mut *tx).await?;
            if updated.rows_affected() == 0 {
                let exists: (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM medicines WHERE id = $1)")
                    .bind(line.id).fetch_one(&mut *tx).await?;
                // Dropping `tx` rolls back the lines already applied.
                if exists.0 { return Err(StorefrontError::InsufficientStock(line.name.clone())); }
            }
        }

        let sql = format!("INSERT INTO orders ({ORDER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {ORDER_COLUMNS}");
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(order.id).bind(&order.user_email).bind(&order.user_name).bind(Json(&order.cart)).bind(order.total)
            .bind(&order.payment_info.card_last4).bind(&order.payment_info.method).bind(order.date)
            .fetch_one(&mut *tx).await?;

        tx.commit().await?;
        Ok(row.into())
    }

    async fn get_order(&self, id: Uuid) -> Result<Option<Order>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
        Ok(sqlx::query_as::<_, OrderRow>(&sql).bind(id).fetch_optional(&self.db).await?.map(Order::from))
    }

    async fn orders_for_user(&self, email: &str) -> Result<Vec<Order>> {
        self.fetch_orders("WHERE user_email = $1 ORDER BY placed_at DESC", Some(OrderFilter::Email(email))).await
    }

    async fn list_orders(&self) -> Result<Vec<Order>> {
        self.fetch_orders("ORDER BY placed_at", None).await
    }

    async fn orders_since(&self, since: DateTime<Utc>) -> Result<Vec<Order>> {
        self.fetch_orders("WHERE placed_at >= $1 ORDER BY placed_at", Some(OrderFilter::Since(since))).await
    }
}
