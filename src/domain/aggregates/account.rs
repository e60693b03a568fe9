//! Customer and administrator accounts

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

pub const ROLE_USER: &str = "user";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub owner_name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn register(owner_name: String, email: String, phone: String, password_hash: String) -> Self {
        Self {
            id: Uuid::now_v7(), owner_name, email, phone, password_hash,
            role: ROLE_USER.to_string(), created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Admin {
    pub id: Uuid,
    pub owner_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Admin {
    pub fn create(owner_name: String, email: String, password_hash: String) -> Self {
        Self { id: Uuid::now_v7(), owner_name, email, password_hash, created_at: Utc::now() }
    }
}
