//! Carousel banners and brand tiles shown on the storefront.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_BANNER_TITLE: &str = "New Offer";
pub const DEFAULT_BANNER_IMAGE: &str = "https://via.placeholder.com/800x400";
pub const DEFAULT_BANNER_LINK: &str = "/shop";
pub const DEFAULT_BRAND_IMAGE: &str = "https://via.placeholder.com/100";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Banner {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image: String,
    pub link: String,
    pub created_at: DateTime<Utc>,
}

impl Banner {
    pub fn create(title: String, description: String, image: String, link: String) -> Self {
        Self { id: Uuid::now_v7(), title, description, image, link, created_at: Utc::now() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Brand {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
}

impl Brand {
    pub fn create(name: String, image: String) -> Self {
        Self { id: Uuid::now_v7(), name, image, created_at: Utc::now() }
    }
}
