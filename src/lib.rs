//! Pharmacy Storefront
//!
//! Online pharmacy: customers browse medicines, keep a cart and wishlist,
//! get promotional deals applied at checkout and pay; administrators manage
//! inventory, deals, banners and brands and read sales analytics.
//!
//! ## Features
//! - Medicine catalog with stock and sales counters
//! - Session cart and wishlist
//! - Deal-based checkout pricing
//! - Order ledger with atomic stock decrement
//! - Admin dashboard analytics

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

pub mod auth;
pub mod config;
pub mod domain;
pub mod http;
pub mod publisher;
pub mod session;
pub mod store;

pub use config::AppConfig;
pub use http::{router, AppState};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("Email already exists")]
    EmailTaken,

    #[error("Email not registered")]
    EmailNotRegistered,

    #[error("Incorrect password")]
    IncorrectPassword,

    #[error("Login first")]
    LoginRequired,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Medicine not found")]
    MedicineNotFound,

    #[error("Order not found")]
    OrderNotFound,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Medicine out of stock")]
    OutOfStock,

    #[error("Insufficient stock for {0}")]
    InsufficientStock(String),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("{0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl StorefrontError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::EmailTaken | Self::EmailNotRegistered | Self::IncorrectPassword
            | Self::OutOfStock | Self::InsufficientStock(_) | Self::EmptyCart | Self::Validation(_)
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::LoginRequired | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::MedicineNotFound | Self::OrderNotFound | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PasswordHash(_) | Self::Database(_) | Self::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for StorefrontError {
    fn from(rejection: JsonRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl From<PathRejection> for StorefrontError {
    fn from(rejection: PathRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl IntoResponse for StorefrontError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(serde_json::json!({ "message": self.to_string() }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
