//! Request bodies.

use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};
use crate::domain::aggregates::{
    medicine::{DEFAULT_CATEGORY, DEFAULT_IMAGE, MAX_PRICE},
    storefront::{DEFAULT_BANNER_IMAGE, DEFAULT_BANNER_LINK, DEFAULT_BANNER_TITLE, DEFAULT_BRAND_IMAGE},
    DealDraft, MedicineDraft,
};
use crate::domain::value_objects::{DiscountRate, Money};

fn price_in_range(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::new("negative_price"));
    }
    if *price > MAX_PRICE {
        return Err(ValidationError::new("price_too_large"));
    }
    Ok(())
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() { Err(ValidationError::new("blank")) } else { Ok(()) }
}

/// Blank falls back to the default discount, like the other optional deal fields.
fn readable_discount(discount: &str) -> Result<(), ValidationError> {
    if discount.trim().is_empty() {
        return Ok(());
    }
    discount.parse::<DiscountRate>().map(|_| ()).map_err(|_| ValidationError::new("unreadable_discount"))
}

fn or_default(value: Option<String>, default: &str) -> String {
    value.filter(|v| !v.trim().is_empty()).unwrap_or_else(|| default.to_string())
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(custom(function = "not_blank", message = "name is required"))]
    pub owner_name: String,
    #[validate(email(message = "email is invalid"))]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct MedicineRef {
    pub med_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct IdRequest {
    pub id: Uuid,
}

#[derive(Debug, Default, Deserialize)]
pub struct PaymentRequest {
    #[serde(rename = "cardNumber", default)]
    pub card_number: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProfileRequest {
    #[validate(custom(function = "not_blank", message = "name is required"))]
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct MedicineRequest {
    #[validate(custom(function = "not_blank", message = "name is required"))]
    pub name: String,
    pub category: Option<String>,
    #[validate(custom(function = "price_in_range", message = "price must be between 0 and 9999999999.99"))]
    pub price: Decimal,
    #[validate(range(min = 0, message = "quantity must not be negative"))]
    pub quantity: i32,
    pub image: Option<String>,
}

impl MedicineRequest {
    pub fn into_draft(self) -> MedicineDraft {
        MedicineDraft {
            name: self.name.trim().to_string(),
            category: or_default(self.category, DEFAULT_CATEGORY),
            price: Money::new(self.price).rounded(),
            quantity: self.quantity,
            image: or_default(self.image, DEFAULT_IMAGE),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct EditMedicineRequest {
    pub id: Uuid,
    #[serde(flatten)]
    #[validate]
    pub medicine: MedicineRequest,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DealRequest {
    #[validate(custom(function = "not_blank", message = "title is required"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(custom(function = "readable_discount", message = "discount must look like 15%"))]
    pub discount: Option<String>,
    pub code: Option<String>,
    pub category: Option<String>,
}

impl DealRequest {
    pub fn into_draft(self) -> DealDraft {
        let defaults = DealDraft::default();
        DealDraft {
            title: self.title.trim().to_string(),
            description: self.description.unwrap_or(defaults.description),
            discount: or_default(self.discount, &defaults.discount),
            code: or_default(self.code, &defaults.code),
            category: or_default(self.category, &defaults.category),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BannerRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
}

impl BannerRequest {
    /// `(title, description, image, link)` with storefront defaults filled in.
    pub fn into_parts(self) -> (String, String, String, String) {
        (
            or_default(self.title, DEFAULT_BANNER_TITLE),
            self.description.unwrap_or_default(),
            or_default(self.image, DEFAULT_BANNER_IMAGE),
            or_default(self.link, DEFAULT_BANNER_LINK),
        )
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct BrandRequest {
    #[validate(custom(function = "not_blank", message = "name is required"))]
    pub name: String,
    pub image: Option<String>,
}

impl BrandRequest {
    pub fn image(&self) -> String { or_default(self.image.clone(), DEFAULT_BRAND_IMAGE) }
}
