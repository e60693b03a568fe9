//! Administrator dashboard and catalog management.

use axum::{extract::State, response::IntoResponse, Json};
use chrono::{Days, Utc};
use serde::Serialize;
use serde_json::json;
use validator::Validate;
use crate::domain::aggregates::{Banner, Brand, Deal, Medicine};
use crate::domain::analytics::{self, SALES_WINDOW_DAYS, TOP_MEDICINES_LIMIT, TOP_USERS_LIMIT};
use crate::domain::events::{CatalogEvent, DomainEvent};
use crate::domain::value_objects::Money;
use crate::http::extract::{CurrentAdmin, JsonBody};
use crate::http::requests::{BannerRequest, BrandRequest, DealRequest, EditMedicineRequest, IdRequest, MedicineRequest};
use crate::http::AppState;
use crate::Result;

pub const UNKNOWN_USER: &str = "Unknown User";

#[derive(Debug, Serialize)]
pub struct TopUser {
    pub name: String,
    pub email: String,
    pub spent: Money,
    pub orders: usize,
}

pub async fn dashboard(State(s): State<AppState>, admin: CurrentAdmin) -> Result<impl IntoResponse> {
    let medicines = s.store.list_medicines().await?;
    let orders = s.store.list_orders().await?;
    let summary = analytics::inventory_summary(&medicines, &orders, s.store.count_users().await?);
    Ok(Json(json!({
        "admin": admin.principal,
        "summary": summary,
        "medicines": medicines,
        "deals": s.store.list_deals().await?,
        "banners": s.store.list_banners().await?,
        "brands": s.store.list_brands().await?,
    })))
}

pub async fn dashboard_data(State(s): State<AppState>, _admin: CurrentAdmin) -> Result<impl IntoResponse> {
    let today = Utc::now().date_naive();
    let window_start = today
        .checked_sub_days(Days::new(SALES_WINDOW_DAYS - 1))
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
        .unwrap_or_default();
    let recent = s.store.orders_since(window_start).await?;
    let medicines = s.store.list_medicines().await?;
    let orders = s.store.list_orders().await?;

    let mut top_users = Vec::new();
    for spend in analytics::top_customers(&orders, TOP_USERS_LIMIT) {
        let name = s.store.find_user(&spend.email).await?.map(|u| u.owner_name).unwrap_or_else(|| UNKNOWN_USER.to_string());
        top_users.push(TopUser { name, email: spend.email, spent: spend.spent, orders: spend.orders });
    }

    Ok(Json(json!({
        "sales_over_time": analytics::sales_over_time(&recent, today, SALES_WINDOW_DAYS),
        "top_medicines": analytics::top_medicines(&medicines, TOP_MEDICINES_LIMIT),
        "stock_status": analytics::stock_status(&medicines),
        "top_users": top_users,
    })))
}

pub async fn add_medicine(State(s): State<AppState>, _admin: CurrentAdmin, JsonBody(r): JsonBody<MedicineRequest>) -> Result<impl IntoResponse> {
    r.validate()?;
    let medicine = s.store.insert_medicine(Medicine::create(r.into_draft())).await?;
    tracing::info!(medicine_id = %medicine.id, name = %medicine.name, "medicine added");
    s.events.publish(DomainEvent::Catalog(CatalogEvent::MedicineAdded { medicine_id: medicine.id, name: medicine.name.clone() })).await;
    Ok(Json(json!({ "message": "Medicine added successfully", "medicine": medicine })))
}

pub async fn edit_medicine(State(s): State<AppState>, _admin: CurrentAdmin, JsonBody(r): JsonBody<EditMedicineRequest>) -> Result<impl IntoResponse> {
    r.validate()?;
    let medicine = s.store.update_medicine(r.id, r.medicine.into_draft()).await?;
    tracing::info!(medicine_id = %medicine.id, "medicine updated");
    s.events.publish(DomainEvent::Catalog(CatalogEvent::MedicineUpdated { medicine_id: medicine.id })).await;
    Ok(Json(json!({ "message": "Medicine updated successfully", "medicine": medicine })))
}

pub async fn delete_medicine(State(s): State<AppState>, _admin: CurrentAdmin, JsonBody(r): JsonBody<IdRequest>) -> Result<impl IntoResponse> {
    s.store.delete_medicine(r.id).await?;
    tracing::info!(medicine_id = %r.id, "medicine deleted");
    s.events.publish(DomainEvent::Catalog(CatalogEvent::MedicineRemoved { medicine_id: r.id })).await;
    Ok(Json(json!({ "message": "Medicine deleted successfully" })))
}

pub async fn add_deal(State(s): State<AppState>, _admin: CurrentAdmin, JsonBody(r): JsonBody<DealRequest>) -> Result<impl IntoResponse> {
    r.validate()?;
    let deal = s.store.insert_deal(Deal::create(r.into_draft())).await?;
    tracing::info!(deal_id = %deal.id, category = %deal.category, discount = %deal.discount, "deal added");
    s.events.publish(DomainEvent::Catalog(CatalogEvent::DealAdded { deal_id: deal.id, category: deal.category.clone() })).await;
    Ok(Json(json!({ "message": "Deal added successfully", "deal": deal })))
}

pub async fn delete_deal(State(s): State<AppState>, _admin: CurrentAdmin, JsonBody(r): JsonBody<IdRequest>) -> Result<impl IntoResponse> {
    s.store.delete_deal(r.id).await?;
    tracing::info!(deal_id = %r.id, "deal deleted");
    s.events.publish(DomainEvent::Catalog(CatalogEvent::DealRemoved { deal_id: r.id })).await;
    Ok(Json(json!({ "message": "Deal deleted successfully" })))
}

pub async fn add_banner(State(s): State<AppState>, _admin: CurrentAdmin, body: Option<JsonBody<BannerRequest>>) -> Result<impl IntoResponse> {
    let (title, description, image, link) = body.map(|JsonBody(r)| r).unwrap_or_default().into_parts();
    let banner = s.store.insert_banner(Banner::create(title, description, image, link)).await?;
    tracing::info!(banner_id = %banner.id, "banner added");
    Ok(Json(json!({ "message": "Banner added successfully", "banner": banner })))
}

pub async fn delete_banner(State(s): State<AppState>, _admin: CurrentAdmin, JsonBody(r): JsonBody<IdRequest>) -> Result<impl IntoResponse> {
    s.store.delete_banner(r.id).await?;
    tracing::info!(banner_id = %r.id, "banner deleted");
    Ok(Json(json!({ "message": "Banner deleted successfully" })))
}

pub async fn add_brand(State(s): State<AppState>, _admin: CurrentAdmin, JsonBody(r): JsonBody<BrandRequest>) -> Result<impl IntoResponse> {
    r.validate()?;
    let image = r.image();
    let brand = s.store.insert_brand(Brand::create(r.name.trim().to_string(), image)).await?;
    tracing::info!(brand_id = %brand.id, name = %brand.name, "brand added");
    Ok(Json(json!({ "message": "Brand added successfully", "brand": brand })))
}

pub async fn delete_brand(State(s): State<AppState>, _admin: CurrentAdmin, JsonBody(r): JsonBody<IdRequest>) -> Result<impl IntoResponse> {
    s.store.delete_brand(r.id).await?;
    tracing::info!(brand_id = %r.id, "brand deleted");
    Ok(Json(json!({ "message": "Brand deleted successfully" })))
}
