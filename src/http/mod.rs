//! HTTP surface: JSON endpoints behind cookie sessions.

use axum::{routing::{get, post}, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use crate::publisher::EventPublisher;
use crate::session::SessionStore;
use crate::store::Store;

pub mod admin;
pub mod extract;
pub mod public;
pub mod requests;
pub mod shop;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub sessions: SessionStore,
    pub events: EventPublisher,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, sessions: SessionStore, events: EventPublisher) -> Self {
        Self { store, sessions, events }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(public::health))
        .route("/", get(public::landing))
        .route("/register", post(public::register))
        .route("/login", post(public::login))
        .route("/logout", get(public::logout).post(public::logout))
        .route("/home", get(shop::home))
        .route("/medicines", get(shop::medicines))
        .route("/user/add_to_cart", post(shop::add_to_cart))
        .route("/user/remove_from_cart", post(shop::remove_from_cart))
        .route("/user/add_to_wishlist", post(shop::add_to_wishlist))
        .route("/user/remove_from_wishlist", post(shop::remove_from_wishlist))
        .route("/user/update_profile", post(shop::update_profile))
        .route("/user/receipts", get(shop::receipts))
        .route("/checkout", get(shop::checkout))
        .route("/complete_payment", post(shop::complete_payment))
        .route("/receipt/:order_id", get(shop::receipt))
        .route("/dashboard", get(admin::dashboard))
        .route("/admin/dashboard_data", get(admin::dashboard_data))
        .route("/admin/add_medicine", post(admin::add_medicine))
        .route("/admin/edit_medicine", post(admin::edit_medicine))
        .route("/admin/delete_medicine", post(admin::delete_medicine))
        .route("/admin/add_deal", post(admin::add_deal))
        .route("/admin/delete_deal", post(admin::delete_deal))
        .route("/admin/add_banner", post(admin::add_banner))
        .route("/admin/delete_banner", post(admin::delete_banner))
        .route("/admin/add_brand", post(admin::add_brand))
        .route("/admin/delete_brand", post(admin::delete_brand))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
