//! Customer-facing storefront: catalog pages, cart, wishlist, checkout and receipts.

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;
use crate::domain::aggregates::{deal::category_has_deal, Cart, Customer, Medicine, Order, PaymentInfo, WishlistAction};
use crate::domain::analytics::{categories, top_sellers, HOME_TOP_SELLERS};
use crate::domain::pricing::price_cart;
use crate::http::extract::{CurrentCustomer, JsonBody, UrlPath};
use crate::http::requests::{MedicineRef, PaymentRequest, ProfileRequest};
use crate::http::AppState;
use crate::session::Principal;
use crate::{Result, StorefrontError};

async fn find_medicine(s: &AppState, id: Uuid) -> Result<Medicine> {
    s.store.get_medicine(id).await?.ok_or(StorefrontError::MedicineNotFound)
}

pub async fn home(State(s): State<AppState>, c: CurrentCustomer) -> Result<impl IntoResponse> {
    let all = s.store.list_medicines().await?;
    let deals = s.store.list_deals().await?;
    let on_deal: Vec<&Medicine> = all.iter().filter(|m| category_has_deal(&deals, &m.category)).collect();
    Ok(Json(json!({
        "user": c.customer,
        "medicines": on_deal,
        "top_medicines": top_sellers(&all, HOME_TOP_SELLERS),
        "carousel_banners": s.store.list_banners().await?,
        "brands": s.store.list_brands().await?,
        "cart": c.session.cart,
        "wishlist": c.session.wishlist,
        "deals": deals,
    })))
}

pub async fn medicines(State(s): State<AppState>, c: CurrentCustomer) -> Result<impl IntoResponse> {
    let all = s.store.list_medicines().await?;
    Ok(Json(json!({
        "user": c.customer,
        "categories": categories(&all),
        "medicines": all,
        "cart": c.session.cart,
        "wishlist": c.session.wishlist,
        "deals": s.store.list_deals().await?,
    })))
}

pub async fn add_to_cart(State(s): State<AppState>, c: CurrentCustomer, JsonBody(r): JsonBody<MedicineRef>) -> Result<impl IntoResponse> {
    let med = find_medicine(&s, r.med_id).await?;
    if !med.is_in_stock() {
        return Err(StorefrontError::OutOfStock);
    }
    let cart = s.sessions.update(&c.session_id, |session| {
        let wanted = session.cart.quantity_of(med.id).add(1);
        if !med.has_stock_for(wanted) {
            return Err(StorefrontError::InsufficientStock(med.name.clone()));
        }
        session.cart.add(&med);
        Ok(session.cart.clone())
    }).await.ok_or(StorefrontError::LoginRequired)??;
    Ok(Json(json!({ "message": "Added to cart", "cart": cart })))
}

pub async fn remove_from_cart(State(s): State<AppState>, c: CurrentCustomer, JsonBody(r): JsonBody<MedicineRef>) -> Result<impl IntoResponse> {
    let cart = s.sessions.update(&c.session_id, |session| {
        session.cart.remove(r.med_id);
        session.cart.clone()
    }).await.ok_or(StorefrontError::LoginRequired)?;
    Ok(Json(json!({ "message": "Removed from cart", "cart": cart })))
}

pub async fn add_to_wishlist(State(s): State<AppState>, c: CurrentCustomer, JsonBody(r): JsonBody<MedicineRef>) -> Result<impl IntoResponse> {
    let med = find_medicine(&s, r.med_id).await?;
    let (action, wishlist) = s.sessions.update(&c.session_id, |session| {
        (session.wishlist.add(&med), session.wishlist.clone())
    }).await.ok_or(StorefrontError::LoginRequired)?;
    let message = match action {
        WishlistAction::Added => "Added to wishlist",
        WishlistAction::Exists => "Already in wishlist",
    };
    Ok(Json(json!({ "message": message, "wishlist": wishlist, "action": action })))
}

pub async fn remove_from_wishlist(State(s): State<AppState>, c: CurrentCustomer, JsonBody(r): JsonBody<MedicineRef>) -> Result<impl IntoResponse> {
    let wishlist = s.sessions.update(&c.session_id, |session| {
        session.wishlist.remove(r.med_id);
        session.wishlist.clone()
    }).await.ok_or(StorefrontError::LoginRequired)?;
    Ok(Json(json!({ "message": "Removed from wishlist", "wishlist": wishlist })))
}

/// Prices the session cart against the current deals without placing an order.
pub async fn checkout(State(s): State<AppState>, c: CurrentCustomer) -> Result<impl IntoResponse> {
    if c.session.cart.is_empty() {
        return Err(StorefrontError::EmptyCart);
    }
    let deals = s.store.list_deals().await?;
    let priced = price_cart(c.session.cart.items(), &deals);
    Ok(Json(json!({
        "user": c.customer,
        "cart": priced.lines,
        "original_total": priced.original_total,
        "subtotal": priced.total,
        "total_savings": priced.total_savings,
    })))
}

pub async fn complete_payment(State(s): State<AppState>, c: CurrentCustomer, payment: Option<JsonBody<PaymentRequest>>) -> Result<impl IntoResponse> {
    let payment = payment.map(|JsonBody(p)| p).unwrap_or_default();
    // A concurrent payment on the same session finds the cart already empty.
    let cart = s.sessions.update(&c.session_id, |session| std::mem::take(&mut session.cart))
        .await
        .ok_or(StorefrontError::LoginRequired)?;
    if cart.is_empty() {
        return Err(StorefrontError::EmptyCart);
    }

    let order = match place_cart_order(&s, c.customer, &cart, &payment).await {
        Ok(order) => order,
        Err(e) => {
            s.sessions.update(&c.session_id, |session| session.cart.restore(cart)).await;
            return Err(e);
        }
    };
    tracing::info!(order_id = %order.id, email = %order.user_email, total = %order.total, "order placed");
    s.events.publish(order.placed_event()).await;

    Ok(Json(json!({
        "message": "Payment successful",
        "order_id": order.id,
        "total": order.total,
        "redirect": format!("/receipt/{}", order.id),
    })))
}

async fn place_cart_order(s: &AppState, customer: Customer, cart: &Cart, payment: &PaymentRequest) -> Result<Order> {
    let deals = s.store.list_deals().await?;
    let priced = price_cart(cart.items(), &deals);
    let order = Order::place(customer, cart.items().to_vec(), priced.total, PaymentInfo::card(&payment.card_number))
        .map_err(|_| StorefrontError::EmptyCart)?;
    s.store.place_order(order).await
}

pub async fn receipt(State(s): State<AppState>, c: CurrentCustomer, UrlPath(order_id): UrlPath<Uuid>) -> Result<impl IntoResponse> {
    let order = s.store.get_order(order_id).await?
        .filter(|o| o.belongs_to(&c.customer.email))
        .ok_or(StorefrontError::OrderNotFound)?;
    let all_orders = s.store.orders_for_user(&c.customer.email).await?;
    Ok(Json(json!({ "order": order, "all_orders": all_orders })))
}

pub async fn receipts(State(s): State<AppState>, c: CurrentCustomer) -> Result<impl IntoResponse> {
    let all_orders = s.store.orders_for_user(&c.customer.email).await?;
    Ok(Json(json!({ "user": c.customer, "all_orders": all_orders })))
}

pub async fn update_profile(State(s): State<AppState>, c: CurrentCustomer, JsonBody(r): JsonBody<ProfileRequest>) -> Result<impl IntoResponse> {
    r.validate()?;
    let name = r.name.trim().to_string();
    s.store.update_user_profile(&c.customer.email, &name, r.phone.trim()).await?;
    s.sessions.update(&c.session_id, |session| {
        session.principal = Principal::Customer { name: name.clone(), email: c.customer.email.clone() };
    }).await;
    Ok(Json(json!({ "success": true, "message": "Profile updated" })))
}
