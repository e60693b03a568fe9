use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Duration;
use pharmacy_storefront::publisher::EventPublisher;
use pharmacy_storefront::session::SessionStore;
use pharmacy_storefront::store::{MemoryStore, Store};
use pharmacy_storefront::{auth, router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

async fn app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    auth::ensure_admin(store.as_ref(), "Admin", "admin@example.com", "admin123").await.unwrap();
    let state = AppState::new(store.clone(), SessionStore::new(Duration::minutes(30)), EventPublisher::disabled());
    (router(state), store)
}

async fn send(app: &Router, method: &str, uri: &str, cookie: Option<&str>, body: Option<Value>) -> (StatusCode, Option<String>, Value) {
    send_raw(app, method, uri, cookie, body.map(|b| b.to_string())).await
}

async fn send_raw(app: &Router, method: &str, uri: &str, cookie: Option<&str>, body: Option<String>) -> (StatusCode, Option<String>, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        req = req.header(header::COOKIE, cookie);
    }
    let req = match body {
        Some(body) => req.header(header::CONTENT_TYPE, "application/json").body(Body::from(body)),
        None => req.body(Body::empty()),
    }
    .unwrap();

    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let set_cookie = res
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string);
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, set_cookie, json)
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, cookie, body) = send(app, "POST", "/login", None, Some(json!({"email": email, "password": password}))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    cookie.expect("session cookie")
}

async fn register_customer(app: &Router, name: &str, email: &str) -> String {
    let (status, _, _) = send(app, "POST", "/register", None, Some(json!({
        "owner_name": name, "email": email, "phone": "555-0100", "password": "pw-123"
    }))).await;
    assert_eq!(status, StatusCode::OK);
    login(app, email, "pw-123").await
}

async fn add_medicine(app: &Router, admin: &str, name: &str, category: &str, price: f64, quantity: i32) -> String {
    let (status, _, body) = send(app, "POST", "/admin/add_medicine", Some(admin), Some(json!({
        "name": name, "category": category, "price": price, "quantity": quantity
    }))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["medicine"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_register_and_login_flow() {
    let (app, _) = app().await;

    let (status, _, body) = send(&app, "POST", "/login", None, Some(json!({"email": "nobody@example.com", "password": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email not registered");

    register_customer(&app, "Ada", "ada@example.com").await;

    let (status, _, body) = send(&app, "POST", "/register", None, Some(json!({
        "owner_name": "Ada Again", "email": "ada@example.com", "password": "other"
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already exists");

    let (status, _, body) = send(&app, "POST", "/login", None, Some(json!({"email": "ada@example.com", "password": "wrong"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Incorrect password");

    let (status, cookie, body) = send(&app, "POST", "/login", None, Some(json!({"email": "admin@example.com", "password": "admin123"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "admin");
    assert_eq!(body["message"], "Welcome Admin Admin!");
    assert!(cookie.unwrap().starts_with("pharmacy_sid="));
}

#[tokio::test]
async fn test_pages_require_the_right_session() {
    let (app, _) = app().await;

    let (status, _, body) = send(&app, "GET", "/home", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Login first");

    let customer = register_customer(&app, "Ada", "ada@example.com").await;
    let (status, _, body) = send(&app, "GET", "/admin/dashboard_data", Some(&customer), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized");

    let admin = login(&app, "admin@example.com", "admin123").await;
    let (status, _, _) = send(&app, "GET", "/home", Some(&admin), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, cleared, _) = send(&app, "POST", "/logout", Some(&customer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared.as_deref(), Some("pharmacy_sid="));
    let (status, _, _) = send(&app, "GET", "/home", Some(&customer), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_checkout_and_payment_apply_deals_and_decrement_stock() {
    let (app, store) = app().await;
    let admin = login(&app, "admin@example.com", "admin123").await;
    let ibuprofen = add_medicine(&app, &admin, "Ibuprofen", "Pain", 10.0, 3).await;
    let vitamin = add_medicine(&app, &admin, "Vitamin C", "Supplements", 5.0, 10).await;

    let (status, _, _) = send(&app, "POST", "/admin/add_deal", Some(&admin), Some(json!({
        "title": "Pain relief week", "discount": "20%", "code": "PAIN20", "category": "Pain"
    }))).await;
    assert_eq!(status, StatusCode::OK);

    let customer = register_customer(&app, "Ada", "ada@example.com").await;
    let (status, _, body) = send(&app, "GET", "/checkout", Some(&customer), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Cart is empty");

    for id in [&ibuprofen, &ibuprofen, &vitamin] {
        let (status, _, _) = send(&app, "POST", "/user/add_to_cart", Some(&customer), Some(json!({"med_id": id}))).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, _, body) = send(&app, "GET", "/checkout", Some(&customer), None).await;
    assert_eq!(status, StatusCode::OK);
    let lines = body["cart"].as_array().unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["quantity"], 2);
    assert_eq!(lines[0]["final_price"].as_f64(), Some(8.0));
    assert_eq!(lines[0]["applied_deal"]["code"], "PAIN20");
    assert!(lines[1]["applied_deal"].is_null());
    assert_eq!(body["original_total"].as_f64(), Some(25.0));
    assert_eq!(body["total_savings"].as_f64(), Some(4.0));
    assert_eq!(body["subtotal"].as_f64(), Some(21.0));

    let (status, _, body) = send(&app, "POST", "/complete_payment", Some(&customer), Some(json!({"cardNumber": "4111111111111111"}))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["total"].as_f64(), Some(21.0));
    let order_id = body["order_id"].as_str().unwrap().to_string();
    assert_eq!(body["redirect"], format!("/receipt/{order_id}"));

    let stock = store.get_medicine(ibuprofen.parse().unwrap()).await.unwrap().unwrap();
    assert_eq!((stock.quantity, stock.sold), (1, 2));

    let (status, _, body) = send(&app, "GET", &format!("/receipt/{order_id}"), Some(&customer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["payment_info"]["card_last4"], "1111");
    assert_eq!(body["all_orders"].as_array().unwrap().len(), 1);

    let other = register_customer(&app, "Grace", "grace@example.com").await;
    let (status, _, body) = send(&app, "GET", &format!("/receipt/{order_id}"), Some(&other), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Order not found");

    let (status, _, _) = send(&app, "POST", "/complete_payment", Some(&customer), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cart_refuses_more_than_stock() {
    let (app, _) = app().await;
    let admin = login(&app, "admin@example.com", "admin123").await;
    let scarce = add_medicine(&app, &admin, "Insulin", "Diabetes", 30.0, 1).await;
    let empty = add_medicine(&app, &admin, "Aspirin", "Pain", 2.0, 0).await;
    let customer = register_customer(&app, "Ada", "ada@example.com").await;

    let (status, _, _) = send(&app, "POST", "/user/add_to_cart", Some(&customer), Some(json!({"med_id": scarce}))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, body) = send(&app, "POST", "/user/add_to_cart", Some(&customer), Some(json!({"med_id": scarce}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Insufficient stock for Insulin");

    let (status, _, body) = send(&app, "POST", "/user/add_to_cart", Some(&customer), Some(json!({"med_id": empty}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Medicine out of stock");

    let (status, _, body) = send(&app, "POST", "/user/remove_from_cart", Some(&customer), Some(json!({"med_id": scarce}))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["cart"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_wishlist_reports_duplicates() {
    let (app, _) = app().await;
    let admin = login(&app, "admin@example.com", "admin123").await;
    let id = add_medicine(&app, &admin, "Zinc", "Supplements", 4.5, 20).await;
    let customer = register_customer(&app, "Ada", "ada@example.com").await;

    let (_, _, body) = send(&app, "POST", "/user/add_to_wishlist", Some(&customer), Some(json!({"med_id": id}))).await;
    assert_eq!(body["action"], "added");
    let (_, _, body) = send(&app, "POST", "/user/add_to_wishlist", Some(&customer), Some(json!({"med_id": id}))).await;
    assert_eq!(body["action"], "exists");
    assert_eq!(body["wishlist"].as_array().unwrap().len(), 1);

    let (_, _, body) = send(&app, "POST", "/user/remove_from_wishlist", Some(&customer), Some(json!({"med_id": id}))).await;
    assert!(body["wishlist"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_admin_dashboard_data() {
    let (app, _) = app().await;
    let admin = login(&app, "admin@example.com", "admin123").await;
    let id = add_medicine(&app, &admin, "Cough Syrup", "Cold", 6.0, 5).await;
    add_medicine(&app, &admin, "Bandage", "First Aid", 1.0, 0).await;

    let customer = register_customer(&app, "Ada", "ada@example.com").await;
    send(&app, "POST", "/user/add_to_cart", Some(&customer), Some(json!({"med_id": id}))).await;
    let (status, _, _) = send(&app, "POST", "/complete_payment", Some(&customer), Some(json!({"cardNumber": "5500000000000004"}))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, body) = send(&app, "GET", "/admin/dashboard_data", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sales_over_time"]["dates"].as_array().unwrap().len(), 7);
    assert_eq!(body["sales_over_time"]["amounts"][6].as_f64(), Some(6.0));
    assert_eq!(body["top_medicines"]["names"][0], "Cough Syrup");
    assert_eq!(body["top_users"][0]["name"], "Ada");
    assert_eq!(body["top_users"][0]["orders"], 1);

    let (status, _, body) = send(&app, "GET", "/dashboard", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["total_medicines"], 2);
    assert_eq!(body["summary"]["out_of_stock"], 1);
    assert_eq!(body["summary"]["total_users"], 1);

    let (status, _, _) = send(&app, "POST", "/admin/delete_medicine", Some(&admin), Some(json!({"id": id}))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, body) = send(&app, "POST", "/admin/delete_medicine", Some(&admin), Some(json!({"id": id}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Medicine not found");
}

#[tokio::test]
async fn test_malformed_requests_answer_with_json_message() {
    let (app, _) = app().await;

    let (status, _, body) = send(&app, "POST", "/login", None, Some(json!({"email": "ada@example.com"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("password"));

    let (status, _, body) = send_raw(&app, "POST", "/register", None, Some("not json".into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let customer = register_customer(&app, "Ada", "ada@example.com").await;
    let (status, _, body) = send(&app, "GET", "/receipt/not-a-uuid", Some(&customer), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let admin = login(&app, "admin@example.com", "admin123").await;
    let (status, _, body) = send(&app, "POST", "/admin/add_medicine", Some(&admin), Some(json!({
        "name": "   ", "price": 1.0, "quantity": 1
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("name"));
}

#[tokio::test]
async fn test_concurrent_payments_place_a_single_order() {
    let (app, store) = app().await;
    let admin = login(&app, "admin@example.com", "admin123").await;
    let id = add_medicine(&app, &admin, "Antacid", "Digestive", 3.0, 5).await;
    let customer = register_customer(&app, "Ada", "ada@example.com").await;
    for _ in 0..2 {
        send(&app, "POST", "/user/add_to_cart", Some(&customer), Some(json!({"med_id": id}))).await;
    }

    let card = json!({"cardNumber": "4111111111111111"});
    let (first, second) = tokio::join!(
        send(&app, "POST", "/complete_payment", Some(&customer), Some(card.clone())),
        send(&app, "POST", "/complete_payment", Some(&customer), Some(card.clone())),
    );
    let mut statuses = vec![first.0.as_u16(), second.0.as_u16()];
    statuses.sort();
    assert_eq!(statuses, vec![200, 400]);

    assert_eq!(store.list_orders().await.unwrap().len(), 1);
    let stock = store.get_medicine(id.parse().unwrap()).await.unwrap().unwrap();
    assert_eq!((stock.quantity, stock.sold), (3, 2));
}

#[tokio::test]
async fn test_failed_payment_puts_the_cart_back() {
    let (app, store) = app().await;
    let admin = login(&app, "admin@example.com", "admin123").await;
    let id = add_medicine(&app, &admin, "Antacid", "Digestive", 3.0, 5).await;
    let customer = register_customer(&app, "Ada", "ada@example.com").await;
    for _ in 0..2 {
        send(&app, "POST", "/user/add_to_cart", Some(&customer), Some(json!({"med_id": id}))).await;
    }

    let (status, _, _) = send(&app, "POST", "/admin/edit_medicine", Some(&admin), Some(json!({
        "id": id, "name": "Antacid", "category": "Digestive", "price": 3.0, "quantity": 1
    }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, body) = send(&app, "POST", "/complete_payment", Some(&customer), Some(json!({"cardNumber": "4111"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Insufficient stock for Antacid");
    assert!(store.list_orders().await.unwrap().is_empty());

    let (status, _, body) = send(&app, "GET", "/checkout", Some(&customer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cart"][0]["quantity"], 2);
}

#[tokio::test]
async fn test_edit_medicine_keeps_sales() {
    let (app, _) = app().await;
    let admin = login(&app, "admin@example.com", "admin123").await;
    let id = add_medicine(&app, &admin, "Saline", "First Aid", 2.0, 5).await;
    let customer = register_customer(&app, "Ada", "ada@example.com").await;
    send(&app, "POST", "/user/add_to_cart", Some(&customer), Some(json!({"med_id": id}))).await;
    let (status, _, _) = send(&app, "POST", "/complete_payment", Some(&customer), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, body) = send(&app, "POST", "/admin/edit_medicine", Some(&admin), Some(json!({
        "id": id, "name": "Saline Spray", "price": 2.5, "quantity": 40
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Medicine updated successfully");
    assert_eq!(body["medicine"]["name"], "Saline Spray");
    assert_eq!(body["medicine"]["category"], "General");
    assert_eq!(body["medicine"]["quantity"], 40);
    assert_eq!(body["medicine"]["sold"], 1);

    let (status, _, body) = send(&app, "POST", "/admin/edit_medicine", Some(&admin), Some(json!({
        "id": "0190a8e4-0000-7000-8000-000000000001", "name": "Ghost", "price": 1.0, "quantity": 1
    }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Medicine not found");
}

#[tokio::test]
async fn test_update_profile_renames_the_session() {
    let (app, _) = app().await;
    let customer = register_customer(&app, "Ada", "ada@example.com").await;

    let (status, _, body) = send(&app, "POST", "/user/update_profile", Some(&customer), Some(json!({
        "name": "Ada Lovelace", "phone": "555-0199"
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, _, body) = send(&app, "GET", "/user/receipts", Some(&customer), None).await;
    assert_eq!(body["user"]["name"], "Ada Lovelace");

    let (status, _, _) = send(&app, "POST", "/user/update_profile", Some(&customer), Some(json!({"name": "  "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, _, body) = send(&app, "POST", "/login", None, Some(json!({"email": "ada@example.com", "password": "pw-123"}))).await;
    assert_eq!(body["message"], "Welcome Ada Lovelace!");
}

#[tokio::test]
async fn test_deals_banners_and_brands_crud() {
    let (app, _) = app().await;
    let admin = login(&app, "admin@example.com", "admin123").await;

    let (status, _, body) = send(&app, "POST", "/admin/add_deal", Some(&admin), Some(json!({"title": "Spring", "discount": ""}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deal"]["discount"], "0%");
    assert_eq!(body["deal"]["category"], "All");
    let deal = body["deal"]["id"].clone();

    let (status, _, body) = send(&app, "POST", "/admin/add_banner", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["banner"]["title"], "New Offer");
    assert_eq!(body["banner"]["link"], "/shop");
    let banner = body["banner"]["id"].clone();

    let (status, _, body) = send(&app, "POST", "/admin/add_brand", Some(&admin), Some(json!({"name": "Acme Labs"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["brand"]["image"], "https://via.placeholder.com/100");
    let brand = body["brand"]["id"].clone();

    let (status, _, _) = send(&app, "POST", "/admin/add_brand", Some(&admin), Some(json!({"name": " "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, _, body) = send(&app, "GET", "/dashboard", Some(&admin), None).await;
    assert_eq!(body["deals"].as_array().unwrap().len(), 1);
    assert_eq!(body["banners"].as_array().unwrap().len(), 1);
    assert_eq!(body["brands"].as_array().unwrap().len(), 1);

    for (uri, id, missing) in [
        ("/admin/delete_deal", deal, "Deal not found"),
        ("/admin/delete_banner", banner, "Banner not found"),
        ("/admin/delete_brand", brand, "Brand not found"),
    ] {
        let (status, _, _) = send(&app, "POST", uri, Some(&admin), Some(json!({"id": id.clone()}))).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _, body) = send(&app, "POST", uri, Some(&admin), Some(json!({"id": id}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], missing);
    }
}

#[tokio::test]
async fn test_home_lists_deal_covered_medicines() {
    let (app, _) = app().await;
    let admin = login(&app, "admin@example.com", "admin123").await;
    add_medicine(&app, &admin, "Paracetamol", "Pain", 4.0, 20).await;
    add_medicine(&app, &admin, "Lozenges", "Cold", 3.0, 20).await;
    send(&app, "POST", "/admin/add_deal", Some(&admin), Some(json!({"title": "Pain week", "discount": "10%", "category": "Pain"}))).await;
    let customer = register_customer(&app, "Ada", "ada@example.com").await;

    let (status, _, body) = send(&app, "GET", "/home", Some(&customer), None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["medicines"].as_array().unwrap().iter().map(|m| m["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Paracetamol"]);
    assert_eq!(body["top_medicines"].as_array().unwrap().len(), 2);

    send(&app, "POST", "/admin/add_deal", Some(&admin), Some(json!({"title": "Everything", "discount": "5%", "category": "All"}))).await;
    let (_, _, body) = send(&app, "GET", "/home", Some(&customer), None).await;
    assert_eq!(body["medicines"].as_array().unwrap().len(), 2);

    let (status, _, body) = send(&app, "GET", "/medicines", Some(&customer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["categories"], json!(["Cold", "Pain"]));
    assert_eq!(body["medicines"].as_array().unwrap().len(), 2);
}
