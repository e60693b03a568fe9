//! Public pages and account endpoints.

use axum::{extract::State, http::header::SET_COOKIE, response::IntoResponse, Json};
use serde_json::json;
use validator::Validate;
use crate::auth;
use crate::domain::aggregates::User;
use crate::http::extract::{JsonBody, MaybeSession};
use crate::http::requests::{LoginRequest, RegisterRequest};
use crate::http::AppState;
use crate::session::{Principal, SessionId};
use crate::{Result, StorefrontError};

pub async fn health() -> impl IntoResponse {
    Json(json!({"status": "healthy", "service": "pharmacy-storefront"}))
}

pub async fn landing(State(s): State<AppState>) -> Result<impl IntoResponse> {
    let medicines = s.store.list_medicines().await?;
    let deals = s.store.list_deals().await?;
    Ok(Json(json!({ "medicines": medicines, "deals": deals })))
}

pub async fn register(State(s): State<AppState>, JsonBody(r): JsonBody<RegisterRequest>) -> Result<impl IntoResponse> {
    r.validate()?;
    let email = r.email.trim().to_string();
    if s.store.find_user(&email).await?.is_some() {
        return Err(StorefrontError::EmailTaken);
    }
    let hash = auth::hash_password(&r.password)?;
    let user = s.store.insert_user(User::register(r.owner_name.trim().to_string(), email, r.phone, hash)).await?;
    tracing::info!(email = %user.email, "user registered");
    Ok(Json(json!({ "message": "Registered successfully" })))
}

pub async fn login(State(s): State<AppState>, MaybeSession(previous): MaybeSession, JsonBody(r): JsonBody<LoginRequest>) -> Result<impl IntoResponse> {
    let email = r.email.trim();
    let principal = match auth::authenticate(s.store.as_ref(), email, &r.password).await {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(%email, reason = %e, "login rejected");
            return Err(e);
        }
    };
    if let Some(previous) = previous {
        s.sessions.destroy(&previous).await;
    }

    let message = match &principal {
        Principal::Admin { name, .. } => format!("Welcome Admin {name}!"),
        Principal::Customer { name, .. } => format!("Welcome {name}!"),
    };
    let role = principal.role();
    let id = s.sessions.create(principal).await;
    tracing::info!(%email, role, "logged in");

    Ok(([(SET_COOKIE, id.set_cookie(s.sessions.ttl()))], Json(json!({ "message": message, "role": role }))))
}

pub async fn logout(State(s): State<AppState>, MaybeSession(id): MaybeSession) -> impl IntoResponse {
    if let Some(id) = id {
        s.sessions.destroy(&id).await;
    }
    ([(SET_COOKIE, SessionId::clear_cookie())], Json(json!({ "message": "Logged out" })))
}
