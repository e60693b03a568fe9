//! Session-gated extractors, plus body and path extractors that reject with
//! the storefront's JSON error body.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::{header::COOKIE, request::Parts},
};
use crate::domain::aggregates::Customer;
use crate::http::AppState;
use crate::session::{Principal, Session, SessionId};
use crate::StorefrontError;

/// Session cookie from the request, if any.
pub fn session_id(parts: &Parts) -> Option<SessionId> {
    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(SessionId::from_cookie_header)
}

async fn live_session(parts: &Parts, state: &AppState) -> Option<(SessionId, Session)> {
    let id = session_id(parts)?;
    let session = state.sessions.get(&id).await?;
    Some((id, session))
}

/// A logged-in customer. Rejects with 401 "Login first".
pub struct CurrentCustomer {
    pub session_id: SessionId,
    pub customer: Customer,
    pub session: Session,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentCustomer {
    type Rejection = StorefrontError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let (session_id, session) = live_session(parts, state).await.ok_or(StorefrontError::LoginRequired)?;
        let customer = session.principal.customer().ok_or(StorefrontError::LoginRequired)?;
        Ok(Self { session_id, customer, session })
    }
}

/// A logged-in administrator. Rejects with 401 "Unauthorized".
pub struct CurrentAdmin {
    pub principal: Principal,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = StorefrontError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match live_session(parts, state).await {
            Some((_, session)) if session.principal.is_admin() => Ok(Self { principal: session.principal }),
            _ => Err(StorefrontError::Unauthorized),
        }
    }
}

/// Session cookie, whether or not it still names a live session.
pub struct MaybeSession(pub Option<SessionId>);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for MaybeSession {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(session_id(parts)))
    }
}

/// `axum::Json` whose rejection is a [`StorefrontError::BadRequest`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(StorefrontError))]
pub struct JsonBody<T>(pub T);

/// `axum::extract::Path` whose rejection is a [`StorefrontError::BadRequest`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(StorefrontError))]
pub struct UrlPath<T>(pub T);
