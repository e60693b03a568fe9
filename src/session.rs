//! Server-side sessions holding the logged-in principal, cart and wishlist.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;
use crate::domain::aggregates::{Cart, Customer, Wishlist};

pub const SESSION_COOKIE: &str = "pharmacy_sid";

/// Session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self { Self(Uuid::new_v4().simple().to_string()) }
    pub fn as_str(&self) -> &str { &self.0 }

    /// Finds the session cookie in a `Cookie` header value.
    pub fn from_cookie_header(header: &str) -> Option<Self> {
        header
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
            .map(|value| Self(value.to_string()))
    }

    pub fn set_cookie(&self, ttl: Duration) -> String {
        format!("{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}", self.0, ttl.num_seconds())
    }

    pub fn clear_cookie() -> String {
        format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Principal {
    Customer { name: String, email: String },
    Admin { name: String, email: String },
}

impl Principal {
    pub fn name(&self) -> &str {
        match self { Self::Customer { name, .. } | Self::Admin { name, .. } => name }
    }

    pub fn email(&self) -> &str {
        match self { Self::Customer { email, .. } | Self::Admin { email, .. } => email }
    }

    pub fn is_admin(&self) -> bool { matches!(self, Self::Admin { .. }) }

    pub fn role(&self) -> &'static str { if self.is_admin() { "admin" } else { "user" } }

    pub fn customer(&self) -> Option<Customer> {
        match self {
            Self::Customer { name, email } => Some(Customer { name: name.clone(), email: email.clone() }),
            Self::Admin { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub principal: Principal,
    pub cart: Cart,
    pub wishlist: Wishlist,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    fn is_expired(&self, now: DateTime<Utc>) -> bool { now >= self.expires_at }
}

/// In-process session table. Cloning shares the table.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self { sessions: Arc::new(RwLock::new(HashMap::new())), ttl }
    }

    pub fn ttl(&self) -> Duration { self.ttl }

    /// Starts a fresh session with an empty cart and wishlist.
    pub async fn create(&self, principal: Principal) -> SessionId {
        let id = SessionId::generate();
        let now = Utc::now();
        let session = Session { principal, cart: Cart::new(), wishlist: Wishlist::default(), created_at: now, expires_at: now + self.ttl };
        self.sessions.write().await.insert(id.clone(), session);
        id
    }

    pub async fn get(&self, id: &SessionId) -> Option<Session> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(id) {
                Some(s) if !s.is_expired(now) => return Some(s.clone()),
                None => return None,
                Some(_) => {}
            }
        }
        self.sessions.write().await.remove(id);
        None
    }

    /// Runs `f` against a live session. `None` if it is missing or expired.
    pub async fn update<R>(&self, id: &SessionId, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(id) {
            Some(s) if !s.is_expired(Utc::now()) => Some(f(s)),
            Some(_) => {
                sessions.remove(id);
                None
            }
            None => None,
        }
    }

    pub async fn destroy(&self, id: &SessionId) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(now));
        before - sessions.len()
    }

    pub async fn len(&self) -> usize { self.sessions.read().await.len() }
}
