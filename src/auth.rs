//! Password hashing and credential checks.

use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::rngs::OsRng;
use crate::domain::aggregates::{Admin, User};
use crate::session::Principal;
use crate::store::Store;
use crate::{Result, StorefrontError};

/// Hashes a password into an Argon2id PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| StorefrontError::PasswordHash(e.to_string()))
}

pub fn verify_password(password: &str, phc: &str) -> Result<bool> {
    let parsed = PasswordHash::new(phc).map_err(|e| StorefrontError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}

/// Resolves a login attempt. Admin accounts take precedence over users with
/// the same email.
pub async fn authenticate(store: &dyn Store, email: &str, password: &str) -> Result<Principal> {
    if let Some(admin) = store.find_admin(email).await? {
        return check(password, &admin.password_hash).map(|_| admin_principal(&admin));
    }
    if let Some(user) = store.find_user(email).await? {
        return check(password, &user.password_hash).map(|_| customer_principal(&user));
    }
    Err(StorefrontError::EmailNotRegistered)
}

fn check(password: &str, phc: &str) -> Result<()> {
    if verify_password(password, phc)? { Ok(()) } else { Err(StorefrontError::IncorrectPassword) }
}

fn admin_principal(admin: &Admin) -> Principal {
    Principal::Admin { name: admin.owner_name.clone(), email: admin.email.clone() }
}

fn customer_principal(user: &User) -> Principal {
    Principal::Customer { name: user.owner_name.clone(), email: user.email.clone() }
}

/// Creates the configured admin account unless one with that email exists.
pub async fn ensure_admin(store: &dyn Store, name: &str, email: &str, password: &str) -> Result<bool> {
    if store.find_admin(email).await?.is_some() {
        return Ok(false);
    }
    let admin = Admin::create(name.to_string(), email.to_string(), hash_password(password)?);
    store.insert_admin(admin).await?;
    tracing::info!(%email, "seeded default admin account");
    Ok(true)
}
