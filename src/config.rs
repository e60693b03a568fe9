//! Runtime configuration read from the environment (and `.env`).

use anyhow::{bail, Context};
use chrono::Duration;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend { Postgres, Memory }

impl FromStr for StorageBackend {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => bail!("unknown STORAGE_BACKEND '{other}' (expected postgres or memory)"),
        }
    }
}

/// Account seeded at startup when no admin with this email exists.
#[derive(Debug, Clone)]
pub struct DefaultAdmin {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub session_ttl: Duration,
    pub nats_url: Option<String>,
    pub default_admin: DefaultAdmin,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8083,
            storage: StorageBackend::Postgres,
            database_url: None,
            db_max_connections: 10,
            session_ttl: Duration::minutes(24 * 60),
            nats_url: None,
            default_admin: DefaultAdmin {
                name: "Admin".into(),
                email: "admin@example.com".into(),
                password: "admin123".into(),
            },
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let parse = |key: &str| -> anyhow::Result<Option<i64>> {
            lookup(key).map(|v| v.trim().parse::<i64>().with_context(|| format!("{key} must be an integer"))).transpose()
        };

        let storage = match lookup("STORAGE_BACKEND") {
            Some(v) => v.parse()?,
            None => defaults.storage,
        };
        let database_url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty());
        if storage == StorageBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL is required when STORAGE_BACKEND=postgres");
        }

        let port = match parse("PORT")? {
            Some(p) => u16::try_from(p).context("PORT out of range")?,
            None => defaults.port,
        };
        let db_max_connections = match parse("DB_MAX_CONNECTIONS")? {
            Some(n) if n > 0 => u32::try_from(n).context("DB_MAX_CONNECTIONS out of range")?,
            Some(_) => bail!("DB_MAX_CONNECTIONS must be positive"),
            None => defaults.db_max_connections,
        };
        let session_ttl = match parse("SESSION_TTL_MINUTES")? {
            Some(m) if m > 0 => Duration::try_minutes(m).context("SESSION_TTL_MINUTES out of range")?,
            Some(_) => bail!("SESSION_TTL_MINUTES must be positive"),
            None => defaults.session_ttl,
        };

        Ok(Self {
            port,
            storage,
            database_url,
            db_max_connections,
            session_ttl,
            nats_url: lookup("NATS_URL").filter(|v| !v.trim().is_empty()),
            default_admin: DefaultAdmin {
                name: lookup("ADMIN_NAME").unwrap_or(defaults.default_admin.name),
                email: lookup("ADMIN_EMAIL").unwrap_or(defaults.default_admin.email),
                password: lookup("ADMIN_PASSWORD").unwrap_or(defaults.default_admin.password),
            },
        })
    }
}
