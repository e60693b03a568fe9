//! Pharmacy storefront - online medicine shop with deals, carts and an admin dashboard

use anyhow::{Context, Result};
use pharmacy_storefront::config::StorageBackend;
use pharmacy_storefront::publisher::EventPublisher;
use pharmacy_storefront::session::SessionStore;
use pharmacy_storefront::store::{MemoryStore, PgStore, Store};
use pharmacy_storefront::{auth, router, AppConfig, AppState};
use std::{sync::Arc, time::Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();
    let cfg = AppConfig::from_env()?;

    let store: Arc<dyn Store> = match cfg.storage {
        StorageBackend::Postgres => {
            let url = cfg.database_url.as_deref().context("DATABASE_URL is not set")?;
            Arc::new(PgStore::connect(url, cfg.db_max_connections).await?)
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let admin = &cfg.default_admin;
    auth::ensure_admin(store.as_ref(), &admin.name, &admin.email, &admin.password).await?;

    let sessions = SessionStore::new(cfg.session_ttl);
    let sweeper = sessions.clone();
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            tick.tick().await;
            let purged = sweeper.purge_expired().await;
            if purged > 0 {
                tracing::debug!(purged, "expired sessions removed");
            }
        }
    });

    let events = EventPublisher::connect(cfg.nats_url.as_deref()).await;
    let app = router(AppState::new(store, sessions, events));

    tracing::info!("🚀 Pharmacy storefront listening on 0.0.0.0:{}", cfg.port);
    axum::serve(tokio::net::TcpListener::bind(("0.0.0.0", cfg.port)).await?, app).await?;
    Ok(())
}
