use std::{str::FromStr, time::Duration};

use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use tracing::{info, warn};

use crate::config::AppConfig;

/// Database reachability as reported by the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Connected,
    Disconnected,
}

#[async_trait]
pub trait ConnectionMonitor: Send + Sync {
    async fn state(&self) -> ConnectionState;
}

/// Checks the pool on demand instead of tracking a flag.
#[derive(Clone)]
pub struct PgMonitor {
    db: PgPool,
}

impl PgMonitor {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ConnectionMonitor for PgMonitor {
    async fn state(&self) -> ConnectionState {
        match sqlx::query("SELECT 1").execute(&self.db).await {
            Ok(_) => ConnectionState::Connected,
            Err(e) => {
                warn!(error = %e, "database ping failed");
                ConnectionState::Disconnected
            }
        }
    }
}

/// Builds the pool without connecting, so the server can come up while the
/// database is still unreachable.
pub fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let options = PgConnectOptions::from_str(&config.database_url)
        .context("parse DATABASE_URL")?
        .database(&config.database_name);
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(30))
        .connect_lazy_with(options);
    Ok(pool)
}

/// Applies pending migrations; failure is logged and startup continues.
pub async fn migrate(db: &PgPool) {
    match sqlx::migrate!("./migrations").run(db).await {
        Ok(()) => info!("database migrations applied"),
        Err(e) => warn!(error = %e, "migration failed; continuing"),
    }
}
