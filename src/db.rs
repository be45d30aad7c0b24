//! PostgreSQL connectivity probe.
//!
//! A single long-lived connection is opened at startup and shared by every
//! `/api/db-test` request; the driver pipelines concurrent queries over it.
//! Handlers only see the [`DatabaseProbe`] trait so they can be exercised
//! without a running database.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_postgres::{Client, Config as PgConfig, NoTls};

use crate::config::{DatabaseConfig, DB_CLOSE_TIMEOUT_SECS};

/// Asks the server for its clock and version string in one round-trip
const PROBE_QUERY: &str = "SELECT NOW() AS current_time, version() AS db_version";

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Failed to connect to database: {0}")]
    Connect(#[source] tokio_postgres::Error),

    #[error("{0}")]
    Query(#[from] tokio_postgres::Error),

    /// Startup connection failed; carries that failure's message
    #[error("{0}")]
    NotConnected(String),

    #[error("Database connection closed")]
    Closed,
}

/// Result of a successful probe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbInfo {
    pub current_time: DateTime<Utc>,
    pub db_version: String,
}

#[async_trait]
pub trait DatabaseProbe: Send + Sync {
    /// Run the probe query against the server.
    async fn server_info(&self) -> Result<DbInfo, DbError>;

    /// Release the underlying connection. Later probes fail with [`DbError::Closed`].
    async fn close(&self);
}

/// Live PostgreSQL connection.
pub struct PgDatabase {
    client: RwLock<Option<Client>>,
    connection: Mutex<Option<JoinHandle<()>>>,
}

impl PgDatabase {
    /// Open the connection and spawn the task that drives it.
    ///
    /// Failure is returned to the caller, which decides whether the service can
    /// start without a database.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbError> {
        tracing::info!(
            host = %config.host,
            port = config.port,
            dbname = %config.dbname,
            user = %config.user,
            "Connecting to PostgreSQL"
        );

        let (client, connection) = to_pg_config(config)
            .connect(NoTls)
            .await
            .map_err(DbError::Connect)?;

        let handle = tokio::spawn(async move {
            match connection.await {
                Ok(()) => tracing::debug!("Database connection closed"),
                Err(e) => tracing::error!(error = %e, "Database connection error"),
            }
        });

        tracing::info!("Connected to PostgreSQL");

        Ok(Self {
            client: RwLock::new(Some(client)),
            connection: Mutex::new(Some(handle)),
        })
    }
}

#[async_trait]
impl DatabaseProbe for PgDatabase {
    async fn server_info(&self) -> Result<DbInfo, DbError> {
        let guard = self.client.read().await;
        let client = guard.as_ref().ok_or(DbError::Closed)?;

        let row = client.query_one(PROBE_QUERY, &[]).await?;
        Ok(DbInfo {
            current_time: row.try_get("current_time")?,
            db_version: row.try_get("db_version")?,
        })
    }

    async fn close(&self) {
        // Dropping the client ends the connection future once pending queries drain
        let client = self.client.write().await.take();
        if client.is_none() {
            return;
        }
        drop(client);

        if let Some(handle) = self.connection.lock().await.take() {
            let wait = Duration::from_secs(DB_CLOSE_TIMEOUT_SECS);
            if tokio::time::timeout(wait, handle).await.is_err() {
                tracing::warn!(
                    timeout_secs = DB_CLOSE_TIMEOUT_SECS,
                    "Database connection did not close in time"
                );
            }
        }
        tracing::info!("Database connection closed");
    }
}

/// Stand-in used when the startup connection failed and the database is optional.
///
/// Every probe reports the original connection failure.
pub struct DisconnectedDatabase {
    reason: String,
}

impl DisconnectedDatabase {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl DatabaseProbe for DisconnectedDatabase {
    async fn server_info(&self) -> Result<DbInfo, DbError> {
        Err(DbError::NotConnected(self.reason.clone()))
    }

    async fn close(&self) {}
}

fn to_pg_config(config: &DatabaseConfig) -> PgConfig {
    let mut pg_config = PgConfig::new();
    pg_config.host(&config.host);
    pg_config.port(config.port);
    pg_config.dbname(&config.dbname);
    pg_config.user(&config.user);
    pg_config.password(&config.password);
    pg_config.connect_timeout(Duration::from_secs(config.connect_timeout_seconds));
    pg_config.application_name(env!("CARGO_PKG_NAME"));
    pg_config
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_postgres::config::Host;

    #[test]
    fn test_pg_config_from_defaults() {
        let pg_config = to_pg_config(&DatabaseConfig::default());
        assert_eq!(pg_config.get_hosts(), &[Host::Tcp("database".to_string())]);
        assert_eq!(pg_config.get_ports(), &[5432]);
        assert_eq!(pg_config.get_dbname(), Some("bluegreen_db"));
        assert_eq!(pg_config.get_user(), Some("admin"));
        assert_eq!(pg_config.get_password(), Some("secret123".as_bytes()));
        assert_eq!(pg_config.get_connect_timeout(), Some(&Duration::from_secs(10)));
    }

    #[tokio::test]
    async fn test_disconnected_reports_reason() {
        let db = DisconnectedDatabase::new("connection refused");
        let err = db.server_info().await.unwrap_err();
        assert!(matches!(err, DbError::NotConnected(_)));
        assert_eq!(err.to_string(), "connection refused");

        // Closing twice is harmless
        db.close().await;
        db.close().await;
    }

    #[tokio::test]
    async fn test_connect_failure_is_returned() {
        let config = DatabaseConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            connect_timeout_seconds: 2,
            ..DatabaseConfig::default()
        };
        let result = PgDatabase::connect(&config).await;
        assert!(matches!(result, Err(DbError::Connect(_))));
    }
}
