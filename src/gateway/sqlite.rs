//! Shared SQLite file as the backing store.
//!
//! Several processes may open the same file. Push notifications come from the
//! trigger-maintained `change_feed` table, which each subscription polls from
//! the sequence it saw when it started. Pollers also prune feed entries older
//! than the retention, so the file does not grow with every write.

use super::{EventSink, RemoteGateway, Subscription};
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::GatewayError;
use crate::models::period::Period;
use crate::models::remote::{RemoteChangeEvent, RemoteRow};
use async_trait::async_trait;
use rusqlite::Connection;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// How long change-feed entries are kept. Live pollers read them within a
/// few poll intervals.
pub const DEFAULT_FEED_RETENTION: Duration = Duration::from_secs(600);

#[derive(Clone)]
pub struct SqliteGateway {
    pool: DbPool,
    poll_interval: Duration,
    feed_retention: Duration,
}

impl SqliteGateway {
    fn with_pool(pool: DbPool, poll_interval: Duration) -> Self {
        Self {
            pool,
            poll_interval,
            feed_retention: DEFAULT_FEED_RETENTION,
        }
    }

    /// Open (creating if needed) the store at `path`.
    pub fn open(path: &str, poll_interval: Duration) -> Result<Self, GatewayError> {
        Ok(Self::with_pool(DbPool::open(path)?, poll_interval))
    }

    /// A gateway for `path` that connects on first use. Every call made while
    /// the file cannot be opened fails with that error, and the next call
    /// tries again.
    pub fn lazy(path: &str, poll_interval: Duration) -> Self {
        Self::with_pool(DbPool::lazy(path), poll_interval)
    }

    /// Wrap an already opened connection (e.g. `Connection::open_in_memory`).
    pub fn from_connection(conn: Connection, poll_interval: Duration) -> Result<Self, GatewayError> {
        Ok(Self::with_pool(DbPool::from_connection(conn)?, poll_interval))
    }

    pub fn with_feed_retention(mut self, retention: Duration) -> Self {
        self.feed_retention = retention;
        self
    }

    pub fn is_connected(&self) -> bool {
        self.pool.is_connected()
    }

    pub fn row(&self, id: &str) -> Result<Option<RemoteRow>, GatewayError> {
        self.pool.with_conn(|conn| queries::load_row(conn, id))
    }

    /// Number of entries currently in the change feed.
    pub fn feed_len(&self) -> Result<usize, GatewayError> {
        self.pool.with_conn(|conn| queries::feed_len(conn))
    }

    /// Remove change-feed entries older than the retention.
    pub async fn prune_feed(&self) -> Result<usize, GatewayError> {
        let max_age = self.feed_retention.as_secs() as i64;
        self.blocking(move |conn| queries::prune_feed(conn, max_age))
            .await
    }

    /// Run a database closure off the async thread.
    async fn blocking<F, T>(&self, func: F) -> Result<T, GatewayError>
    where
        F: FnOnce(&mut Connection) -> Result<T, GatewayError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || pool.with_conn(func))
            .await
            .map_err(|e| GatewayError::Task(e.to_string()))?
    }
}

#[async_trait]
impl RemoteGateway for SqliteGateway {
    async fn fetch_by_period(&self, period: Period) -> Result<Vec<RemoteRow>, GatewayError> {
        self.blocking(move |conn| {
            queries::fetch_rows_by_period(conn, period.month.as_str(), period.year)
        })
        .await
    }

    async fn upsert(&self, row: RemoteRow) -> Result<(), GatewayError> {
        self.blocking(move |conn| queries::upsert_row(conn, &row))
            .await
    }

    async fn delete_by_period(&self, period: Period) -> Result<usize, GatewayError> {
        self.blocking(move |conn| {
            queries::delete_rows_by_period(conn, period.month.as_str(), period.year)
        })
        .await
    }

    async fn subscribe(&self, sink: EventSink) -> Result<Subscription, GatewayError> {
        let mut cursor = self.blocking(|conn| queries::feed_cursor(conn)).await?;
        let gateway = self.clone();

        let handle = tokio::spawn(async move {
            debug!(cursor, "change feed poller started");
            let prune_every = (gateway.feed_retention / 10).max(gateway.poll_interval);
            let mut last_prune: Option<Instant> = None;
            loop {
                tokio::time::sleep(gateway.poll_interval).await;
                if sink.is_closed() {
                    break;
                }

                let since = cursor;
                let batch = gateway
                    .blocking(move |conn| queries::load_feed_since(conn, since))
                    .await;

                match batch {
                    Ok(entries) => {
                        for (seq, row) in entries {
                            cursor = seq;
                            if sink.send(RemoteChangeEvent::from(row)).is_err() {
                                return;
                            }
                        }
                    }
                    // keep polling; the next round retries from the same cursor
                    Err(e) => warn!(error = %e, "change feed poll failed"),
                }

                if last_prune.is_none_or(|t| t.elapsed() >= prune_every) {
                    last_prune = Some(Instant::now());
                    match gateway.prune_feed().await {
                        Ok(0) => {}
                        Ok(removed) => debug!(removed, "change feed pruned"),
                        Err(e) => warn!(error = %e, "change feed prune failed"),
                    }
                }
            }
        });

        Ok(Subscription::new(move || handle.abort()))
    }
}
