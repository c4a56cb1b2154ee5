//! Backing-store abstraction used by the reconciliation engine.
//!
//! A gateway is optional: an engine built without one runs in offline mode.
//! Every call reports failure as a [`GatewayError`] value; the engine turns
//! those into status transitions.

pub mod memory;
pub mod sqlite;

use crate::errors::GatewayError;
use crate::models::period::Period;
use crate::models::remote::{RemoteChangeEvent, RemoteRow};
use async_trait::async_trait;
use tokio::sync::mpsc;

pub use memory::MemoryGateway;
pub use sqlite::SqliteGateway;

/// Where a subscription delivers change notifications.
pub type EventSink = mpsc::UnboundedSender<RemoteChangeEvent>;

#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// All rows of `period`.
    async fn fetch_by_period(&self, period: Period) -> Result<Vec<RemoteRow>, GatewayError>;

    /// Insert or replace the row addressed by `row.id`.
    async fn upsert(&self, row: RemoteRow) -> Result<(), GatewayError>;

    /// Remove every row of `period`; returns how many were removed.
    async fn delete_by_period(&self, period: Period) -> Result<usize, GatewayError>;

    /// Start delivering insert/update notifications for the whole table to
    /// `sink`, in commit order. Delivery stops when the returned
    /// [`Subscription`] is dropped.
    async fn subscribe(&self, sink: EventSink) -> Result<Subscription, GatewayError>;
}

/// Handle of an active subscription. Dropping it releases the listener.
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}
