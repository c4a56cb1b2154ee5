//! In-process store shared by every clone of the gateway.
//!
//! Cloning a `MemoryGateway` gives another client of the same store, which is
//! how tests simulate several operators editing one period.

use super::{EventSink, RemoteGateway, Subscription};
use crate::errors::GatewayError;
use crate::models::period::Period;
use crate::models::remote::{RemoteChangeEvent, RemoteRow};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct MemoryState {
    rows: BTreeMap<String, RemoteRow>,
    listeners: HashMap<u64, EventSink>,
    next_listener: u64,
    unavailable: bool,
    upserts: usize,
}

impl MemoryState {
    fn check_available(&self) -> Result<(), GatewayError> {
        if self.unavailable {
            return Err(GatewayError::Unavailable("memory store offline".into()));
        }
        Ok(())
    }

    /// Store the row and fan out one notification per listener.
    fn write(&mut self, row: RemoteRow) {
        let event = RemoteChangeEvent::from(row.clone());
        self.rows.insert(row.id.clone(), row);
        self.listeners
            .retain(|_, sink| sink.send(event.clone()).is_ok());
    }
}

#[derive(Clone, Default)]
pub struct MemoryGateway {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, GatewayError> {
        self.state
            .lock()
            .map_err(|_| GatewayError::Task("memory store lock poisoned".into()))
    }

    /// Simulate losing (or regaining) connectivity.
    pub fn set_available(&self, available: bool) {
        if let Ok(mut state) = self.lock() {
            state.unavailable = !available;
        }
    }

    /// Write a row as a foreign client would, notifying subscribers.
    pub fn insert_row(&self, row: RemoteRow) {
        if let Ok(mut state) = self.lock() {
            state.write(row);
        }
    }

    pub fn row(&self, id: &str) -> Option<RemoteRow> {
        self.lock().ok()?.rows.get(id).cloned()
    }

    pub fn rows(&self) -> Vec<RemoteRow> {
        self.lock()
            .map(|s| s.rows.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn listener_count(&self) -> usize {
        self.lock().map(|s| s.listeners.len()).unwrap_or(0)
    }

    /// Successful upserts so far.
    pub fn upsert_count(&self) -> usize {
        self.lock().map(|s| s.upserts).unwrap_or(0)
    }
}

#[async_trait]
impl RemoteGateway for MemoryGateway {
    async fn fetch_by_period(&self, period: Period) -> Result<Vec<RemoteRow>, GatewayError> {
        let state = self.lock()?;
        state.check_available()?;
        Ok(state
            .rows
            .values()
            .filter(|r| period.matches(&r.month, r.year))
            .cloned()
            .collect())
    }

    async fn upsert(&self, row: RemoteRow) -> Result<(), GatewayError> {
        let mut state = self.lock()?;
        state.check_available()?;
        state.upserts += 1;
        state.write(row);
        Ok(())
    }

    async fn delete_by_period(&self, period: Period) -> Result<usize, GatewayError> {
        let mut state = self.lock()?;
        state.check_available()?;
        let before = state.rows.len();
        state.rows.retain(|_, r| !period.matches(&r.month, r.year));
        Ok(before - state.rows.len())
    }

    async fn subscribe(&self, sink: EventSink) -> Result<Subscription, GatewayError> {
        let id = {
            let mut state = self.lock()?;
            state.check_available()?;
            let id = state.next_listener;
            state.next_listener += 1;
            state.listeners.insert(id, sink);
            id
        };

        let shared = Arc::clone(&self.state);
        Ok(Subscription::new(move || {
            if let Ok(mut state) = shared.lock() {
                state.listeners.remove(&id);
            }
        }))
    }
}
