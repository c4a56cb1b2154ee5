//! Reconciliation engine: the single owner of the record set.
//!
//! Local edits are written into the [`RecordStore`] synchronously and then
//! persisted by a spawned task. Upsert outcomes and push notifications come
//! back as messages on the engine's own channels and are applied only through
//! `&mut self`, so the store never needs a lock.

use super::echo::{DEFAULT_ECHO_WINDOW, EchoGuard, EchoVerdict, generate_client_id};
use super::store::RecordStore;
use crate::errors::GatewayError;
use crate::gateway::{RemoteGateway, Subscription};
use crate::models::period::Period;
use crate::models::record::{LocationRecord, RecordChange};
use crate::models::remote::{RemoteChangeEvent, RemoteRow};
use crate::models::roster::Roster;
use crate::models::sync_status::SyncStatus;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub client_id: String,
    pub echo_window: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            client_id: generate_client_id(),
            echo_window: DEFAULT_ECHO_WINDOW,
        }
    }
}

/// What `merge` did with a change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Applied,
    Echo,
    Superseded,
    OtherPeriod,
    UnknownLocation,
}

/// Something the engine processed from its queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Merged {
        location_id: String,
        outcome: MergeOutcome,
    },
    Persisted {
        location_id: String,
        ok: bool,
    },
}

#[derive(Debug)]
struct UpsertOutcome {
    period: Period,
    location_id: String,
    seq: u64,
    result: Result<(), GatewayError>,
}

/// Result of deriving the record set for a period.
#[derive(Debug)]
pub struct InitialSet {
    pub store: RecordStore,
    pub status: SyncStatus,
    pub error: Option<String>,
}

/// Roster defaults for `period`, overlaid with the remote rows when the
/// gateway answers. An absent or failing gateway yields the plain defaults.
pub async fn build_initial_set(
    roster: &Roster,
    gateway: Option<&Arc<dyn RemoteGateway>>,
    period: Period,
) -> InitialSet {
    let mut store = RecordStore::from_roster(roster, period);

    let Some(gateway) = gateway else {
        return InitialSet {
            store,
            status: SyncStatus::Offline,
            error: None,
        };
    };

    match gateway.fetch_by_period(period).await {
        Ok(rows) => {
            let total = rows.len();
            let mut applied = 0;
            for row in &rows {
                if store.overlay_row(roster, row) {
                    applied += 1;
                } else {
                    debug!(row = %row.id, "ignoring orphan row");
                }
            }
            debug!(%period, total, applied, "remote snapshot loaded");
            InitialSet {
                store,
                status: SyncStatus::Synced,
                error: None,
            }
        }
        Err(e) => {
            warn!(%period, error = %e, "fetch failed, using roster defaults");
            InitialSet {
                store,
                status: SyncStatus::Error,
                error: Some(e.to_string()),
            }
        }
    }
}

pub struct ReconciliationEngine {
    roster: Arc<Roster>,
    gateway: Option<Arc<dyn RemoteGateway>>,
    store: RecordStore,
    status: SyncStatus,
    last_error: Option<String>,
    echo: EchoGuard,
    subscription: Option<Subscription>,
    in_flight: usize,
    events_tx: mpsc::UnboundedSender<RemoteChangeEvent>,
    events_rx: mpsc::UnboundedReceiver<RemoteChangeEvent>,
    done_tx: mpsc::UnboundedSender<UpsertOutcome>,
    done_rx: mpsc::UnboundedReceiver<UpsertOutcome>,
}

impl ReconciliationEngine {
    /// A loading engine holding roster defaults for `period`. Call
    /// [`set_period`](Self::set_period) or [`start`](Self::start) to load it.
    pub fn new(
        roster: Arc<Roster>,
        gateway: Option<Arc<dyn RemoteGateway>>,
        period: Period,
        options: EngineOptions,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        let store = RecordStore::from_roster(&roster, period);

        Self {
            roster,
            gateway,
            store,
            status: SyncStatus::Loading,
            last_error: None,
            echo: EchoGuard::new(options.client_id, options.echo_window),
            subscription: None,
            in_flight: 0,
            events_tx,
            events_rx,
            done_tx,
            done_rx,
        }
    }

    // ---------------------------
    // Accessors
    // ---------------------------

    pub fn records(&self) -> &[LocationRecord] {
        self.store.records()
    }

    pub fn record(&self, location_id: &str) -> Option<&LocationRecord> {
        self.store.get(location_id)
    }

    pub fn period(&self) -> Period {
        self.store.period()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn status(&self) -> SyncStatus {
        self.status
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn client_id(&self) -> &str {
        self.echo.client_id()
    }

    pub fn is_online(&self) -> bool {
        self.gateway.is_some()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Upserts spawned but not yet reported back.
    pub fn pending_writes(&self) -> usize {
        self.in_flight
    }

    fn set_status(&mut self, status: SyncStatus, error: Option<String>) {
        if self.status != status {
            debug!(from = %self.status, to = %status, "sync status changed");
        }
        self.status = status;
        self.last_error = error;
    }

    // ---------------------------
    // Period lifecycle
    // ---------------------------

    /// Load the period the engine was created with.
    pub async fn start(&mut self) {
        self.set_period(self.period()).await;
    }

    /// Make `period` active: release the previous subscription, subscribe
    /// again and rebuild the record set from scratch.
    pub async fn set_period(&mut self, period: Period) {
        // release first so no duplicate listener ever feeds the queue
        self.subscription = None;
        self.echo.clear();
        self.store = RecordStore::from_roster(&self.roster, period);
        self.set_status(SyncStatus::Loading, None);

        let subscribe_error = self.subscribe().await;

        let initial = build_initial_set(&self.roster, self.gateway.as_ref(), period).await;
        self.store = initial.store;
        self.set_status(initial.status, initial.error);

        if let Some(e) = subscribe_error
            && self.status != SyncStatus::Error
        {
            self.set_status(SyncStatus::Error, Some(e));
        }
        info!(%period, status = %self.status, "period loaded");
    }

    async fn subscribe(&mut self) -> Option<String> {
        let gateway = self.gateway.clone()?;
        match gateway.subscribe(self.events_tx.clone()).await {
            Ok(sub) => {
                self.subscription = Some(sub);
                None
            }
            Err(e) => {
                warn!(error = %e, "subscription failed, live updates disabled");
                Some(e.to_string())
            }
        }
    }

    /// Re-run the initial derivation for the active period. Local writes that
    /// the store has not acknowledged yet are re-applied on top; committed
    /// ones are already part of the snapshot (or were overwritten since).
    pub async fn refresh(&mut self) {
        if self.gateway.is_some() && self.subscription.is_none() {
            // a previous subscribe failed; retry it with the refresh
            if let Some(e) = self.subscribe().await {
                debug!(error = %e, "resubscribe failed");
            }
        }

        let period = self.period();
        let initial = build_initial_set(&self.roster, self.gateway.as_ref(), period).await;
        let expired = self.echo.expire_committed();
        if expired > 0 {
            debug!(expired, "dropped committed writes whose echo never arrived");
        }

        let mut store = initial.store;
        for record in self.echo.uncommitted() {
            store.put(record.clone());
        }
        self.store = store;
        self.set_status(initial.status, initial.error);
    }

    /// Discard the active period: every record back to roster defaults and
    /// the period's remote rows deleted. Does nothing unless `confirmed`.
    pub async fn reset_period(&mut self, confirmed: bool) -> bool {
        if !confirmed {
            return false;
        }

        let period = self.period();
        self.echo.clear();
        self.store = RecordStore::from_roster(&self.roster, period);

        let Some(gateway) = self.gateway.clone() else {
            self.set_status(SyncStatus::Offline, None);
            return true;
        };

        match gateway.delete_by_period(period).await {
            Ok(removed) => {
                info!(%period, removed, "period reset");
                self.set_status(SyncStatus::Synced, None);
            }
            Err(e) => {
                warn!(%period, error = %e, "remote reset failed");
                self.set_status(SyncStatus::Error, Some(e.to_string()));
            }
        }
        true
    }

    // ---------------------------
    // Local edits
    // ---------------------------

    /// Apply `change` to the record locally, then persist it in the
    /// background. Unknown ids and empty changes are ignored.
    pub fn update(&mut self, location_id: &str, change: RecordChange) {
        if change.is_empty() {
            return;
        }
        let Some(current) = self.store.get(location_id) else {
            debug!(location_id, "update for unknown location ignored");
            return;
        };

        let next = change.apply_to(current);
        self.store.put(next.clone());
        let origin = self.echo.record_write(&next);

        let Some(gateway) = self.gateway.clone() else {
            return;
        };

        let period = self.period();
        let seq = origin.seq;
        let row = RemoteRow::from_record(&period, &next, Some(origin));
        let done = self.done_tx.clone();
        let location_id = location_id.to_string();
        self.in_flight += 1;

        tokio::spawn(async move {
            let result = gateway.upsert(row).await;
            // the engine may be gone already; nothing to report to then
            let _ = done.send(UpsertOutcome {
                period,
                location_id,
                seq,
                result,
            });
        });
    }

    fn on_upsert_outcome(&mut self, outcome: UpsertOutcome) -> EngineEvent {
        self.in_flight = self.in_flight.saturating_sub(1);
        let ok = outcome.result.is_ok();

        if outcome.period != self.period() {
            debug!(period = %outcome.period, "discarding upsert outcome of an inactive period");
            return EngineEvent::Persisted {
                location_id: outcome.location_id,
                ok,
            };
        }

        match outcome.result {
            Ok(()) => {
                self.echo.write_committed(&outcome.location_id, outcome.seq);
                self.set_status(SyncStatus::Synced, None);
            }
            Err(e) => {
                warn!(location_id = %outcome.location_id, error = %e, "upsert failed");
                self.echo.write_failed(&outcome.location_id, outcome.seq);
                self.set_status(SyncStatus::Error, Some(e.to_string()));
            }
        }

        EngineEvent::Persisted {
            location_id: outcome.location_id,
            ok,
        }
    }

    // ---------------------------
    // Remote changes
    // ---------------------------

    /// Fold one change notification into the record set.
    pub fn merge(&mut self, event: RemoteChangeEvent) -> MergeOutcome {
        if !self.period().matches(&event.month, event.year) {
            return MergeOutcome::OtherPeriod;
        }
        if self.store.get(&event.location_id).is_none() {
            debug!(location_id = %event.location_id, "change for unknown location ignored");
            return MergeOutcome::UnknownLocation;
        }

        let verdict = self.echo.classify(&event);
        let outcome = match verdict {
            EchoVerdict::Echo => return MergeOutcome::Echo,
            EchoVerdict::Superseded => return MergeOutcome::Superseded,
            // our latest write as the store saw it; normally a no-op
            EchoVerdict::Confirmed => MergeOutcome::Echo,
            EchoVerdict::Accept => MergeOutcome::Applied,
        };

        self.store.overlay(
            &self.roster,
            &event.location_id,
            event.activities.as_ref(),
            event.note.as_deref(),
            event.responsible.as_deref(),
        );
        outcome
    }

    // ---------------------------
    // Queue
    // ---------------------------

    /// Process every message already queued, without waiting.
    pub fn pump(&mut self) -> Vec<EngineEvent> {
        let mut processed = Vec::new();
        loop {
            if let Ok(outcome) = self.done_rx.try_recv() {
                processed.push(self.on_upsert_outcome(outcome));
                continue;
            }
            if let Ok(event) = self.events_rx.try_recv() {
                let location_id = event.location_id.clone();
                let outcome = self.merge(event);
                processed.push(EngineEvent::Merged {
                    location_id,
                    outcome,
                });
                continue;
            }
            break;
        }
        processed
    }

    /// Wait for the next queued message and process it.
    pub async fn next_message(&mut self) -> EngineEvent {
        tokio::select! {
            Some(outcome) = self.done_rx.recv() => self.on_upsert_outcome(outcome),
            Some(event) = self.events_rx.recv() => {
                let location_id = event.location_id.clone();
                let outcome = self.merge(event);
                EngineEvent::Merged { location_id, outcome }
            }
        }
    }

    /// Wait until every spawned upsert has reported back, then drain the
    /// queue.
    pub async fn settle(&mut self) -> Vec<EngineEvent> {
        let mut processed = Vec::new();
        while self.in_flight > 0 {
            match self.done_rx.recv().await {
                Some(outcome) => processed.push(self.on_upsert_outcome(outcome)),
                None => break,
            }
        }
        processed.extend(self.pump());
        processed
    }
}
