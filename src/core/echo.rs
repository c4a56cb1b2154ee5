//! Echo suppression for push notifications.
//!
//! Every local write is tagged with `(client id, seq)`. The guard remembers,
//! per location, the latest local write that has not come back through the
//! change feed yet. Because the feed delivers in commit order:
//!
//! - our own tag coming back is an echo; when it is the latest write for the
//!   location, that write is confirmed;
//! - a foreign write arriving while one of ours is still outstanding was
//!   committed before ours and is superseded by it;
//! - untagged rows fall back to a time window after the last local write.
//!
//! An outstanding write whose upsert succeeded but whose echo never arrives
//! stops superseding foreign writes once the echo window has passed.

use crate::models::record::LocationRecord;
use crate::models::remote::{RemoteChangeEvent, WriteOrigin};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;

pub const DEFAULT_ECHO_WINDOW: Duration = Duration::from_secs(3);

static CLIENT_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Unique id for one engine instance.
pub fn generate_client_id() -> String {
    let n = CLIENT_COUNTER.fetch_add(1, Ordering::Relaxed);
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("client-{}-{:x}-{}", std::process::id(), nanos, n)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EchoVerdict {
    /// Foreign (or old enough untagged) change: apply it.
    Accept,
    /// The latest local write for the location came back.
    Confirmed,
    /// Echo of an older local write, or untagged inside the window.
    Echo,
    /// Foreign change committed before a local write still in flight.
    Superseded,
}

#[derive(Debug, Clone)]
struct Outstanding {
    seq: u64,
    record: LocationRecord,
    committed_at: Option<Instant>,
}

#[derive(Debug)]
pub struct EchoGuard {
    client_id: String,
    window: Duration,
    next_seq: u64,
    last_local_write_at: Option<Instant>,
    outstanding: HashMap<String, Outstanding>,
}

impl EchoGuard {
    pub fn new(client_id: impl Into<String>, window: Duration) -> Self {
        Self {
            client_id: client_id.into(),
            window,
            next_seq: 0,
            last_local_write_at: None,
            outstanding: HashMap::new(),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Register a local write and return the tag to persist with it.
    pub fn record_write(&mut self, record: &LocationRecord) -> WriteOrigin {
        self.next_seq += 1;
        self.last_local_write_at = Some(Instant::now());
        self.outstanding.insert(
            record.id.clone(),
            Outstanding {
                seq: self.next_seq,
                record: record.clone(),
                committed_at: None,
            },
        );
        WriteOrigin {
            client: self.client_id.clone(),
            seq: self.next_seq,
        }
    }

    /// The store acknowledged write `seq`.
    pub fn write_committed(&mut self, location_id: &str, seq: u64) {
        if let Some(o) = self.outstanding.get_mut(location_id)
            && o.seq == seq
        {
            o.committed_at = Some(Instant::now());
        }
    }

    /// Write `seq` failed; it will never come back through the feed.
    pub fn write_failed(&mut self, location_id: &str, seq: u64) {
        if self
            .outstanding
            .get(location_id)
            .is_some_and(|o| o.seq == seq)
        {
            self.outstanding.remove(location_id);
        }
    }

    pub fn classify(&mut self, event: &RemoteChangeEvent) -> EchoVerdict {
        match &event.origin {
            Some(origin) if origin.client == self.client_id => {
                let latest = self
                    .outstanding
                    .get(&event.location_id)
                    .is_some_and(|o| o.seq <= origin.seq);
                if latest {
                    self.outstanding.remove(&event.location_id);
                    EchoVerdict::Confirmed
                } else {
                    EchoVerdict::Echo
                }
            }
            Some(_) => match self.outstanding.get(&event.location_id) {
                Some(o) if o.committed_at.is_some_and(|t| t.elapsed() >= self.window) => {
                    self.outstanding.remove(&event.location_id);
                    EchoVerdict::Accept
                }
                Some(_) => EchoVerdict::Superseded,
                None => EchoVerdict::Accept,
            },
            None => {
                let recent = self
                    .last_local_write_at
                    .is_some_and(|t| t.elapsed() < self.window);
                if recent {
                    EchoVerdict::Echo
                } else {
                    EchoVerdict::Accept
                }
            }
        }
    }

    /// Local writes the store has not acknowledged yet, newest state per
    /// location. A snapshot fetched now cannot contain them.
    pub fn uncommitted(&self) -> impl Iterator<Item = &LocationRecord> {
        self.outstanding
            .values()
            .filter(|o| o.committed_at.is_none())
            .map(|o| &o.record)
    }

    /// Forget committed writes whose echo is overdue. Returns how many were
    /// dropped.
    pub fn expire_committed(&mut self) -> usize {
        let window = self.window;
        let before = self.outstanding.len();
        self.outstanding
            .retain(|_, o| !o.committed_at.is_some_and(|t| t.elapsed() >= window));
        before - self.outstanding.len()
    }

    /// Forget every outstanding write (period switch, reset).
    pub fn clear(&mut self) {
        self.outstanding.clear();
    }
}
