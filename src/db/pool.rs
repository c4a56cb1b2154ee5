//! SQLite connection wrapper shared by the SQLite gateway and its poll task.
//!
//! A pool built with [`DbPool::lazy`] holds no connection until the first
//! statement; a failed open is reported by that statement and retried by the
//! next one.

use super::initialize::init_db;
use crate::errors::GatewayError;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Wait this long on a locked database before failing a statement.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct DbPool {
    path: Option<Arc<str>>,
    conn: Arc<Mutex<Option<Connection>>>,
}

/// Open the store at `path` and make sure the schema exists.
fn connect(path: &str) -> Result<Connection, GatewayError> {
    let conn = Connection::open(Path::new(path))?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    init_db(&conn)?;
    Ok(conn)
}

impl DbPool {
    /// Open now; fails if the store cannot be opened.
    pub fn open(path: &str) -> Result<Self, GatewayError> {
        let conn = connect(path)?;
        Ok(Self {
            path: Some(Arc::from(path)),
            conn: Arc::new(Mutex::new(Some(conn))),
        })
    }

    /// Open on first use.
    pub fn lazy(path: &str) -> Self {
        Self {
            path: Some(Arc::from(path)),
            conn: Arc::new(Mutex::new(None)),
        }
    }

    pub fn from_connection(conn: Connection) -> Result<Self, GatewayError> {
        init_db(&conn)?;
        Ok(Self {
            path: None,
            conn: Arc::new(Mutex::new(Some(conn))),
        })
    }

    pub fn is_connected(&self) -> bool {
        self.lock().map(|guard| guard.is_some()).unwrap_or(false)
    }

    /// Helper to execute a closure with a mutable connection reference.
    ///
    /// The lock is held only for the closure, never across an `.await`.
    pub fn with_conn<F, T>(&self, func: F) -> Result<T, GatewayError>
    where
        F: FnOnce(&mut Connection) -> Result<T, GatewayError>,
    {
        let mut guard = self.lock()?;

        if guard.is_none() {
            let path = self
                .path
                .as_deref()
                .ok_or_else(|| GatewayError::Unavailable("no database path".into()))?;
            *guard = Some(connect(path)?);
        }

        match guard.as_mut() {
            Some(conn) => func(conn),
            None => Err(GatewayError::Unavailable("database not connected".into())),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Connection>>, GatewayError> {
        self.conn
            .lock()
            .map_err(|_| GatewayError::Task("database connection lock poisoned".into()))
    }
}
