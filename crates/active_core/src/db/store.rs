//! Shared store handle: one view connection plus on-demand background
//! connections to the same database.
//!
//! # Invariants
//! - The view connection lives as long as the `Store`; for in-memory stores
//!   it is what keeps the shared database alive.
//! - Every background connection is bootstrapped like the view connection
//!   (pragmas + migration check) before it is handed out.

use super::{open_db, open_db_uri, DbResult};
use log::{debug, error};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use uuid::Uuid;

/// Where the store's database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// SQLite database file on disk.
    File(PathBuf),
    /// Named shared-cache in-memory database, addressed by URI.
    SharedMemory(String),
}

impl StoreLocation {
    fn connect(&self) -> DbResult<Connection> {
        match self {
            Self::File(path) => open_db(path),
            Self::SharedMemory(uri) => open_db_uri(uri),
        }
    }
}

/// Process-wide persistent store, passed explicitly to its consumers.
///
/// The view connection serves foreground reads and writes (counts, erase).
/// Background work gets a dedicated connection per task.
#[derive(Debug)]
pub struct Store {
    location: StoreLocation,
    view: Mutex<Connection>,
}

impl Store {
    /// Opens (or creates) a file-backed store.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Self::with_location(StoreLocation::File(path.as_ref().to_path_buf()))
    }

    /// Opens a fresh in-memory store that background connections can share.
    pub fn open_in_memory() -> DbResult<Self> {
        let uri = format!("file:active-{}?mode=memory&cache=shared", Uuid::new_v4());
        Self::with_location(StoreLocation::SharedMemory(uri))
    }

    fn with_location(location: StoreLocation) -> DbResult<Self> {
        let view = location.connect()?;
        Ok(Self {
            location,
            view: Mutex::new(view),
        })
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// Locks and returns the main (view) connection.
    ///
    /// A panic while the lock was held does not invalidate the connection,
    /// so a poisoned lock is recovered instead of propagated.
    pub fn view_context(&self) -> MutexGuard<'_, Connection> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens a new connection for work off the view context.
    pub fn new_background_context(&self) -> DbResult<Connection> {
        self.location.connect()
    }

    /// Runs `task` on a new thread with its own background connection.
    ///
    /// The task receives the connection result so it can report an
    /// unavailable context itself. The returned handle may be dropped; the
    /// thread keeps running to completion.
    pub fn perform_background_task<F, T>(self: &Arc<Self>, task: F) -> JoinHandle<T>
    where
        F: FnOnce(DbResult<Connection>) -> T + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(self);
        thread::spawn(move || {
            let context = store.new_background_context();
            match &context {
                Ok(_) => debug!("event=background_task module=db status=start"),
                Err(err) => error!(
                    "event=background_task module=db status=error error_code=context_unavailable error={}",
                    err
                ),
            }
            task(context)
        })
    }
}
