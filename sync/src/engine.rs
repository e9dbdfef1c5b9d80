//! Board session engine: the commit path for mutations and the sync loops.
//!
//! DESIGN
//! ======
//! `BoardSession` owns the [`BoardStore`] and wires it to the adapters.
//! Every committed mutation is written to local storage immediately and
//! nudges a trailing-edge debounce timer for the remote save. Outbound
//! saves are serialized behind a gate and skipped when the document digest
//! equals the last state exchanged with the remote store; inbound
//! subscription snapshots are dropped by the same digest comparison, which
//! keeps the adapter's echo of our own writes from looping back out.
//! Identity establishment retries a bounded number of times with growing
//! backoff, then the session runs offline for its lifetime.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use board::doc::Document;
use board::store::BoardStore;
use time::OffsetDateTime;
use tokio::sync::{Notify, broadcast};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::digest::{DocumentDigest, document_digest};
use crate::local::{self, LocalStore};
use crate::remote::{IdentityId, RemoteError, RemoteStore};
use crate::status::SyncStatus;

/// Tuning for the sync engine.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Quiet period after the last mutation before a remote save fires.
    pub debounce: Duration,
    /// Identity handshake attempts before falling back to offline mode.
    pub identity_attempts: u32,
    /// Delay after the first failed handshake; grows linearly per attempt.
    pub identity_backoff: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_secs(2),
            identity_attempts: 3,
            identity_backoff: Duration::from_secs(2),
        }
    }
}

/// State shared between the session handle and its background tasks.
struct SessionShared {
    store: Mutex<BoardStore>,
    local: Arc<dyn LocalStore>,
    remote: Arc<dyn RemoteStore>,
    status: Mutex<SyncStatus>,
    identity: Mutex<Option<IdentityId>>,
    /// Digest of the last document exchanged with the remote store, in
    /// either direction. Gates both redundant saves and inbound echoes.
    last_synced: Mutex<Option<DocumentDigest>>,
    /// Signal that the document may have changed since the last flush.
    dirty: Notify,
    /// Serializes outbound saves; a save requested while one is in flight
    /// coalesces into the next flush instead of running concurrently.
    save_gate: tokio::sync::Mutex<()>,
}

/// A live board session: the store plus its persistence and sync loops.
pub struct BoardSession {
    shared: Arc<SessionShared>,
    debounce_task: JoinHandle<()>,
    inbound_task: JoinHandle<()>,
}

impl BoardSession {
    /// Start a session: establish identity (bounded retries), hydrate the
    /// store (remote record first, else local storage), and spawn the
    /// debounce and subscription tasks.
    pub async fn start(
        store: BoardStore,
        local: Arc<dyn LocalStore>,
        remote: Arc<dyn RemoteStore>,
        config: SyncConfig,
    ) -> Self {
        let shared = Arc::new(SessionShared {
            store: Mutex::new(store),
            local,
            remote,
            status: Mutex::new(SyncStatus::default()),
            identity: Mutex::new(None),
            last_synced: Mutex::new(None),
            dirty: Notify::new(),
            save_gate: tokio::sync::Mutex::new(()),
        });

        // Subscribe before hydrating so snapshots arriving during startup
        // are not lost.
        let inbound_rx = shared.remote.subscribe();

        let online = establish_identity(&shared, &config).await;
        hydrate(&shared, online).await;

        let debounce_task = tokio::spawn(debounce_loop(Arc::clone(&shared), config.debounce));
        let inbound_task = tokio::spawn(inbound_loop(Arc::clone(&shared), inbound_rx));

        Self { shared, debounce_task, inbound_task }
    }

    /// Commit a mutation: run `f` against the store, persist the result
    /// locally, and schedule a debounced remote save.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut BoardStore) -> R) -> R {
        let (result, doc) = {
            let mut store = lock(&self.shared.store);
            let result = f(&mut store);
            (result, store.document().clone())
        };
        local::save_document(self.shared.local.as_ref(), &doc, OffsetDateTime::now_utc());
        with_status(&self.shared, |s| s.has_unsaved_changes = true);
        self.shared.dirty.notify_one();
        result
    }

    /// Run a read-only closure against the store.
    pub fn read<R>(&self, f: impl FnOnce(&BoardStore) -> R) -> R {
        f(&lock(&self.shared.store))
    }

    /// Current sync status snapshot.
    #[must_use]
    pub fn status(&self) -> SyncStatus {
        lock(&self.shared.status).clone()
    }

    /// The established remote identity, if the session is online.
    #[must_use]
    pub fn identity(&self) -> Option<IdentityId> {
        lock(&self.shared.identity).clone()
    }

    /// Flush pending changes to the remote store without waiting for the
    /// debounce timer.
    pub async fn force_sync(&self) {
        flush(&self.shared).await;
    }

    /// Replace this session's data with another identity's record, then
    /// overwrite local storage and this identity's remote record with it.
    ///
    /// Destructive; the host confirms with the user before calling.
    ///
    /// # Errors
    ///
    /// [`RemoteError::NoRecord`] when the other identity has nothing
    /// stored, or any transport failure from the adapter. The local
    /// document is untouched on error.
    pub async fn pull_from_identity(&self, other: &str) -> Result<(), RemoteError> {
        let Some(doc) = self.shared.remote.load_for_identity(other).await? else {
            return Err(RemoteError::NoRecord(other.to_owned()));
        };
        info!(identity = %other, "pulled document from other identity");
        {
            let mut store = lock(&self.shared.store);
            store.apply_remote(doc.clone());
            store.reset_interaction();
        }
        local::save_document(self.shared.local.as_ref(), &doc, OffsetDateTime::now_utc());
        // Forget the last-synced digest so the flush below overwrites our
        // own record even if it matched the previous state.
        *lock(&self.shared.last_synced) = None;
        flush(&self.shared).await;
        Ok(())
    }

    /// Stop the background tasks. In-flight work is abandoned; the store's
    /// last committed state is already in local storage.
    pub fn shutdown(self) {
        drop(self);
    }
}

impl Drop for BoardSession {
    fn drop(&mut self) {
        self.debounce_task.abort();
        self.inbound_task.abort();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn with_status(shared: &SessionShared, f: impl FnOnce(&mut SyncStatus)) {
    f(&mut lock(&shared.status));
}

/// Try the identity handshake up to the configured number of attempts.
/// Returns whether the session is online.
async fn establish_identity(shared: &SessionShared, config: &SyncConfig) -> bool {
    for attempt in 1..=config.identity_attempts {
        match shared.remote.establish_identity().await {
            Ok(identity) => {
                info!(%identity, attempt, "remote identity established");
                *lock(&shared.identity) = Some(identity);
                with_status(shared, |s| {
                    s.online = true;
                    s.error = None;
                });
                return true;
            }
            Err(e) => {
                warn!(
                    error = %e,
                    attempt,
                    attempts = config.identity_attempts,
                    "identity handshake failed"
                );
                if attempt < config.identity_attempts {
                    tokio::time::sleep(config.identity_backoff * attempt).await;
                }
            }
        }
    }
    info!("running in offline mode for this session");
    with_status(shared, |s| {
        s.online = false;
        s.error = Some("remote store unavailable; running offline".into());
    });
    false
}

/// Initial hydration: prefer a non-empty remote record, fall back to local
/// storage, and push surviving local data up when online.
async fn hydrate(shared: &Arc<SessionShared>, online: bool) {
    if online {
        match shared.remote.load().await {
            Ok(Some(doc)) if !(doc.notes.is_empty() && doc.themes.is_empty()) => {
                let digest = document_digest(&doc);
                lock(&shared.store).apply_remote(doc.clone());
                local::save_document(shared.local.as_ref(), &doc, OffsetDateTime::now_utc());
                *lock(&shared.last_synced) = Some(digest);
                with_status(shared, |s| s.last_synced = Some(OffsetDateTime::now_utc()));
                debug!("hydrated from remote record");
                return;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "remote load failed; falling back to local storage");
                with_status(shared, |s| s.error = Some(e.to_string()));
            }
        }
    }

    let Some(doc) = local::load_document(shared.local.as_ref()) else {
        return;
    };
    let empty = doc.notes.is_empty() && doc.themes.is_empty();
    lock(&shared.store).apply_remote(doc);
    debug!("hydrated from local storage");
    if online && !empty {
        flush(shared).await;
    }
}

/// Save the current document to the remote store, unless offline or
/// unchanged since the last exchange.
async fn flush(shared: &Arc<SessionShared>) {
    if !lock(&shared.status).online {
        return;
    }
    let _gate = shared.save_gate.lock().await;

    let (doc, digest) = {
        let store = lock(&shared.store);
        let doc = store.document().clone();
        let digest = document_digest(&doc);
        (doc, digest)
    };
    if lock(&shared.last_synced).as_ref() == Some(&digest) {
        with_status(shared, |s| s.has_unsaved_changes = false);
        return;
    }

    with_status(shared, |s| {
        s.syncing = true;
        s.error = None;
    });
    match shared.remote.save(&doc).await {
        Ok(()) => {
            *lock(&shared.last_synced) = Some(digest);
            with_status(shared, |s| {
                s.syncing = false;
                s.last_synced = Some(OffsetDateTime::now_utc());
                s.has_unsaved_changes = false;
            });
            debug!(notes = doc.notes.len(), "remote save complete");
        }
        Err(e) => {
            error!(error = %e, "remote save failed; data stays dirty");
            with_status(shared, |s| {
                s.syncing = false;
                s.error = Some(e.to_string());
                s.has_unsaved_changes = true;
            });
        }
    }
}

/// Trailing-edge debounce: wait for a dirty signal, let the quiet period
/// elapse (restarting it on every further signal), then flush.
async fn debounce_loop(shared: Arc<SessionShared>, debounce: Duration) {
    loop {
        shared.dirty.notified().await;
        loop {
            tokio::select! {
                () = shared.dirty.notified() => {}
                () = tokio::time::sleep(debounce) => break,
            }
        }
        flush(&shared).await;
    }
}

/// Apply inbound subscription snapshots, dropping echoes of our own
/// writes by digest comparison.
async fn inbound_loop(shared: Arc<SessionShared>, mut rx: broadcast::Receiver<Document>) {
    loop {
        match rx.recv().await {
            Ok(doc) => apply_inbound(&shared, doc),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "remote subscription lagged; continuing with latest");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn apply_inbound(shared: &SessionShared, doc: Document) {
    let digest = document_digest(&doc);
    {
        let mut last = lock(&shared.last_synced);
        if last.as_ref() == Some(&digest) {
            // Echo of a write this session made; already applied.
            return;
        }
        *last = Some(digest);
    }
    lock(&shared.store).apply_remote(doc.clone());
    local::save_document(shared.local.as_ref(), &doc, OffsetDateTime::now_utc());
    with_status(shared, |s| {
        s.last_synced = Some(OffsetDateTime::now_utc());
        s.has_unsaved_changes = false;
    });
    debug!(notes = doc.notes.len(), "applied remote snapshot");
}
