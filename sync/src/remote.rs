//! Remote sync adapter contract: one hosted document record per identity.
//!
//! The concrete cloud vendor SDK lives behind [`RemoteStore`]; the engine
//! only depends on this call surface. Subscriptions are delivered over a
//! broadcast channel — dropping the receiver unsubscribes. The crate
//! ships [`MemoryRemote`], an in-process implementation used by tests and
//! by hosts running without a configured backend.

#[cfg(test)]
#[path = "remote_test.rs"]
mod remote_test;

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use board::doc::Document;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::broadcast;

/// Opaque identity string assigned by the remote service.
pub type IdentityId = String;

/// Failures from the remote document store.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RemoteError {
    /// The identity handshake was rejected or could not complete.
    #[error("identity error: {0}")]
    Identity(String),
    /// Transient transport failure; the operation may succeed on retry.
    #[error("network error: {0}")]
    Network(String),
    /// The adapter is not configured; remote sync is unavailable.
    #[error("remote store unavailable: {0}")]
    Unavailable(String),
    /// No record exists for the requested identity.
    #[error("no record for identity {0}")]
    NoRecord(String),
}

/// One identity's remote record: the document plus server-assigned
/// metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRecord {
    /// The synced document fields, flattened to the record's top level.
    #[serde(flatten)]
    pub document: Document,
    /// Server-assigned modification timestamp.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub last_modified: Option<OffsetDateTime>,
    /// Identity that owns the record.
    pub user_id: IdentityId,
}

/// Contract the sync engine depends on.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Establish (or resume) an anonymous identity.
    ///
    /// # Errors
    ///
    /// Any [`RemoteError`]; the engine treats failures here as grounds for
    /// offline mode after bounded retries.
    async fn establish_identity(&self) -> Result<IdentityId, RemoteError>;

    /// Overwrite the current identity's record with `document`.
    ///
    /// # Errors
    ///
    /// [`RemoteError`] on transport or service failure; the engine keeps
    /// the data dirty and retries later.
    async fn save(&self, document: &Document) -> Result<(), RemoteError>;

    /// Load the current identity's record, if one exists.
    ///
    /// # Errors
    ///
    /// [`RemoteError`] on transport or service failure.
    async fn load(&self) -> Result<Option<Document>, RemoteError>;

    /// Subscribe to document snapshots pushed for the current identity.
    /// The adapter's own writes are echoed back here, exactly as hosted
    /// document stores behave; the engine suppresses them by digest.
    fn subscribe(&self) -> broadcast::Receiver<Document>;

    /// Load the record belonging to another identity (manual
    /// cross-device pull).
    ///
    /// # Errors
    ///
    /// [`RemoteError`] on transport or service failure.
    async fn load_for_identity(&self, identity: &str) -> Result<Option<Document>, RemoteError>;
}

/// In-process [`RemoteStore`] backed by a map of records.
///
/// Saves broadcast to subscribers like a real hosted store, so engine
/// tests exercise the echo path. Failure injection flips identity or save
/// operations into [`RemoteError::Network`].
pub struct MemoryRemote {
    identity: IdentityId,
    records: Mutex<HashMap<IdentityId, RemoteRecord>>,
    tx: broadcast::Sender<Document>,
    fail_identity: AtomicBool,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryRemote {
    /// Create a remote with the given identity and no records.
    #[must_use]
    pub fn new(identity: impl Into<String>) -> Self {
        let (tx, _) = broadcast::channel(16);
        Self {
            identity: identity.into(),
            records: Mutex::new(HashMap::new()),
            tx,
            fail_identity: AtomicBool::new(false),
            fail_saves: AtomicBool::new(false),
            saves: AtomicUsize::new(0),
        }
    }

    /// Make identity handshakes fail (or succeed again).
    pub fn fail_identity(&self, fail: bool) {
        self.fail_identity.store(fail, Ordering::SeqCst);
    }

    /// Make saves fail (or succeed again).
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Seed a record for `identity` without broadcasting.
    pub fn insert_record(&self, identity: impl Into<String>, document: Document) {
        let identity = identity.into();
        let record = RemoteRecord {
            document,
            last_modified: Some(OffsetDateTime::now_utc()),
            user_id: identity.clone(),
        };
        self.lock_records().insert(identity, record);
    }

    /// Store `document` under our own identity and broadcast it, as if
    /// another session for the same identity had written it.
    pub fn push_external(&self, document: Document) {
        self.insert_record(self.identity.clone(), document.clone());
        let _ = self.tx.send(document);
    }

    /// The document currently stored for `identity`, if any.
    #[must_use]
    pub fn stored_document(&self, identity: &str) -> Option<Document> {
        self.lock_records().get(identity).map(|r| r.document.clone())
    }

    fn lock_records(&self) -> std::sync::MutexGuard<'_, HashMap<IdentityId, RemoteRecord>> {
        self.records.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl RemoteStore for MemoryRemote {
    async fn establish_identity(&self) -> Result<IdentityId, RemoteError> {
        if self.fail_identity.load(Ordering::SeqCst) {
            return Err(RemoteError::Network("injected identity failure".into()));
        }
        Ok(self.identity.clone())
    }

    async fn save(&self, document: &Document) -> Result<(), RemoteError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(RemoteError::Network("injected save failure".into()));
        }
        let record = RemoteRecord {
            document: document.clone(),
            last_modified: Some(OffsetDateTime::now_utc()),
            user_id: self.identity.clone(),
        };
        self.lock_records().insert(self.identity.clone(), record);
        self.saves.fetch_add(1, Ordering::SeqCst);
        let _ = self.tx.send(document.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<Document>, RemoteError> {
        Ok(self.stored_document(&self.identity))
    }

    fn subscribe(&self) -> broadcast::Receiver<Document> {
        self.tx.subscribe()
    }

    async fn load_for_identity(&self, identity: &str) -> Result<Option<Document>, RemoteError> {
        Ok(self.stored_document(identity))
    }
}
