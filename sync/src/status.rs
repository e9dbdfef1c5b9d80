//! Sync status snapshot consumed by the host's status indicator.

use time::OffsetDateTime;

/// Point-in-time view of the sync machinery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStatus {
    /// A remote identity is established and remote writes are enabled.
    pub online: bool,
    /// An outbound save is currently in flight.
    pub syncing: bool,
    /// When the last successful remote exchange completed.
    pub last_synced: Option<OffsetDateTime>,
    /// Description of the most recent failure, if any.
    pub error: Option<String>,
    /// Local mutations exist that the remote store has not acknowledged.
    pub has_unsaved_changes: bool,
}
