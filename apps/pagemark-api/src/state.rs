//! Shared application state.

use std::sync::Arc;

use pagemark_mirror::MirrorClient;
use pagemark_source::SourceClient;
use pagemark_sync::SyncSettings;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Bookmark-service client.
    pub source: Arc<SourceClient>,
    /// Document-database client.
    pub mirror: Arc<MirrorClient>,
    /// Sync tuning knobs.
    pub settings: SyncSettings,
}
