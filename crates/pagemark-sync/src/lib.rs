//! Synchronization and reconciliation engines.
//!
//! Two independent paths keep the mirror eventually consistent with the
//! bookmark service:
//!
//! - The **incremental path** ([`run_incremental`]) runs every few
//!   minutes: a bounded recency scan plus two date-filtered searches are
//!   unioned into a candidate set, and each candidate is created, updated,
//!   or skipped against the mirror's current state.
//! - The **reconciliation path** ([`run_reconciliation`]) runs nightly
//!   over the entire population of both systems, telling bookmarks that
//!   moved collections apart from ones that disappeared, and walking
//!   disappearances through a grace-period delete state machine.
//!
//! Neither path keeps state between invocations; everything is re-derived
//! from the mirror's persisted fields, which is what makes overlapping or
//! interrupted runs safe.

pub mod changeset;
pub mod error;
pub mod reconcile;
pub mod run;
pub mod settings;
pub mod summary;
pub mod upsert;
pub mod window;

pub use changeset::{ChangeSetBuilder, ScanStats, StopReason};
pub use error::{SyncError, SyncResult};
pub use reconcile::ReconcileEngine;
pub use run::{run_incremental, run_reconciliation, SyncOptions};
pub use settings::{DeleteMode, SyncSettings};
pub use summary::{PlannedWrite, ReconcileSummary, SyncSummary, UpsertAction};
pub use upsert::UpsertEngine;
pub use window::SyncWindow;
