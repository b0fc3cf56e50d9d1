//! Handlers for the sync and reconciliation operations.
//!
//! Both operations are idempotent and safely repeatable: they re-derive
//! every decision from current mirror state, so an overlapping or
//! interrupted invocation leaves nothing to clean up.

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use pagemark_sync::{
    run_incremental, run_reconciliation, ReconcileSummary, SyncOptions, SyncSummary,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for the incremental sync operation.
#[derive(Debug, Deserialize)]
pub struct SyncQuery {
    /// Compute and report decisions without writing.
    #[serde(default)]
    pub dry_run: bool,
    /// Hard candidate cap, for controlled manual testing.
    pub max_items: Option<usize>,
}

/// Query parameters for the reconciliation operation.
#[derive(Debug, Deserialize)]
pub struct ReconcileQuery {
    /// Compute and report classifications without writing.
    #[serde(default)]
    pub dry_run: bool,
}

/// `POST /sync` — run one incremental pass.
pub async fn sync(
    State(state): State<AppState>,
    Query(query): Query<SyncQuery>,
) -> Result<Json<SyncSummary>, ApiError> {
    let options = SyncOptions {
        dry_run: query.dry_run,
        max_items: query.max_items,
    };
    let summary = run_incremental(
        state.source.as_ref(),
        state.mirror.as_ref(),
        &state.settings,
        options,
        Utc::now(),
    )
    .await?;
    Ok(Json(summary))
}

/// `POST /reconcile` — run one full reconciliation pass.
pub async fn reconcile(
    State(state): State<AppState>,
    Query(query): Query<ReconcileQuery>,
) -> Result<Json<ReconcileSummary>, ApiError> {
    let summary = run_reconciliation(
        state.source.as_ref(),
        state.mirror.as_ref(),
        &state.settings,
        query.dry_run,
        Utc::now(),
    )
    .await?;
    Ok(Json(summary))
}

/// `GET /healthz` — liveness probe.
pub async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
