//! `/dashboard` and `/reconciliation`

use axum::Json;
use axum::extract::State;

use crate::billing::{DashboardSnapshot, ReconciliationReport};
use crate::core::OwnerSession;
use crate::core::error::TentError;
use crate::server::AppState;

pub async fn dashboard(
    _owner: OwnerSession,
    State(state): State<AppState>,
) -> Result<Json<DashboardSnapshot>, TentError> {
    Ok(Json(state.billing.dashboard().await?))
}

pub async fn reconciliation(
    _owner: OwnerSession,
    State(state): State<AppState>,
) -> Result<Json<ReconciliationReport>, TentError> {
    Ok(Json(state.billing.reconciliation().await?))
}
