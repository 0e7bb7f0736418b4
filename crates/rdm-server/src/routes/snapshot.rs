use axum::extract::State;
use axum::Json;
use rdm_core::Snapshot;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/snapshot — the raw data a pass would render, without touching
/// the regions. Node failures surface as 502/504.
pub async fn get_snapshot(State(app): State<AppState>) -> Result<Json<Snapshot>, AppError> {
    let snapshot = app.controller.fetch_snapshot().await?;
    Ok(Json(snapshot))
}
