use axum::extract::State;
use axum::Json;
use rdm_core::RefreshReport;

use crate::state::AppState;

/// POST /api/refresh — run a pass now and return its report.
///
/// Always 200: an aborted pass is a normal outcome, described in the body.
pub async fn post_refresh(State(app): State<AppState>) -> Json<RefreshReport> {
    Json(app.refresh_now().await)
}
