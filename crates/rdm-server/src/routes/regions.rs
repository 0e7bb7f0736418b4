use axum::extract::State;
use axum::Json;

use crate::state::AppState;

/// GET /api/regions — current fragments keyed by element id, plus the
/// report of the most recent pass.
///
/// An aborted pass leaves the regions as the last successful pass wrote them.
pub async fn get_regions(State(app): State<AppState>) -> Json<serde_json::Value> {
    let regions = app.surface.lock().by_element_id();
    Json(serde_json::json!({
        "regions": regions,
        "report": app.last_report(),
    }))
}
