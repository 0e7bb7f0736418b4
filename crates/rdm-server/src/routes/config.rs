use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/config — the effective configuration the server runs with.
///
/// Read-only; edit `rdm.yaml` and restart to change it.
pub async fn get_config(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let json = serde_json::to_value(app.config.as_ref())?;
    Ok(Json(json))
}
