use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rdm_core::RdmError;

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.0.downcast_ref::<RdmError>() {
            Some(e) => status_for(e),
            None => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

/// Failures talking to the node are the node's fault, not ours.
fn status_for(e: &RdmError) -> StatusCode {
    match e {
        RdmError::Fetch { source, .. } => status_for(source),
        RdmError::Transport { .. }
        | RdmError::Status { .. }
        | RdmError::Decode { .. } => StatusCode::BAD_GATEWAY,
        RdmError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        RdmError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
        RdmError::Io(_) | RdmError::Yaml(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
