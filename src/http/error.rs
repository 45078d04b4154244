use crate::error::CoordError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Wraps `CoordError` so it can implement `IntoResponse` without this
/// crate needing a newtype at every handler call site.
pub struct ApiError(pub CoordError);

impl From<CoordError> for ApiError {
    fn from(e: CoordError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self.0 {
            CoordError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            CoordError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            CoordError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            CoordError::Dependency(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            CoordError::Fatal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
