use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use studydesk_api_types::ErrorResponse;

pub type AppResult<T> = Result<T, AppError>;

/// Unclassified failure escaping a handler. Everything a handler knows how
/// to recover from (not-found, validation, conflicts) is turned into a flash
/// and a redirect before reaching this type.
pub struct AppError(anyhow::Error);

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = ?self.0, "request failed");

        let body = Json(ErrorResponse {
            code: "internal_error".to_string(),
            message: "internal server error".to_string(),
        });
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
