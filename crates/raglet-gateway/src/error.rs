//! HTTP mapping for [`RagletError`].

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use raglet_core::error::RagletError;

/// Error returned by route handlers.
///
/// Wraps [`RagletError`] and renders it as a JSON body with the
/// appropriate status code: 400 for caller mistakes, 404 for missing
/// resources, 503 when an external dependency is unreachable, 500 for
/// everything else.
#[derive(Debug)]
pub struct ApiError(pub RagletError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            RagletError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RagletError::NotFound(_) => StatusCode::NOT_FOUND,
            err if err.is_dependency_unavailable() => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RagletError> for ApiError {
    fn from(err: RagletError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = %status, "request failed: {}", self.0);
        }
        let body = Json(serde_json::json!({
            "ok": false,
            "error": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ApiError(RagletError::BadRequest("x".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(RagletError::NotFound("x".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError(RagletError::Database("x".into())).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError(RagletError::Cache("x".into())).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError(RagletError::Provider("x".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
