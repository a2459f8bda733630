//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use lightgate_domain::error::{HubError, LightgateError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`LightgateError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub enum ApiError {
    /// Domain or hub failure.
    Lightgate(LightgateError),
    /// A path segment that should have been a numeric hub id.
    InvalidId(String),
}

impl From<LightgateError> for ApiError {
    fn from(err: LightgateError) -> Self {
        Self::Lightgate(err)
    }
}

impl From<HubError> for ApiError {
    fn from(err: HubError) -> Self {
        Self::Lightgate(err.into())
    }
}

/// Status code for a domain error: rejected requests are the caller's fault,
/// anything the hub got wrong is a bad gateway.
#[must_use]
pub fn status_for(err: &LightgateError) -> StatusCode {
    match err {
        LightgateError::Configuration(_) => StatusCode::BAD_REQUEST,
        LightgateError::Hub(HubError::NotFound { .. }) => StatusCode::NOT_FOUND,
        LightgateError::Hub(HubError::Rejected(_)) => StatusCode::FORBIDDEN,
        LightgateError::Hub(HubError::Unreachable(_)) | LightgateError::Fanout(_) => {
            StatusCode::BAD_GATEWAY
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Lightgate(err) => {
                let status = status_for(&err);
                if status.is_server_error() {
                    tracing::error!(error = %err, "hub error");
                }
                (status, err.to_string())
            }
            Self::InvalidId(raw) => (StatusCode::BAD_REQUEST, format!("invalid id {raw:?}")),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
