//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use domain_property::{Notification, PropertyError};

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The record service refused the request
    #[error("Rejected by record service: {0}")]
    Rejected(String),

    /// The record service could not be reached or failed
    #[error("Record service error: {0}")]
    Upstream(String),

    #[error("Invalid record: {0}")]
    InvalidData(String),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            ApiError::Rejected(msg) => (StatusCode::BAD_GATEWAY, "rejected", msg.clone()),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "upstream_error", msg.clone()),
            ApiError::InvalidData(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "invalid_data", msg.clone())
            }
        }
    }

    /// Attaches the notifications raised while handling the request
    pub fn with_notifications(self, notifications: Vec<Notification>) -> ApiFailure {
        ApiFailure {
            error: self,
            notifications,
        }
    }
}

impl From<PropertyError> for ApiError {
    fn from(err: PropertyError) -> Self {
        match err {
            PropertyError::NotFound(_) => ApiError::NotFound(err.to_string()),
            PropertyError::Rejected(message) => ApiError::Rejected(message),
            PropertyError::InvalidData(message) => ApiError::InvalidData(message),
            PropertyError::Backend(port) => {
                error!(error = %port, "Record service call failed");
                ApiError::Upstream(port.to_string())
            }
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub notifications: Vec<Notification>,
}

/// An error plus the notifications raised before it
#[derive(Debug)]
pub struct ApiFailure {
    pub error: ApiError,
    pub notifications: Vec<Notification>,
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let (status, error_type, message) = self.error.parts();

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            notifications: self.notifications,
        };

        (status, Json(body)).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.with_notifications(Vec::new()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{PortError, PropertyId};

    #[test]
    fn test_property_errors_map_to_statuses() {
        let cases = [
            (PropertyError::NotFound(PropertyId::new(3)), StatusCode::NOT_FOUND),
            (PropertyError::Rejected("no".to_string()), StatusCode::BAD_GATEWAY),
            (PropertyError::invalid("bad row"), StatusCode::UNPROCESSABLE_ENTITY),
            (
                PropertyError::Backend(PortError::connection("down")),
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (err, expected) in cases {
            let (status, _, _) = ApiError::from(err).parts();
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn test_not_found_message_names_the_id() {
        let (_, error_type, message) = ApiError::from(PropertyError::NotFound(PropertyId::new(42))).parts();
        assert_eq!(error_type, "not_found");
        assert_eq!(message, "Property with Id 42 not found");
    }
}
