//! Record service adapter errors
//!
//! `ApperError` covers setting the adapter up. Once running, every failure
//! leaves the adapter as a [`PortError`]; [`status_error`] and
//! [`transport_error`] do that translation.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use core_kernel::PortError;

/// Errors raised while building the record service adapter
#[derive(Debug, Error)]
pub enum ApperError {
    /// Configuration could not be loaded
    #[error("Failed to load record service configuration: {0}")]
    Config(#[from] config::ConfigError),

    /// A configuration value is unusable
    #[error("Invalid record service configuration: {0}")]
    InvalidConfig(String),

    /// The HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

fn body_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message.or(parsed.error))
        .filter(|message| !message.is_empty())
}

/// Maps a non-success HTTP status to a `PortError`
///
/// A JSON body with a `message` (or `error`) field supplies the detail;
/// otherwise the raw body is used.
pub fn status_error(
    operation: &str,
    status: StatusCode,
    retry_after_secs: Option<u64>,
    body: &str,
) -> PortError {
    let detail = body_message(body).unwrap_or_else(|| format!("HTTP {}: {}", status, body.trim()));

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PortError::Unauthorized { message: detail },
        StatusCode::NOT_FOUND => PortError::NotFound {
            entity_type: "record".to_string(),
            id: detail,
        },
        StatusCode::TOO_MANY_REQUESTS => PortError::RateLimited {
            retry_after_secs: retry_after_secs.unwrap_or(0),
        },
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE => PortError::ServiceUnavailable {
            service: format!("record service ({})", detail),
        },
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => PortError::Timeout {
            operation: operation.to_string(),
            duration_ms: 0,
        },
        _ => PortError::internal(format!("{} failed: {}", operation, detail)),
    }
}

/// Maps a reqwest failure that produced no usable response
pub fn transport_error(operation: &str, timeout_ms: u64, error: reqwest::Error) -> PortError {
    if error.is_timeout() {
        PortError::Timeout {
            operation: operation.to_string(),
            duration_ms: timeout_ms,
        }
    } else if error.is_connect() {
        PortError::Connection {
            message: format!("{}: connection failed", operation),
            source: Some(Box::new(error)),
        }
    } else if error.is_decode() {
        PortError::transformation(format!("{}: unreadable response: {}", operation, error))
    } else {
        PortError::Internal {
            message: format!("{}: {}", operation, error),
            source: Some(Box::new(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_statuses_map_to_unauthorized() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
            let err = status_error("fetch_records", status, None, r#"{"message":"bad key"}"#);
            match err {
                PortError::Unauthorized { message } => assert_eq!(message, "bad key"),
                other => panic!("Expected Unauthorized, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_not_found_status() {
        let err = status_error("get_record_by_id", StatusCode::NOT_FOUND, None, "");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_rate_limit_carries_retry_after() {
        let err = status_error("create_record", StatusCode::TOO_MANY_REQUESTS, Some(12), "");
        assert!(matches!(err, PortError::RateLimited { retry_after_secs: 12 }));
        assert!(err.is_transient());
    }

    #[test]
    fn test_gateway_statuses_are_transient() {
        for status in [
            StatusCode::BAD_GATEWAY,
            StatusCode::SERVICE_UNAVAILABLE,
            StatusCode::REQUEST_TIMEOUT,
            StatusCode::GATEWAY_TIMEOUT,
        ] {
            assert!(status_error("delete_record", status, None, "").is_transient());
        }
    }

    #[test]
    fn test_other_statuses_are_internal_with_body() {
        let err = status_error("update_record", StatusCode::INTERNAL_SERVER_ERROR, None, "boom");
        assert!(matches!(err, PortError::Internal { .. }));
        assert!(err.to_string().contains("boom"));
        assert!(!err.is_transient());
    }
}
