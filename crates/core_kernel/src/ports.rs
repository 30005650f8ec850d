//! Ports and Adapters Infrastructure
//!
//! This module provides the foundational types for the ports and adapters
//! split between the property domain and the hosted record service.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   interface_api (HTTP)                       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │        domain_property::PropertyService (shape mapping)      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  RecordClient port trait                     │
//! └─────────────────────────────────────────────────────────────┘
//!                    ▲                         ▲
//!                    │                         │
//!         ┌─────────┴─────────┐     ┌────────┴────────┐
//!         │  ApperHttpClient  │     │ MockRecordClient │
//!         │   (infra_apper)   │     │   (in-memory)    │
//!         └───────────────────┘     └──────────────────┘
//! ```
//!
//! Port traits extend the marker traits defined here, and every adapter
//! reports failures through [`PortError`].

use std::fmt;
use thiserror::Error;
use serde::{Deserialize, Serialize};

/// Error type for port operations
///
/// Provides a unified error type that all port implementations must use,
/// so the domain handles the HTTP client and test doubles the same way.
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: String,
        id: String,
    },

    /// Connection to the underlying system failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The operation timed out
    #[error("Timeout after {duration_ms}ms: {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
    },

    /// Authentication or authorization failed
    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
    },

    /// Rate limit exceeded for external API
    #[error("Rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        retry_after_secs: u64,
    },

    /// The external system is unavailable
    #[error("Service unavailable: {service}")]
    ServiceUnavailable {
        service: String,
    },

    /// A payload could not be converted between shapes
    #[error("Transformation error: {message}")]
    Transformation {
        message: String,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a Transformation error
    pub fn transformation(message: impl Into<String>) -> Self {
        PortError::Transformation {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true if this error indicates a transient failure that may succeed on retry
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PortError::Connection { .. }
                | PortError::Timeout { .. }
                | PortError::RateLimited { .. }
                | PortError::ServiceUnavailable { .. }
        )
    }

    /// Returns true if this error indicates the entity was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }
}

/// Marker trait for all domain ports
///
/// All port traits extend this marker so they are thread-safe and can be
/// shared across async tasks behind an `Arc`.
pub trait DomainPort: Send + Sync + 'static {}

/// Health status for an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterHealth {
    /// Adapter is healthy and operational
    Healthy,
    /// Adapter is degraded but operational
    Degraded,
    /// Adapter is unhealthy and not operational
    Unhealthy,
    /// Health status is unknown
    Unknown,
}

impl AdapterHealth {
    /// Returns true when the adapter can serve requests
    pub fn is_available(&self) -> bool {
        matches!(self, AdapterHealth::Healthy | AdapterHealth::Degraded)
    }
}

/// Health check result for an adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    /// Adapter identifier
    pub adapter_id: String,
    /// Current health status
    pub status: AdapterHealth,
    /// Latency of the health check in milliseconds
    pub latency_ms: u64,
    /// Optional message with additional details
    pub message: Option<String>,
    /// Timestamp of the health check
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

/// Trait for adapters that support health checks
#[async_trait::async_trait]
pub trait HealthCheckable: Send + Sync {
    /// Performs a health check on the adapter
    ///
    /// # Returns
    ///
    /// A `HealthCheckResult` indicating the current health status
    async fn health_check(&self) -> HealthCheckResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_error_not_found() {
        let error = PortError::not_found("Property", "123");
        assert!(error.is_not_found());
        assert!(!error.is_transient());
        assert!(error.to_string().contains("Property"));
        assert!(error.to_string().contains("123"));
    }

    #[test]
    fn test_port_error_transient() {
        let timeout = PortError::Timeout {
            operation: "fetch_records".to_string(),
            duration_ms: 5000,
        };
        assert!(timeout.is_transient());

        let rate_limited = PortError::RateLimited {
            retry_after_secs: 60,
        };
        assert!(rate_limited.is_transient());

        let transformation = PortError::transformation("bad payload");
        assert!(!transformation.is_transient());
    }

    #[test]
    fn test_adapter_health_availability() {
        assert!(AdapterHealth::Healthy.is_available());
        assert!(AdapterHealth::Degraded.is_available());
        assert!(!AdapterHealth::Unhealthy.is_available());
        assert!(!AdapterHealth::Unknown.is_available());
    }
}
