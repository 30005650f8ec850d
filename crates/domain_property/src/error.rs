//! Property domain errors
//!
//! A missing record, a request the record service refused, an unreadable
//! payload and a transport failure are distinct variants, so callers can
//! tell "no such listing" apart from "the backend is down".

use thiserror::Error;

use core_kernel::{PortError, PropertyId};

/// Errors that can occur in the property domain
#[derive(Debug, Error)]
pub enum PropertyError {
    /// The record service returned no data for the id
    #[error("Property with Id {0} not found")]
    NotFound(PropertyId),

    /// The record service refused the whole request (`success: false`)
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// A payload could not be mapped between shapes
    #[error("Invalid property data: {0}")]
    InvalidData(String),

    /// The client failed before a response was available
    #[error("Record service error: {0}")]
    Backend(#[from] PortError),
}

impl PropertyError {
    /// Creates an InvalidData error with a message
    pub fn invalid(message: impl Into<String>) -> Self {
        PropertyError::InvalidData(message.into())
    }

    /// Returns true if this error means the listing does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, PropertyError::NotFound(_))
    }
}
