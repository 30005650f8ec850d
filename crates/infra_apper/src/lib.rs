//! Record Service Infrastructure
//!
//! This crate connects the property domain to the hosted record service
//! over HTTP. It provides the connection settings and a `reqwest`-backed
//! implementation of the `RecordClient` port.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_apper::{ApperConfig, ApperHttpClient};
//! use domain_property::{PropertyService, TracingFeedback};
//! use std::sync::Arc;
//!
//! let client = ApperHttpClient::new(ApperConfig::from_env()?)?;
//! let service = PropertyService::new(Arc::new(client), Arc::new(TracingFeedback));
//! ```

pub mod config;
pub mod error;
pub mod client;

pub use config::ApperConfig;
pub use error::ApperError;
pub use client::ApperHttpClient;
