//! Core Kernel - Foundational types shared by the property listing crates
//!
//! This crate provides the building blocks used by every other crate:
//! - Strongly-typed record identifiers issued by the backend
//! - The ports and adapters error type and health-check contracts
//! - A clock abstraction for timestamp defaults

pub mod identifiers;
pub mod ports;
pub mod temporal;

pub use identifiers::{PropertyId, IdParseError};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
pub use temporal::{Clock, SystemClock, FixedClock, format_timestamp};
