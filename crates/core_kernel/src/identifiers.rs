//! Strongly-typed identifiers for backend records
//!
//! The hosted record service issues integer keys. Wrapping them in newtypes
//! keeps a property key from being passed where another table's key is
//! expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when an identifier string cannot be parsed
#[derive(Debug, Error)]
#[error("Invalid identifier '{input}': {source}")]
pub struct IdParseError {
    pub input: String,
    #[source]
    pub source: ParseIntError,
}

macro_rules! define_record_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw key issued by the backend
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the raw backend key
            pub const fn value(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s.trim();
                let raw = raw.strip_prefix(concat!($prefix, "-")).unwrap_or(raw);
                raw.parse::<i64>()
                    .map(Self)
                    .map_err(|source| IdParseError {
                        input: s.to_string(),
                        source,
                    })
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }
    };
}

define_record_id!(PropertyId, "PROP");
