//! Property Listing Domain
//!
//! This crate maps the property listings the UI works with onto the
//! `property_c` table of a hosted record service, and back.
//!
//! # Layers
//!
//! - **property**: the UI record (`PropertyRecord`) and input (`PropertyDraft`)
//! - **schema**: the backend row (`BackendProperty`), field names, defaults
//!   and the comma-delimited list encoding
//! - **ports**: the `RecordClient` port to the record service and its wire types
//! - **feedback**: the `FeedbackSink` for user-facing notifications
//! - **service**: `PropertyService`, the CRUD adapter tying these together
//!
//! # Examples
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use core_kernel::{FixedClock, PropertyId};
//! use domain_property::{BackendProperty, PropertyDraft};
//!
//! let draft = PropertyDraft {
//!     title: Some("Garden Flat".to_string()),
//!     images: Some(vec!["front.jpg".to_string(), "back.jpg".to_string()]),
//!     ..Default::default()
//! };
//!
//! let clock = FixedClock(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
//! let row = BackendProperty::for_create(&draft, &clock);
//! assert_eq!(row.images_c.as_deref(), Some("front.jpg,back.jpg"));
//!
//! let sparse = BackendProperty::for_update(PropertyId::new(4), &draft);
//! assert!(sparse.price_c.is_none());
//! ```

pub mod property;
pub mod schema;
pub mod error;
pub mod ports;
pub mod feedback;
pub mod service;

pub use property::{PropertyRecord, PropertyDraft, PropertyStatus};
pub use schema::{BackendProperty, encode_list, decode_list, TABLE_NAME, PAGE_SIZE, READ_FIELDS};
pub use error::PropertyError;
pub use ports::{
    RecordClient, FetchParams, FieldSelection, FieldSpec, OrderBy, PagingInfo, SortType,
    RecordBatch, DeleteParams, FetchResponse, RecordResponse, MutationResponse,
    RecordResult, FieldError,
};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{MockRecordClient, RecordedCall, ScriptedReply};
pub use feedback::{FeedbackSink, Notification, NotificationLevel, TracingFeedback, RecordingFeedback};
pub use service::PropertyService;
