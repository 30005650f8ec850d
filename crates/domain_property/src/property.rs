//! Property listing model (UI shape)
//!
//! This module defines the record shape the listing UI works with. Field
//! names serialize in camelCase with the backend key as `Id`, matching what
//! the front end already consumes.
//!
//! # Inputs
//!
//! - [`PropertyRecord`] is a fully populated listing as read back from the
//!   record service, with every default already substituted.
//! - [`PropertyDraft`] carries optional fields. Create applies defaults to
//!   whatever is absent, while update sends only what is present.
//!
//! # Examples
//!
//! ```rust
//! use domain_property::property::{PropertyDraft, PropertyStatus};
//!
//! let draft = PropertyDraft {
//!     title: Some("Harbour View Loft".to_string()),
//!     price: Some(425_000.0),
//!     status: Some(PropertyStatus::ForSale),
//!     ..Default::default()
//! };
//! assert!(draft.images.is_none());
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use core_kernel::PropertyId;

use crate::schema::{decode_list, nullable};

/// Listing status
///
/// The record service stores status as free text. The well-known values get
/// their own variants and anything else is carried through as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PropertyStatus {
    #[default]
    ForSale,
    ForRent,
    Sold,
    Pending,
    Other(String),
}

impl PropertyStatus {
    /// Returns the stored string form
    pub fn as_str(&self) -> &str {
        match self {
            PropertyStatus::ForSale => "for-sale",
            PropertyStatus::ForRent => "for-rent",
            PropertyStatus::Sold => "sold",
            PropertyStatus::Pending => "pending",
            PropertyStatus::Other(raw) => raw,
        }
    }
}

impl From<&str> for PropertyStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "for-sale" => PropertyStatus::ForSale,
            "for-rent" => PropertyStatus::ForRent,
            "sold" => PropertyStatus::Sold,
            "pending" => PropertyStatus::Pending,
            other => PropertyStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for PropertyStatus {
    fn from(raw: String) -> Self {
        PropertyStatus::from(raw.as_str())
    }
}

impl From<PropertyStatus> for String {
    fn from(status: PropertyStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A property listing as the UI sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    /// Backend record key
    #[serde(rename = "Id")]
    pub id: PropertyId,
    pub title: String,
    pub price: f64,
    /// Kind of dwelling (house, condo, ...)
    #[serde(rename = "type")]
    pub property_type: String,
    pub bedrooms: u32,
    pub bathrooms: f64,
    pub sqft: u32,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub description: String,
    /// Image URLs in display order
    pub images: Vec<String>,
    pub amenities: Vec<String>,
    pub year_built: Option<i32>,
    pub parking: String,
    pub lat: f64,
    pub lng: f64,
    /// RFC 3339 timestamp
    pub listed_date: String,
    pub status: PropertyStatus,
    pub tags: String,
}

/// Optional listing fields used for create and update
///
/// `year_built` is tri-state: `None` leaves it out, `Some(None)` sends an
/// explicit null and `Some(Some(year))` sends the year. `images` and
/// `amenities` deserialize from either a list or an already comma-joined
/// string.
///
/// Only `year_built` can be cleared. An explicit `null` on any other field
/// reads the same as leaving it out, so an update keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sqft: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "list_input", skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, deserialize_with = "list_input", skip_serializing_if = "Option::is_none")]
    pub amenities: Option<Vec<String>>,
    #[serde(default, with = "nullable", skip_serializing_if = "Option::is_none")]
    pub year_built: Option<Option<i32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parking: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listed_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PropertyStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

impl PropertyDraft {
    /// Returns true when no field is set
    pub fn is_empty(&self) -> bool {
        *self == PropertyDraft::default()
    }
}

impl From<&PropertyRecord> for PropertyDraft {
    fn from(record: &PropertyRecord) -> Self {
        Self {
            title: Some(record.title.clone()),
            price: Some(record.price),
            property_type: Some(record.property_type.clone()),
            bedrooms: Some(record.bedrooms),
            bathrooms: Some(record.bathrooms),
            sqft: Some(record.sqft),
            address: Some(record.address.clone()),
            city: Some(record.city.clone()),
            state: Some(record.state.clone()),
            zip_code: Some(record.zip_code.clone()),
            description: Some(record.description.clone()),
            images: Some(record.images.clone()),
            amenities: Some(record.amenities.clone()),
            year_built: Some(record.year_built),
            parking: Some(record.parking.clone()),
            lat: Some(record.lat),
            lng: Some(record.lng),
            listed_date: Some(record.listed_date.clone()),
            status: Some(record.status.clone()),
            tags: Some(record.tags.clone()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListInput {
    Items(Vec<String>),
    Joined(String),
}

fn list_input<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<ListInput>::deserialize(deserializer)?.map(|input| match input {
        ListInput::Items(items) => items,
        ListInput::Joined(joined) => decode_list(&joined),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_known_values() {
        assert_eq!(PropertyStatus::from("for-rent"), PropertyStatus::ForRent);
        assert_eq!(PropertyStatus::from("sold").as_str(), "sold");
        assert_eq!(PropertyStatus::default(), PropertyStatus::ForSale);
    }

    #[test]
    fn test_status_unknown_value_is_preserved() {
        let status = PropertyStatus::from("off-market");
        assert_eq!(status, PropertyStatus::Other("off-market".to_string()));
        assert_eq!(serde_json::to_value(&status).unwrap(), json!("off-market"));
    }

    #[test]
    fn test_draft_accepts_list_or_joined_string() {
        let draft: PropertyDraft = serde_json::from_value(json!({
            "images": ["a.jpg", "b.jpg"],
            "amenities": "Pool, Gym"
        }))
        .unwrap();

        assert_eq!(draft.images, Some(vec!["a.jpg".to_string(), "b.jpg".to_string()]));
        assert_eq!(draft.amenities, Some(vec!["Pool".to_string(), "Gym".to_string()]));
    }

    #[test]
    fn test_draft_year_built_tri_state() {
        let absent: PropertyDraft = serde_json::from_value(json!({})).unwrap();
        let cleared: PropertyDraft = serde_json::from_value(json!({ "yearBuilt": null })).unwrap();
        let set: PropertyDraft = serde_json::from_value(json!({ "yearBuilt": 1998 })).unwrap();

        assert_eq!(absent.year_built, None);
        assert_eq!(cleared.year_built, Some(None));
        assert_eq!(set.year_built, Some(Some(1998)));
    }

    #[test]
    fn test_draft_is_empty() {
        assert!(PropertyDraft::default().is_empty());
        let draft = PropertyDraft {
            price: Some(1.0),
            ..Default::default()
        };
        assert!(!draft.is_empty());
    }

    #[test]
    fn test_record_serializes_in_ui_shape() {
        let record = PropertyRecord {
            id: PropertyId::new(3),
            title: "Loft".to_string(),
            price: 100.0,
            property_type: "condo".to_string(),
            bedrooms: 1,
            bathrooms: 1.5,
            sqft: 700,
            address: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62701".to_string(),
            description: String::new(),
            images: vec![],
            amenities: vec![],
            year_built: None,
            parking: String::new(),
            lat: 0.0,
            lng: 0.0,
            listed_date: "2024-01-01T00:00:00.000Z".to_string(),
            status: PropertyStatus::ForRent,
            tags: String::new(),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["Id"], json!(3));
        assert_eq!(value["type"], json!("condo"));
        assert_eq!(value["zipCode"], json!("62701"));
        assert_eq!(value["yearBuilt"], json!(null));
        assert_eq!(value["status"], json!("for-rent"));
    }

    #[test]
    fn test_draft_null_reads_as_absent() {
        let draft: PropertyDraft = serde_json::from_value(json!({
            "price": null,
            "city": null,
            "images": null
        }))
        .unwrap();

        assert!(draft.is_empty());

        let payload = crate::schema::BackendProperty::for_update(PropertyId::new(7), &draft)
            .to_payload()
            .unwrap();
        assert_eq!(payload, json!({ "Id": 7 }));
    }
}
