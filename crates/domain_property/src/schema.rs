//! Backend schema for the `property_c` table
//!
//! The record service stores listings with `_c`-suffixed custom fields next
//! to the built-in `Id`, `Name` and `Tags` columns. [`BackendProperty`] is
//! that shape, and this module owns every conversion between it and the UI
//! model in [`crate::property`].
//!
//! # List encoding
//!
//! `images_c` and `amenities_c` hold comma-joined strings. There is no
//! escaping, so an item containing a comma splits into two items on read.
//! Items are trimmed on both encode and decode.
//!
//! # Defaults on read
//!
//! Missing, null and empty values substitute as follows: numbers become 0,
//! strings become empty, `year_built_c` becomes `None` (a stored 0 too),
//! `status_c` becomes `for-sale`, and `listed_date_c` becomes "now" from the
//! supplied [`Clock`]. Numeric columns are read through [`lenient`], so a
//! count stored as `3.0` or a price stored as `"450000"` still maps.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use core_kernel::{Clock, PropertyId};

use crate::error::PropertyError;
use crate::property::{PropertyDraft, PropertyRecord, PropertyStatus};

/// Table holding property listings
pub const TABLE_NAME: &str = "property_c";

/// Maximum records returned by a listing fetch
pub const PAGE_SIZE: u32 = 50;

/// Field used to order listing fetches (newest first)
pub const LISTED_DATE_FIELD: &str = "listed_date_c";

/// Fields requested on every read
pub const READ_FIELDS: [&str; 21] = [
    "Name",
    "Tags",
    "title_c",
    "price_c",
    "type_c",
    "bedrooms_c",
    "bathrooms_c",
    "sqft_c",
    "address_c",
    "city_c",
    "state_c",
    "zip_code_c",
    "description_c",
    "images_c",
    "amenities_c",
    "year_built_c",
    "parking_c",
    "lat_c",
    "lng_c",
    "listed_date_c",
    "status_c",
];

/// Joins list items into the stored comma-delimited form
pub fn encode_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| item.trim())
        .collect::<Vec<_>>()
        .join(",")
}

/// Splits a stored comma-delimited value into trimmed items
///
/// An empty string decodes to an empty list.
pub fn decode_list(joined: &str) -> Vec<String> {
    if joined.is_empty() {
        return Vec::new();
    }
    joined.split(',').map(|item| item.trim().to_string()).collect()
}

/// Serde adapter for `Option<Option<T>>` fields
///
/// The outer option tracks presence and the inner one tracks null. Pair it
/// with `default` and `skip_serializing_if = "Option::is_none"` so an absent
/// field stays absent while `Some(None)` serializes as `null`.
pub mod nullable {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S, T>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

/// Lenient readers for numeric columns
///
/// The backend hands numbers back as JSON integers, floats or numeric
/// strings. Anything else (or a non-finite value) reads as `None`, which
/// the row mapping then replaces with the column default.
pub mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn number(value: Option<Value>) -> Option<f64> {
        let parsed = match value? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed.filter(|n| n.is_finite())
    }

    pub fn float<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<Value>::deserialize(deserializer).map(number)
    }

    /// Whole non-negative counts; fractions truncate
    pub fn count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<Value>::deserialize(deserializer).map(|value| {
            number(value)
                .filter(|n| *n >= 0.0 && *n <= f64::from(u32::MAX))
                .map(|n| n.trunc() as u32)
        })
    }

    /// Presence-tracking year, same shape as [`super::nullable`]
    pub fn year<'de, D>(deserializer: D) -> Result<Option<Option<i32>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<Value>::deserialize(deserializer).map(|value| {
            Some(
                number(value)
                    .filter(|n| *n >= f64::from(i32::MIN) && *n <= f64::from(i32::MAX))
                    .map(|n| n.trunc() as i32),
            )
        })
    }
}

/// A `property_c` row in backend shape
///
/// Every field is optional. A `None` field is left out of the payload,
/// which keeps update payloads sparse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendProperty {
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PropertyId>,
    /// Generic display name, mirrors the title
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Tags", default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_c: Option<String>,
    #[serde(default, deserialize_with = "lenient::float", skip_serializing_if = "Option::is_none")]
    pub price_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_c: Option<String>,
    #[serde(default, deserialize_with = "lenient::count", skip_serializing_if = "Option::is_none")]
    pub bedrooms_c: Option<u32>,
    #[serde(default, deserialize_with = "lenient::float", skip_serializing_if = "Option::is_none")]
    pub bathrooms_c: Option<f64>,
    #[serde(default, deserialize_with = "lenient::count", skip_serializing_if = "Option::is_none")]
    pub sqft_c: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code_c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images_c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amenities_c: Option<String>,
    #[serde(
        default,
        serialize_with = "nullable::serialize",
        deserialize_with = "lenient::year",
        skip_serializing_if = "Option::is_none"
    )]
    pub year_built_c: Option<Option<i32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parking_c: Option<String>,
    #[serde(default, deserialize_with = "lenient::float", skip_serializing_if = "Option::is_none")]
    pub lat_c: Option<f64>,
    #[serde(default, deserialize_with = "lenient::float", skip_serializing_if = "Option::is_none")]
    pub lng_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listed_date_c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_c: Option<String>,
}

impl BackendProperty {
    /// Builds the full create payload from a draft
    ///
    /// Absent fields take their defaults; `Id` is left for the backend to
    /// assign.
    pub fn for_create(draft: &PropertyDraft, clock: &dyn Clock) -> Self {
        let title = draft.title.clone().unwrap_or_default();
        Self {
            id: None,
            name: Some(title.clone()),
            tags: Some(draft.tags.clone().unwrap_or_default()),
            title_c: Some(title),
            price_c: Some(draft.price.unwrap_or(0.0)),
            type_c: Some(draft.property_type.clone().unwrap_or_default()),
            bedrooms_c: Some(draft.bedrooms.unwrap_or(0)),
            bathrooms_c: Some(draft.bathrooms.unwrap_or(0.0)),
            sqft_c: Some(draft.sqft.unwrap_or(0)),
            address_c: Some(draft.address.clone().unwrap_or_default()),
            city_c: Some(draft.city.clone().unwrap_or_default()),
            state_c: Some(draft.state.clone().unwrap_or_default()),
            zip_code_c: Some(draft.zip_code.clone().unwrap_or_default()),
            description_c: Some(draft.description.clone().unwrap_or_default()),
            images_c: Some(draft.images.as_deref().map(encode_list).unwrap_or_default()),
            amenities_c: Some(draft.amenities.as_deref().map(encode_list).unwrap_or_default()),
            year_built_c: Some(draft.year_built.flatten().filter(|year| *year != 0)),
            parking_c: Some(draft.parking.clone().unwrap_or_default()),
            lat_c: Some(draft.lat.unwrap_or(0.0)),
            lng_c: Some(draft.lng.unwrap_or(0.0)),
            listed_date_c: Some(
                draft
                    .listed_date
                    .clone()
                    .filter(|date| !date.is_empty())
                    .unwrap_or_else(|| clock.timestamp()),
            ),
            status_c: Some(
                draft
                    .status
                    .clone()
                    .filter(|status| !status.as_str().is_empty())
                    .unwrap_or_default()
                    .to_string(),
            ),
        }
    }

    /// Builds a sparse update payload carrying only the fields set on the draft
    pub fn for_update(id: PropertyId, draft: &PropertyDraft) -> Self {
        Self {
            id: Some(id),
            name: draft.title.clone(),
            tags: draft.tags.clone(),
            title_c: draft.title.clone(),
            price_c: draft.price,
            type_c: draft.property_type.clone(),
            bedrooms_c: draft.bedrooms,
            bathrooms_c: draft.bathrooms,
            sqft_c: draft.sqft,
            address_c: draft.address.clone(),
            city_c: draft.city.clone(),
            state_c: draft.state.clone(),
            zip_code_c: draft.zip_code.clone(),
            description_c: draft.description.clone(),
            images_c: draft.images.as_deref().map(encode_list),
            amenities_c: draft.amenities.as_deref().map(encode_list),
            year_built_c: draft.year_built,
            parking_c: draft.parking.clone(),
            lat_c: draft.lat,
            lng_c: draft.lng,
            listed_date_c: draft.listed_date.clone(),
            status_c: draft.status.as_ref().map(|status| status.to_string()),
        }
    }

    /// Converts a backend row into the UI record, substituting defaults
    ///
    /// # Errors
    ///
    /// Returns `PropertyError::InvalidData` when the row carries no `Id`.
    pub fn into_record(self, clock: &dyn Clock) -> Result<PropertyRecord, PropertyError> {
        let id = self
            .id
            .ok_or_else(|| PropertyError::invalid("record is missing its Id"))?;

        Ok(PropertyRecord {
            id,
            title: self.title_c.unwrap_or_default(),
            price: self.price_c.unwrap_or(0.0),
            property_type: self.type_c.unwrap_or_default(),
            bedrooms: self.bedrooms_c.unwrap_or(0),
            bathrooms: self.bathrooms_c.unwrap_or(0.0),
            sqft: self.sqft_c.unwrap_or(0),
            address: self.address_c.unwrap_or_default(),
            city: self.city_c.unwrap_or_default(),
            state: self.state_c.unwrap_or_default(),
            zip_code: self.zip_code_c.unwrap_or_default(),
            description: self.description_c.unwrap_or_default(),
            images: self.images_c.as_deref().map(decode_list).unwrap_or_default(),
            amenities: self.amenities_c.as_deref().map(decode_list).unwrap_or_default(),
            year_built: self.year_built_c.flatten().filter(|year| *year != 0),
            parking: self.parking_c.unwrap_or_default(),
            lat: self.lat_c.unwrap_or(0.0),
            lng: self.lng_c.unwrap_or(0.0),
            listed_date: self
                .listed_date_c
                .filter(|date| !date.is_empty())
                .unwrap_or_else(|| clock.timestamp()),
            status: self
                .status_c
                .filter(|status| !status.is_empty())
                .map(PropertyStatus::from)
                .unwrap_or_default(),
            tags: self.tags.unwrap_or_default(),
        })
    }

    /// Parses a raw record returned by the client
    pub fn from_payload(payload: Value) -> Result<Self, PropertyError> {
        serde_json::from_value(payload)
            .map_err(|e| PropertyError::invalid(format!("unreadable property record: {}", e)))
    }

    /// Serializes this row into a raw record for the client
    pub fn to_payload(&self) -> Result<Value, PropertyError> {
        serde_json::to_value(self)
            .map_err(|e| PropertyError::invalid(format!("unwritable property record: {}", e)))
    }
}

impl From<&PropertyRecord> for BackendProperty {
    fn from(record: &PropertyRecord) -> Self {
        Self {
            id: Some(record.id),
            name: Some(record.title.clone()),
            tags: Some(record.tags.clone()),
            title_c: Some(record.title.clone()),
            price_c: Some(record.price),
            type_c: Some(record.property_type.clone()),
            bedrooms_c: Some(record.bedrooms),
            bathrooms_c: Some(record.bathrooms),
            sqft_c: Some(record.sqft),
            address_c: Some(record.address.clone()),
            city_c: Some(record.city.clone()),
            state_c: Some(record.state.clone()),
            zip_code_c: Some(record.zip_code.clone()),
            description_c: Some(record.description.clone()),
            images_c: Some(encode_list(&record.images)),
            amenities_c: Some(encode_list(&record.amenities)),
            year_built_c: Some(record.year_built),
            parking_c: Some(record.parking.clone()),
            lat_c: Some(record.lat),
            lng_c: Some(record.lng),
            listed_date_c: Some(record.listed_date.clone()),
            status_c: Some(record.status.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use core_kernel::FixedClock;
    use serde_json::json;

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap())
    }

    #[test]
    fn test_decode_list_trims_items() {
        assert_eq!(
            decode_list("a.jpg, b.jpg"),
            vec!["a.jpg".to_string(), "b.jpg".to_string()]
        );
        assert!(decode_list("").is_empty());
    }

    #[test]
    fn test_encode_list_joins_without_spaces() {
        let items = vec!["a.jpg".to_string(), " b.jpg ".to_string()];
        assert_eq!(encode_list(&items), "a.jpg,b.jpg");
        assert_eq!(encode_list(&[]), "");
    }

    #[test]
    fn test_read_fields_cover_the_schema() {
        assert_eq!(READ_FIELDS.len(), 21);
        assert!(READ_FIELDS.contains(&LISTED_DATE_FIELD));
    }

    #[test]
    fn test_into_record_substitutes_defaults() {
        let row = BackendProperty::from_payload(json!({
            "Id": 12,
            "title_c": "Cottage",
            "price_c": null,
            "status_c": "",
            "year_built_c": 0
        }))
        .unwrap();

        let record = row.into_record(&clock()).unwrap();
        assert_eq!(record.id, PropertyId::new(12));
        assert_eq!(record.title, "Cottage");
        assert_eq!(record.price, 0.0);
        assert_eq!(record.city, "");
        assert!(record.images.is_empty());
        assert_eq!(record.year_built, None);
        assert_eq!(record.status, PropertyStatus::ForSale);
        assert_eq!(record.listed_date, "2024-05-01T09:00:00.000Z");
    }

    #[test]
    fn test_into_record_requires_id() {
        let row = BackendProperty {
            title_c: Some("No key".to_string()),
            ..Default::default()
        };
        let err = row.into_record(&clock()).unwrap_err();
        assert!(matches!(err, PropertyError::InvalidData(_)));
    }

    #[test]
    fn test_for_create_fills_every_field() {
        let draft = PropertyDraft {
            title: Some("A".to_string()),
            price: Some(100.0),
            images: Some(vec!["x.jpg".to_string(), "y.jpg".to_string()]),
            ..Default::default()
        };

        let payload = BackendProperty::for_create(&draft, &clock()).to_payload().unwrap();
        let object = payload.as_object().unwrap();

        assert_eq!(object.len(), 21);
        assert!(!object.contains_key("Id"));
        assert_eq!(payload["Name"], json!("A"));
        assert_eq!(payload["title_c"], json!("A"));
        assert_eq!(payload["price_c"], json!(100.0));
        assert_eq!(payload["images_c"], json!("x.jpg,y.jpg"));
        assert_eq!(payload["amenities_c"], json!(""));
        assert_eq!(payload["year_built_c"], json!(null));
        assert_eq!(payload["status_c"], json!("for-sale"));
        assert_eq!(payload["listed_date_c"], json!("2024-05-01T09:00:00.000Z"));
    }

    #[test]
    fn test_for_update_is_sparse() {
        let draft = PropertyDraft {
            price: Some(500.0),
            ..Default::default()
        };

        let payload = BackendProperty::for_update(PropertyId::new(7), &draft)
            .to_payload()
            .unwrap();

        assert_eq!(payload, json!({ "Id": 7, "price_c": 500.0 }));
    }

    #[test]
    fn test_for_update_title_mirrors_into_name() {
        let draft = PropertyDraft {
            title: Some("Renamed".to_string()),
            year_built: Some(None),
            ..Default::default()
        };

        let payload = BackendProperty::for_update(PropertyId::new(1), &draft)
            .to_payload()
            .unwrap();

        assert_eq!(
            payload,
            json!({ "Id": 1, "Name": "Renamed", "title_c": "Renamed", "year_built_c": null })
        );
    }

    #[test]
    fn test_numeric_columns_read_leniently() {
        let row = BackendProperty::from_payload(json!({
            "Id": 3,
            "bedrooms_c": 3.0,
            "sqft_c": "1200.5",
            "price_c": " 450000 ",
            "bathrooms_c": 2,
            "lat_c": "north",
            "year_built_c": 1998.0
        }))
        .unwrap();

        let record = row.into_record(&clock()).unwrap();
        assert_eq!(record.bedrooms, 3);
        assert_eq!(record.sqft, 1200);
        assert_eq!(record.price, 450000.0);
        assert_eq!(record.bathrooms, 2.0);
        assert_eq!(record.lat, 0.0);
        assert_eq!(record.year_built, Some(1998));
    }

    #[test]
    fn test_out_of_range_counts_read_as_default() {
        let row = BackendProperty::from_payload(json!({
            "Id": 4,
            "bedrooms_c": -2,
            "sqft_c": 1e12,
            "year_built_c": "unknown"
        }))
        .unwrap();

        assert_eq!(row.bedrooms_c, None);
        assert_eq!(row.sqft_c, None);
        assert_eq!(row.year_built_c, Some(None));

        let record = row.into_record(&clock()).unwrap();
        assert_eq!(record.bedrooms, 0);
        assert_eq!(record.sqft, 0);
        assert_eq!(record.year_built, None);
    }

    #[test]
    fn test_year_presence_survives_lenient_read() {
        let absent = BackendProperty::from_payload(json!({ "Id": 5 })).unwrap();
        assert_eq!(absent.year_built_c, None);

        let null = BackendProperty::from_payload(json!({ "Id": 5, "year_built_c": null })).unwrap();
        assert_eq!(null.year_built_c, Some(None));
        assert_eq!(null.to_payload().unwrap()["year_built_c"], json!(null));
    }

    #[test]
    fn test_for_create_defaults_empty_status() {
        let draft: PropertyDraft = serde_json::from_value(json!({ "status": "" })).unwrap();

        let payload = BackendProperty::for_create(&draft, &clock()).to_payload().unwrap();

        assert_eq!(payload["status_c"], json!("for-sale"));
    }
}
