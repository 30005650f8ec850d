//! Pre-built Test Fixtures
//!
//! Provides ready-to-use listings and backend rows. Values are fixed so
//! assertions can compare against literals.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};

use core_kernel::{FixedClock, PropertyId};
use domain_property::{PropertyRecord, PropertyStatus};

/// Fixture for time-related test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// The instant every fixture clock is frozen at (June 1, 2024, 08:00 UTC)
    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
    }

    /// `now()` as a stored timestamp
    pub fn now_timestamp() -> &'static str {
        "2024-06-01T08:00:00.000Z"
    }

    /// A clock frozen at `now()`
    pub fn clock() -> FixedClock {
        FixedClock(Self::now())
    }
}

/// Fixture for property listings
pub struct PropertyFixtures;

impl PropertyFixtures {
    /// A fully populated family home
    pub fn family_home() -> PropertyRecord {
        PropertyRecord {
            id: PropertyId::new(1),
            title: "Maple Street Family Home".to_string(),
            price: 485_000.0,
            property_type: "house".to_string(),
            bedrooms: 4,
            bathrooms: 2.5,
            sqft: 2_350,
            address: "14 Maple Street".to_string(),
            city: "Portland".to_string(),
            state: "OR".to_string(),
            zip_code: "97205".to_string(),
            description: "Renovated craftsman close to the park.".to_string(),
            images: vec!["maple-front.jpg".to_string(), "maple-kitchen.jpg".to_string()],
            amenities: vec!["Garage".to_string(), "Garden".to_string(), "Fireplace".to_string()],
            year_built: Some(1928),
            parking: "2-car garage".to_string(),
            lat: 45.5231,
            lng: -122.6765,
            listed_date: "2024-05-20T10:15:00.000Z".to_string(),
            status: PropertyStatus::ForSale,
            tags: "featured".to_string(),
        }
    }

    /// A downtown rental with no build year on file
    pub fn city_rental() -> PropertyRecord {
        PropertyRecord {
            id: PropertyId::new(2),
            title: "Downtown Studio".to_string(),
            price: 1_850.0,
            property_type: "apartment".to_string(),
            bedrooms: 0,
            bathrooms: 1.0,
            sqft: 520,
            address: "200 Pine Ave, Unit 9".to_string(),
            city: "Seattle".to_string(),
            state: "WA".to_string(),
            zip_code: "98101".to_string(),
            description: String::new(),
            images: vec!["studio.jpg".to_string()],
            amenities: vec![],
            year_built: None,
            parking: String::new(),
            lat: 47.6101,
            lng: -122.3421,
            listed_date: "2024-05-28T09:00:00.000Z".to_string(),
            status: PropertyStatus::ForRent,
            tags: String::new(),
        }
    }
}

/// Fixture for raw `property_c` rows as the record service returns them
pub struct BackendRowFixtures;

impl BackendRowFixtures {
    /// The family home in backend shape, with spaces after list commas
    pub fn family_home_row() -> Value {
        json!({
            "Id": 1,
            "Name": "Maple Street Family Home",
            "Tags": "featured",
            "title_c": "Maple Street Family Home",
            "price_c": 485000.0,
            "type_c": "house",
            "bedrooms_c": 4,
            "bathrooms_c": 2.5,
            "sqft_c": 2350,
            "address_c": "14 Maple Street",
            "city_c": "Portland",
            "state_c": "OR",
            "zip_code_c": "97205",
            "description_c": "Renovated craftsman close to the park.",
            "images_c": "maple-front.jpg, maple-kitchen.jpg",
            "amenities_c": "Garage, Garden, Fireplace",
            "year_built_c": 1928,
            "parking_c": "2-car garage",
            "lat_c": 45.5231,
            "lng_c": -122.6765,
            "listed_date_c": "2024-05-20T10:15:00.000Z",
            "status_c": "for-sale"
        })
    }

    /// A row with only its key and title; everything else must default
    pub fn sparse_row(id: i64) -> Value {
        json!({
            "Id": id,
            "title_c": "Untitled listing",
            "price_c": null,
            "images_c": null,
            "year_built_c": null,
            "status_c": null
        })
    }
}
