//! Property-Based Test Generators
//!
//! Provides proptest strategies for listings. Generated values stay inside
//! the domain the schema mapping round-trips exactly: list items carry no
//! commas, build years are non-zero, and listed dates are never empty.

use proptest::collection::vec;
use proptest::prelude::*;

use core_kernel::PropertyId;
use domain_property::{PropertyRecord, PropertyStatus};

/// Strategy for listing statuses, including free-text ones
pub fn status_strategy() -> impl Strategy<Value = PropertyStatus> {
    prop_oneof![
        Just(PropertyStatus::ForSale),
        Just(PropertyStatus::ForRent),
        Just(PropertyStatus::Sold),
        Just(PropertyStatus::Pending),
        "[a-z]{3,10}(-[a-z]{2,6})?".prop_map(PropertyStatus::from),
    ]
}

/// Strategy for list items as stored in `images_c`/`amenities_c`
pub fn list_item_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9._/-]{1,16}( [A-Za-z0-9._/-]{1,8})?"
}

/// Strategy for free text fields
pub fn text_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ,.'-]{0,40}"
}

/// Strategy for RFC 3339 timestamps in the stored format
pub fn timestamp_strategy() -> impl Strategy<Value = String> {
    (2000u32..2030, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60).prop_map(
        |(year, month, day, hour, minute)| {
            format!("{:04}-{:02}-{:02}T{:02}:{:02}:00.000Z", year, month, day, hour, minute)
        },
    )
}

/// Strategy for fully populated listings
pub fn property_record_strategy() -> impl Strategy<Value = PropertyRecord> {
    let identity = (
        1i64..1_000_000,
        text_strategy(),
        0.0f64..10_000_000.0,
        "[a-z]{0,12}",
        0u32..12,
        0.0f64..8.0,
        0u32..20_000,
    );
    let location = (
        text_strategy(),
        text_strategy(),
        "[A-Z]{2}",
        "[0-9]{5}",
        -90.0f64..90.0,
        -180.0f64..180.0,
    );
    let details = (
        text_strategy(),
        vec(list_item_strategy(), 0..6),
        vec(list_item_strategy(), 0..6),
        prop::option::of(1800i32..2030),
        text_strategy(),
        timestamp_strategy(),
        status_strategy(),
        text_strategy(),
    );

    (identity, location, details).prop_map(
        |(
            (id, title, price, property_type, bedrooms, bathrooms, sqft),
            (address, city, state, zip_code, lat, lng),
            (description, images, amenities, year_built, parking, listed_date, status, tags),
        )| PropertyRecord {
            id: PropertyId::new(id),
            title,
            price,
            property_type,
            bedrooms,
            bathrooms,
            sqft,
            address,
            city,
            state,
            zip_code,
            description,
            images,
            amenities,
            year_built,
            parking,
            lat,
            lng,
            listed_date,
            status,
            tags,
        },
    )
}
