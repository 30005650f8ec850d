//! Test Data Builders
//!
//! Provides a builder for listings with sensible defaults, so tests only
//! spell out the fields they care about.

use core_kernel::PropertyId;
use domain_property::{PropertyDraft, PropertyRecord, PropertyStatus};

use crate::fixtures::PropertyFixtures;

/// Builder for constructing test listings
pub struct TestPropertyBuilder {
    record: PropertyRecord,
}

impl Default for TestPropertyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPropertyBuilder {
    /// Creates a new builder starting from the family home fixture
    pub fn new() -> Self {
        Self {
            record: PropertyFixtures::family_home(),
        }
    }

    /// Sets the backend key
    pub fn with_id(mut self, id: i64) -> Self {
        self.record.id = PropertyId::new(id);
        self
    }

    /// Sets the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.record.title = title.into();
        self
    }

    /// Sets the asking price
    pub fn with_price(mut self, price: f64) -> Self {
        self.record.price = price;
        self
    }

    /// Sets the listing status
    pub fn with_status(mut self, status: PropertyStatus) -> Self {
        self.record.status = status;
        self
    }

    /// Sets the listed date
    pub fn listed_on(mut self, listed_date: impl Into<String>) -> Self {
        self.record.listed_date = listed_date.into();
        self
    }

    /// Sets the image list
    pub fn with_images(mut self, images: &[&str]) -> Self {
        self.record.images = images.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Sets the build year
    pub fn built_in(mut self, year: Option<i32>) -> Self {
        self.record.year_built = year;
        self
    }

    /// Builds the listing
    pub fn build(self) -> PropertyRecord {
        self.record
    }

    /// Builds a draft carrying every field of the listing
    pub fn build_draft(self) -> PropertyDraft {
        PropertyDraft::from(&self.record)
    }
}
