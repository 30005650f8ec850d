//! Request and response types

pub mod property;
