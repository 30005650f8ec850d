//! Property DTOs
//!
//! Requests reuse `PropertyDraft` directly; every response wraps its payload
//! with the notifications raised while serving it.

use serde::Serialize;

use domain_property::Notification;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub notifications: Vec<Notification>,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T, notifications: Vec<Notification>) -> Self {
        Self {
            data,
            notifications,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}
