//! Property handlers
//!
//! Each handler runs the service with a fresh [`RequestFeedback`] so the
//! notifications it raises come back in the response body.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use core_kernel::PropertyId;
use domain_property::{PropertyDraft, PropertyRecord, PropertyService};

use crate::dto::property::{ApiResponse, DeleteResponse};
use crate::error::{ApiError, ApiFailure};
use crate::feedback::RequestFeedback;
use crate::AppState;

fn scoped(state: &AppState) -> (PropertyService, Arc<RequestFeedback>) {
    let feedback = Arc::new(RequestFeedback::new());
    (state.service.with_feedback(feedback.clone()), feedback)
}

fn parse_id(raw: &str) -> Result<PropertyId, ApiFailure> {
    raw.parse::<PropertyId>()
        .map_err(|e| ApiError::BadRequest(e.to_string()).with_notifications(Vec::new()))
}

/// Lists the newest listings
pub async fn list_properties(
    State(state): State<AppState>,
) -> Json<ApiResponse<Vec<PropertyRecord>>> {
    let (service, feedback) = scoped(&state);
    let listings = service.list_all().await;
    Json(ApiResponse::new(listings, feedback.take()))
}

/// Gets a listing by ID
pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<PropertyRecord>>, ApiFailure> {
    let id = parse_id(&id)?;
    let (service, feedback) = scoped(&state);

    match service.get_by_id(id).await {
        Ok(listing) => Ok(Json(ApiResponse::new(listing, feedback.take()))),
        Err(e) => Err(ApiError::from(e).with_notifications(feedback.take())),
    }
}

/// Creates a listing
///
/// Responds 201 with the new listing, or 200 with `null` data when the
/// record service created nothing.
pub async fn create_property(
    State(state): State<AppState>,
    Json(draft): Json<PropertyDraft>,
) -> Result<(StatusCode, Json<ApiResponse<Option<PropertyRecord>>>), ApiFailure> {
    let (service, feedback) = scoped(&state);

    match service.create(&draft).await {
        Ok(created) => {
            let status = if created.is_some() {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            Ok((status, Json(ApiResponse::new(created, feedback.take()))))
        }
        Err(e) => Err(ApiError::from(e).with_notifications(feedback.take())),
    }
}

/// Updates the fields present in the body
pub async fn update_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(changes): Json<PropertyDraft>,
) -> Result<Json<ApiResponse<Option<PropertyRecord>>>, ApiFailure> {
    let id = parse_id(&id)?;
    if changes.is_empty() {
        return Err(ApiError::BadRequest("No fields to update".to_string()).with_notifications(Vec::new()));
    }
    let (service, feedback) = scoped(&state);

    match service.update(id, &changes).await {
        Ok(updated) => Ok(Json(ApiResponse::new(updated, feedback.take()))),
        Err(e) => Err(ApiError::from(e).with_notifications(feedback.take())),
    }
}

/// Deletes a listing
pub async fn delete_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeleteResponse>>, ApiFailure> {
    let id = parse_id(&id)?;
    let (service, feedback) = scoped(&state);

    let deleted = service.delete(id).await;
    Ok(Json(ApiResponse::new(DeleteResponse { deleted }, feedback.take())))
}
