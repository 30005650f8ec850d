//! HTTP API Layer
//!
//! This crate provides the REST API over the property listing service
//! using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for listings and health
//! - **Middleware**: Request ids, tracing, request logging
//! - **DTOs**: The `{data, notifications}` response envelope
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(service);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod feedback;
pub mod middleware;
pub mod handlers;
pub mod dto;

use axum::{
    http::HeaderName,
    middleware as axum_middleware,
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_property::PropertyService;

use crate::handlers::{health, properties};
use crate::middleware::{request_logging_middleware, REQUEST_ID_HEADER};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: PropertyService,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `service` - The property service handlers delegate to
pub fn create_router(service: PropertyService) -> Router {
    let state = AppState { service };
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let property_routes = Router::new()
        .route(
            "/",
            get(properties::list_properties).post(properties::create_property),
        )
        .route(
            "/:id",
            get(properties::get_property)
                .patch(properties::update_property)
                .delete(properties::delete_property),
        );

    let api_routes = Router::new()
        .nest("/properties", property_routes)
        .layer(axum_middleware::from_fn(request_logging_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
