//! HTTP tests for interface_api

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use domain_property::{
    BackendProperty, MockRecordClient, PropertyService, RecordedCall, ScriptedReply,
    TracingFeedback, TABLE_NAME,
};
use interface_api::create_router;
use test_utils::{BackendRowFixtures, TemporalFixtures, TestPropertyBuilder};

async fn app_with(client: Arc<MockRecordClient>) -> Router {
    let service = PropertyService::new(client, Arc::new(TracingFeedback))
        .with_clock(Arc::new(TemporalFixtures::clock()));
    create_router(service)
}

async fn seeded_client(ids: &[i64]) -> Arc<MockRecordClient> {
    let rows = ids
        .iter()
        .map(|id| {
            let record = TestPropertyBuilder::new().with_id(*id).build();
            BackendProperty::from(&record).to_payload().unwrap()
        })
        .collect();
    Arc::new(MockRecordClient::with_records(TABLE_NAME, rows).await)
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

// ============================================================================
// Health Tests
// ============================================================================

mod health_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_reports_version() {
        let app = app_with(Arc::new(MockRecordClient::new())).await;

        let (status, body) = send(app, Method::GET, "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], json!("healthy"));
        assert!(body["version"].is_string());
    }

    #[tokio::test]
    async fn test_readiness_follows_record_service_health() {
        let client = Arc::new(MockRecordClient::new());

        let (status, body) = send(app_with(client.clone()).await, Method::GET, "/health/ready", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["record_service"], json!("healthy"));

        client.set_healthy(false);
        let (status, body) = send(app_with(client).await, Method::GET, "/health/ready", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], json!("unavailable"));
    }
}

// ============================================================================
// Property Route Tests
// ============================================================================

mod property_tests {
    use super::*;

    #[tokio::test]
    async fn test_list_returns_listings_in_envelope() {
        let client = Arc::new(
            MockRecordClient::with_records(TABLE_NAME, vec![BackendRowFixtures::family_home_row()])
                .await,
        );

        let (status, body) = send(app_with(client).await, Method::GET, "/api/v1/properties", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["Id"], json!(1));
        assert_eq!(body["data"][0]["zipCode"], json!("97205"));
        assert_eq!(body["data"][0]["images"], json!(["maple-front.jpg", "maple-kitchen.jpg"]));
        assert_eq!(body["notifications"], json!([]));
    }

    #[tokio::test]
    async fn test_list_failure_is_empty_with_notification() {
        let client = Arc::new(MockRecordClient::new());
        client.script(ScriptedReply::Reject("Quota exceeded".to_string())).await;

        let (status, body) = send(app_with(client).await, Method::GET, "/api/v1/properties", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([]));
        assert_eq!(
            body["notifications"],
            json!([{"level": "error", "message": "Quota exceeded"}])
        );
    }

    #[tokio::test]
    async fn test_get_missing_listing_is_404() {
        let app = app_with(Arc::new(MockRecordClient::new())).await;

        let (status, body) = send(app, Method::GET, "/api/v1/properties/42", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], json!("not_found"));
        assert_eq!(body["message"], json!("Property with Id 42 not found"));
    }

    #[tokio::test]
    async fn test_get_accepts_prefixed_id() {
        let app = app_with(seeded_client(&[8]).await).await;

        let (status, body) = send(app, Method::GET, "/api/v1/properties/PROP-8", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["Id"], json!(8));
    }

    #[tokio::test]
    async fn test_get_rejects_malformed_id() {
        let app = app_with(Arc::new(MockRecordClient::new())).await;

        let (status, body) = send(app, Method::GET, "/api/v1/properties/abc", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("bad_request"));
    }

    #[tokio::test]
    async fn test_create_returns_201_with_notification() {
        let client = Arc::new(MockRecordClient::new());

        let (status, body) = send(
            app_with(client.clone()).await,
            Method::POST,
            "/api/v1/properties",
            Some(json!({"title": "A", "price": 100, "amenities": "Pool, Gym"})),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["title"], json!("A"));
        assert_eq!(body["data"]["amenities"], json!(["Pool", "Gym"]));
        assert_eq!(
            body["notifications"],
            json!([{"level": "success", "message": "Property created successfully"}])
        );
        assert_eq!(client.count(TABLE_NAME).await, 1);
    }

    #[tokio::test]
    async fn test_create_without_successes_returns_null_data() {
        let client = Arc::new(MockRecordClient::new());
        client
            .script(ScriptedReply::FailRecords {
                message: Some("Title is required".to_string()),
                errors: vec![],
            })
            .await;

        let (status, body) = send(
            app_with(client).await,
            Method::POST,
            "/api/v1/properties",
            Some(json!({})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], Value::Null);
        assert_eq!(body["notifications"][0]["message"], json!("Title is required"));
    }

    #[tokio::test]
    async fn test_create_rejection_is_502_with_notifications() {
        let client = Arc::new(MockRecordClient::new());
        client.script(ScriptedReply::Reject("Duplicate listing".to_string())).await;

        let (status, body) = send(
            app_with(client).await,
            Method::POST,
            "/api/v1/properties",
            Some(json!({"title": "A"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], json!("rejected"));
        assert_eq!(body["message"], json!("Duplicate listing"));
        assert_eq!(body["notifications"][0]["level"], json!("error"));
    }

    #[tokio::test]
    async fn test_patch_sends_sparse_update() {
        let client = seeded_client(&[7]).await;

        let (status, body) = send(
            app_with(client.clone()).await,
            Method::PATCH,
            "/api/v1/properties/7",
            Some(json!({"price": 500})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["price"], json!(500.0));
        match client.last_call().await {
            Some(RecordedCall::Update { batch, .. }) => {
                assert_eq!(batch.records, vec![json!({"Id": 7, "price_c": 500.0})]);
            }
            other => panic!("Expected update call, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_patch_with_empty_body_is_400() {
        let client = seeded_client(&[7]).await;

        let (status, _) = send(
            app_with(client.clone()).await,
            Method::PATCH,
            "/api/v1/properties/7",
            Some(json!({})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(client.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_reports_outcome() {
        let client = seeded_client(&[5]).await;

        let (status, body) = send(app_with(client.clone()).await, Method::DELETE, "/api/v1/properties/5", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!({"deleted": true}));

        let (status, body) = send(app_with(client).await, Method::DELETE, "/api/v1/properties/5", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!({"deleted": false}));
    }
}
