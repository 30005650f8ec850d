//! reqwest implementation of the record service port
//!
//! `ApperHttpClient` speaks the hosted record service's table API. One
//! client is built at startup and shared; reqwest pools connections
//! underneath it.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, RETRY_AFTER};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, instrument, warn};

use core_kernel::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_property::{
    DeleteParams, FetchParams, FieldSelection, MutationResponse, RecordBatch, RecordClient,
    RecordResponse, FetchResponse,
};

use crate::config::ApperConfig;
use crate::error::{status_error, transport_error, ApperError};

const ADAPTER_ID: &str = "apper-http-client";

/// HTTP client for the hosted record service
#[derive(Debug, Clone)]
pub struct ApperHttpClient {
    http: reqwest::Client,
    config: ApperConfig,
}

impl ApperHttpClient {
    /// Builds a client from validated settings
    ///
    /// # Errors
    ///
    /// Returns `ApperError::InvalidConfig` for unusable settings and
    /// `ApperError::Client` when reqwest cannot build the client.
    pub fn new(config: ApperConfig) -> Result<Self, ApperError> {
        config.validate()?;

        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.public_key))
            .map_err(|_| ApperError::InvalidConfig("public_key is not a valid header value".to_string()))?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        Ok(Self { http, config })
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn records_url(&self, table: &str) -> String {
        format!(
            "{}/projects/{}/tables/{}/records",
            self.base_url(),
            self.config.project_id,
            table
        )
    }

    fn query_url(&self, table: &str) -> String {
        format!("{}/query", self.records_url(table))
    }

    fn record_query_url(&self, table: &str, id: i64) -> String {
        format!("{}/{}/query", self.records_url(table), id)
    }

    fn health_url(&self) -> String {
        format!("{}/health", self.base_url())
    }

    fn request<B: Serialize>(&self, method: Method, url: String, body: &B) -> RequestBuilder {
        self.http.request(method, url).json(body)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<T, PortError> {
        let timeout_ms = self.config.timeout().as_millis() as u64;

        let response = request
            .send()
            .await
            .map_err(|e| transport_error(operation, timeout_ms, e))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok());
            let body = response.text().await.unwrap_or_default();
            warn!(operation, %status, "Record service returned an error status");
            return Err(status_error(operation, status, retry_after, &body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| transport_error(operation, timeout_ms, e))?;
        debug!(operation, bytes = body.len(), "Record service responded");

        serde_json::from_str(&body).map_err(|e| {
            PortError::transformation(format!("{}: unreadable response: {}", operation, e))
        })
    }
}

impl DomainPort for ApperHttpClient {}

#[async_trait]
impl HealthCheckable for ApperHttpClient {
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let result = self.http.get(self.health_url()).send().await;
        let latency_ms = start.elapsed().as_millis() as u64;

        let (status, message) = match result {
            Ok(response) if response.status().is_success() => (AdapterHealth::Healthy, None),
            Ok(response) if response.status().is_server_error() => (
                AdapterHealth::Unhealthy,
                Some(format!("Record service returned {}", response.status())),
            ),
            Ok(response) => (
                AdapterHealth::Degraded,
                Some(format!("Record service returned {}", response.status())),
            ),
            Err(e) => (
                AdapterHealth::Unhealthy,
                Some(format!("Record service unreachable: {}", e)),
            ),
        };

        HealthCheckResult {
            adapter_id: ADAPTER_ID.to_string(),
            status,
            latency_ms,
            message,
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl RecordClient for ApperHttpClient {
    #[instrument(skip(self, params), fields(table = %table))]
    async fn fetch_records(
        &self,
        table: &str,
        params: &FetchParams,
    ) -> Result<FetchResponse, PortError> {
        let request = self.request(Method::POST, self.query_url(table), params);
        self.send("fetch_records", request).await
    }

    #[instrument(skip(self, selection), fields(table = %table, record_id = id))]
    async fn get_record_by_id(
        &self,
        table: &str,
        id: i64,
        selection: &FieldSelection,
    ) -> Result<RecordResponse, PortError> {
        let request = self.request(Method::POST, self.record_query_url(table, id), selection);
        self.send("get_record_by_id", request).await
    }

    #[instrument(skip(self, batch), fields(table = %table, records = batch.records.len()))]
    async fn create_record(
        &self,
        table: &str,
        batch: &RecordBatch,
    ) -> Result<MutationResponse, PortError> {
        let request = self.request(Method::POST, self.records_url(table), batch);
        self.send("create_record", request).await
    }

    #[instrument(skip(self, batch), fields(table = %table, records = batch.records.len()))]
    async fn update_record(
        &self,
        table: &str,
        batch: &RecordBatch,
    ) -> Result<MutationResponse, PortError> {
        let request = self.request(Method::PATCH, self.records_url(table), batch);
        self.send("update_record", request).await
    }

    #[instrument(skip(self, params), fields(table = %table, records = params.record_ids.len()))]
    async fn delete_record(
        &self,
        table: &str,
        params: &DeleteParams,
    ) -> Result<MutationResponse, PortError> {
        let request = self.request(Method::DELETE, self.records_url(table), params);
        self.send("delete_record", request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApperHttpClient {
        ApperHttpClient::new(ApperConfig::new("proj-9", "pk_test", "https://records.example.com/api/"))
            .unwrap()
    }

    #[test]
    fn test_urls_follow_table_layout() {
        let client = client();

        assert_eq!(
            client.query_url("property_c"),
            "https://records.example.com/api/projects/proj-9/tables/property_c/records/query"
        );
        assert_eq!(
            client.record_query_url("property_c", 42),
            "https://records.example.com/api/projects/proj-9/tables/property_c/records/42/query"
        );
        assert_eq!(
            client.records_url("property_c"),
            "https://records.example.com/api/projects/proj-9/tables/property_c/records"
        );
        assert_eq!(client.health_url(), "https://records.example.com/api/health");
    }

    #[test]
    fn test_new_rejects_invalid_settings() {
        let err = ApperHttpClient::new(ApperConfig::new("", "pk", "https://x")).unwrap_err();
        assert!(matches!(err, ApperError::InvalidConfig(_)));

        let err = ApperHttpClient::new(ApperConfig::new("p", "bad\nkey", "https://x")).unwrap_err();
        assert!(matches!(err, ApperError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_connection_error() {
        let client = ApperHttpClient::new(
            ApperConfig::new("p", "pk", "http://127.0.0.1:9").timeout_secs(2),
        )
        .unwrap();

        let err = client
            .delete_record("property_c", &DeleteParams::single(1))
            .await
            .unwrap_err();
        assert!(err.is_transient());

        let health = client.health_check().await;
        assert_eq!(health.status, AdapterHealth::Unhealthy);
        assert_eq!(health.adapter_id, ADAPTER_ID);
    }
}
