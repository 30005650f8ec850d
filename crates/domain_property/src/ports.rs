//! Record Service Ports
//!
//! This module defines the port the property domain needs from the hosted
//! record service, plus the request and response shapes that travel through
//! it.
//!
//! # Architecture
//!
//! `RecordClient` mirrors the vendor's table API: fetch a page, get one row,
//! and create, update or delete batches of rows. It is table-agnostic and
//! moves records as raw JSON. The typed schema lives in [`crate::schema`].
//! Implementations:
//!
//! - **ApperHttpClient** (infra_apper): talks to the hosted service over HTTP
//! - **MockRecordClient**: in-memory tables for tests (`mock` feature)
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_property::{PropertyService, RecordClient, TracingFeedback};
//! use std::sync::Arc;
//!
//! let client: Arc<dyn RecordClient> = Arc::new(ApperHttpClient::new(config)?);
//! let service = PropertyService::new(client, Arc::new(TracingFeedback));
//! let listings = service.list_all().await;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use core_kernel::{DomainPort, HealthCheckable, PortError};

/// Reference to a column by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldName {
    #[serde(rename = "Name")]
    pub name: String,
}

/// One entry of a field list, serialized as `{"field": {"Name": "..."}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub field: FieldName,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            field: FieldName { name: name.into() },
        }
    }
}

/// Builds a field list from column names
pub fn field_specs(names: &[&str]) -> Vec<FieldSpec> {
    names.iter().map(|name| FieldSpec::new(*name)).collect()
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortType {
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

/// Ordering clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    #[serde(rename = "fieldName")]
    pub field_name: String,
    #[serde(rename = "sorttype")]
    pub sort_type: SortType,
}

/// Page window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingInfo {
    pub limit: u32,
    pub offset: u32,
}

/// Parameters for a table fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchParams {
    pub fields: Vec<FieldSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderBy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging_info: Option<PagingInfo>,
}

impl FetchParams {
    /// Selects the given columns with no ordering or paging
    pub fn new(fields: &[&str]) -> Self {
        Self {
            fields: field_specs(fields),
            order_by: Vec::new(),
            paging_info: None,
        }
    }

    /// Adds an ordering clause
    pub fn order_by(mut self, field_name: impl Into<String>, sort_type: SortType) -> Self {
        self.order_by.push(OrderBy {
            field_name: field_name.into(),
            sort_type,
        });
        self
    }

    /// Sets the page window
    pub fn paginate(mut self, limit: u32, offset: u32) -> Self {
        self.paging_info = Some(PagingInfo { limit, offset });
        self
    }
}

/// Column selection for a single-record read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSelection {
    pub fields: Vec<FieldSpec>,
}

impl FieldSelection {
    pub fn new(fields: &[&str]) -> Self {
        Self {
            fields: field_specs(fields),
        }
    }
}

/// Records sent to create or update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordBatch {
    pub records: Vec<Value>,
}

impl RecordBatch {
    pub fn single(record: Value) -> Self {
        Self {
            records: vec![record],
        }
    }
}

/// Keys sent to delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteParams {
    #[serde(rename = "RecordIds")]
    pub record_ids: Vec<i64>,
}

impl DeleteParams {
    pub fn single(id: i64) -> Self {
        Self {
            record_ids: vec![id],
        }
    }
}

/// Response to a table fetch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Vec<Value>>,
}

/// Response to a single-record read; `data` is absent when nothing matched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordResponse {
    #[serde(default)]
    pub data: Option<Value>,
}

/// A field-level validation failure reported for one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(rename = "fieldLabel", default)]
    pub field_label: String,
    #[serde(default)]
    pub message: String,
}

/// Outcome for one record of a create, update or delete batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RecordResult {
    pub fn succeeded(data: Option<Value>) -> Self {
        Self {
            success: true,
            data,
            ..Default::default()
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            ..Default::default()
        }
    }
}

/// Response to a create, update or delete batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub results: Option<Vec<RecordResult>>,
}

/// The port to the hosted record service
///
/// Each call is one round trip. `Err` means no response was obtained at
/// all; a response with `success: false` is the service refusing the
/// request and is returned as `Ok`.
#[async_trait]
pub trait RecordClient: DomainPort + HealthCheckable {
    /// Fetches a page of records from a table
    async fn fetch_records(
        &self,
        table: &str,
        params: &FetchParams,
    ) -> Result<FetchResponse, PortError>;

    /// Reads one record by key
    async fn get_record_by_id(
        &self,
        table: &str,
        id: i64,
        selection: &FieldSelection,
    ) -> Result<RecordResponse, PortError>;

    /// Creates a batch of records
    async fn create_record(
        &self,
        table: &str,
        batch: &RecordBatch,
    ) -> Result<MutationResponse, PortError>;

    /// Updates a batch of records; each record carries its `Id`
    async fn update_record(
        &self,
        table: &str,
        batch: &RecordBatch,
    ) -> Result<MutationResponse, PortError>;

    /// Deletes a batch of records by key
    async fn delete_record(
        &self,
        table: &str,
        params: &DeleteParams,
    ) -> Result<MutationResponse, PortError>;
}

/// Mock implementation for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use chrono::Utc;
    use serde_json::Map;
    use std::cmp::Ordering;
    use std::collections::{BTreeMap, HashMap, VecDeque};
    use std::sync::atomic::{AtomicBool, AtomicI64, Ordering as AtomicOrdering};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::{AdapterHealth, HealthCheckResult};

    type Row = Map<String, Value>;

    /// A call received by the mock, in arrival order
    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedCall {
        Fetch { table: String, params: FetchParams },
        Get { table: String, id: i64, selection: FieldSelection },
        Create { table: String, batch: RecordBatch },
        Update { table: String, batch: RecordBatch },
        Delete { table: String, params: DeleteParams },
    }

    /// A canned outcome consumed by the next call
    #[derive(Debug, Clone)]
    pub enum ScriptedReply {
        /// Respond with `success: false` and this message. A single-record
        /// read answers with no data instead.
        Reject(String),
        /// Respond `success: true` but fail every record in the batch
        FailRecords {
            message: Option<String>,
            errors: Vec<FieldError>,
        },
        /// Fail the call without a response
        Transport(String),
        /// Answer a create, update or delete with this response as is.
        /// Reads ignore it.
        Mutation(MutationResponse),
    }

    /// In-memory mock implementation of RecordClient
    ///
    /// Tables behave like the hosted service: keys are assigned on create,
    /// updates merge fields, fetches honour ordering and paging, and reads
    /// return only the selected columns plus `Id`.
    #[derive(Debug, Default)]
    pub struct MockRecordClient {
        tables: Arc<RwLock<HashMap<String, BTreeMap<i64, Row>>>>,
        calls: Arc<RwLock<Vec<RecordedCall>>>,
        script: Arc<RwLock<VecDeque<ScriptedReply>>>,
        last_id: AtomicI64,
        unhealthy: AtomicBool,
    }

    impl MockRecordClient {
        /// Creates a new mock client with no tables
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates a table for testing
        pub async fn with_records(table: &str, records: Vec<Value>) -> Self {
            let client = Self::new();
            for record in records {
                client.seed(table, record).await;
            }
            client
        }

        /// Stores a record directly, keeping its `Id` when present, and returns the key
        pub async fn seed(&self, table: &str, record: Value) -> i64 {
            let mut row = match record {
                Value::Object(row) => row,
                _ => Row::new(),
            };
            let id = match row.get("Id").and_then(Value::as_i64) {
                Some(id) => {
                    self.last_id.fetch_max(id, AtomicOrdering::SeqCst);
                    id
                }
                None => self.next_id(),
            };
            row.insert("Id".to_string(), Value::from(id));
            self.tables
                .write()
                .await
                .entry(table.to_string())
                .or_default()
                .insert(id, row);
            id
        }

        /// Queues an outcome for the next call
        pub async fn script(&self, reply: ScriptedReply) {
            self.script.write().await.push_back(reply);
        }

        /// Returns every call received so far
        pub async fn calls(&self) -> Vec<RecordedCall> {
            self.calls.read().await.clone()
        }

        /// Returns the most recent call
        pub async fn last_call(&self) -> Option<RecordedCall> {
            self.calls.read().await.last().cloned()
        }

        /// Returns a stored record
        pub async fn stored(&self, table: &str, id: i64) -> Option<Value> {
            self.tables
                .read()
                .await
                .get(table)
                .and_then(|rows| rows.get(&id))
                .cloned()
                .map(Value::Object)
        }

        /// Returns the number of rows in a table
        pub async fn count(&self, table: &str) -> usize {
            self.tables
                .read()
                .await
                .get(table)
                .map(BTreeMap::len)
                .unwrap_or(0)
        }

        /// Toggles the health check result
        pub fn set_healthy(&self, healthy: bool) {
            self.unhealthy.store(!healthy, AtomicOrdering::SeqCst);
        }

        fn next_id(&self) -> i64 {
            self.last_id.fetch_add(1, AtomicOrdering::SeqCst) + 1
        }

        async fn record(&self, call: RecordedCall) -> Option<ScriptedReply> {
            self.calls.write().await.push(call);
            self.script.write().await.pop_front()
        }
    }

    fn project(row: &Row, fields: &[FieldSpec]) -> Value {
        let mut projected = Row::new();
        if let Some(id) = row.get("Id") {
            projected.insert("Id".to_string(), id.clone());
        }
        for spec in fields {
            if let Some(value) = row.get(&spec.field.name) {
                projected.insert(spec.field.name.clone(), value.clone());
            }
        }
        Value::Object(projected)
    }

    fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
        match (a, b) {
            (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
            (Some(Value::Number(a)), Some(Value::Number(b))) => a
                .as_f64()
                .partial_cmp(&b.as_f64())
                .unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            _ => Ordering::Equal,
        }
    }

    fn rejected(message: String) -> MutationResponse {
        MutationResponse {
            success: false,
            message: Some(message),
            results: None,
        }
    }

    fn all_failed(count: usize, message: Option<String>, errors: Vec<FieldError>) -> MutationResponse {
        let failure = RecordResult {
            success: false,
            data: None,
            errors: Some(errors).filter(|errors| !errors.is_empty()),
            message,
        };
        MutationResponse {
            success: true,
            message: None,
            results: Some(vec![failure; count]),
        }
    }

    impl DomainPort for MockRecordClient {}

    #[async_trait]
    impl HealthCheckable for MockRecordClient {
        async fn health_check(&self) -> HealthCheckResult {
            let status = if self.unhealthy.load(AtomicOrdering::SeqCst) {
                AdapterHealth::Unhealthy
            } else {
                AdapterHealth::Healthy
            };
            HealthCheckResult {
                adapter_id: "mock-record-client".to_string(),
                status,
                latency_ms: 0,
                message: Some("Mock adapter".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl RecordClient for MockRecordClient {
        async fn fetch_records(
            &self,
            table: &str,
            params: &FetchParams,
        ) -> Result<FetchResponse, PortError> {
            let scripted = self
                .record(RecordedCall::Fetch {
                    table: table.to_string(),
                    params: params.clone(),
                })
                .await;
            match scripted {
                Some(ScriptedReply::Transport(message)) => return Err(PortError::connection(message)),
                Some(ScriptedReply::Reject(message)) => {
                    return Ok(FetchResponse {
                        success: false,
                        message: Some(message),
                        data: None,
                    })
                }
                Some(ScriptedReply::FailRecords { message, .. }) => {
                    return Ok(FetchResponse {
                        success: false,
                        message,
                        data: None,
                    })
                }
                Some(ScriptedReply::Mutation(_)) | None => {}
            }

            let tables = self.tables.read().await;
            let mut rows: Vec<&Row> = tables
                .get(table)
                .map(|rows| rows.values().collect())
                .unwrap_or_default();

            for clause in params.order_by.iter().rev() {
                rows.sort_by(|a, b| {
                    let ordering = compare_values(a.get(&clause.field_name), b.get(&clause.field_name));
                    match clause.sort_type {
                        SortType::Asc => ordering,
                        SortType::Desc => ordering.reverse(),
                    }
                });
            }

            let (offset, limit) = params
                .paging_info
                .map(|paging| (paging.offset as usize, paging.limit as usize))
                .unwrap_or((0, usize::MAX));

            let data = rows
                .into_iter()
                .skip(offset)
                .take(limit)
                .map(|row| project(row, &params.fields))
                .collect();

            Ok(FetchResponse {
                success: true,
                message: None,
                data: Some(data),
            })
        }

        async fn get_record_by_id(
            &self,
            table: &str,
            id: i64,
            selection: &FieldSelection,
        ) -> Result<RecordResponse, PortError> {
            let scripted = self
                .record(RecordedCall::Get {
                    table: table.to_string(),
                    id,
                    selection: selection.clone(),
                })
                .await;
            match scripted {
                Some(ScriptedReply::Transport(message)) => return Err(PortError::connection(message)),
                Some(ScriptedReply::Mutation(_)) | None => {}
                Some(_) => return Ok(RecordResponse { data: None }),
            }

            let data = self
                .tables
                .read()
                .await
                .get(table)
                .and_then(|rows| rows.get(&id))
                .map(|row| project(row, &selection.fields));
            Ok(RecordResponse { data })
        }

        async fn create_record(
            &self,
            table: &str,
            batch: &RecordBatch,
        ) -> Result<MutationResponse, PortError> {
            let scripted = self
                .record(RecordedCall::Create {
                    table: table.to_string(),
                    batch: batch.clone(),
                })
                .await;
            match scripted {
                Some(ScriptedReply::Transport(message)) => return Err(PortError::connection(message)),
                Some(ScriptedReply::Reject(message)) => return Ok(rejected(message)),
                Some(ScriptedReply::Mutation(response)) => return Ok(response),
                Some(ScriptedReply::FailRecords { message, errors }) => {
                    return Ok(all_failed(batch.records.len(), message, errors))
                }
                None => {}
            }

            let mut tables = self.tables.write().await;
            let rows = tables.entry(table.to_string()).or_default();
            let mut results = Vec::with_capacity(batch.records.len());
            for record in &batch.records {
                let Value::Object(fields) = record else {
                    results.push(RecordResult::failed("Record must be an object"));
                    continue;
                };
                let id = self.next_id();
                let mut row = fields.clone();
                row.insert("Id".to_string(), Value::from(id));
                results.push(RecordResult::succeeded(Some(Value::Object(row.clone()))));
                rows.insert(id, row);
            }

            Ok(MutationResponse {
                success: true,
                message: None,
                results: Some(results),
            })
        }

        async fn update_record(
            &self,
            table: &str,
            batch: &RecordBatch,
        ) -> Result<MutationResponse, PortError> {
            let scripted = self
                .record(RecordedCall::Update {
                    table: table.to_string(),
                    batch: batch.clone(),
                })
                .await;
            match scripted {
                Some(ScriptedReply::Transport(message)) => return Err(PortError::connection(message)),
                Some(ScriptedReply::Reject(message)) => return Ok(rejected(message)),
                Some(ScriptedReply::Mutation(response)) => return Ok(response),
                Some(ScriptedReply::FailRecords { message, errors }) => {
                    return Ok(all_failed(batch.records.len(), message, errors))
                }
                None => {}
            }

            let mut tables = self.tables.write().await;
            let rows = tables.entry(table.to_string()).or_default();
            let mut results = Vec::with_capacity(batch.records.len());
            for record in &batch.records {
                let existing = match record.get("Id").and_then(Value::as_i64) {
                    Some(id) => rows.get_mut(&id),
                    None => None,
                };
                match (existing, record) {
                    (Some(row), Value::Object(fields)) => {
                        for (key, value) in fields {
                            row.insert(key.clone(), value.clone());
                        }
                        results.push(RecordResult::succeeded(Some(Value::Object(row.clone()))));
                    }
                    _ => results.push(RecordResult::failed("Record does not exist")),
                }
            }

            Ok(MutationResponse {
                success: true,
                message: None,
                results: Some(results),
            })
        }

        async fn delete_record(
            &self,
            table: &str,
            params: &DeleteParams,
        ) -> Result<MutationResponse, PortError> {
            let scripted = self
                .record(RecordedCall::Delete {
                    table: table.to_string(),
                    params: params.clone(),
                })
                .await;
            match scripted {
                Some(ScriptedReply::Transport(message)) => return Err(PortError::connection(message)),
                Some(ScriptedReply::Reject(message)) => return Ok(rejected(message)),
                Some(ScriptedReply::Mutation(response)) => return Ok(response),
                Some(ScriptedReply::FailRecords { message, errors }) => {
                    return Ok(all_failed(params.record_ids.len(), message, errors))
                }
                None => {}
            }

            let mut tables = self.tables.write().await;
            let rows = tables.entry(table.to_string()).or_default();
            let results = params
                .record_ids
                .iter()
                .map(|id| match rows.remove(id) {
                    Some(_) => RecordResult::succeeded(None),
                    None => RecordResult::failed("Record does not exist"),
                })
                .collect();

            Ok(MutationResponse {
                success: true,
                message: None,
                results: Some(results),
            })
        }
    }
}
