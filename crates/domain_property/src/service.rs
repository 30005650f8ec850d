//! Property record service
//!
//! `PropertyService` is the adapter between the listing UI and the hosted
//! record service. Each operation is one round trip through the injected
//! [`RecordClient`], wrapped with the shape mapping from [`crate::schema`]
//! and uniform outcome reporting:
//!
//! - structured `tracing` events for operators
//! - short notifications to the injected [`FeedbackSink`] for users
//!
//! Reporting never changes control flow. Reads that the UI renders as a
//! list (`list_all`) and the boolean `delete` swallow failures into a safe
//! default. `get_by_id`, `create` and `update` raise them.

use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use core_kernel::{Clock, PropertyId, SystemClock};

use crate::error::PropertyError;
use crate::feedback::FeedbackSink;
use crate::ports::{
    DeleteParams, FetchParams, FieldSelection, MutationResponse, RecordBatch, RecordClient,
    RecordResult, SortType,
};
use crate::property::{PropertyDraft, PropertyRecord};
use crate::schema::{BackendProperty, LISTED_DATE_FIELD, PAGE_SIZE, READ_FIELDS, TABLE_NAME};

const LIST_FAILED: &str = "Failed to load properties. Please try again.";
const CREATED: &str = "Property created successfully";
const CREATE_FAILED: &str = "Failed to create property. Please try again.";
const UPDATED: &str = "Property updated successfully";
const UPDATE_FAILED: &str = "Failed to update property. Please try again.";
const DELETED: &str = "Property deleted successfully";
const DELETE_FAILED: &str = "Failed to delete property. Please try again.";
const REJECTED_WITHOUT_MESSAGE: &str = "Request was rejected by the record service";

#[derive(Debug, Clone, Copy)]
enum WriteKind {
    Create,
    Update,
}

impl WriteKind {
    fn verb(self) -> &'static str {
        match self {
            WriteKind::Create => "create",
            WriteKind::Update => "update",
        }
    }

    fn success_message(self) -> &'static str {
        match self {
            WriteKind::Create => CREATED,
            WriteKind::Update => UPDATED,
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            WriteKind::Create => CREATE_FAILED,
            WriteKind::Update => UPDATE_FAILED,
        }
    }
}

/// Adapter exposing listing CRUD over the record service
///
/// The service holds no state of its own. Collaborators sit behind `Arc`,
/// so clones are cheap and concurrent calls are independent.
///
/// # Example
///
/// ```rust,ignore
/// use domain_property::{PropertyService, PropertyDraft, TracingFeedback};
/// use std::sync::Arc;
///
/// let service = PropertyService::new(client, Arc::new(TracingFeedback));
///
/// let created = service.create(&PropertyDraft {
///     title: Some("Harbour View Loft".into()),
///     price: Some(425_000.0),
///     ..Default::default()
/// }).await?;
/// ```
#[derive(Clone)]
pub struct PropertyService {
    client: Arc<dyn RecordClient>,
    feedback: Arc<dyn FeedbackSink>,
    clock: Arc<dyn Clock>,
}

impl PropertyService {
    /// Creates a service over the given client and feedback sink
    pub fn new(client: Arc<dyn RecordClient>, feedback: Arc<dyn FeedbackSink>) -> Self {
        Self {
            client,
            feedback,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock used for timestamp defaults
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns a copy of this service reporting to a different sink
    pub fn with_feedback(&self, feedback: Arc<dyn FeedbackSink>) -> Self {
        Self {
            client: Arc::clone(&self.client),
            feedback,
            clock: Arc::clone(&self.clock),
        }
    }

    /// Returns the underlying record client
    pub fn client(&self) -> &Arc<dyn RecordClient> {
        &self.client
    }

    /// Fetches the newest listings, at most one page
    ///
    /// Ordered by listed date, newest first. A failed or rejected fetch is
    /// reported and yields an empty list. Rows that cannot be read are
    /// logged and skipped.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Vec<PropertyRecord> {
        let params = FetchParams::new(&READ_FIELDS)
            .order_by(LISTED_DATE_FIELD, SortType::Desc)
            .paginate(PAGE_SIZE, 0);

        let response = match self.client.fetch_records(TABLE_NAME, &params).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Error fetching properties");
                self.feedback.error(LIST_FAILED);
                return Vec::new();
            }
        };

        if !response.success {
            let message = rejection_message(response.message);
            error!(%message, "Property fetch rejected");
            self.feedback.error(&message);
            return Vec::new();
        }

        let rows = response.data.unwrap_or_default();
        let fetched = rows.len();
        let records: Vec<PropertyRecord> = rows
            .into_iter()
            .filter_map(|row| match self.decode(row) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable property row");
                    None
                }
            })
            .collect();

        debug!(count = records.len(), skipped = fetched - records.len(), "Fetched properties");
        records
    }

    /// Fetches one listing
    ///
    /// # Errors
    ///
    /// - `PropertyError::NotFound` when the service has no such record
    /// - `PropertyError::Backend` when the call itself failed
    /// - `PropertyError::InvalidData` when the record cannot be read
    #[instrument(skip(self), fields(property_id = %id))]
    pub async fn get_by_id(&self, id: PropertyId) -> Result<PropertyRecord, PropertyError> {
        let selection = FieldSelection::new(&READ_FIELDS);

        let response = self
            .client
            .get_record_by_id(TABLE_NAME, id.value(), &selection)
            .await
            .map_err(|e| {
                error!(error = %e, "Error fetching property");
                if e.is_not_found() {
                    PropertyError::NotFound(id)
                } else {
                    PropertyError::Backend(e)
                }
            })?;

        let Some(row) = response.data.filter(|row| !row.is_null()) else {
            warn!("Property not found");
            return Err(PropertyError::NotFound(id));
        };

        self.decode(row).map_err(|e| {
            error!(error = %e, "Error reading property");
            e
        })
    }

    /// Creates a listing, applying defaults to absent fields
    ///
    /// Returns the created listing, or `None` when the service accepted the
    /// request but created nothing. Per-record failures are reported to the
    /// feedback sink.
    ///
    /// # Errors
    ///
    /// `PropertyError::Rejected` when the request is refused outright, and
    /// `PropertyError::Backend` when the call fails.
    #[instrument(skip(self, draft))]
    pub async fn create(&self, draft: &PropertyDraft) -> Result<Option<PropertyRecord>, PropertyError> {
        let record = BackendProperty::for_create(draft, self.clock.as_ref());
        let payload = self.encode(&record, WriteKind::Create)?;
        self.write(WriteKind::Create, RecordBatch::single(payload)).await
    }

    /// Updates only the fields present on `changes`
    ///
    /// Returns the updated listing, or `None` when nothing was updated.
    ///
    /// # Errors
    ///
    /// Same as [`PropertyService::create`].
    #[instrument(skip(self, changes), fields(property_id = %id))]
    pub async fn update(
        &self,
        id: PropertyId,
        changes: &PropertyDraft,
    ) -> Result<Option<PropertyRecord>, PropertyError> {
        let record = BackendProperty::for_update(id, changes);
        let payload = self.encode(&record, WriteKind::Update)?;
        self.write(WriteKind::Update, RecordBatch::single(payload)).await
    }

    /// Deletes a listing
    ///
    /// Returns true only if the service reports at least one deletion.
    #[instrument(skip(self), fields(property_id = %id))]
    pub async fn delete(&self, id: PropertyId) -> bool {
        let params = DeleteParams::single(id.value());

        let response = match self.client.delete_record(TABLE_NAME, &params).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Error deleting property");
                self.feedback.error(DELETE_FAILED);
                return false;
            }
        };

        if !response.success {
            let message = rejection_message(response.message);
            error!(%message, "Property delete rejected");
            self.feedback.error(&message);
            return false;
        }

        let (successful, failed) = partition(response);
        self.report_failures("delete", &failed);

        if successful.is_empty() {
            return false;
        }
        info!("Property deleted");
        self.feedback.success(DELETED);
        true
    }

    async fn write(
        &self,
        kind: WriteKind,
        batch: RecordBatch,
    ) -> Result<Option<PropertyRecord>, PropertyError> {
        let outcome = match kind {
            WriteKind::Create => self.client.create_record(TABLE_NAME, &batch).await,
            WriteKind::Update => self.client.update_record(TABLE_NAME, &batch).await,
        };

        let response = outcome.map_err(|e| {
            error!(error = %e, "Error trying to {} property", kind.verb());
            self.feedback.error(kind.failure_message());
            PropertyError::Backend(e)
        })?;

        if !response.success {
            let message = rejection_message(response.message);
            error!(%message, "Property {} rejected", kind.verb());
            self.feedback.error(&message);
            return Err(PropertyError::Rejected(message));
        }

        let (successful, failed) = partition(response);
        self.report_failures(kind.verb(), &failed);

        let Some(first) = successful.into_iter().next() else {
            return Ok(None);
        };

        let record = match first.data.map(|row| self.decode(row)).transpose() {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Error reading {}d property", kind.verb());
                None
            }
        };

        info!("Property {}d", kind.verb());
        self.feedback.success(kind.success_message());
        Ok(record)
    }

    fn report_failures(&self, verb: &str, failed: &[RecordResult]) {
        if failed.is_empty() {
            return;
        }
        warn!(count = failed.len(), failures = ?failed, "Failed to {} records", verb);
        for result in failed {
            for field_error in result.errors.iter().flatten() {
                self.feedback
                    .error(&format!("{}: {}", field_error.field_label, field_error.message));
            }
            if let Some(message) = result.message.as_deref().filter(|m| !m.is_empty()) {
                self.feedback.error(message);
            }
        }
    }

    fn encode(&self, record: &BackendProperty, kind: WriteKind) -> Result<serde_json::Value, PropertyError> {
        record.to_payload().map_err(|e| {
            error!(error = %e, "Error preparing property to {}", kind.verb());
            self.feedback.error(kind.failure_message());
            e
        })
    }

    fn decode(&self, row: serde_json::Value) -> Result<PropertyRecord, PropertyError> {
        BackendProperty::from_payload(row)?.into_record(self.clock.as_ref())
    }
}

fn rejection_message(message: Option<String>) -> String {
    message
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| REJECTED_WITHOUT_MESSAGE.to_string())
}

fn partition(response: MutationResponse) -> (Vec<RecordResult>, Vec<RecordResult>) {
    response
        .results
        .unwrap_or_default()
        .into_iter()
        .partition(|result| result.success)
}
