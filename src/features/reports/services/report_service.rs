use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::identity::IdentityProvider;
use crate::features::reports::models::{GeoPoint, NewReportDocument, Report, ReportDocument};
use crate::modules::capture::PhotoSource;
use crate::modules::storage::{BlobStore, DocumentStore};
use crate::shared::constants::{PHOTO_KEY_PREFIX, REPORTS_COLLECTION};

/// Raw captured fields as handed over by the client.
#[derive(Debug, Clone)]
pub struct NewReportInput {
    pub description: String,
    pub location: Option<GeoPoint>,
    pub photo_local_ref: Option<String>,
}

/// Photo upload collaborators for remote mode. Absent in local mode, where
/// the captured local ref is persisted as-is.
pub struct PhotoUploadBackend {
    pub blob_store: Arc<dyn BlobStore>,
    pub photo_source: Arc<dyn PhotoSource>,
}

/// Turns raw captured input into a persisted report document.
///
/// One sequential pipeline per submission: construct, validate, upload,
/// persist. Every failure aborts the remaining steps; nothing is retried and
/// no partial document is ever written. Concurrent submissions are
/// independent.
pub struct ReportService {
    store: Arc<dyn DocumentStore>,
    photo_backend: Option<PhotoUploadBackend>,
    identity: Arc<dyn IdentityProvider>,
    app_id: String,
}

impl ReportService {
    /// Storage and identity handles are required up front: a service cannot
    /// exist before its backends are initialized.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        photo_backend: Option<PhotoUploadBackend>,
        identity: Arc<dyn IdentityProvider>,
        app_id: String,
    ) -> Self {
        Self {
            store,
            photo_backend,
            identity,
            app_id,
        }
    }

    /// Create a report from raw captured input.
    ///
    /// Calling this twice with identical input produces two distinct
    /// documents; every physical submission is its own event.
    pub async fn create_report(&self, input: NewReportInput) -> Result<ReportDocument> {
        let owner_id = self.identity.current_user_id().ok_or_else(|| {
            AppError::NotConnected("No active identity; the report store is unavailable".to_string())
        })?;

        let report = Report::new(
            input.description,
            input.location,
            input.photo_local_ref,
            Some(owner_id.clone()),
        );

        // Hard gate: an invalid report triggers no upload and no write.
        report
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        tracing::debug!("Validated {}", report.summary());

        // Validation guarantees a latitude beyond this point.
        let latitude = report
            .location
            .and_then(|l| l.latitude)
            .ok_or_else(|| AppError::Internal("validated report lost its latitude".to_string()))?;

        let photo_url = match (&self.photo_backend, &report.photo_local_ref) {
            (Some(backend), Some(local_ref)) => {
                let url = self
                    .upload_photo(backend, local_ref, &owner_id, &report)
                    .await?;
                tracing::info!("Photo uploaded for report {}: {}", report.id, url);
                Some(url)
            }
            // Local mode: the captured ref is the document's image field.
            _ => report.photo_local_ref.clone(),
        };

        let document = NewReportDocument {
            id: report.id,
            description: report.description.clone(),
            latitude,
            longitude: report.location.and_then(|l| l.longitude),
            photo_url,
            status: report.status.to_string(),
            user_id: owner_id,
            app_id: self.app_id.clone(),
        };

        // An already-uploaded photo is not rolled back on write failure; the
        // orphaned blob is an accepted limitation.
        let stored = self.store.insert(document).await.map_err(|e| match e {
            AppError::PersistFailed(_) => e,
            other => AppError::PersistFailed(other.to_string()),
        })?;

        tracing::info!(
            "Created report {} in collection '{}'",
            stored.id,
            REPORTS_COLLECTION
        );

        Ok(stored)
    }

    /// All stored reports in insertion order.
    pub async fn list_reports(&self) -> Result<Vec<ReportDocument>> {
        self.store.list_all().await
    }

    /// Read the referenced photo and push it to the blob store. Any failure
    /// in this step surfaces as an upload failure.
    async fn upload_photo(
        &self,
        backend: &PhotoUploadBackend,
        local_ref: &str,
        owner_id: &str,
        report: &Report,
    ) -> Result<String> {
        let bytes = backend.photo_source.read(local_ref).await?;
        let key = Self::photo_key(owner_id, report);

        backend
            .blob_store
            .upload(&key, bytes, "image/jpeg")
            .await
            .map_err(|e| match e {
                AppError::UploadFailed(_) => e,
                other => AppError::UploadFailed(other.to_string()),
            })
    }

    /// Key scoped by the owner plus a creation-millis + random suffix, unique
    /// within a user's namespace.
    fn photo_key(owner_id: &str, report: &Report) -> String {
        let token = Uuid::new_v4().simple().to_string();
        format!(
            "{}/{}/{}_{}.jpg",
            PHOTO_KEY_PREFIX,
            owner_id,
            report.created_at.timestamp_millis(),
            &token[..8]
        )
    }
}
