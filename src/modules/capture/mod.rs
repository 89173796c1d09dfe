//! Device capture collaborators.
//!
//! Permission prompts, GPS fixes and camera shots happen on the client
//! device; this module defines the contract those collaborators satisfy plus
//! the one piece that runs server-side: resolving a local photo ref to bytes
//! for upload. Capture failures are deliberately a different type from the
//! pipeline's `AppError` so callers can tell "the device could not capture"
//! apart from "the pipeline rejected or lost the report".

use async_trait::async_trait;
use thiserror::Error;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::GeoPoint;

/// Errors raised while acquiring input, before the creation pipeline runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("GPS unavailable: {0}")]
    GpsUnavailable(String),

    #[error("Capture cancelled")]
    Cancelled,
}

/// Contract for the device-side capture collaborator.
///
/// Implementations live in the client (camera + GPS hardware); the doubles in
/// the test suite drive the full submission flow against it.
#[allow(dead_code)]
#[async_trait]
pub trait CaptureProvider: Send + Sync {
    async fn request_location_permission(&self) -> std::result::Result<(), CaptureError>;

    async fn get_current_location(&self) -> std::result::Result<GeoPoint, CaptureError>;

    async fn request_camera_permission(&self) -> std::result::Result<(), CaptureError>;

    /// Take a photo, returning an opaque local ref (`file://...`).
    async fn capture_photo(&self) -> std::result::Result<String, CaptureError>;
}

/// Resolves a local photo ref to its bytes for upload.
#[async_trait]
pub trait PhotoSource: Send + Sync {
    async fn read(&self, local_ref: &str) -> Result<Vec<u8>>;
}

/// Reads `file://` refs (or plain paths) from the local filesystem.
///
/// A read failure counts as an upload failure: it aborts the photo step the
/// same way a rejected blob write would.
pub struct FsPhotoSource;

#[async_trait]
impl PhotoSource for FsPhotoSource {
    async fn read(&self, local_ref: &str) -> Result<Vec<u8>> {
        let path = local_ref.strip_prefix("file://").unwrap_or(local_ref);

        tokio::fs::read(path).await.map_err(|e| {
            AppError::UploadFailed(format!("Could not read photo '{}': {}", local_ref, e))
        })
    }
}
