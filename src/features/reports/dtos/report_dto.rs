use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::reports::models::{GeoPoint, ReportDocument};
use crate::features::reports::services::NewReportInput;

/// Request DTO for submitting a report.
///
/// Field-level validation is deliberately absent here: the Report entity owns
/// its rules and reports the first violation only.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportDto {
    /// What the citizen observed (at least 10 characters)
    pub description: String,

    /// GPS coordinates from the device
    pub location: Option<GeoPoint>,

    /// Local ref of the captured photo (`file://...`)
    pub photo_local_ref: Option<String>,
}

impl From<CreateReportDto> for NewReportInput {
    fn from(dto: CreateReportDto) -> Self {
        NewReportInput {
            description: dto.description,
            location: dto.location,
            photo_local_ref: dto.photo_local_ref,
        }
    }
}

/// Response DTO for a stored report document
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponseDto {
    pub id: Uuid,
    pub description: String,
    pub location: GeoPoint,
    /// Remote photo URL in remote mode, the original local ref in local mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub app_id: String,
}

impl From<ReportDocument> for ReportResponseDto {
    fn from(document: ReportDocument) -> Self {
        Self {
            id: document.id,
            description: document.description,
            location: GeoPoint {
                latitude: Some(document.latitude),
                longitude: document.longitude,
            },
            photo_url: document.photo_url,
            status: document.status,
            timestamp: document.timestamp,
            user_id: document.user_id,
            app_id: document.app_id,
        }
    }
}
