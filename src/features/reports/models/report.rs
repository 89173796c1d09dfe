use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::constants::{DESCRIPTION_MIN_LEN, SUMMARY_DESCRIPTION_LEN};

/// Report lifecycle status. New reports always start as `Pending`;
/// transitions happen in moderation tooling outside this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    InProgress,
    Resolved,
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Pending => write!(f, "pending"),
            ReportStatus::InProgress => write!(f, "in_progress"),
            ReportStatus::Resolved => write!(f, "resolved"),
        }
    }
}

/// GPS coordinate pair as captured by the device.
///
/// Both components are optional because capture can hand over partial fixes;
/// validation only insists on a latitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl GeoPoint {
    #[allow(dead_code)]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
        }
    }
}

/// A single report failing validation. First failing rule wins; a report
/// never carries more than one of these at a time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("The description must be at least 10 characters")]
    DescriptionTooShort,

    #[error("A GPS location with latitude is required")]
    LocationRequired,

    #[error("A photo of the road hazard is required")]
    PhotoRequired,
}

/// A citizen-submitted road-hazard observation.
///
/// Owned by the creation pipeline that constructs it: the service derives a
/// persisted document from it and discards it. Construction always succeeds;
/// well-formedness is checked separately with [`Report::validate`].
#[derive(Debug, Clone)]
pub struct Report {
    pub id: Uuid,
    pub description: String,
    pub location: Option<GeoPoint>,
    pub photo_local_ref: Option<String>,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    pub owner_id: Option<String>,
}

impl Report {
    /// Build a report from raw captured fields. Assigns a creation-time
    /// ordered id, stamps the current time, and fixes status to `Pending`.
    pub fn new(
        description: impl Into<String>,
        location: Option<GeoPoint>,
        photo_local_ref: Option<String>,
        owner_id: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            description: description.into(),
            location,
            photo_local_ref,
            status: ReportStatus::Pending,
            created_at: Utc::now(),
            owner_id,
        }
    }

    /// Check the field constraints in order, returning the first violation.
    ///
    /// Pure function of the current field values. Rule order matters: a short
    /// description masks a missing location, which masks a missing photo.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.description.chars().count() < DESCRIPTION_MIN_LEN {
            return Err(ValidationError::DescriptionTooShort);
        }
        if self.location.and_then(|l| l.latitude).is_none() {
            return Err(ValidationError::LocationRequired);
        }
        if self.photo_local_ref.is_none() {
            return Err(ValidationError::PhotoRequired);
        }
        Ok(())
    }

    /// One-line diagnostic summary for logs. Not part of the durable contract.
    pub fn summary(&self) -> String {
        let desc: String = self
            .description
            .chars()
            .take(SUMMARY_DESCRIPTION_LEN)
            .collect();
        format!("Report {}, Status: {}, Desc: {}...", self.id, self.status, desc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_report() -> Report {
        Report::new(
            "Large pothole on Main St",
            Some(GeoPoint::new(19.43, -99.13)),
            Some("file://abc.jpg".to_string()),
            Some("anon_user".to_string()),
        )
    }

    #[test]
    fn valid_report_passes() {
        assert_eq!(valid_report().validate(), Ok(()));
    }

    #[test]
    fn short_description_fails() {
        let mut report = valid_report();
        report.description = "too short".to_string(); // 9 chars
        assert_eq!(
            report.validate(),
            Err(ValidationError::DescriptionTooShort)
        );
    }

    #[test]
    fn empty_description_fails() {
        let report = Report::new("", None, None, None);
        assert_eq!(
            report.validate(),
            Err(ValidationError::DescriptionTooShort)
        );
    }

    #[test]
    fn exactly_ten_chars_passes_description_rule() {
        let mut report = valid_report();
        report.description = "0123456789".to_string();
        assert_eq!(report.validate(), Ok(()));
    }

    #[test]
    fn short_description_wins_over_other_violations() {
        // First failing rule wins: everything is missing, but only the
        // description error is reported.
        let report = Report::new("bad", None, None, None);
        assert_eq!(
            report.validate(),
            Err(ValidationError::DescriptionTooShort)
        );
    }

    #[test]
    fn missing_location_fails() {
        let mut report = valid_report();
        report.location = None;
        assert_eq!(report.validate(), Err(ValidationError::LocationRequired));
    }

    #[test]
    fn location_without_latitude_fails() {
        let mut report = valid_report();
        report.location = Some(GeoPoint {
            latitude: None,
            longitude: Some(-99.13),
        });
        assert_eq!(report.validate(), Err(ValidationError::LocationRequired));
    }

    #[test]
    fn location_without_longitude_still_passes() {
        let mut report = valid_report();
        report.location = Some(GeoPoint {
            latitude: Some(19.43),
            longitude: None,
        });
        assert_eq!(report.validate(), Ok(()));
    }

    #[test]
    fn missing_photo_fails() {
        let mut report = valid_report();
        report.photo_local_ref = None;
        assert_eq!(report.validate(), Err(ValidationError::PhotoRequired));
    }

    #[test]
    fn location_error_masks_photo_error() {
        let report = Report::new("Large pothole on Main St", None, None, None);
        assert_eq!(report.validate(), Err(ValidationError::LocationRequired));
    }

    #[test]
    fn construction_assigns_pending_status_and_id() {
        let report = valid_report();
        assert_eq!(report.status, ReportStatus::Pending);
        assert!(!report.id.is_nil());
    }

    #[test]
    fn ids_are_distinct_and_time_ordered() {
        let a = valid_report();
        let b = valid_report();
        assert_ne!(a.id, b.id);
        // UUID v7 sorts by creation time
        assert!(a.id < b.id);
    }

    #[test]
    fn summary_truncates_description_to_thirty_chars() {
        let mut report = valid_report();
        report.description = "x".repeat(50);
        let summary = report.summary();
        assert_eq!(
            summary,
            format!("Report {}, Status: pending, Desc: {}...", report.id, "x".repeat(30))
        );
    }

    #[test]
    fn summary_handles_short_and_multibyte_descriptions() {
        let mut report = valid_report();
        report.description = "bache grandísimo en la calle ñ".to_string();
        // Must not panic on char boundaries
        let summary = report.summary();
        assert!(summary.starts_with(&format!("Report {}", report.id)));
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn validation_has_no_side_effects() {
        let report = valid_report();
        let before = report.clone();
        let _ = report.validate();
        assert_eq!(report.description, before.description);
        assert_eq!(report.status, before.status);
    }
}
