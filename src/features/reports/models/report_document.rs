use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Store-side projection of a validated report, built once per successful
/// creation call and never mutated afterwards.
///
/// `photo_url` holds the resolved remote URL in remote mode and the original
/// local ref in local mode. `timestamp` is assigned by the store at write
/// time, not copied from the report.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument {
    pub id: Uuid,
    pub description: String,
    pub latitude: f64,
    pub longitude: Option<f64>,
    pub photo_url: Option<String>,
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub app_id: String,
}

/// Fields the pipeline hands to the document store. The store assigns the
/// write timestamp itself.
#[derive(Debug, Clone)]
pub struct NewReportDocument {
    pub id: Uuid,
    pub description: String,
    pub latitude: f64,
    pub longitude: Option<f64>,
    pub photo_url: Option<String>,
    pub status: String,
    pub user_id: String,
    pub app_id: String,
}
