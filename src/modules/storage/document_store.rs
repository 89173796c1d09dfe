use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use sqlx::PgPool;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{GeoPoint, NewReportDocument, Report, ReportDocument};
use crate::shared::constants::REPORTS_COLLECTION;

/// Durable storage for report documents.
///
/// `insert` assigns the write timestamp; `list_all` returns documents in
/// insertion order. Concurrent inserts are safe: Postgres serializes through
/// the database, the in-memory store through its lock.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, document: NewReportDocument) -> Result<ReportDocument>;

    async fn list_all(&self) -> Result<Vec<ReportDocument>>;
}

/// Postgres-backed document store (remote mode).
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(&self, document: NewReportDocument) -> Result<ReportDocument> {
        let sql = format!(
            r#"
            INSERT INTO {} (id, description, latitude, longitude, photo_url, status, user_id, app_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, description, latitude, longitude, photo_url, status, "timestamp", user_id, app_id
            "#,
            REPORTS_COLLECTION
        );

        let stored = sqlx::query_as::<_, ReportDocument>(&sql)
            .bind(document.id)
            .bind(&document.description)
            .bind(document.latitude)
            .bind(document.longitude)
            .bind(&document.photo_url)
            .bind(&document.status)
            .bind(&document.user_id)
            .bind(&document.app_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to write report document: {:?}", e);
                AppError::PersistFailed(format!("Could not write report document: {}", e))
            })?;

        info!("Stored report document: {}", stored.id);
        Ok(stored)
    }

    async fn list_all(&self) -> Result<Vec<ReportDocument>> {
        let sql = format!(
            r#"
            SELECT id, description, latitude, longitude, photo_url, status, "timestamp", user_id, app_id
            FROM {}
            ORDER BY seq
            "#,
            REPORTS_COLLECTION
        );

        let documents = sqlx::query_as::<_, ReportDocument>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(documents)
    }
}

/// Seed entry shape for the local store, matching the raw fields the mobile
/// client captures.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedReport {
    description: String,
    location: Option<GeoPoint>,
    photo_local_ref: Option<String>,
    user_id: Option<String>,
}

/// In-process document store (local mode).
///
/// A single process-wide ordered collection; appends are serialized through
/// the mutex so concurrent submissions cannot lose updates.
pub struct MemoryDocumentStore {
    reports: Mutex<Vec<ReportDocument>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            reports: Mutex::new(Vec::new()),
        }
    }

    /// Load seed reports from a JSON file into the collection.
    ///
    /// Each entry goes through the regular entity constructor and validation;
    /// malformed entries are skipped with a warning rather than failing
    /// startup.
    pub async fn load_seed_file(&self, path: &str, app_id: &str) -> Result<usize> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AppError::Internal(format!("Could not read seed file '{}': {}", path, e)))?;

        let seeds: Vec<SeedReport> = serde_json::from_str(&raw)
            .map_err(|e| AppError::Internal(format!("Invalid seed file '{}': {}", path, e)))?;

        let mut loaded = 0;
        let mut reports = self.reports.lock().await;
        for seed in seeds {
            let report = Report::new(
                seed.description,
                seed.location,
                seed.photo_local_ref,
                seed.user_id.or_else(|| Some("anon_user".to_string())),
            );

            let Some(latitude) = report.location.and_then(|l| l.latitude) else {
                warn!("Skipping seed report without latitude: {}", report.summary());
                continue;
            };

            reports.push(ReportDocument {
                id: report.id,
                description: report.description,
                latitude,
                longitude: report.location.and_then(|l| l.longitude),
                photo_url: report.photo_local_ref,
                status: report.status.to_string(),
                timestamp: Utc::now(),
                user_id: report.owner_id.unwrap_or_else(|| "anon_user".to_string()),
                app_id: app_id.to_string(),
            });
            loaded += 1;
        }

        info!("Loaded {} seed reports from '{}'", loaded, path);
        Ok(loaded)
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(&self, document: NewReportDocument) -> Result<ReportDocument> {
        let stored = ReportDocument {
            id: document.id,
            description: document.description,
            latitude: document.latitude,
            longitude: document.longitude,
            photo_url: document.photo_url,
            status: document.status,
            timestamp: Utc::now(),
            user_id: document.user_id,
            app_id: document.app_id,
        };

        let mut reports = self.reports.lock().await;
        reports.push(stored.clone());

        info!("Stored report document in memory: {}", stored.id);
        Ok(stored)
    }

    async fn list_all(&self) -> Result<Vec<ReportDocument>> {
        let reports = self.reports.lock().await;
        Ok(reports.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use uuid::Uuid;

    fn new_document(description: &str) -> NewReportDocument {
        NewReportDocument {
            id: Uuid::now_v7(),
            description: description.to_string(),
            latitude: 19.43,
            longitude: Some(-99.13),
            photo_url: Some("file://abc.jpg".to_string()),
            status: "pending".to_string(),
            user_id: "anon_user".to_string(),
            app_id: "MandaTuHoyoApp-Dev".to_string(),
        }
    }

    #[tokio::test]
    async fn memory_store_preserves_insertion_order() {
        let store = MemoryDocumentStore::new();

        store.insert(new_document("first")).await.unwrap();
        store.insert(new_document("second")).await.unwrap();
        store.insert(new_document("third")).await.unwrap();

        let all = store.list_all().await.unwrap();
        let descriptions: Vec<_> = all.iter().map(|d| d.description.as_str()).collect();
        assert_eq!(descriptions, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn memory_store_assigns_write_timestamp() {
        let store = MemoryDocumentStore::new();
        let before = Utc::now();
        let stored = store.insert(new_document("timestamped")).await.unwrap();
        assert!(stored.timestamp >= before);
    }

    #[tokio::test]
    async fn concurrent_appends_are_not_lost() {
        let store = Arc::new(MemoryDocumentStore::new());

        let mut handles = Vec::new();
        for i in 0..32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .insert(new_document(&format!("report {}", i)))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.list_all().await.unwrap().len(), 32);
    }

    #[tokio::test]
    async fn seed_file_loads_valid_entries_and_skips_latitude_less_ones() {
        let seed = r#"[
            {
                "description": "Bache enorme frente al mercado",
                "location": {"latitude": 19.43, "longitude": -99.13},
                "photoLocalRef": "file://seed1.jpg",
                "userId": "seed_user"
            },
            {
                "description": "No coordinates on this one",
                "photoLocalRef": "file://seed2.jpg"
            }
        ]"#;
        let path = std::env::temp_dir().join("mandatuhoyo_seed_test.json");
        std::fs::write(&path, seed).unwrap();

        let store = MemoryDocumentStore::new();
        let loaded = store
            .load_seed_file(path.to_str().unwrap(), "MandaTuHoyoApp-Dev")
            .await
            .unwrap();

        assert_eq!(loaded, 1);
        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].user_id, "seed_user");
        assert_eq!(all[0].app_id, "MandaTuHoyoApp-Dev");

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn missing_seed_file_is_an_error() {
        let store = MemoryDocumentStore::new();
        let result = store
            .load_seed_file("/nonexistent/reportes.json", "MandaTuHoyoApp-Dev")
            .await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
