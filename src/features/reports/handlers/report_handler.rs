use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::reports::dtos::{CreateReportDto, ReportResponseDto};
use crate::features::reports::services::ReportService;
use crate::shared::types::{ApiResponse, Meta};

/// Submit a road-hazard report
///
/// Validation failures return the entity's message verbatim; connectivity and
/// storage failures map to 503/502 so the client can offer a retry.
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = CreateReportDto,
    responses(
        (status = 201, description = "Report created", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 502, description = "Photo upload or document write failed"),
        (status = 503, description = "Report store unavailable")
    ),
    tag = "reports"
)]
pub async fn create_report(
    State(service): State<Arc<ReportService>>,
    AppJson(dto): AppJson<CreateReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReportResponseDto>>)> {
    let stored = service.create_report(dto.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(stored.into()),
            Some("Report received. Thank you for helping fix the roads!".to_string()),
            None,
        )),
    ))
}

/// List all submitted reports in submission order
#[utoipa::path(
    get,
    path = "/api/reports",
    responses(
        (status = 200, description = "All reports in insertion order", body = ApiResponse<Vec<ReportResponseDto>>)
    ),
    tag = "reports"
)]
pub async fn list_reports(
    State(service): State<Arc<ReportService>>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let documents = service.list_reports().await?;
    let total = documents.len() as i64;
    let reports: Vec<ReportResponseDto> = documents.into_iter().map(Into::into).collect();

    Ok(Json(ApiResponse::success(
        Some(reports),
        None,
        Some(Meta { total }),
    )))
}

#[cfg(test)]
mod tests {
    use axum_test::TestServer;
    use serde_json::json;
    use std::sync::Arc;

    use crate::features::identity::AnonymousIdentityProvider;
    use crate::features::reports::routes;
    use crate::features::reports::services::ReportService;
    use crate::modules::storage::MemoryDocumentStore;

    fn local_server() -> TestServer {
        let service = Arc::new(ReportService::new(
            Arc::new(MemoryDocumentStore::new()),
            None,
            Arc::new(AnonymousIdentityProvider::with_user_id("anon_user")),
            "MandaTuHoyoApp-Dev".to_string(),
        ));
        TestServer::new(routes::routes(service)).unwrap()
    }

    #[tokio::test]
    async fn post_valid_report_returns_created() {
        let server = local_server();

        let response = server
            .post("/api/reports")
            .json(&json!({
                "description": "Large pothole on Main St",
                "location": {"latitude": 19.43, "longitude": -99.13},
                "photoLocalRef": "file://abc.jpg"
            }))
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["photoUrl"], "file://abc.jpg");
        assert_eq!(body["data"]["status"], "pending");
        assert_eq!(body["data"]["userId"], "anon_user");
    }

    #[tokio::test]
    async fn post_invalid_report_returns_bad_request_with_message() {
        let server = local_server();

        let response = server
            .post("/api/reports")
            .json(&json!({
                "description": "short",
                "location": {"latitude": 19.43, "longitude": -99.13},
                "photoLocalRef": "file://abc.jpg"
            }))
            .await;

        response.assert_status(axum::http::StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("at least 10 characters"));
    }

    #[tokio::test]
    async fn list_reflects_submissions_in_order() {
        let server = local_server();

        for description in ["First pothole report", "Second pothole report"] {
            server
                .post("/api/reports")
                .json(&json!({
                    "description": description,
                    "location": {"latitude": 19.43, "longitude": -99.13},
                    "photoLocalRef": "file://abc.jpg"
                }))
                .await
                .assert_status(axum::http::StatusCode::CREATED);
        }

        let response = server.get("/api/reports").await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["meta"]["total"], 2);
        assert_eq!(body["data"][0]["description"], "First pothole report");
        assert_eq!(body["data"][1]["description"], "Second pothole report");
    }
}
