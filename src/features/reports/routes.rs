use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::reports::handlers::report_handler;
use crate::features::reports::services::ReportService;

/// Create routes for the reports feature
///
/// Submissions are anonymous, so no authentication layer is applied.
pub fn routes(service: Arc<ReportService>) -> Router {
    Router::new()
        .route("/api/reports", post(report_handler::create_report))
        .route("/api/reports", get(report_handler::list_reports))
        .with_state(service)
}
