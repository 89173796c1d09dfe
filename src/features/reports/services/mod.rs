mod report_service;

pub use report_service::{NewReportInput, PhotoUploadBackend, ReportService};
