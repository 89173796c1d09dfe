mod report;
mod report_document;

pub use report::{GeoPoint, Report, ReportStatus, ValidationError};
pub use report_document::{NewReportDocument, ReportDocument};
