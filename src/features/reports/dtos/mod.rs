mod report_dto;

pub use report_dto::{CreateReportDto, ReportResponseDto};
