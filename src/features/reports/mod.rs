//! Road-hazard report feature.
//!
//! The Report entity validates its own fields (first failing rule wins); the
//! ReportService runs the construct → validate → upload → persist pipeline
//! against whichever storage backend the deployment is configured with.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/reports` | No | Submit a report |
//! | GET | `/api/reports` | No | List all reports |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ReportService;
