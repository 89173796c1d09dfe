//! Modules layer - Infrastructure components for external integrations
//!
//! Contains storage backends and the device-capture collaborator contracts.

pub mod capture;
pub mod storage;
