//! Storage module for report persistence
//!
//! Document stores keep the structured report records (Postgres in remote
//! mode, an in-process collection in local mode); the blob store keeps the
//! photo binaries and serves them by public URL.

mod document_store;
mod s3_photo_store;

pub use document_store::{DocumentStore, MemoryDocumentStore, PgDocumentStore};
pub use s3_photo_store::{BlobStore, S3PhotoStore};
